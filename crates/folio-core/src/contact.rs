#![forbid(unsafe_code)]

//! Contact form validation and the simulated submission state machine.
//!
//! # Field states
//!
//! ```text
//!            blur(valid)               blur(invalid)
//! Untouched ───────────► Valid   Untouched ─────────► Invalid
//!     ▲                                                  │
//!     └──────────────────────── input ───────────────────┘
//! ```
//!
//! `submit` validates all four fields at once, whatever their history.
//! Validation looks only at the trimmed value. Trimming and the email rule use
//! the browser's whitespace set, and lengths are counted in UTF-16 code units,
//! matching what `value.trim().length` reports in the page.
//!
//! # Submission
//!
//! `Idle → Sending → Idle`. While `Sending`, further submits are refused; the
//! submit control is disabled for the same span.

use std::sync::LazyLock;

use regex::Regex;

/// `[^\s@]` with `\s` as browsers define it: no U+0085, plus U+FEFF.
const NOT_SPACE_OR_AT: &str =
    r"[^\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}@]";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    let part = NOT_SPACE_OR_AT;
    Regex::new(&format!(r"^{part}+@{part}+\.{part}+$")).unwrap()
});

/// Whitespace and line terminators as `String.prototype.trim` strips them.
const fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Length as the page's scripts see it: UTF-16 code units.
fn js_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// One of the four contact form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    /// Default element id of the input. Pages that use other ids set
    /// [`crate::config::FieldIds`].
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Default element id of the inline error slot.
    #[must_use]
    pub const fn error_slot_id(self) -> &'static str {
        match self {
            Self::Name => "nameError",
            Self::Email => "emailError",
            Self::Subject => "subjectError",
            Self::Message => "messageError",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == id)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// A failed field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
}

impl FieldError {
    /// Message shown in the field's error slot.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self.field {
            Field::Name => "Name must be at least 2 characters long",
            Field::Email => "Please enter a valid email address",
            Field::Subject => "Subject must be at least 3 characters long",
            Field::Message => "Message must be at least 10 characters long",
        }
    }
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FieldError {}

/// Check `value` against the rule for `field`.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    let value = value.trim_matches(is_js_whitespace);
    let ok = match field {
        Field::Name => js_len(value) >= 2,
        Field::Email => EMAIL.is_match(value),
        Field::Subject => js_len(value) >= 3,
        Field::Message => js_len(value) >= 10,
    };
    if ok { Ok(()) } else { Err(FieldError { field }) }
}

/// Display state of one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldState {
    #[default]
    Untouched,
    Invalid,
    Valid,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed for these fields; nothing was sent.
    Rejected(Vec<Field>),
    /// All fields passed; the simulated send is in flight.
    Sending,
    /// A previous submission is still in flight.
    AlreadySending,
    /// The page has no contact form.
    Unbound,
}

/// Field and submission state, independent of any page.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    states: [FieldState; 4],
    /// Submit control markup saved while a submission is in flight.
    in_flight: Option<String>,
}

impl ContactForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, field: Field) -> FieldState {
        self.states[field.index()]
    }

    /// Focus left `field`: validate its current value.
    pub fn blur(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        let result = validate_field(field, value);
        self.states[field.index()] = if result.is_ok() {
            FieldState::Valid
        } else {
            FieldState::Invalid
        };
        result
    }

    /// The user edited `field`: drop any displayed error without revalidating.
    pub fn input(&mut self, field: Field) {
        self.states[field.index()] = FieldState::Untouched;
    }

    /// Validate every field; returns the failures in form order.
    pub fn validate_all<'a>(
        &mut self,
        values: impl IntoIterator<Item = (Field, &'a str)>,
    ) -> Vec<FieldError> {
        values
            .into_iter()
            .filter_map(|(field, value)| self.blur(field, value).err())
            .collect()
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Enter `Sending`, remembering the submit control's label.
    ///
    /// Returns `false` if a submission is already in flight.
    pub fn begin_send(&mut self, original_label: String) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(original_label);
        true
    }

    /// Leave `Sending`; yields the label to restore. Every field is
    /// `Untouched` afterwards since the form was cleared.
    pub fn finish_send(&mut self) -> Option<String> {
        let label = self.in_flight.take()?;
        self.states = [FieldState::Untouched; 4];
        Some(label)
    }
}
