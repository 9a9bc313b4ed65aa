#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field defaults to the values the portfolio page ships with, so
//! `FolioConfig::default()` reproduces the stock behavior. Hosts may override
//! any subset through a JSON options object:
//!
//! ```json
//! { "nav": { "navbar_threshold": 60 }, "form": { "send_delay_ms": 800 } }
//! ```
//!
//! Durations are expressed in milliseconds.

use core::time::Duration;

use serde::Deserialize;

use crate::FolioError;
use crate::contact::Field;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub form: FormConfig,
    pub selectors: SelectorConfig,
}

impl FolioConfig {
    /// Parse a JSON options object and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, FolioError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no page could sensibly use.
    pub fn validate(&self) -> Result<(), FolioError> {
        finite("nav.active_lookahead", self.nav.active_lookahead)?;
        finite("nav.navbar_threshold", self.nav.navbar_threshold)?;
        finite("reveal.threshold", self.reveal.threshold)?;
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(FolioError::InvalidValue {
                field: "reveal.threshold",
                reason: "must be within [0, 1]",
            });
        }
        if self.selectors.nav_links.trim().is_empty() {
            return Err(FolioError::InvalidValue {
                field: "selectors.nav_links",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), FolioError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FolioError::InvalidValue {
            field,
            reason: "must be a finite number",
        })
    }
}

/// Navigation bar and scroll behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Added to the scroll offset before locating the active section.
    pub active_lookahead: f64,
    /// Scroll offset above which the navbar switches to the emphasized style.
    pub navbar_threshold: f64,
    pub baseline_background: String,
    pub baseline_shadow: String,
    pub emphasized_background: String,
    pub emphasized_shadow: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            active_lookahead: 100.0,
            navbar_threshold: 100.0,
            baseline_background: "rgba(248, 250, 252, 0.95)".to_owned(),
            baseline_shadow: "none".to_owned(),
            emphasized_background: "rgba(248, 250, 252, 0.98)".to_owned(),
            emphasized_shadow: "0 4px 16px rgba(15, 23, 42, 0.08)".to_owned(),
        }
    }
}

/// Fade/slide-in reveal of content blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Intersection ratio at which a block counts as visible.
    pub threshold: f64,
    /// Root margin handed to the intersection observer.
    pub root_margin: String,
    /// Delay between consecutive reveals within one notification batch.
    pub stagger_ms: u64,
    pub hidden_transform: String,
    pub shown_transform: String,
    pub transition: String,
    /// Transition applied to project cards on hover.
    pub hover_transition: String,
}

impl RevealConfig {
    #[must_use]
    pub const fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_owned(),
            stagger_ms: 100,
            hidden_transform: "translateY(30px)".to_owned(),
            shown_transform: "translateY(0)".to_owned(),
            transition: "opacity 0.6s ease, transform 0.6s ease".to_owned(),
            hover_transition: "transform 0.3s ease, box-shadow 0.3s ease".to_owned(),
        }
    }
}

/// Simulated contact-form submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Pretend network latency before the success message appears.
    pub send_delay_ms: u64,
    /// How long the success message stays visible.
    pub success_visible_ms: u64,
    /// Submit button markup while a submission is in flight.
    pub sending_label: String,
}

impl FormConfig {
    #[must_use]
    pub const fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    #[must_use]
    pub const fn success_visible(&self) -> Duration {
        Duration::from_millis(self.success_visible_ms)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: 1500,
            success_visible_ms: 5000,
            sending_label: "<span>Sending...</span>".to_owned(),
        }
    }
}

/// Element ids and selectors the page is expected to provide.
///
/// `*_id` fields are element ids; the rest are CSS selectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    pub nav_toggle_id: String,
    pub nav_menu_id: String,
    pub navbar_id: String,
    pub nav_links: String,
    /// Element whose rendered height offsets smooth-scroll targets.
    pub nav_height: String,
    pub sections: String,
    pub reveal_targets: String,
    pub project_cards: String,
    pub contact_form_id: String,
    pub submit_button: String,
    pub form_success_id: String,
    pub fields: FieldIds,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            nav_toggle_id: "navToggle".to_owned(),
            nav_menu_id: "navMenu".to_owned(),
            navbar_id: "navbar".to_owned(),
            nav_links: ".nav-link".to_owned(),
            nav_height: ".nav".to_owned(),
            sections: "section[id]".to_owned(),
            reveal_targets: ".skill-category, .project-card, .timeline-item, .about-card"
                .to_owned(),
            project_cards: ".project-card".to_owned(),
            contact_form_id: "contactForm".to_owned(),
            submit_button: "button[type=\"submit\"]".to_owned(),
            form_success_id: "formSuccess".to_owned(),
            fields: FieldIds::default(),
        }
    }
}

/// Element ids of the contact form inputs and their error slots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldIds {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub name_error: String,
    pub email_error: String,
    pub subject_error: String,
    pub message_error: String,
}

impl FieldIds {
    #[must_use]
    pub fn input(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    #[must_use]
    pub fn error_slot(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name_error,
            Field::Email => &self.email_error,
            Field::Subject => &self.subject_error,
            Field::Message => &self.message_error,
        }
    }
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            name: Field::Name.id().to_owned(),
            email: Field::Email.id().to_owned(),
            subject: Field::Subject.id().to_owned(),
            message: Field::Message.id().to_owned(),
            name_error: Field::Name.error_slot_id().to_owned(),
            email_error: Field::Email.error_slot_id().to_owned(),
            subject_error: Field::Subject.error_slot_id().to_owned(),
            message_error: Field::Message.error_slot_id().to_owned(),
        }
    }
}
