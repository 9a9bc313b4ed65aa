#![forbid(unsafe_code)]

//! `folio-core` is the host-agnostic interaction engine behind the portfolio
//! page: navigation, reveal animations and the contact form.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) forwards DOM events
//!   (click, scroll, blur, input, submit, intersection changes).
//! - **Deterministic time**: the host advances a monotonic clock explicitly and
//!   signals animation frames; delayed work is queued as plain [`Task`] values.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The page itself is reached through the [`Page`] capability trait.
//! [`MemoryPage`] implements it in memory so every behavior can be driven and
//! asserted natively.
//!
//! ```ignore
//! use folio_core::{FolioConfig, MemoryPage, Portfolio};
//! use core::time::Duration;
//!
//! let mut folio = Portfolio::bind(page, FolioConfig::default());
//! folio.on_dom_ready();
//!
//! // Host-driven event loop
//! folio.on_scroll();
//! folio.advance_time(Duration::from_millis(16));
//! if folio.wants_animation_frame() {
//!     folio.run_animation_frame();
//! }
//! ```

pub mod config;
pub mod contact;
pub mod memory;
pub mod nav;
pub mod page;
pub mod portfolio;
pub mod reveal;
pub mod schedule;

pub use config::{FieldIds, FolioConfig, FormConfig, NavConfig, RevealConfig, SelectorConfig};
pub use contact::{Field, FieldError, FieldState, SubmitOutcome, validate_field};
pub use memory::MemoryPage;
pub use nav::{LinkClick, NavbarStyle, SectionBounds, active_section, navbar_style, scroll_progress};
pub use page::{Page, ScrollBehavior};
pub use portfolio::Portfolio;
pub use reveal::{RevealEntry, RevealTarget};
pub use schedule::{DeterministicClock, Scheduler, Task};

/// Error type for configuration and host-boundary failures.
///
/// Page behaviors themselves never fail; missing elements disable the
/// feature that needs them.
#[derive(Debug, Clone, PartialEq)]
pub enum FolioError {
    /// Options JSON could not be parsed.
    Config(String),
    /// A configuration value is outside its accepted range.
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl core::fmt::Display for FolioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid options: {msg}"),
            Self::InvalidValue { field, reason } => write!(f, "invalid value for {field}: {reason}"),
        }
    }
}

impl std::error::Error for FolioError {}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn error_display_names_the_field() {
        let err = FolioError::InvalidValue {
            field: "reveal.threshold",
            reason: "must be within [0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "invalid value for reveal.threshold: must be within [0, 1]"
        );
    }

    #[test]
    fn json_errors_convert_to_config_errors() {
        let err: FolioError = serde_json::from_str::<FolioConfig>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FolioError::Config(_)));
        assert!(err.to_string().starts_with("invalid options: "));
    }
}
