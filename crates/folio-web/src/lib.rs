#![forbid(unsafe_code)]

//! WASM frontend for the portfolio page.
//!
//! This crate is intentionally host-specific (web/WASM). It wires the
//! browser's DOM events, timers and animation frames into
//! [`folio_core::Portfolio`] through a `web-sys` implementation of
//! [`folio_core::Page`].
//!
//! JS usage:
//!
//! ```js
//! import init, { FolioWeb } from "./pkg/folio_web.js";
//! await init();
//! const folio = new FolioWeb(JSON.stringify({ form: { send_delay_ms: 1500 } }));
//! folio.mount();
//! ```

pub mod greeting;
pub mod logging;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::DomPage;
#[cfg(target_arch = "wasm32")]
pub use wasm::FolioWeb;

use folio_core::{FolioConfig, FolioError};

/// Parse the optional JSON options object handed in from JS.
///
/// A missing or blank string yields the stock configuration.
pub fn parse_options(options: Option<&str>) -> Result<FolioConfig, FolioError> {
    match options.map(str::trim) {
        None | Some("") => Ok(FolioConfig::default()),
        Some(json) => FolioConfig::from_json_str(json),
    }
}

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioWeb {
    config: FolioConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl FolioWeb {
    pub fn new(options: Option<String>) -> Result<Self, FolioError> {
        Ok(Self {
            config: parse_options(options.as_deref())?,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &FolioConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn blank_options_are_defaults() {
        assert_eq!(parse_options(None).unwrap(), FolioConfig::default());
        assert_eq!(parse_options(Some("  ")).unwrap(), FolioConfig::default());
    }

    #[test]
    fn options_override_config() {
        let config = parse_options(Some(r#"{ "reveal": { "stagger_ms": 40 } }"#)).unwrap();
        assert_eq!(config.reveal.stagger_ms, 40);
    }

    #[test]
    fn malformed_options_are_errors() {
        assert!(matches!(
            parse_options(Some("{ nav: ")),
            Err(FolioError::Config(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_stub_validates_options() {
        let web = FolioWeb::new(Some(r#"{ "reveal": { "threshold": -0.5 } }"#.to_owned()));
        assert!(matches!(web, Err(FolioError::InvalidValue { .. })));
        let web = FolioWeb::new(None).unwrap();
        assert_eq!(web.config(), &FolioConfig::default());
    }
}
