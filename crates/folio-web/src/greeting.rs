#![forbid(unsafe_code)]

//! Console greeting printed at mount.

/// One styled console line: `(text, css)`, logged as `console.log("%c" + text, css)`.
pub type ConsoleLine = (&'static str, &'static str);

pub const GREETING: [ConsoleLine; 3] = [
    (
        "👋 Hello, fellow developer!",
        "font-size: 20px; font-weight: bold; color: #06b6d4;",
    ),
    (
        "Thanks for checking out my portfolio. Feel free to explore the code!",
        "font-size: 14px; color: #64748b;",
    ),
    (
        "Interested in working together? Reach out via the contact form!",
        "font-size: 14px; color: #64748b;",
    ),
];

/// Format string for [`ConsoleLine`] text.
#[must_use]
pub fn styled(text: &str) -> String {
    format!("%c{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_line_is_styled() {
        for (text, css) in GREETING {
            assert!(styled(text).starts_with("%c"));
            assert!(css.ends_with(';'));
        }
    }
}
