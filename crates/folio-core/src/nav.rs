#![forbid(unsafe_code)]

//! Navigation decisions: active section, navbar style, fragment links and
//! scroll progress.
//!
//! Everything here is a pure function of scroll geometry. The
//! [`crate::Portfolio`] controller reads the geometry from the page and
//! applies the result.

/// Vertical extent of one page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open containment: `[top, top + height)`.
    #[must_use]
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.top && offset < self.top + self.height
    }
}

/// Section containing `offset`, scanning in document order.
///
/// When ranges overlap the last matching section wins.
#[must_use]
pub fn active_section(offset: f64, sections: &[SectionBounds]) -> Option<&str> {
    let mut hit: Option<&SectionBounds> = None;
    for section in sections.iter().filter(|s| s.contains(offset)) {
        if let Some(prev) = hit {
            tracing::debug!(
                offset,
                shadowed = %prev.id,
                winner = %section.id,
                "overlapping sections; later section wins"
            );
        }
        hit = Some(section);
    }
    hit.map(|s| s.id.as_str())
}

/// Navbar presentation for a given scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavbarStyle {
    /// Translucent, no shadow (near the top of the page).
    Baseline,
    /// More opaque, with a drop shadow.
    Emphasized,
}

#[must_use]
pub fn navbar_style(scroll_y: f64, threshold: f64) -> NavbarStyle {
    if scroll_y > threshold {
        NavbarStyle::Emphasized
    } else {
        NavbarStyle::Baseline
    }
}

/// What a nav-link click resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkClick {
    /// Not an in-page link; the browser should navigate normally.
    Navigate,
    /// In-page link whose target exists; scrolled to `top`.
    Scrolled { target: String, top: f64 },
    /// In-page link whose target does not exist; nothing happened.
    MissingTarget(String),
}

impl LinkClick {
    /// Whether the host must suppress the browser's default navigation.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Navigate)
    }
}

/// Target id of a fragment link (`"#about"` → `"about"`).
#[must_use]
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#')
}

/// Percentage of the scrollable height already scrolled, in `[0, 100]`.
#[must_use]
pub fn scroll_progress(scroll_y: f64, viewport_height: f64, document_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable.is_nan() || scrollable <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn page_sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds::new("home", 0.0, 600.0),
            SectionBounds::new("about", 600.0, 800.0),
            SectionBounds::new("projects", 1400.0, 1000.0),
        ]
    }

    #[test]
    fn active_section_uses_half_open_ranges() {
        let sections = page_sections();
        assert_eq!(active_section(0.0, &sections), Some("home"));
        assert_eq!(active_section(599.9, &sections), Some("home"));
        assert_eq!(active_section(600.0, &sections), Some("about"));
        assert_eq!(active_section(2399.0, &sections), Some("projects"));
        assert_eq!(active_section(2400.0, &sections), None);
        assert_eq!(active_section(-1.0, &sections), None);
    }

    #[test]
    fn overlapping_sections_resolve_to_last_match() {
        let sections = vec![
            SectionBounds::new("outer", 0.0, 1000.0),
            SectionBounds::new("inner", 200.0, 100.0),
        ];
        assert_eq!(active_section(250.0, &sections), Some("inner"));
        assert_eq!(active_section(350.0, &sections), Some("outer"));
    }

    #[test]
    fn no_sections_means_no_active_section() {
        assert_eq!(active_section(100.0, &[]), None);
    }

    #[test]
    fn navbar_threshold_is_exclusive() {
        assert_eq!(navbar_style(0.0, 100.0), NavbarStyle::Baseline);
        assert_eq!(navbar_style(100.0, 100.0), NavbarStyle::Baseline);
        assert_eq!(navbar_style(100.5, 100.0), NavbarStyle::Emphasized);
    }

    #[test]
    fn fragment_targets() {
        assert_eq!(fragment_target("#about"), Some("about"));
        assert_eq!(fragment_target("#"), Some(""));
        assert_eq!(fragment_target("https://example.org/#x"), None);
        assert_eq!(fragment_target("resume.pdf"), None);
    }

    #[test]
    fn only_external_links_keep_default_navigation() {
        assert!(!LinkClick::Navigate.prevents_default());
        assert!(LinkClick::MissingTarget("gone".into()).prevents_default());
        assert!(
            LinkClick::Scrolled {
                target: "about".into(),
                top: 530.0,
            }
            .prevents_default()
        );
    }

    #[test]
    fn scroll_progress_is_clamped() {
        assert_eq!(scroll_progress(0.0, 800.0, 2800.0), 0.0);
        assert_eq!(scroll_progress(1000.0, 800.0, 2800.0), 50.0);
        assert_eq!(scroll_progress(5000.0, 800.0, 2800.0), 100.0);
        assert_eq!(scroll_progress(-20.0, 800.0, 2800.0), 0.0);
        // Page shorter than the viewport never scrolls.
        assert_eq!(scroll_progress(0.0, 800.0, 600.0), 0.0);
    }
}
