#![forbid(unsafe_code)]

//! The page capability consumed by the engine.
//!
//! [`Page`] is a thin slice of the DOM: element lookup, geometry, classes,
//! inline styles, form values and window scrolling. Implementations are
//! expected to be cheap handles over the real document (`folio-web`) or an
//! in-memory tree ([`crate::MemoryPage`]).
//!
//! Geometry follows the DOM: `offset_top` and `offset_height` are layout
//! pixels, `scroll_y` is the window's vertical scroll offset.

/// How a scroll request should be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Access to the hosting document.
pub trait Page {
    /// Handle to one element. Equality must be element identity.
    type Element: Clone + PartialEq + core::fmt::Debug;

    // ── Lookup ────────────────────────────────────────────────────────

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    fn body(&self) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    // ── Geometry ──────────────────────────────────────────────────────

    fn offset_top(&self, element: &Self::Element) -> f64;

    fn offset_height(&self, element: &Self::Element) -> f64;

    // ── Presentation ──────────────────────────────────────────────────

    fn add_class(&mut self, element: &Self::Element, class: &str);

    fn remove_class(&mut self, element: &Self::Element, class: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Toggle `class` and return whether it is now present.
    fn toggle_class(&mut self, element: &Self::Element, class: &str) -> bool {
        if self.has_class(element, class) {
            self.remove_class(element, class);
            false
        } else {
            self.add_class(element, class);
            true
        }
    }

    /// Set an inline style property. An empty value removes the declaration.
    fn set_style(&mut self, element: &Self::Element, property: &str, value: &str);

    fn set_text(&mut self, element: &Self::Element, text: &str);

    fn inner_html(&self, element: &Self::Element) -> String;

    fn set_inner_html(&mut self, element: &Self::Element, html: &str);

    // ── Form controls ─────────────────────────────────────────────────

    fn value(&self, element: &Self::Element) -> String;

    fn set_value(&mut self, element: &Self::Element, value: &str);

    fn set_disabled(&mut self, element: &Self::Element, disabled: bool);

    // ── Window ────────────────────────────────────────────────────────

    fn scroll_y(&self) -> f64;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    fn viewport_height(&self) -> f64;

    fn document_height(&self) -> f64;
}
