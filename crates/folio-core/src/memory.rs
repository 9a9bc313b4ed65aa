#![forbid(unsafe_code)]

//! In-memory [`Page`] for deterministic tests and headless hosts.
//!
//! Elements live in an arena; handle order is creation order, which is taken
//! as document order, so build trees top-down. Selector support covers
//! compound selectors (`tag`, `#id`, `.class`, `[attr]`, `[attr="v"]`) and
//! comma-separated lists; combinators match nothing.

use std::collections::BTreeMap;

use crate::page::{Page, ScrollBehavior};

/// Handle to an element of a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryElement(usize);

/// Description of an element to insert.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    top: f64,
    height: f64,
    text: String,
    value: String,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Layout box: `offsetTop` and `offsetHeight`.
    #[must_use]
    pub fn bounds(mut self, top: f64, height: f64) -> Self {
        self.top = top;
        self.height = height;
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_owned();
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    spec: ElementSpec,
    parent: Option<usize>,
    style: BTreeMap<String, String>,
    inner_html: String,
    disabled: bool,
}

/// A recorded `scroll_to` request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Arena-backed document.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    body: usize,
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
    scrolls: Vec<ScrollRequest>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Create a page holding only a `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let body = Node {
            spec: ElementSpec::new("body"),
            parent: None,
            style: BTreeMap::new(),
            inner_html: String::new(),
            disabled: false,
        };
        Self {
            nodes: vec![body],
            body: 0,
            scroll_y: 0.0,
            viewport_height: 800.0,
            document_height: 800.0,
            scrolls: Vec::new(),
        }
    }

    /// Append an element under `parent` (the body when `None`).
    pub fn append(&mut self, parent: Option<MemoryElement>, spec: ElementSpec) -> MemoryElement {
        let idx = self.nodes.len();
        let inner_html = spec.text.clone();
        self.nodes.push(Node {
            spec,
            parent: Some(parent.map_or(self.body, |p| p.0)),
            style: BTreeMap::new(),
            inner_html,
            disabled: false,
        });
        MemoryElement(idx)
    }

    /// Set the window scroll offset without recording a scroll request.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn set_viewport(&mut self, viewport_height: f64, document_height: f64) {
        self.viewport_height = viewport_height;
        self.document_height = document_height;
    }

    /// Scroll requests issued through [`Page::scroll_to`], oldest first.
    #[must_use]
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    #[must_use]
    pub fn style(&self, element: MemoryElement, property: &str) -> Option<&str> {
        self.nodes[element.0].style.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn text(&self, element: MemoryElement) -> &str {
        &self.nodes[element.0].spec.text
    }

    #[must_use]
    pub fn is_disabled(&self, element: MemoryElement) -> bool {
        self.nodes[element.0].disabled
    }

    /// Simulate the user typing into a control.
    pub fn type_value(&mut self, element: MemoryElement, value: &str) {
        self.nodes[element.0].spec.value = value.to_owned();
    }

    fn is_descendant(&self, mut idx: usize, ancestor: usize) -> bool {
        while let Some(parent) = self.nodes[idx].parent {
            if parent == ancestor {
                return true;
            }
            idx = parent;
        }
        false
    }

    fn matching(&self, selector: &str) -> impl Iterator<Item = usize> + '_ {
        let compounds: Vec<Compound> = selector.split(',').filter_map(Compound::parse).collect();
        (0..self.nodes.len()).filter(move |&idx| {
            compounds
                .iter()
                .any(|compound| compound.matches(&self.nodes[idx].spec))
        })
    }
}

impl Page for MemoryPage {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.nodes
            .iter()
            .position(|node| node.spec.id.as_deref() == Some(id))
            .map(MemoryElement)
    }

    fn query_all(&self, selector: &str) -> Vec<MemoryElement> {
        self.matching(selector).map(MemoryElement).collect()
    }

    fn query_within(&self, scope: &MemoryElement, selector: &str) -> Option<MemoryElement> {
        self.matching(selector)
            .find(|&idx| self.is_descendant(idx, scope.0))
            .map(MemoryElement)
    }

    fn parent(&self, element: &MemoryElement) -> Option<MemoryElement> {
        self.nodes[element.0].parent.map(MemoryElement)
    }

    fn body(&self) -> Option<MemoryElement> {
        Some(MemoryElement(self.body))
    }

    fn attribute(&self, element: &MemoryElement, name: &str) -> Option<String> {
        let spec = &self.nodes[element.0].spec;
        match name {
            "id" => spec.id.clone(),
            "class" if !spec.classes.is_empty() => Some(spec.classes.join(" ")),
            _ => spec.attributes.get(name).cloned(),
        }
    }

    fn offset_top(&self, element: &MemoryElement) -> f64 {
        self.nodes[element.0].spec.top
    }

    fn offset_height(&self, element: &MemoryElement) -> f64 {
        self.nodes[element.0].spec.height
    }

    fn add_class(&mut self, element: &MemoryElement, class: &str) {
        let classes = &mut self.nodes[element.0].spec.classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, element: &MemoryElement, class: &str) {
        self.nodes[element.0].spec.classes.retain(|c| c != class);
    }

    fn has_class(&self, element: &MemoryElement, class: &str) -> bool {
        self.nodes[element.0].spec.classes.iter().any(|c| c == class)
    }

    fn set_style(&mut self, element: &MemoryElement, property: &str, value: &str) {
        let style = &mut self.nodes[element.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_owned(), value.to_owned());
        }
    }

    fn set_text(&mut self, element: &MemoryElement, text: &str) {
        let node = &mut self.nodes[element.0];
        node.spec.text = text.to_owned();
        node.inner_html = text.to_owned();
    }

    fn inner_html(&self, element: &MemoryElement) -> String {
        self.nodes[element.0].inner_html.clone()
    }

    fn set_inner_html(&mut self, element: &MemoryElement, html: &str) {
        let node = &mut self.nodes[element.0];
        node.inner_html = html.to_owned();
        node.spec.text = html.to_owned();
    }

    fn value(&self, element: &MemoryElement) -> String {
        self.nodes[element.0].spec.value.clone()
    }

    fn set_value(&mut self, element: &MemoryElement, value: &str) {
        self.nodes[element.0].spec.value = value.to_owned();
    }

    fn set_disabled(&mut self, element: &MemoryElement, disabled: bool) {
        self.nodes[element.0].disabled = disabled;
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push(ScrollRequest { top, behavior });
        self.scroll_y = top.max(0.0);
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }
}

/// One compound selector such as `button[type="submit"]` or `.nav-link`.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        let mut out = Self::default();
        let mut rest = selector;

        let tag_len = ident_len(rest);
        if tag_len > 0 {
            out.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 {
                        return None;
                    }
                    let name = rest[1..=len].to_owned();
                    if first == '.' {
                        out.classes.push(name);
                    } else {
                        out.id = Some(name);
                    }
                    rest = &rest[1 + len..];
                }
                '[' => {
                    let end = rest.find(']')?;
                    let body = &rest[1..end];
                    let attr = match body.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_owned(),
                            Some(value.trim().trim_matches(['"', '\'']).to_owned()),
                        ),
                        None => (body.trim().to_owned(), None),
                    };
                    out.attributes.push(attr);
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }
        Some(out)
    }

    fn matches(&self, spec: &ElementSpec) -> bool {
        if self.tag.as_ref().is_some_and(|tag| *tag != spec.tag) {
            return false;
        }
        if self.id.is_some() && self.id != spec.id {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|class| spec.classes.iter().any(|c| c == class))
        {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| {
            let actual = if name == "id" {
                spec.id.as_deref()
            } else {
                spec.attributes.get(name).map(String::as_str)
            };
            match (actual, expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            }
        })
    }
}

fn ident_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn sample() -> (MemoryPage, MemoryElement, MemoryElement, MemoryElement) {
        let mut page = MemoryPage::new();
        let form = page.append(None, ElementSpec::new("form").id("contactForm"));
        let button = page.append(
            Some(form),
            ElementSpec::new("button").attr("type", "submit").text("Send"),
        );
        let section = page.append(
            None,
            ElementSpec::new("section").id("about").bounds(100.0, 400.0),
        );
        (page, form, button, section)
    }

    #[test]
    fn attribute_selector_with_quoted_value() {
        let (page, form, button, _) = sample();
        assert_eq!(
            page.query_within(&form, "button[type=\"submit\"]"),
            Some(button)
        );
        assert_eq!(page.query_all("button[type=reset]"), vec![]);
    }

    #[test]
    fn presence_selector_matches_ids() {
        let (page, form, _, section) = sample();
        assert_eq!(page.query_all("section[id]"), vec![section]);
        assert_eq!(page.query_all("[id]"), vec![form, section]);
    }

    #[test]
    fn selector_lists_keep_document_order() {
        let mut page = MemoryPage::new();
        let a = page.append(None, ElementSpec::new("div").class("project-card"));
        let b = page.append(None, ElementSpec::new("div").class("about-card"));
        let c = page.append(None, ElementSpec::new("div").class("project-card"));
        assert_eq!(page.query_all(".about-card, .project-card"), vec![a, b, c]);
    }

    #[test]
    fn combinators_match_nothing() {
        let (page, ..) = sample();
        assert!(page.query_all("form button").is_empty());
    }

    #[test]
    fn query_within_excludes_outside_elements() {
        let (page, _, _, section) = sample();
        assert_eq!(page.query_within(&section, "button"), None);
    }

    #[test]
    fn toggle_class_reports_new_state() {
        let (mut page, form, ..) = sample();
        assert!(page.toggle_class(&form, "active"));
        assert!(page.has_class(&form, "active"));
        assert!(!page.toggle_class(&form, "active"));
        assert!(!page.has_class(&form, "active"));
    }

    #[test]
    fn empty_style_value_removes_declaration() {
        let (mut page, form, ..) = sample();
        page.set_style(&form, "overflow", "hidden");
        assert_eq!(page.style(form, "overflow"), Some("hidden"));
        page.set_style(&form, "overflow", "");
        assert_eq!(page.style(form, "overflow"), None);
    }

    #[test]
    fn scroll_to_is_recorded_and_applied() {
        let (mut page, ..) = sample();
        page.scroll_to(320.0, ScrollBehavior::Smooth);
        assert_eq!(page.scroll_y(), 320.0);
        assert_eq!(
            page.scroll_requests(),
            &[ScrollRequest {
                top: 320.0,
                behavior: ScrollBehavior::Smooth,
            }]
        );
    }
}
