#![forbid(unsafe_code)]

//! The page controller.
//!
//! [`Portfolio`] binds every element it needs once, at construction, and
//! keeps them as explicit fields. Elements the page does not provide simply
//! disable the behavior that needs them.
//!
//! # Lifecycle
//!
//! 1. [`Portfolio::bind`]: resolve elements against the page.
//! 2. [`Portfolio::on_dom_ready`]: initial active link, navbar style and
//!    the body `loaded` marker.
//! 3. Forward DOM events (`on_scroll`, `on_nav_link_click`, `on_field_blur`,
//!    `on_submit`, `on_intersection`, ...) as they arrive.
//! 4. Drive time with [`Portfolio::advance_time`] / [`Portfolio::set_time`]
//!    and animation frames with [`Portfolio::run_animation_frame`].

use core::time::Duration;

use crate::config::FolioConfig;
use crate::contact::{ContactForm, Field, FieldState, SubmitOutcome};
use crate::nav::{self, LinkClick, NavbarStyle, SectionBounds};
use crate::page::{Page, ScrollBehavior};
use crate::reveal::{RevealAnimator, RevealEntry, RevealTarget};
use crate::schedule::{Scheduler, Task};

const ACTIVE: &str = "active";
const ERROR: &str = "error";
const SHOW: &str = "show";
const LOADED: &str = "loaded";

struct NavElements<E> {
    toggle: Option<E>,
    menu: Option<E>,
    links: Vec<E>,
    sections: Vec<E>,
    navbar: Option<E>,
    /// Element whose height offsets smooth-scroll targets.
    bar: Option<E>,
}

struct ContactElements<E> {
    form: E,
    inputs: [E; 4],
    errors: [Option<E>; 4],
    success: Option<E>,
    submit: Option<E>,
}

/// Interaction controller for one page.
pub struct Portfolio<P: Page> {
    page: P,
    config: FolioConfig,
    scheduler: Scheduler,
    nav: NavElements<P::Element>,
    reveal_targets: Vec<P::Element>,
    reveal: RevealAnimator,
    project_cards: Vec<P::Element>,
    contact: Option<ContactElements<P::Element>>,
    form: ContactForm,
    progress: f64,
}

impl<P: Page> Portfolio<P> {
    /// Resolve all elements against `page`.
    pub fn bind(page: P, config: FolioConfig) -> Self {
        let sel = &config.selectors;

        let nav = NavElements {
            toggle: page.element_by_id(&sel.nav_toggle_id),
            menu: page.element_by_id(&sel.nav_menu_id),
            links: page.query_all(&sel.nav_links),
            sections: page.query_all(&sel.sections),
            navbar: page.element_by_id(&sel.navbar_id),
            bar: page.query_all(&sel.nav_height).into_iter().next(),
        };
        let reveal_targets = page.query_all(&sel.reveal_targets);
        let project_cards = page.query_all(&sel.project_cards);
        let contact = bind_contact(&page, &config);

        if nav.toggle.is_none() || nav.menu.is_none() {
            tracing::debug!(
                toggle = %sel.nav_toggle_id,
                menu = %sel.nav_menu_id,
                "mobile menu incomplete; toggle disabled"
            );
        }
        if nav.navbar.is_none() {
            tracing::debug!(id = %sel.navbar_id, "navbar missing; background transition disabled");
        }
        if contact.is_none() {
            tracing::debug!(id = %sel.contact_form_id, "contact form incomplete; validation disabled");
        }
        tracing::debug!(
            links = nav.links.len(),
            sections = nav.sections.len(),
            reveal_targets = reveal_targets.len(),
            project_cards = project_cards.len(),
            contact = contact.is_some(),
            "page bound"
        );

        let reveal = RevealAnimator::new(reveal_targets.len(), config.reveal.stagger());
        Self {
            page,
            config,
            scheduler: Scheduler::new(),
            nav,
            reveal_targets,
            reveal,
            project_cards,
            contact,
            form: ContactForm::new(),
            progress: 0.0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────

    #[must_use]
    pub const fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub const fn config(&self) -> &FolioConfig {
        &self.config
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    #[must_use]
    pub fn nav_toggle(&self) -> Option<&P::Element> {
        self.nav.toggle.as_ref()
    }

    #[must_use]
    pub fn nav_links(&self) -> &[P::Element] {
        &self.nav.links
    }

    #[must_use]
    pub fn reveal_targets(&self) -> &[P::Element] {
        &self.reveal_targets
    }

    #[must_use]
    pub fn project_cards(&self) -> &[P::Element] {
        &self.project_cards
    }

    #[must_use]
    pub fn contact_form(&self) -> Option<&P::Element> {
        self.contact.as_ref().map(|c| &c.form)
    }

    #[must_use]
    pub fn field_input(&self, field: Field) -> Option<&P::Element> {
        self.contact.as_ref().map(|c| &c.inputs[field as usize])
    }

    #[must_use]
    pub fn field_state(&self, field: Field) -> FieldState {
        self.form.state(field)
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.nav
            .menu
            .as_ref()
            .is_some_and(|menu| self.page.has_class(menu, ACTIVE))
    }

    #[must_use]
    pub fn is_revealed(&self, target: RevealTarget) -> bool {
        self.reveal.is_revealed(target)
    }

    /// Percentage of the page scrolled as of the last scroll event.
    #[must_use]
    pub const fn scroll_progress(&self) -> f64 {
        self.progress
    }

    // ── Bootstrap ─────────────────────────────────────────────────────

    /// Run once the document is ready to be manipulated.
    pub fn on_dom_ready(&mut self) {
        self.set_active_nav_link();
        self.update_navbar_background();
        self.update_scroll_progress();
        if let Some(body) = self.page.body() {
            self.page.add_class(&body, LOADED);
        }
        tracing::debug!(scroll_y = self.page.scroll_y(), "page ready");
    }

    // ── Navigation ────────────────────────────────────────────────────

    /// Flip the mobile menu. Returns whether it is now open.
    pub fn toggle_menu(&mut self) -> bool {
        let Some(menu) = self.nav.menu.clone() else {
            return false;
        };
        if let Some(toggle) = &self.nav.toggle {
            self.page.toggle_class(toggle, ACTIVE);
        }
        let open = self.page.toggle_class(&menu, ACTIVE);
        self.lock_scroll(open);
        tracing::trace!(open, "menu toggled");
        open
    }

    /// Force the mobile menu closed.
    pub fn close_menu(&mut self) {
        if let Some(toggle) = &self.nav.toggle {
            self.page.remove_class(toggle, ACTIVE);
        }
        if let Some(menu) = &self.nav.menu {
            self.page.remove_class(menu, ACTIVE);
        }
        self.lock_scroll(false);
    }

    fn lock_scroll(&mut self, locked: bool) {
        if let Some(body) = self.page.body() {
            self.page
                .set_style(&body, "overflow", if locked { "hidden" } else { "" });
        }
    }

    /// A nav link was clicked: close the menu, then scroll in-page links.
    ///
    /// The host must suppress default navigation when
    /// [`LinkClick::prevents_default`] is true.
    pub fn on_nav_link_click(&mut self, index: usize) -> LinkClick {
        self.close_menu();
        match self.nav.links.get(index).cloned() {
            Some(link) => self.smooth_scroll_to(&link),
            None => LinkClick::Navigate,
        }
    }

    fn smooth_scroll_to(&mut self, link: &P::Element) -> LinkClick {
        let Some(href) = self.page.attribute(link, "href") else {
            return LinkClick::Navigate;
        };
        let Some(id) = nav::fragment_target(&href) else {
            return LinkClick::Navigate;
        };
        let target = if id.is_empty() {
            None
        } else {
            self.page.element_by_id(id)
        };
        let Some(target) = target else {
            tracing::debug!(%href, "fragment link without target");
            return LinkClick::MissingTarget(id.to_owned());
        };

        let bar_height = self
            .nav
            .bar
            .as_ref()
            .map_or(0.0, |bar| self.page.offset_height(bar));
        let top = self.page.offset_top(&target) - bar_height;
        self.page.scroll_to(top, ScrollBehavior::Smooth);
        LinkClick::Scrolled {
            target: id.to_owned(),
            top,
        }
    }

    /// Smooth-scroll back to the top of the page.
    pub fn scroll_to_top(&mut self) {
        self.page.scroll_to(0.0, ScrollBehavior::Smooth);
    }

    /// Window scrolled.
    pub fn on_scroll(&mut self) {
        self.set_active_nav_link();
        self.update_navbar_background();
        self.update_scroll_progress();
    }

    /// Mark the links of the section under the scroll position as active.
    ///
    /// Returns the active section id, if any.
    pub fn set_active_nav_link(&mut self) -> Option<String> {
        let offset = self.page.scroll_y() + self.config.nav.active_lookahead;
        let bounds: Vec<SectionBounds> = self
            .nav
            .sections
            .iter()
            .filter_map(|section| {
                let id = self.page.attribute(section, "id")?;
                Some(SectionBounds::new(
                    id,
                    self.page.offset_top(section),
                    self.page.offset_height(section),
                ))
            })
            .collect();
        let active = nav::active_section(offset, &bounds).map(str::to_owned);

        let wanted = active.as_ref().map(|id| format!("#{id}"));
        for link in &self.nav.links {
            self.page.remove_class(link, ACTIVE);
            if wanted.is_some() && self.page.attribute(link, "href") == wanted {
                self.page.add_class(link, ACTIVE);
            }
        }
        active
    }

    /// Apply the navbar style for the current scroll offset.
    pub fn update_navbar_background(&mut self) -> NavbarStyle {
        let style = nav::navbar_style(self.page.scroll_y(), self.config.nav.navbar_threshold);
        if let Some(navbar) = &self.nav.navbar {
            let nav = &self.config.nav;
            let (background, shadow) = match style {
                NavbarStyle::Baseline => (&nav.baseline_background, &nav.baseline_shadow),
                NavbarStyle::Emphasized => (&nav.emphasized_background, &nav.emphasized_shadow),
            };
            self.page.set_style(navbar, "background", background);
            self.page.set_style(navbar, "box-shadow", shadow);
        }
        style
    }

    fn update_scroll_progress(&mut self) {
        self.progress = nav::scroll_progress(
            self.page.scroll_y(),
            self.page.viewport_height(),
            self.page.document_height(),
        );
    }

    // ── Reveal ────────────────────────────────────────────────────────

    /// Intersection notification batch from the host's observer.
    ///
    /// Returns the targets that were just claimed; the host should stop
    /// observing them.
    pub fn on_intersection(&mut self, entries: &[RevealEntry]) -> Vec<RevealTarget> {
        let claimed = self.reveal.claim_batch(entries);
        claimed
            .into_iter()
            .map(|(target, delay)| {
                self.scheduler.schedule_after(delay, Task::RevealStart(target));
                target
            })
            .collect()
    }

    /// Pointer entered a project card.
    pub fn on_project_card_hover(&mut self, index: usize) {
        if let Some(card) = self.project_cards.get(index) {
            self.page
                .set_style(card, "transition", &self.config.reveal.hover_transition);
        }
    }

    // ── Contact form ──────────────────────────────────────────────────

    /// Focus left `field`: validate it and show or clear its message.
    pub fn on_field_blur(&mut self, field: Field) -> FieldState {
        let Some(input) = self.field_input(field).cloned() else {
            return FieldState::Untouched;
        };
        let value = self.page.value(&input);
        match self.form.blur(field, &value) {
            Ok(()) => self.clear_error(field),
            Err(err) => self.show_error(field, err.message()),
        }
        self.form.state(field)
    }

    /// `field` was edited: clear its message without revalidating.
    pub fn on_field_input(&mut self, field: Field) {
        if self.contact.is_none() {
            return;
        }
        self.form.input(field);
        self.clear_error(field);
    }

    /// Form submitted. The host must always suppress the native submission.
    pub fn on_submit(&mut self) -> SubmitOutcome {
        let Some(contact) = &self.contact else {
            return SubmitOutcome::Unbound;
        };
        if self.form.is_sending() {
            tracing::debug!("submit ignored; submission in flight");
            return SubmitOutcome::AlreadySending;
        }
        if let Some(success) = &contact.success {
            self.page.remove_class(success, SHOW);
        }

        let values: Vec<(Field, String)> = Field::ALL
            .into_iter()
            .map(|field| (field, self.page.value(&contact.inputs[field as usize])))
            .collect();
        let errors = self
            .form
            .validate_all(values.iter().map(|(field, value)| (*field, value.as_str())));
        for field in Field::ALL {
            match errors.iter().find(|err| err.field == field) {
                Some(err) => self.show_error(field, err.message()),
                None => self.clear_error(field),
            }
        }
        if !errors.is_empty() {
            let fields: Vec<Field> = errors.iter().map(|err| err.field).collect();
            tracing::debug!(?fields, "submit rejected");
            return SubmitOutcome::Rejected(fields);
        }

        let submit = self.contact.as_ref().and_then(|c| c.submit.clone());
        let label = submit
            .as_ref()
            .map(|button| self.page.inner_html(button))
            .unwrap_or_default();
        self.form.begin_send(label);
        if let Some(button) = &submit {
            self.page
                .set_inner_html(button, &self.config.form.sending_label);
            self.page.set_disabled(button, true);
        }
        self.scheduler
            .schedule_after(self.config.form.send_delay(), Task::CompleteSubmission);
        tracing::debug!("submission started");
        SubmitOutcome::Sending
    }

    fn show_error(&mut self, field: Field, message: &str) {
        self.mark_error(field, Some(message));
    }

    fn clear_error(&mut self, field: Field) {
        self.mark_error(field, None);
    }

    fn mark_error(&mut self, field: Field, message: Option<&str>) {
        let Some(contact) = &self.contact else {
            return;
        };
        let idx = field as usize;
        if let Some(group) = self.page.parent(&contact.inputs[idx]) {
            if message.is_some() {
                self.page.add_class(&group, ERROR);
            } else {
                self.page.remove_class(&group, ERROR);
            }
        }
        if let Some(slot) = &contact.errors[idx] {
            self.page.set_text(slot, message.unwrap_or(""));
        }
    }

    // ── Time ──────────────────────────────────────────────────────────

    /// Advance the clock by `dt` and run everything that became due.
    pub fn advance_time(&mut self, dt: Duration) {
        self.scheduler.advance(dt);
        self.run_due();
    }

    /// Move the clock to `now` (ignored if earlier) and run due work.
    pub fn set_time(&mut self, now: Duration) {
        self.scheduler.set_time(now);
        self.run_due();
    }

    /// Run the work queued for this animation frame.
    pub fn run_animation_frame(&mut self) {
        for task in self.scheduler.take_frame() {
            self.run_task(task);
        }
    }

    /// Animation frame delivered at `now`.
    ///
    /// Frame work queued before this frame runs first; only then does the
    /// clock catch up. Work that becomes due on the way waits for the next
    /// frame, so a reveal's start and finish never share one.
    pub fn on_animation_frame(&mut self, now: Duration) {
        let frame = self.scheduler.take_frame();
        for task in frame {
            self.run_task(task);
        }
        self.set_time(now);
    }

    /// Deadline of the next pending timer, for the host to arm.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    #[must_use]
    pub fn wants_animation_frame(&self) -> bool {
        self.scheduler.wants_frame()
    }

    fn run_due(&mut self) {
        while let Some(task) = self.scheduler.pop_due() {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: Task) {
        tracing::trace!(?task, now_ms = self.now().as_millis() as u64, "run task");
        match task {
            Task::RevealStart(target) => {
                let Some(el) = self.reveal_targets.get(target.0) else {
                    return;
                };
                let reveal = &self.config.reveal;
                self.page.set_style(el, "opacity", "0");
                self.page.set_style(el, "transform", &reveal.hidden_transform);
                self.page.set_style(el, "transition", &reveal.transition);
                self.scheduler.request_frame(Task::RevealFinish(target));
            }
            Task::RevealFinish(target) => {
                let Some(el) = self.reveal_targets.get(target.0) else {
                    return;
                };
                self.page.set_style(el, "opacity", "1");
                self.page
                    .set_style(el, "transform", &self.config.reveal.shown_transform);
            }
            Task::CompleteSubmission => self.complete_submission(),
            Task::HideSuccess => {
                if let Some(success) = self.contact.as_ref().and_then(|c| c.success.as_ref()) {
                    self.page.remove_class(success, SHOW);
                }
            }
        }
    }

    fn complete_submission(&mut self) {
        let label = self.form.finish_send();
        let Some(contact) = &self.contact else {
            return;
        };
        if let Some(success) = &contact.success {
            self.page.add_class(success, SHOW);
        }
        for input in &contact.inputs {
            self.page.set_value(input, "");
        }
        if let Some(button) = &contact.submit {
            self.page
                .set_inner_html(button, label.as_deref().unwrap_or_default());
            self.page.set_disabled(button, false);
        }
        self.scheduler
            .schedule_after(self.config.form.success_visible(), Task::HideSuccess);
        tracing::debug!("submission complete");
    }
}

fn bind_contact<P: Page>(page: &P, config: &FolioConfig) -> Option<ContactElements<P::Element>> {
    let sel = &config.selectors;
    let form = page.element_by_id(&sel.contact_form_id)?;
    let ids = &sel.fields;
    let [name, email, subject, message] =
        Field::ALL.map(|field| page.element_by_id(ids.input(field)));
    let inputs = [name?, email?, subject?, message?];
    let errors = Field::ALL.map(|field| page.element_by_id(ids.error_slot(field)));
    let success = page.element_by_id(&sel.form_success_id);
    let submit = page.query_within(&form, &sel.submit_button);
    Some(ContactElements {
        form,
        inputs,
        errors,
        success,
        submit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemoryPage};

    use pretty_assertions::assert_eq;

    #[test]
    fn empty_page_binds_without_features() {
        let mut folio = Portfolio::bind(MemoryPage::new(), FolioConfig::default());
        folio.on_dom_ready();
        folio.on_scroll();

        assert!(!folio.toggle_menu());
        assert_eq!(folio.on_nav_link_click(0), LinkClick::Navigate);
        assert_eq!(folio.on_submit(), SubmitOutcome::Unbound);
        assert_eq!(folio.on_field_blur(Field::Name), FieldState::Untouched);
        assert!(folio.on_intersection(&[RevealEntry::new(0, true)]).is_empty());
        assert_eq!(folio.next_deadline(), None);

        let body = folio.page().body().unwrap();
        assert!(folio.page().has_class(&body, "loaded"));
    }

    #[test]
    fn form_needs_all_four_inputs() {
        let mut page = MemoryPage::new();
        let form = page.append(None, ElementSpec::new("form").id("contactForm"));
        for id in ["name", "email", "subject"] {
            page.append(Some(form), ElementSpec::new("input").id(id));
        }
        let folio = Portfolio::bind(page, FolioConfig::default());
        assert!(folio.contact_form().is_none());
        assert!(folio.field_input(Field::Name).is_none());
    }

    #[test]
    fn form_binds_without_optional_slots() {
        let mut page = MemoryPage::new();
        let form = page.append(None, ElementSpec::new("form").id("contactForm"));
        let inputs: Vec<_> = Field::ALL
            .iter()
            .map(|f| page.append(Some(form), ElementSpec::new("input").id(f.id()).value("x")))
            .collect();
        let mut folio = Portfolio::bind(page, FolioConfig::default());

        let outcome = folio.on_submit();
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(vec![Field::Name, Field::Email, Field::Subject, Field::Message])
        );
        let page = folio.page();
        assert!(page.has_class(&form, "error"));
        assert_eq!(page.value(&inputs[0]), "x");
    }

    #[test]
    fn navbar_style_is_idempotent() {
        let mut page = MemoryPage::new();
        let navbar = page.append(None, ElementSpec::new("nav").id("navbar"));
        page.set_scroll_y(250.0);
        let mut folio = Portfolio::bind(page, FolioConfig::default());

        assert_eq!(folio.update_navbar_background(), NavbarStyle::Emphasized);
        let first = folio.page().style(navbar, "background").map(str::to_owned);
        assert_eq!(folio.update_navbar_background(), NavbarStyle::Emphasized);
        assert_eq!(folio.page().style(navbar, "background").map(str::to_owned), first);
        assert_eq!(
            folio.page().style(navbar, "box-shadow"),
            Some("0 4px 16px rgba(15, 23, 42, 0.08)")
        );
    }
}
