#![forbid(unsafe_code)]

use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::rc::{Rc, Weak};

use folio_core::{Field, Portfolio, RevealEntry};
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use crate::dom::DomPage;
use crate::greeting::{GREETING, styled};
use crate::logging;
use crate::parse_options;

/// Shared state behind every DOM callback.
///
/// Callbacks borrow the controller for the duration of one event; time is
/// synced from `performance.now()` before each dispatch.
struct Host {
    window: Window,
    origin_ms: f64,
    folio: RefCell<Portfolio<DomPage>>,
    timer: Cell<Option<(i32, Duration)>>,
    frame_pending: Cell<bool>,
    on_timer: RefCell<Option<Closure<dyn FnMut()>>>,
    on_frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Host {
    fn elapsed(&self) -> Duration {
        let now_ms = self
            .window
            .performance()
            .map_or(self.origin_ms, |perf| perf.now());
        Duration::from_secs_f64(((now_ms - self.origin_ms) / 1000.0).max(0.0))
    }

    /// Catch the clock up, run `f` against the controller, then re-arm
    /// timers and frames.
    fn dispatch<R: Default>(&self, f: impl FnOnce(&mut Portfolio<DomPage>) -> R) -> R {
        let now = self.elapsed();
        self.with_folio(|folio| {
            folio.set_time(now);
            f(folio)
        })
    }

    /// Run `f` without touching the clock, then re-arm timers and frames.
    fn with_folio<R: Default>(&self, f: impl FnOnce(&mut Portfolio<DomPage>) -> R) -> R {
        let out = match self.folio.try_borrow_mut() {
            Ok(mut folio) => f(&mut folio),
            Err(_) => {
                tracing::debug!("re-entrant DOM event dropped");
                return R::default();
            }
        };
        self.pump();
        out
    }

    fn pump(&self) {
        let (deadline, wants_frame) = {
            let folio = self.folio.borrow();
            (folio.next_deadline(), folio.wants_animation_frame())
        };

        if let Some(deadline) = deadline {
            let armed = self.timer.get();
            if armed.is_none_or(|(_, at)| deadline < at) {
                if let Some((handle, _)) = armed {
                    self.window.clear_timeout_with_handle(handle);
                }
                let delay = deadline.saturating_sub(self.elapsed());
                let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
                if let Some(cb) = self.on_timer.borrow().as_ref() {
                    match self
                        .window
                        .set_timeout_with_callback_and_timeout_and_arguments_0(
                            cb.as_ref().unchecked_ref(),
                            delay_ms,
                        ) {
                        Ok(handle) => self.timer.set(Some((handle, deadline))),
                        Err(err) => tracing::warn!(?err, "setTimeout failed"),
                    }
                }
            }
        }

        if wants_frame && !self.frame_pending.get() {
            if let Some(cb) = self.on_frame.borrow().as_ref() {
                match self
                    .window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                {
                    Ok(_) => self.frame_pending.set(true),
                    Err(err) => tracing::warn!(?err, "requestAnimationFrame failed"),
                }
            }
        }
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Web/WASM interaction layer for the portfolio page.
#[wasm_bindgen]
pub struct FolioWeb {
    config: folio_core::FolioConfig,
    host: Option<Rc<Host>>,
    listeners: Vec<Listener>,
    observer: Option<IntersectionObserver>,
    observer_callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

#[wasm_bindgen]
impl FolioWeb {
    /// Create the layer. `options` is an optional JSON object overriding any
    /// configuration field.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<FolioWeb, JsValue> {
        console_error_panic_hook::set_once();
        logging::install(logging::ConsoleLayer::new(logging::BrowserConsole));
        let config =
            parse_options(options.as_deref()).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            config,
            host: None,
            listeners: Vec::new(),
            observer: None,
            observer_callback: None,
        })
    }

    /// Bind the page and wire every DOM listener.
    ///
    /// Call once the document has been parsed (module scripts are deferred,
    /// so calling it at module top level is fine).
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.host.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        if document.ready_state() == "loading" {
            return Err(JsValue::from_str(
                "document is still loading; call mount() after DOMContentLoaded",
            ));
        }

        let origin_ms = window.performance().map_or(0.0, |perf| perf.now());
        let folio = Portfolio::bind(DomPage::new(window.clone(), document.clone()), self.config.clone());
        let host = Rc::new(Host {
            window: window.clone(),
            origin_ms,
            folio: RefCell::new(folio),
            timer: Cell::new(None),
            frame_pending: Cell::new(false),
            on_timer: RefCell::new(None),
            on_frame: RefCell::new(None),
        });
        install_clock_callbacks(&host);
        self.host = Some(Rc::clone(&host));

        self.wire_navigation(&host, &window)?;
        self.wire_reveal(&host)?;
        self.wire_contact(&host)?;

        host.dispatch(|folio| folio.on_dom_ready());
        for (text, css) in GREETING {
            web_sys::console::log_2(&JsValue::from_str(&styled(text)), &JsValue::from_str(css));
        }
        Ok(())
    }

    /// Smooth-scroll to the top of the page.
    #[wasm_bindgen(js_name = scrollToTop)]
    pub fn scroll_to_top(&self) {
        if let Some(host) = &self.host {
            host.dispatch(|folio| folio.scroll_to_top());
        }
    }

    /// Percentage of the page scrolled, in `[0, 100]`.
    #[wasm_bindgen(js_name = scrollProgress)]
    pub fn scroll_progress(&self) -> f64 {
        self.host
            .as_ref()
            .map_or(0.0, |host| host.folio.borrow().scroll_progress())
    }

    /// Explicit teardown for JS callers. Removes listeners and pending
    /// callbacks so the page can be re-mounted.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.observer_callback = None;
        if let Some(host) = self.host.take() {
            if let Some((handle, _)) = host.timer.take() {
                host.window.clear_timeout_with_handle(handle);
            }
            host.on_timer.borrow_mut().take();
            host.on_frame.borrow_mut().take();
        }
    }
}

impl FolioWeb {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn wire_navigation(&mut self, host: &Rc<Host>, window: &Window) -> Result<(), JsValue> {
        let (toggle, links, cards) = {
            let folio = host.folio.borrow();
            (
                folio.nav_toggle().cloned(),
                folio.nav_links().to_vec(),
                folio.project_cards().to_vec(),
            )
        };

        if let Some(toggle) = toggle {
            let h = Rc::clone(host);
            self.listen(&toggle, "click", move |_| {
                h.dispatch(|folio| folio.toggle_menu());
            })?;
        }

        for (index, link) in links.iter().enumerate() {
            let h = Rc::clone(host);
            self.listen(link, "click", move |event| {
                let prevent = h.dispatch(|folio| folio.on_nav_link_click(index).prevents_default());
                if prevent {
                    event.prevent_default();
                }
            })?;
        }

        let h = Rc::clone(host);
        self.listen(window, "scroll", move |_| {
            h.dispatch(|folio| folio.on_scroll());
        })?;

        for (index, card) in cards.iter().enumerate() {
            let h = Rc::clone(host);
            self.listen(card, "mouseenter", move |_| {
                h.dispatch(|folio| folio.on_project_card_hover(index));
            })?;
        }
        Ok(())
    }

    fn wire_reveal(&mut self, host: &Rc<Host>) -> Result<(), JsValue> {
        let (targets, threshold, root_margin) = {
            let folio = host.folio.borrow();
            let reveal = &folio.config().reveal;
            (
                folio.reveal_targets().to_vec(),
                reveal.threshold,
                reveal.root_margin.clone(),
            )
        };
        if targets.is_empty() {
            return Ok(());
        }

        let h = Rc::clone(host);
        let observed: Vec<Element> = targets.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let batch: Vec<RevealEntry> = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        let target = entry.target();
                        let index = observed
                            .iter()
                            .position(|el| *el == target)
                            .unwrap_or(usize::MAX);
                        RevealEntry::new(index, entry.is_intersecting())
                    })
                    .collect();
                for claimed in h.dispatch(|folio| folio.on_intersection(&batch)) {
                    if let Some(el) = observed.get(claimed.0) {
                        observer.unobserve(el);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        init.set_root_margin(&root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        for target in &targets {
            observer.observe(target);
        }
        self.observer = Some(observer);
        self.observer_callback = Some(callback);
        Ok(())
    }

    fn wire_contact(&mut self, host: &Rc<Host>) -> Result<(), JsValue> {
        let (form, inputs) = {
            let folio = host.folio.borrow();
            let Some(form) = folio.contact_form().cloned() else {
                return Ok(());
            };
            let inputs: Vec<(Field, Element)> = Field::ALL
                .into_iter()
                .filter_map(|field| folio.field_input(field).cloned().map(|el| (field, el)))
                .collect();
            (form, inputs)
        };

        for (field, input) in &inputs {
            let field = *field;
            let h = Rc::clone(host);
            self.listen(input, "blur", move |_| {
                h.dispatch(|folio| folio.on_field_blur(field));
            })?;
            let h = Rc::clone(host);
            self.listen(input, "input", move |_| {
                h.dispatch(|folio| folio.on_field_input(field));
            })?;
        }

        let h = Rc::clone(host);
        self.listen(&form, "submit", move |event| {
            event.prevent_default();
            h.dispatch(|folio| {
                folio.on_submit();
            });
        })?;
        Ok(())
    }
}

/// Timer and animation-frame callbacks hold a weak reference so the host can
/// be dropped after [`FolioWeb::destroy`].
fn install_clock_callbacks(host: &Rc<Host>) {
    let weak: Weak<Host> = Rc::downgrade(host);
    let on_timer = Closure::<dyn FnMut()>::new(move || {
        if let Some(host) = weak.upgrade() {
            host.timer.set(None);
            host.dispatch(|_| ());
        }
    });

    let weak: Weak<Host> = Rc::downgrade(host);
    let on_frame = Closure::<dyn FnMut(f64)>::new(move |_ts: f64| {
        if let Some(host) = weak.upgrade() {
            host.frame_pending.set(false);
            let now = host.elapsed();
            host.with_folio(|folio| folio.on_animation_frame(now));
        }
    });

    *host.on_timer.borrow_mut() = Some(on_timer);
    *host.on_frame.borrow_mut() = Some(on_frame);
}
