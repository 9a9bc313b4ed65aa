#![forbid(unsafe_code)]

//! Diagnostic events emitted by the page engine.
//!
//! The engine never fails loudly on a partial page; it logs what it skipped.
//! These tests capture the `tracing` events to pin that behavior down.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use folio_core::{FolioConfig, MemoryPage, Portfolio, SectionBounds, SubmitOutcome, active_section};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], needle: &str) -> Option<&'a CapturedEvent> {
    events.iter().find(|e| e.message.contains(needle))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn overlapping_sections_are_reported() {
    let sections = [
        SectionBounds::new("about", 0.0, 500.0),
        SectionBounds::new("skills", 300.0, 500.0),
    ];
    let mut winner = None;
    let events = with_captured_events(|| {
        winner = active_section(350.0, &sections).map(str::to_owned);
    });

    assert_eq!(winner.as_deref(), Some("skills"));
    let event = find(&events, "overlapping sections").expect("overlap event");
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.fields["shadowed"], "about");
    assert_eq!(event.fields["winner"], "skills");
}

#[test]
fn disjoint_sections_are_silent() {
    let sections = [
        SectionBounds::new("about", 0.0, 300.0),
        SectionBounds::new("skills", 300.0, 500.0),
    ];
    let events = with_captured_events(|| {
        let _ = active_section(350.0, &sections);
    });
    assert!(find(&events, "overlapping sections").is_none());
}

#[test]
fn empty_page_logs_each_disabled_feature() {
    let events = with_captured_events(|| {
        let _ = Portfolio::bind(MemoryPage::new(), FolioConfig::default());
    });

    assert!(find(&events, "mobile menu incomplete").is_some());
    assert!(find(&events, "navbar missing").is_some());
    assert!(find(&events, "contact form incomplete").is_some());
}

#[test]
fn full_page_binds_quietly() {
    let fx = common::portfolio_page();
    let events = with_captured_events(|| {
        let _ = Portfolio::bind(fx.page.clone(), FolioConfig::default());
    });

    assert!(find(&events, "incomplete").is_none());
    assert!(find(&events, "missing").is_none());
}

#[test]
fn submit_while_sending_is_logged() {
    let fx = common::portfolio_page();
    let mut folio = Portfolio::bind(fx.page.clone(), FolioConfig::default());
    for (input, value) in fx
        .inputs
        .iter()
        .zip(["Ada Lovelace", "ada@example.org", "Hello", "I would like to talk."])
    {
        folio.page_mut().type_value(*input, value);
    }
    assert_eq!(folio.on_submit(), SubmitOutcome::Sending);

    let mut outcome = None;
    let events = with_captured_events(|| {
        outcome = Some(folio.on_submit());
    });

    assert_eq!(outcome, Some(SubmitOutcome::AlreadySending));
    assert!(find(&events, "submission in flight").is_some());
}
