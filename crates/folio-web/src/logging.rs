#![forbid(unsafe_code)]

//! Routes `tracing` events from the engine to the browser console.
//!
//! Each event becomes one line, `LEVEL target: message key=value ...`, handed
//! to a [`LogSink`] together with its level so the sink can pick the matching
//! `console` method.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync + 'static {
    fn write(&self, level: Level, line: &str);
}

/// `tracing_subscriber::Layer` writing every enabled event to a [`LogSink`].
pub struct ConsoleLayer<K> {
    sink: K,
    max_level: Level,
}

impl<K: LogSink> ConsoleLayer<K> {
    /// Layer forwarding events at `DEBUG` and above.
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            max_level: Level::DEBUG,
        }
    }

    /// Builder: most verbose level forwarded.
    #[must_use]
    pub fn max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: LogSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = *metadata.level();
        if level > self.max_level {
            return;
        }
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.sink
            .write(level, &format_line(level, metadata.target(), &visitor));
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

fn format_line(level: Level, target: &str, visitor: &EventVisitor) -> String {
    let mut line = format!("{level} {target}: {}", visitor.message.as_deref().unwrap_or(""));
    for (key, value) in &visitor.fields {
        let _ = write!(line, " {key}={value}");
    }
    line
}

/// Sink backed by `web_sys::console`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserConsole;

#[cfg(target_arch = "wasm32")]
impl LogSink for BrowserConsole {
    fn write(&self, level: Level, line: &str) {
        let line = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

/// Install `layer` as the global subscriber. Returns `false` if one was
/// already installed, e.g. by an earlier `FolioWeb`.
pub fn install<K: LogSink>(layer: ConsoleLayer<K>) -> bool {
    use tracing_subscriber::layer::SubscriberExt;

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer)).is_ok()
}
