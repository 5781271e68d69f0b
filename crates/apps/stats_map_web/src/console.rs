use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wasm_bindgen::JsValue;

/// Tracing layer that writes each event to the browser console.
pub struct ConsoleLayer {
    max_level: Level,
}

impl ConsoleLayer {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }
}

#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl Visit for EventText {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

fn format_line(level: &Level, target: &str, message: &str, fields: &str) -> String {
    format!("{level} {target}: {message}{fields}")
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut text = EventText::default();
        event.record(&mut text);
        let meta = event.metadata();
        let line = JsValue::from_str(&format_line(
            meta.level(),
            meta.target(),
            &text.message,
            &text.fields,
        ));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

/// Installs the console layer as the global subscriber. Returns false if a
/// subscriber was already set.
pub fn install(max_level: Level) -> bool {
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(max_level));
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::format_line;
    use tracing::Level;

    #[test]
    fn line_carries_level_target_and_fields() {
        assert_eq!(
            format_line(&Level::WARN, "runtime::controller", "failed", " id=3"),
            "WARN runtime::controller: failed id=3"
        );
    }
}
