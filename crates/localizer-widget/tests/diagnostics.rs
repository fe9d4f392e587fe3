#![forbid(unsafe_code)]

//! Diagnostics emitted through `tracing`.
//!
//! Soft failures (missing host, bad options, unknown switch target) must be
//! observable as WARN events; normal switches stay at DEBUG.

use std::sync::{Arc, Mutex};

use localizer_widget::{LocalizedTextEditor, OptionsPatch, StringMap, VirtualDocument};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.push((field.name().to_owned(), rendered));
        }
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.events.lock().expect("capture lock").push(Captured {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().expect("capture lock").clone();
    out
}

fn warnings(events: &[Captured]) -> Vec<&Captured> {
    events.iter().filter(|e| e.level == Level::WARN).collect()
}

fn page() -> VirtualDocument {
    let doc = VirtualDocument::new();
    doc.append_element(doc.body(), "textarea", &[("id", "host")])
        .unwrap();
    doc
}

#[test]
fn missing_host_warns_with_selector() {
    let events = capture(|| {
        let editor = LocalizedTextEditor::mount(page(), "#nowhere", OptionsPatch::new());
        assert!(editor.is_inert());
    });
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1, "events: {events:?}");
    assert_eq!(warns[0].message, "textarea localizer left inert");
    assert!(
        warns[0]
            .fields
            .iter()
            .any(|(k, v)| k == "error" && v.contains("element #nowhere not found")),
        "fields: {:?}",
        warns[0].fields
    );
}

#[test]
fn invalid_options_warn() {
    let events = capture(|| {
        let editor = LocalizedTextEditor::mount(page(), "#host", OptionsPatch::new().rows(0));
        assert!(editor.is_inert());
    });
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1);
    assert!(
        warns[0]
            .fields
            .iter()
            .any(|(k, v)| k == "error" && v.contains("rows must be at least 1"))
    );
}

#[test]
fn unknown_switch_warns_and_known_switch_does_not() {
    let events = capture(|| {
        let mut editor = LocalizedTextEditor::mount(
            page(),
            "#host",
            OptionsPatch::new().texts(StringMap::new().with("it", "").with("en", "")),
        );
        editor.change_language("en");
        editor.change_language("fr");
    });
    let warns = warnings(&events);
    assert_eq!(warns.len(), 1, "events: {events:?}");
    assert_eq!(warns[0].message, "cannot switch to an unconfigured language");
    assert!(warns[0].fields.iter().any(|(k, v)| k == "language" && v == "fr"));
    assert!(
        events
            .iter()
            .any(|e| e.level == Level::DEBUG && e.message == "active language changed")
    );
}
