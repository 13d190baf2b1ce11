mod common;

use common::*;
use core_actions::{KeyTranslator, handle_input};
use core_events::{InputEvent, KeyEvent};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct Capture {
    lines: Arc<Mutex<Vec<String>>>,
}

struct Collector(String);

impl Visit for Collector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push_str(&format!(" {}={:?}", field.name(), value));
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut c = Collector(event.metadata().target().to_string());
        event.record(&mut c);
        self.lines.lock().unwrap().push(c.0);
    }
}

#[test]
fn edits_log_sizes_not_text() {
    let capture = Capture::default();
    let lines = capture.lines.clone();
    let subscriber = Registry::default().with(capture);

    tracing::subscriber::with_default(subscriber, || {
        let mut t = KeyTranslator::default();
        let mut m = model("", 40, 10);
        handle_input(&mut t, &mut m, InputEvent::Paste("hunter2 secret".into()));
        type_str(&mut t, &mut m, "zq");
        press(&mut t, &mut m, &[KeyEvent::ctrl('a'), KeyEvent::ctrl('k')]);
        assert_eq!(m.state().scrap, "hunter2 secretzq");
    });

    let lines = lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.contains("len=14")), "{lines:?}");
    assert!(lines.iter().all(|l| !l.contains("hunter2")), "{lines:?}");
}
