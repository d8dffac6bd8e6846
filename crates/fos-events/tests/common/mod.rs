//! Shared helpers for fos-events integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use fos_events::{Handler, MemoryHost, Registry};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Registry over a host the test can also fire through
pub fn setup() -> (Rc<MemoryHost>, Registry) {
    let host = Rc::new(MemoryHost::default());
    let registry = Registry::with_host(host.clone());
    (host, registry)
}

/// Handler that counts its calls
pub fn counter() -> (Handler, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    let handler = Handler::new(move |_| c.set(c.get() + 1));
    (handler, count)
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<String>>>);

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > tracing::Level::WARN {
            return;
        }
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.0.lock().unwrap().push(message);
    }
}

/// Run `f` with a subscriber that records warnings and errors
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let warnings = captured.0.lock().unwrap().clone();
    (result, warnings)
}
