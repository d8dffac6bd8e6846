//! Host Environment
//!
//! The native side of the event layer: event construction and listener
//! attachment. [`MemoryHost`] is an in-memory implementation used by the
//! engine's headless mode and by tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    Config, EventError, EventFamily, EventInit, EventOptions, NativeEvent, Result, TargetId,
};

/// Identity of a listener function attached to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback the host invokes when it fires an event
pub type NativeListener = Rc<dyn Fn(&mut NativeEvent)>;

/// Native event environment
pub trait EventHost {
    /// Dictionary constructor path (`new MouseEvent(type, init)`)
    fn construct(
        &self,
        family: EventFamily,
        event_type: &str,
        options: &EventOptions,
    ) -> Result<NativeEvent>;

    /// Legacy path (`document.createEvent(interface)`), returns an uninitialized event
    fn create_event(&self, interface: &str) -> Result<NativeEvent>;

    fn dom_level(&self) -> u8;

    /// Default `view` for UI events
    fn window(&self) -> TargetId;

    /// Attach a listener. Attaching the same (target, type, id, capture) twice is a no-op.
    fn add_event_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
        listener: NativeListener,
        capture: bool,
    );

    /// Detach a listener. Unknown listeners are ignored.
    fn remove_event_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
        capture: bool,
    );
}

struct Attached {
    id: ListenerId,
    capture: bool,
    listener: NativeListener,
}

/// In-memory host
#[derive(Default)]
pub struct MemoryHost {
    config: Config,
    listeners: RefCell<HashMap<(TargetId, String), Vec<Attached>>>,
}

const LEGACY_PLURALS: [&str; 5] = [
    "Events",
    "UIEvents",
    "MouseEvents",
    "MutationEvents",
    "HTMLEvents",
];

impl MemoryHost {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            listeners: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fire an event at a target the way the platform would: capture listeners
    /// first, then the rest, until a listener stops immediate propagation.
    ///
    /// Returns `false` if the default action was prevented.
    pub fn dispatch_event(&self, target: TargetId, event: &mut NativeEvent) -> bool {
        event.begin_dispatch();
        if event.target.is_none() {
            event.target = Some(target);
        }
        event.current_target = Some(target);

        // Listeners attached or detached by a handler take effect on the next dispatch
        let snapshot: Vec<NativeListener> = {
            let listeners = self.listeners.borrow();
            match listeners.get(&(target, event.event_type.clone())) {
                Some(attached) => attached
                    .iter()
                    .filter(|a| a.capture)
                    .chain(attached.iter().filter(|a| !a.capture))
                    .map(|a| a.listener.clone())
                    .collect(),
                None => Vec::new(),
            }
        };

        for listener in snapshot {
            listener(event);
            if event.is_immediate_propagation_stopped() {
                break;
            }
        }

        !event.is_default_prevented()
    }

    /// Number of attached listeners for a target and type
    pub fn listener_count(&self, target: TargetId, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(&(target, event_type.to_string()))
            .map_or(0, Vec::len)
    }

    /// Whether a listener is attached
    pub fn has_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
        capture: bool,
    ) -> bool {
        self.listeners
            .borrow()
            .get(&(target, event_type.to_string()))
            .is_some_and(|attached| attached.iter().any(|a| a.id == id && a.capture == capture))
    }

    /// Total attached listeners across all targets
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }
}

impl EventHost for MemoryHost {
    fn construct(
        &self,
        family: EventFamily,
        event_type: &str,
        options: &EventOptions,
    ) -> Result<NativeEvent> {
        if !self.config.modern_constructors || family == EventFamily::Mutation {
            return Err(EventError::Constructor {
                interface: family.interface().to_string(),
                reason: "not a constructor".to_string(),
            });
        }

        let init = EventInit::from_options(family, options, self.config.window);
        Ok(NativeEvent::new(
            family.interface(),
            event_type,
            options.bubbles,
            options.cancelable,
            init,
        ))
    }

    fn create_event(&self, interface: &str) -> Result<NativeEvent> {
        let known =
            EventFamily::from_interface(interface).is_some() || LEGACY_PLURALS.contains(&interface);
        if !self.config.legacy_interfaces || !known {
            return Err(EventError::NotSupported(interface.to_string()));
        }
        Ok(NativeEvent::blank(interface))
    }

    fn dom_level(&self) -> u8 {
        self.config.dom_level
    }

    fn window(&self) -> TargetId {
        self.config.window
    }

    fn add_event_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
        listener: NativeListener,
        capture: bool,
    ) {
        let mut listeners = self.listeners.borrow_mut();
        let attached = listeners.entry((target, event_type.to_string())).or_default();
        if attached.iter().any(|a| a.id == id && a.capture == capture) {
            return;
        }
        attached.push(Attached { id, capture, listener });
    }

    fn remove_event_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
        capture: bool,
    ) {
        let mut listeners = self.listeners.borrow_mut();
        let key = (target, event_type.to_string());
        if let Some(attached) = listeners.get_mut(&key) {
            attached.retain(|a| !(a.id == id && a.capture == capture));
            if attached.is_empty() {
                listeners.remove(&key);
            }
        }
    }
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("config", &self.config)
            .field("listeners", &self.total_listeners())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const CLICK: TargetId = TargetId(1);

    fn counting_listener(count: &Rc<Cell<u32>>) -> NativeListener {
        let count = count.clone();
        Rc::new(move |_e: &mut NativeEvent| count.set(count.get() + 1))
    }

    fn recording_listener(
        order: &Rc<RefCell<Vec<&'static str>>>,
        label: &'static str,
    ) -> NativeListener {
        let order = order.clone();
        Rc::new(move |_e: &mut NativeEvent| order.borrow_mut().push(label))
    }

    #[test]
    fn test_construct_modern() {
        let host = MemoryHost::default();
        let options = EventOptions::default();
        let event = host.construct(EventFamily::Mouse, "click", &options).unwrap();
        assert!(event.is_initialized());
        assert_eq!(event.interface, "MouseEvent");
    }

    #[test]
    fn test_construct_rejects_mutation() {
        let host = MemoryHost::default();
        let options = EventOptions::default();
        let result = host.construct(EventFamily::Mutation, "domnodeinserted", &options);
        assert!(matches!(result, Err(EventError::Constructor { .. })));
    }

    #[test]
    fn test_create_event_legacy_names() {
        let host = MemoryHost::default();
        assert!(host.create_event("MouseEvents").is_ok());
        assert!(host.create_event("CustomEvent").is_ok());
        assert_eq!(
            host.create_event("BogusEvent").unwrap_err(),
            EventError::NotSupported("BogusEvent".to_string())
        );
    }

    #[test]
    fn test_add_listener_is_idempotent() {
        let host = MemoryHost::default();
        let count = Rc::new(Cell::new(0));
        host.add_event_listener(CLICK, "click", ListenerId(1), counting_listener(&count), false);
        host.add_event_listener(CLICK, "click", ListenerId(1), counting_listener(&count), false);
        assert_eq!(host.listener_count(CLICK, "click"), 1);

        let mut event = NativeEvent::new("MouseEvent", "click", true, true, EventInit::Basic);
        host.dispatch_event(CLICK, &mut event);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let host = MemoryHost::default();
        let count = Rc::new(Cell::new(0));
        host.add_event_listener(CLICK, "click", ListenerId(1), counting_listener(&count), true);
        host.remove_event_listener(CLICK, "click", ListenerId(1), false);
        assert_eq!(host.listener_count(CLICK, "click"), 1);
        assert!(host.has_listener(CLICK, "click", ListenerId(1), true));

        host.remove_event_listener(CLICK, "click", ListenerId(1), true);
        assert_eq!(host.listener_count(CLICK, "click"), 0);
        assert_eq!(host.total_listeners(), 0);
    }

    #[test]
    fn test_dispatch_capture_first_and_immediate_stop() {
        let host = MemoryHost::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        let stopper: NativeListener = Rc::new(move |e: &mut NativeEvent| {
            o.borrow_mut().push("bubble");
            e.stop_bubble_all();
        });
        host.add_event_listener(TargetId(2), "keyup", ListenerId(1), stopper, false);
        let late = recording_listener(&order, "late");
        host.add_event_listener(TargetId(2), "keyup", ListenerId(2), late, false);
        let capture = recording_listener(&order, "capture");
        host.add_event_listener(TargetId(2), "keyup", ListenerId(3), capture, true);

        let mut event = NativeEvent::new("KeyboardEvent", "keyup", true, true, EventInit::Basic);
        assert!(host.dispatch_event(TargetId(2), &mut event));
        assert_eq!(*order.borrow(), ["capture", "bubble"]);
        assert_eq!(event.target, Some(TargetId(2)));
    }

    #[test]
    fn test_dispatch_reports_prevented_default() {
        let host = MemoryHost::default();
        let listener: NativeListener = Rc::new(|e: &mut NativeEvent| e.stop_default());
        host.add_event_listener(TargetId(3), "submit", ListenerId(1), listener, false);

        let mut event = NativeEvent::new("Event", "submit", true, true, EventInit::Basic);
        assert!(!host.dispatch_event(TargetId(3), &mut event));
    }
}
