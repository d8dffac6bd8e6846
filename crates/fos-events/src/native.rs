//! Native Events
//!
//! The host-level event object, its per-family init recipes and the stop
//! helpers handlers use during dispatch.

use serde_json::Value;

use crate::{EventData, EventFamily, EventOptions, ListenerId, TargetId};

/// Family specific initialization state
#[derive(Debug, Clone, PartialEq)]
pub enum EventInit {
    /// `initEvent(type, bubbles, cancelable)`
    Basic,
    /// `initUIEvent(type, bubbles, cancelable, view, detail)`
    Ui {
        view: Option<TargetId>,
        detail: Option<Value>,
    },
    /// `initMouseEvent(...)` with 15 arguments
    Mouse(MouseInit),
    /// `initMutationEvent(...)`
    Mutation(MutationInit),
    /// `initCustomEvent(type, bubbles, cancelable, detail)`
    Custom { detail: Option<Value> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseInit {
    pub view: Option<TargetId>,
    pub detail: Option<Value>,
    pub screen_x: i32,
    pub screen_y: i32,
    pub client_x: i32,
    pub client_y: i32,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
    pub button: i16,
    pub related_target: Option<TargetId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationInit {
    pub related_node: Option<TargetId>,
    pub prev_value: String,
    pub new_value: String,
    pub attr_name: String,
    pub attr_change: u16,
}

impl EventInit {
    /// Init state a dictionary constructor derives from options
    pub fn from_options(family: EventFamily, options: &EventOptions, window: TargetId) -> Self {
        let view = options.view.or(Some(window));
        match family {
            EventFamily::Ui
            | EventFamily::Focus
            | EventFamily::Keyboard
            | EventFamily::Touch
            | EventFamily::Composition => EventInit::Ui {
                view,
                detail: options.detail.clone(),
            },
            f if f.is_mouse_like() => EventInit::Mouse(MouseInit::from_options(options, view)),
            EventFamily::Mutation => EventInit::Mutation(MutationInit::from_options(options)),
            EventFamily::Custom => EventInit::Custom {
                detail: options.detail.clone(),
            },
            _ => EventInit::Basic,
        }
    }
}

impl MouseInit {
    pub fn from_options(options: &EventOptions, view: Option<TargetId>) -> Self {
        Self {
            view,
            detail: options.detail.clone(),
            screen_x: options.screen_x,
            screen_y: options.screen_y,
            client_x: options.client_x,
            client_y: options.client_y,
            ctrl_key: options.ctrl_key,
            alt_key: options.alt_key,
            shift_key: options.shift_key,
            meta_key: options.meta_key,
            button: options.button,
            related_target: options.related_target,
        }
    }
}

impl MutationInit {
    pub fn from_options(options: &EventOptions) -> Self {
        Self {
            related_node: options.related_node,
            prev_value: options.prev_value.clone(),
            new_value: options.new_value.clone(),
            attr_name: options.attr_name.clone(),
            attr_change: options.attr_change,
        }
    }
}

/// Native event object
#[derive(Debug, Clone)]
pub struct NativeEvent {
    pub event_type: String,
    /// Interface the host created the event with (`"MouseEvents"` on old hosts)
    pub interface: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub init: EventInit,
    initialized: bool,

    pub target: Option<TargetId>,
    pub current_target: Option<TargetId>,
    pub data: EventData,

    // Set by the wrapped handler
    pub event_class: Option<EventFamily>,
    pub fired: u32,
    pub listener: Option<ListenerId>,

    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,

    stopped: bool,
    stopped_all: bool,
    stopped_default: bool,
    stopped_bubble: bool,
    stopped_bubble_all: bool,
}

impl NativeEvent {
    /// Uninitialized event, as returned by `createEvent`
    pub fn blank(interface: &str) -> Self {
        Self {
            event_type: String::new(),
            interface: interface.to_string(),
            bubbles: false,
            cancelable: false,
            init: EventInit::Basic,
            initialized: false,
            target: None,
            current_target: None,
            data: EventData::new(),
            event_class: None,
            fired: 0,
            listener: None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            stopped: false,
            stopped_all: false,
            stopped_default: false,
            stopped_bubble: false,
            stopped_bubble_all: false,
        }
    }

    /// Initialized event, as returned by a dictionary constructor
    pub fn new(
        interface: &str,
        event_type: &str,
        bubbles: bool,
        cancelable: bool,
        init: EventInit,
    ) -> Self {
        let mut event = Self::blank(interface);
        event.event_type = event_type.to_string();
        event.bubbles = bubbles;
        event.cancelable = cancelable;
        event.init = init;
        event.initialized = true;
        event
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // === Legacy init recipes ===

    pub fn init_event(&mut self, event_type: &str, bubbles: bool, cancelable: bool) {
        self.event_type = event_type.to_string();
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        self.init = EventInit::Basic;
        self.initialized = true;
    }

    pub fn init_ui_event(
        &mut self,
        event_type: &str,
        bubbles: bool,
        cancelable: bool,
        view: Option<TargetId>,
        detail: Option<Value>,
    ) {
        self.init_event(event_type, bubbles, cancelable);
        self.init = EventInit::Ui { view, detail };
    }

    #[allow(clippy::too_many_arguments)]
    pub fn init_mouse_event(
        &mut self,
        event_type: &str,
        bubbles: bool,
        cancelable: bool,
        view: Option<TargetId>,
        detail: Option<Value>,
        screen_x: i32,
        screen_y: i32,
        client_x: i32,
        client_y: i32,
        ctrl_key: bool,
        alt_key: bool,
        shift_key: bool,
        meta_key: bool,
        button: i16,
        related_target: Option<TargetId>,
    ) {
        self.init_event(event_type, bubbles, cancelable);
        self.init = EventInit::Mouse(MouseInit {
            view,
            detail,
            screen_x,
            screen_y,
            client_x,
            client_y,
            ctrl_key,
            alt_key,
            shift_key,
            meta_key,
            button,
            related_target,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn init_mutation_event(
        &mut self,
        event_type: &str,
        bubbles: bool,
        cancelable: bool,
        related_node: Option<TargetId>,
        prev_value: &str,
        new_value: &str,
        attr_name: &str,
        attr_change: u16,
    ) {
        self.init_event(event_type, bubbles, cancelable);
        self.init = EventInit::Mutation(MutationInit {
            related_node,
            prev_value: prev_value.to_string(),
            new_value: new_value.to_string(),
            attr_name: attr_name.to_string(),
            attr_change,
        });
    }

    pub fn init_custom_event(
        &mut self,
        event_type: &str,
        bubbles: bool,
        cancelable: bool,
        detail: Option<Value>,
    ) {
        self.init_event(event_type, bubbles, cancelable);
        self.init = EventInit::Custom { detail };
    }

    /// `detail` of UI, mouse and custom events
    pub fn detail(&self) -> Option<&Value> {
        match &self.init {
            EventInit::Ui { detail, .. } | EventInit::Custom { detail } => detail.as_ref(),
            EventInit::Mouse(mouse) => mouse.detail.as_ref(),
            _ => None,
        }
    }

    // === Platform primitives ===

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    // === Stop helpers ===

    /// Prevent default and stop bubbling
    pub fn stop(&mut self) {
        self.stop_default();
        self.stop_bubble();
        self.stopped = true;
    }

    /// Prevent default and stop all propagation, including sibling listeners
    pub fn stop_all(&mut self) {
        self.stop_default();
        self.stop_bubble();
        self.stop_bubble_all();
        self.stopped_all = true;
    }

    pub fn stop_default(&mut self) {
        self.prevent_default();
        self.stopped_default = true;
    }

    pub fn stop_bubble(&mut self) {
        self.stop_propagation();
        self.stopped_bubble = true;
    }

    pub fn stop_bubble_all(&mut self) {
        self.stop_immediate_propagation();
        self.stopped_bubble_all = true;
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn stopped_all(&self) -> bool {
        self.stopped_all
    }

    pub fn stopped_default(&self) -> bool {
        self.stopped_default
    }

    pub fn stopped_bubble(&self) -> bool {
        self.stopped_bubble
    }

    pub fn stopped_bubble_all(&self) -> bool {
        self.stopped_bubble_all
    }

    /// Clear propagation and stop state before a new dispatch
    pub(crate) fn begin_dispatch(&mut self) {
        self.default_prevented = false;
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
        self.stopped = false;
        self.stopped_all = false;
        self.stopped_default = false;
        self.stopped_bubble = false;
        self.stopped_bubble_all = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_uninitialized() {
        let event = NativeEvent::blank("MouseEvents");
        assert!(!event.is_initialized());
        assert_eq!(event.interface, "MouseEvents");
        assert!(event.event_type.is_empty());
    }

    #[test]
    fn test_init_mouse_event() {
        let mut event = NativeEvent::blank("MouseEvent");
        event.init_mouse_event(
            "click",
            true,
            true,
            Some(TargetId::WINDOW),
            None,
            10,
            20,
            30,
            40,
            true,
            false,
            false,
            false,
            0,
            None,
        );
        assert!(event.is_initialized());
        match &event.init {
            EventInit::Mouse(mouse) => {
                assert_eq!(mouse.client_x, 30);
                assert!(mouse.ctrl_key);
                assert_eq!(mouse.button, 0);
            }
            other => panic!("expected mouse init, got {:?}", other),
        }
    }

    #[test]
    fn test_init_mutation_event() {
        let mut event = NativeEvent::blank("MutationEvent");
        event.init_mutation_event(
            "domattrmodified",
            true,
            false,
            Some(TargetId(4)),
            "old",
            "new",
            "class",
            1,
        );
        match &event.init {
            EventInit::Mutation(m) => {
                assert_eq!(m.attr_name, "class");
                assert_eq!(m.related_node, Some(TargetId(4)));
            }
            other => panic!("expected mutation init, got {:?}", other),
        }
    }

    #[test]
    fn test_prevent_default_needs_cancelable() {
        let mut event = NativeEvent::new("Event", "load", false, false, EventInit::Basic);
        event.stop_default();
        assert!(!event.is_default_prevented());
        assert!(event.stopped_default());
    }

    #[test]
    fn test_stop_helpers() {
        let mut event = NativeEvent::new("MouseEvent", "click", true, true, EventInit::Basic);
        event.stop();
        assert!(event.stopped());
        assert!(event.is_default_prevented());
        assert!(event.is_propagation_stopped());
        assert!(!event.is_immediate_propagation_stopped());

        event.stop_all();
        assert!(event.stopped_all());
        assert!(event.stopped_bubble_all());
        assert!(event.is_immediate_propagation_stopped());

        event.begin_dispatch();
        assert!(!event.stopped());
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_from_options_picks_recipe() {
        let options = EventOptions::new().detail(5);
        let init = EventInit::from_options(EventFamily::Keyboard, &options, TargetId::WINDOW);
        assert_eq!(
            init,
            EventInit::Ui {
                view: Some(TargetId::WINDOW),
                detail: Some(Value::from(5)),
            }
        );

        let init = EventInit::from_options(EventFamily::Storage, &options, TargetId::WINDOW);
        assert_eq!(init, EventInit::Basic);

        let init = EventInit::from_options(EventFamily::Wheel, &options, TargetId(9));
        match init {
            EventInit::Mouse(mouse) => assert_eq!(mouse.view, Some(TargetId(9))),
            other => panic!("expected mouse init, got {:?}", other),
        }
    }
}
