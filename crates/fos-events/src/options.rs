//! Event Options
//!
//! Construction and binding options shared by every event family. Fields a
//! family does not use are ignored by its init recipe.

use serde_json::Value;

use crate::{EventData, EventFamily, Handler, TargetId};

/// Options for creating and binding an event
#[derive(Debug, Clone)]
pub struct EventOptions {
    // All families
    pub bubbles: bool,
    pub cancelable: bool,
    pub scoped: bool,
    pub composed: bool,

    // UI, mouse, custom. `None` view means the host window.
    pub view: Option<TargetId>,
    pub detail: Option<Value>,

    // Mutation
    pub related_node: Option<TargetId>,
    pub prev_value: String,
    pub new_value: String,
    pub attr_name: String,
    pub attr_change: u16,

    // Mouse
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

    // Binding
    pub use_capture: bool,
    pub once: bool,
    pub passive: bool,
    pub data: EventData,
    pub target: Option<TargetId>,
    /// Force a family instead of classifying the type name
    pub event_class: Option<EventFamily>,
    /// Force the `CustomEvent` class
    pub custom: bool,
    /// Handler passed inside the options record
    pub handler: Option<Handler>,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            bubbles: true,
            cancelable: true,
            scoped: false,
            composed: false,
            view: None,
            detail: None,
            related_node: None,
            prev_value: String::new(),
            new_value: String::new(),
            attr_name: String::new(),
            attr_change: 0,
            screen_x: 0,
            screen_y: 0,
            client_x: 0,
            client_y: 0,
            ctrl_key: false,
            alt_key: false,
            shift_key: false,
            meta_key: false,
            button: 1,
            related_target: None,
            use_capture: false,
            once: false,
            passive: false,
            data: EventData::new(),
            target: None,
            event_class: None,
            custom: false,
            handler: None,
        }
    }
}

impl EventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn use_capture(mut self, use_capture: bool) -> Self {
        self.use_capture = use_capture;
        self
    }

    pub fn passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    pub fn event_class(mut self, family: EventFamily) -> Self {
        self.event_class = Some(family);
        self
    }

    pub fn detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Insert one payload entry
    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}
