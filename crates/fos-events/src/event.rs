//! Event Descriptors
//!
//! An [`Event`] is one (type, handler, options) binding intent. Every lifecycle
//! operation works on a fresh copy, so binding or firing through one value never
//! mutates another holder's descriptor. Bookkeeping (fired count, registry slot,
//! payload) is shared between a bound copy and its registry entry.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    EventData, EventError, EventFamily, EventOptions, ListenerId, NativeEvent, Registry, Result,
    TargetId, create_native, is_standard_type, type_list,
};

/// User callback invoked with the live event
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&mut NativeEvent)>);

impl Handler {
    pub fn new(f: impl Fn(&mut NativeEvent) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &mut NativeEvent) {
        (self.0)(event)
    }

    /// Handler identity, used for handler-scoped removal
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0))
    }
}

/// Handler with its invocation context and host-visible identity
#[derive(Debug, Clone)]
pub(crate) struct Wrapped {
    pub(crate) handler: Handler,
    pub(crate) context: Option<TargetId>,
    pub(crate) id: ListenerId,
}

#[derive(Debug)]
pub(crate) struct BindingState {
    pub(crate) fired: Cell<u32>,
    pub(crate) index: Cell<Option<usize>>,
    pub(crate) data: RefCell<EventData>,
}

impl BindingState {
    fn new(data: EventData) -> Self {
        Self {
            fired: Cell::new(0),
            index: Cell::new(None),
            data: RefCell::new(data),
        }
    }

    fn snapshot(&self) -> Self {
        Self {
            fired: Cell::new(self.fired.get()),
            index: Cell::new(self.index.get()),
            data: RefCell::new(self.data.borrow().clone()),
        }
    }
}

/// Descriptor state without the registry handle. This is what the registry stores.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub(crate) event_type: String,
    pub(crate) event_class: EventFamily,
    pub(crate) options: EventOptions,
    pub(crate) target: Option<TargetId>,
    pub(crate) handler: Option<Handler>,
    pub(crate) wrapped: Option<Wrapped>,
    pub(crate) use_capture: bool,
    pub(crate) once: bool,
    pub(crate) passive: bool,
    pub(crate) custom: bool,
    pub(crate) native: Rc<RefCell<NativeEvent>>,
    pub(crate) state: Rc<BindingState>,
}

impl Binding {
    /// Independent copy: own native event, own bookkeeping
    fn copy(&self) -> Binding {
        Binding {
            native: Rc::new(RefCell::new(self.native.borrow().clone())),
            state: Rc::new(self.state.snapshot()),
            ..self.clone()
        }
    }

    pub(crate) fn listener_id(&self) -> Option<ListenerId> {
        self.wrapped.as_ref().map(|w| w.id)
    }

    pub(crate) fn fired(&self) -> u32 {
        self.state.fired.get()
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.state.index.get().is_some()
    }

    pub(crate) fn same_slot(&self, other: &Binding) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// The wrapped handler. Returns whether the user handler ran.
    pub(crate) fn invoke(&self, registry: &Registry, live: &mut NativeEvent) -> bool {
        let Some(wrapped) = &self.wrapped else {
            return false;
        };

        if self.once {
            // A once binding already detached by an earlier delivery stays silent
            if !self.is_bound() {
                return false;
            }
            registry.detach(self);
        }

        let fired = self.state.fired.get() + 1;
        self.state.fired.set(fired);

        if live.data.is_empty() {
            live.data = self.state.data.borrow().clone();
        }
        if live.target.is_none() {
            live.target = self.target;
        }
        live.current_target = wrapped.context.or(self.target);
        live.event_class = Some(self.event_class);
        live.fired = fired;
        live.listener = Some(wrapped.id);

        wrapped.handler.call(live);
        true
    }
}

/// Event descriptor
#[derive(Debug)]
pub struct Event {
    registry: Registry,
    binding: Binding,
}

impl Event {
    /// Create a descriptor. When `handler` is `None` the handler inside `options` is used.
    pub fn new(
        registry: &Registry,
        event_type: &str,
        handler: Option<Handler>,
        options: EventOptions,
    ) -> Result<Event> {
        let event_type = event_type.trim();
        if event_type.is_empty() {
            return Err(EventError::MissingType);
        }

        let mut options = options;
        let handler = handler.or_else(|| options.handler.take());
        if options.custom {
            options.event_class = Some(EventFamily::Custom);
        }

        let event_type = event_type.to_lowercase();
        let handle = create_native(registry.host(), options.event_class, &event_type, &options)?;
        let custom = handle.event_class == EventFamily::Custom || !is_standard_type(&event_type);

        let wrapped = handler.clone().map(|handler| Wrapped {
            handler,
            context: None,
            id: registry.next_listener_id(),
        });

        let binding = Binding {
            event_class: handle.event_class,
            target: options.target,
            handler,
            wrapped,
            use_capture: options.use_capture,
            once: options.once,
            passive: options.passive,
            custom,
            native: Rc::new(RefCell::new(handle.event)),
            state: Rc::new(BindingState::new(options.data.clone())),
            event_type,
            options,
        };

        Ok(Event {
            registry: registry.clone(),
            binding,
        })
    }

    pub(crate) fn from_binding(registry: Registry, binding: Binding) -> Event {
        Event { registry, binding }
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.binding
    }

    pub(crate) fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }

    /// Structurally equal, independently mutable descriptor
    pub fn copy(&self) -> Event {
        Event {
            registry: self.registry.clone(),
            binding: self.binding.copy(),
        }
    }

    /// Copy retargeted to another type, with a native event of that type's family
    fn retyped(&self, event_type: &str) -> Result<Event> {
        let mut event = self.copy();
        let event_type = event_type.to_lowercase();
        if event.binding.event_type == event_type {
            return Ok(event);
        }

        let binding = &mut event.binding;
        let handle = create_native(
            self.registry.host(),
            binding.options.event_class,
            &event_type,
            &binding.options,
        )?;
        binding.custom =
            handle.event_class == EventFamily::Custom || !is_standard_type(&event_type);
        binding.event_class = handle.event_class;
        binding.native = Rc::new(RefCell::new(handle.event));
        binding.event_type = event_type;
        Ok(event)
    }

    /// Bind to the target for each listed type (or the descriptor's own type).
    /// Each type gets its own registry entry; the bound copies are returned.
    pub fn bind(&self, types: Option<&str>) -> Result<Vec<Event>> {
        let target = self.registry.event_target(self.binding.target)?;
        let types = types.unwrap_or(self.binding.event_type.as_str());

        let mut bound = Vec::new();
        for event_type in type_list(types)? {
            let mut event = self.retyped(event_type)?;
            target.add_event(&mut event);
            bound.push(event);
        }
        Ok(bound)
    }

    /// Bind a copy to `target`, with the handler invoked in that target's context
    pub fn bind_to(&self, target: TargetId) -> Result<Vec<Event>> {
        let mut event = self.copy();
        event.binding.target = Some(target);
        event.binding.options.target = Some(target);
        if let Some(handler) = &event.binding.handler {
            event.binding.wrapped = Some(Wrapped {
                handler: handler.clone(),
                context: Some(target),
                id: self.registry.next_listener_id(),
            });
        }
        event.bind(None)
    }

    /// Remove matching registrations from the target for each listed type
    pub fn unbind(&self, types: Option<&str>) -> Result<Event> {
        let target = self.registry.event_target(self.binding.target)?;
        let types = types.unwrap_or(self.binding.event_type.as_str());

        for event_type in type_list(types)? {
            let event = self.retyped(event_type)?;
            target.remove_event(&event);
        }
        Ok(self.copy())
    }

    /// Alias of [`Event::unbind`] for chaining
    pub fn off(&self, types: Option<&str>) -> Result<Event> {
        self.unbind(types)
    }

    /// Synchronously run every handler bound on the target for each listed type
    pub fn fire(&self, types: Option<&str>, data: Option<&EventData>) -> Result<Event> {
        let target = self.registry.event_target(self.binding.target)?;
        let types = types.unwrap_or(self.binding.event_type.as_str());

        for event_type in type_list(types)? {
            let event = self.retyped(event_type)?;
            target.dispatch(&event, data);
        }
        Ok(self.copy())
    }

    pub fn is_fired(&self) -> bool {
        self.binding.fired() > 0
    }

    pub fn fired(&self) -> u32 {
        self.binding.fired()
    }

    pub fn event_type(&self) -> &str {
        &self.binding.event_type
    }

    pub fn set_event_type(&mut self, event_type: &str) {
        self.binding.event_type = event_type.to_lowercase();
    }

    pub fn event_class(&self) -> EventFamily {
        self.binding.event_class
    }

    pub fn options(&self) -> &EventOptions {
        &self.binding.options
    }

    /// Payload, including data merged by earlier dispatches
    pub fn data(&self) -> EventData {
        self.binding.state.data.borrow().clone()
    }

    pub fn target(&self) -> Option<TargetId> {
        self.binding.target
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.binding.handler.as_ref()
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        self.binding.listener_id()
    }

    pub fn use_capture(&self) -> bool {
        self.binding.use_capture
    }

    pub fn is_once(&self) -> bool {
        self.binding.once
    }

    pub fn is_passive(&self) -> bool {
        self.binding.passive
    }

    pub fn is_custom(&self) -> bool {
        self.binding.custom
    }

    /// Position in the registry's per-type list, `None` when not bound
    pub fn binding_index(&self) -> Option<usize> {
        self.binding.state.index.get()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    /// The native event delivered by registry dispatch
    pub fn native(&self) -> NativeEvent {
        self.binding.native.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryHost;

    fn registry() -> Registry {
        Registry::new(MemoryHost::default())
    }

    #[test]
    fn test_missing_type() {
        let result = Event::new(&registry(), "  ", None, EventOptions::default());
        assert_eq!(result.unwrap_err(), EventError::MissingType);
    }

    #[test]
    fn test_type_is_lowercased() {
        let event = Event::new(&registry(), "KeyUp", None, EventOptions::default()).unwrap();
        assert_eq!(event.event_type(), "keyup");
        assert_eq!(event.event_class(), EventFamily::Keyboard);
        assert!(!event.is_custom());
        assert_eq!(event.binding_index(), None);
    }

    #[test]
    fn test_custom_detection() {
        let registry = registry();
        let event = Event::new(&registry, "frobnicate", None, EventOptions::default()).unwrap();
        assert!(event.is_custom());
        assert_eq!(event.event_class(), EventFamily::Custom);

        let forced = EventOptions {
            custom: true,
            ..Default::default()
        };
        let event = Event::new(&registry, "click", None, forced).unwrap();
        assert!(event.is_custom());
        assert_eq!(event.native().interface, "CustomEvent");
    }

    #[test]
    fn test_handler_from_options() {
        let options = EventOptions::new().handler(Handler::new(|_| {}));
        let event = Event::new(&registry(), "click", None, options).unwrap();
        assert!(event.handler().is_some());
        assert!(event.listener_id().is_some());
        assert!(event.options().handler.is_none());
    }

    #[test]
    fn test_copy_is_independent() {
        let registry = registry();
        let options = EventOptions::new().target(TargetId(1)).with_data("a", 1);
        let original = Event::new(&registry, "click", Some(Handler::new(|_| {})), options).unwrap();

        let mut copy = original.copy();
        assert_eq!(copy.event_type(), original.event_type());
        assert_eq!(copy.target(), original.target());
        assert_eq!(copy.data(), original.data());
        assert_eq!(copy.event_class(), original.event_class());
        assert!(copy.handler().unwrap().ptr_eq(original.handler().unwrap()));

        copy.set_event_type("keyup");
        assert_eq!(original.event_type(), "click");
        assert_eq!(copy.event_type(), "keyup");
    }

    #[test]
    fn test_bind_without_target() {
        let event = Event::new(&registry(), "click", None, EventOptions::default()).unwrap();
        assert_eq!(event.bind(None).unwrap_err(), EventError::MissingTarget);
    }

    #[test]
    fn test_retyped_reclassifies() {
        let event = Event::new(&registry(), "click", None, EventOptions::default()).unwrap();
        let keyed = event.retyped("KEYDOWN").unwrap();
        assert_eq!(keyed.event_type(), "keydown");
        assert_eq!(keyed.event_class(), EventFamily::Keyboard);
        assert_eq!(keyed.native().event_type, "keydown");
        assert_eq!(event.event_class(), EventFamily::Mouse);
    }

    #[test]
    fn test_handler_debug() {
        let handler = Handler::new(|_| {});
        assert!(format!("{:?}", handler).starts_with("Handler("));
    }
}
