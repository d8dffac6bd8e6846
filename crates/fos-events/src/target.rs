//! Event Targets
//!
//! Registry view for one host object: add, remove and dispatch bound events,
//! plus the `on`/`once`/`off`/`fire` shortcuts.

use crate::{Event, EventData, EventOptions, Handler, Registry, Result, TargetId, type_list};

/// A host object that can carry listeners
#[derive(Debug, Clone)]
pub struct EventTarget {
    registry: Registry,
    target: TargetId,
}

impl EventTarget {
    pub(crate) fn new(registry: Registry, target: TargetId) -> Self {
        Self { registry, target }
    }

    pub fn id(&self) -> TargetId {
        self.target
    }

    /// Register the event under its type and attach its native listener
    pub fn add_event(&self, event: &mut Event) {
        let binding = event.binding_mut();
        binding.target = Some(self.target);
        binding.options.target = Some(self.target);

        let index = self.registry.insert(self.target, binding);
        tracing::debug!("Bound `{}` on target {:?} at {}", binding.event_type, self.target, index);

        if let Some(id) = binding.listener_id() {
            let listener = self.registry.native_listener(self.target, &binding.event_type, id);
            self.registry.host().add_event_listener(
                self.target,
                &binding.event_type,
                id,
                listener,
                binding.use_capture,
            );
        }
    }

    /// Remove bound events selected by the descriptor's type:
    ///
    /// - `*`: everything
    /// - `**`: everything fired at least once
    /// - `type**`: everything of `type` fired at least once
    /// - otherwise every event sharing the descriptor's handler, or when it has
    ///   none, every event of its type
    ///
    /// Returns the number of removed events.
    pub fn remove_event(&self, event: &Event) -> usize {
        let event_type = event.event_type();
        let selection = if event_type == "*" {
            self.registry.collect(self.target, |_| true)
        } else if event_type == "**" {
            self.registry.collect(self.target, |b| b.fired() > 0)
        } else if let Some(prefix) = event_type.strip_suffix("**") {
            self.registry
                .collect(self.target, |b| b.fired() > 0 && b.event_type == prefix)
        } else if let Some(handler) = event.handler() {
            self.registry
                .collect(self.target, |b| b.handler.as_ref().is_some_and(|h| h.ptr_eq(handler)))
        } else {
            self.registry.collect(self.target, |b| b.event_type == event_type)
        };

        match selection {
            Some(bindings) if !bindings.is_empty() => self.registry.remove(self.target, bindings),
            _ => {
                tracing::warn!("No `{}` events found to remove.", event_type);
                0
            }
        }
    }

    /// Run the handlers bound for the descriptor's type, in registration order.
    ///
    /// The list is snapshotted first: bindings added or removed by a handler do
    /// not change which handlers this dispatch runs. `data` is merged into each
    /// binding's payload and its live event before the handler is called.
    /// Returns the number of handlers run.
    pub fn dispatch(&self, event: &Event, data: Option<&EventData>) -> usize {
        let Some(bindings) = self.registry.lookup(self.target, event.event_type()) else {
            tracing::warn!("No `{}` type events found to fire.", event.event_type());
            return 0;
        };

        let mut invoked = 0;
        for binding in &bindings {
            if let Some(data) = data {
                binding.state.data.borrow_mut().extend(data.clone());
                binding.native.borrow_mut().data.extend(data.clone());
            }

            let mut live = binding.native.borrow().clone();
            live.begin_dispatch();
            if binding.invoke(&self.registry, &mut live) {
                invoked += 1;
            }
            *binding.native.borrow_mut() = live;
        }
        invoked
    }

    // === Shortcuts ===

    fn prepare(
        &self,
        handler: Option<Handler>,
        options: Option<EventOptions>,
        once: bool,
    ) -> (Option<Handler>, EventOptions) {
        let mut options = options.unwrap_or_default();
        let handler = handler.or_else(|| options.handler.take());
        options.target = Some(self.target);
        options.once = options.once || once;
        (handler, options)
    }

    fn add_each(
        &self,
        types: &str,
        handler: Option<Handler>,
        options: EventOptions,
    ) -> Result<Vec<Event>> {
        type_list(types)?
            .into_iter()
            .map(|event_type| {
                let mut event =
                    Event::new(&self.registry, event_type, handler.clone(), options.clone())?;
                self.add_event(&mut event);
                Ok(event)
            })
            .collect()
    }

    /// Bind `handler` for each comma separated type
    pub fn on(
        &self,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<Vec<Event>> {
        let (handler, options) = self.prepare(handler, options, false);
        self.add_each(types, handler, options)
    }

    /// Bind `handler` for each type, removing it after its first call
    pub fn once(
        &self,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<Vec<Event>> {
        let (handler, options) = self.prepare(handler, options, true);
        self.add_each(types, handler, options)
    }

    /// Remove events for each type. With a handler, removes that handler everywhere.
    pub fn off(
        &self,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<usize> {
        let (handler, options) = self.prepare(handler, options, false);
        let mut removed = 0;
        for event_type in type_list(types)? {
            let event = Event::new(&self.registry, event_type, handler.clone(), options.clone())?;
            removed += self.remove_event(&event);
        }
        Ok(removed)
    }

    /// Dispatch each type with the options' data. Returns the number of handlers run.
    pub fn fire(
        &self,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<usize> {
        let (handler, options) = self.prepare(handler, options, false);
        let data = (!options.data.is_empty()).then_some(&options.data);
        let mut invoked = 0;
        for event_type in type_list(types)? {
            let event = Event::new(&self.registry, event_type, handler.clone(), options.clone())?;
            invoked += self.dispatch(&event, data);
        }
        Ok(invoked)
    }

    // === Introspection ===

    /// Bound events for a type, in registration order
    pub fn events(&self, event_type: &str) -> Vec<Event> {
        self.registry.bound(self.target, event_type)
    }

    pub fn types(&self) -> Vec<String> {
        self.registry.types(self.target)
    }
}
