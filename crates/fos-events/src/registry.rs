//! Target Registry
//!
//! Side table of bound events keyed by target identity:
//! `target -> type -> ordered slots`. Removal clears slots and then compacts
//! the touched lists, dropping a type once its list is empty and a target
//! once it has no types left.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::event::Binding;
use crate::{
    Event, EventError, EventHost, EventOptions, EventTarget, Handler, ListenerId, NativeEvent,
    NativeListener, Result, TargetId,
};

type Slots = Vec<Option<Binding>>;

struct RegistryInner {
    host: Rc<dyn EventHost>,
    targets: RefCell<HashMap<TargetId, HashMap<String, Slots>>>,
    next_listener: Cell<u64>,
}

/// Shared handle to the registry. Clones refer to the same registry.
#[derive(Clone)]
pub struct Registry {
    inner: Rc<RegistryInner>,
}

impl Registry {
    pub fn new(host: impl EventHost + 'static) -> Self {
        Self::with_host(Rc::new(host))
    }

    /// Registry over a host the caller keeps a handle to
    pub fn with_host(host: Rc<dyn EventHost>) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                host,
                targets: RefCell::new(HashMap::new()),
                next_listener: Cell::new(1),
            }),
        }
    }

    pub fn host(&self) -> &dyn EventHost {
        self.inner.host.as_ref()
    }

    /// New descriptor (not bound)
    pub fn event(
        &self,
        event_type: &str,
        handler: Option<Handler>,
        options: EventOptions,
    ) -> Result<Event> {
        Event::new(self, event_type, handler, options)
    }

    /// New descriptor forced to the `CustomEvent` class
    pub fn custom_event(
        &self,
        event_type: &str,
        handler: Option<Handler>,
        options: EventOptions,
    ) -> Result<Event> {
        let options = EventOptions {
            custom: true,
            ..options
        };
        Event::new(self, event_type, handler, options)
    }

    /// Registry view for a target, failing when there is none
    pub fn event_target(&self, target: Option<TargetId>) -> Result<EventTarget> {
        target.map(|t| self.target(t)).ok_or(EventError::MissingTarget)
    }

    pub fn target(&self, target: TargetId) -> EventTarget {
        EventTarget::new(self.clone(), target)
    }

    pub fn on(
        &self,
        target: TargetId,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<Vec<Event>> {
        self.target(target).on(types, handler, options)
    }

    pub fn once(
        &self,
        target: TargetId,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<Vec<Event>> {
        self.target(target).once(types, handler, options)
    }

    pub fn off(
        &self,
        target: TargetId,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<usize> {
        self.target(target).off(types, handler, options)
    }

    pub fn fire(
        &self,
        target: TargetId,
        types: &str,
        handler: Option<Handler>,
        options: Option<EventOptions>,
    ) -> Result<usize> {
        self.target(target).fire(types, handler, options)
    }

    // === Introspection ===

    /// Whether the target currently has bound events. Entries are created on the
    /// first add and dropped when the last event is removed.
    pub fn has_registry(&self, target: TargetId) -> bool {
        self.inner.targets.borrow().contains_key(&target)
    }

    /// Types with at least one bound event, sorted
    pub fn types(&self, target: TargetId) -> Vec<String> {
        let targets = self.inner.targets.borrow();
        let mut types: Vec<String> = targets
            .get(&target)
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default();
        types.sort();
        types
    }

    /// Bound events for a type, in registration order
    pub fn bound(&self, target: TargetId, event_type: &str) -> Vec<Event> {
        self.lookup(target, event_type)
            .unwrap_or_default()
            .into_iter()
            .map(|binding| Event::from_binding(self.clone(), binding))
            .collect()
    }

    /// Slot count for a type including holes. Equal to `bound().len()` outside a removal.
    pub fn slot_count(&self, target: TargetId, event_type: &str) -> usize {
        self.inner
            .targets
            .borrow()
            .get(&target)
            .and_then(|types| types.get(event_type))
            .map_or(0, Vec::len)
    }

    // === Crate internals ===

    pub(crate) fn next_listener_id(&self) -> ListenerId {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        ListenerId(id)
    }

    /// Append a binding, initializing the target and type lazily. Returns the slot index.
    pub(crate) fn insert(&self, target: TargetId, binding: &Binding) -> usize {
        let mut targets = self.inner.targets.borrow_mut();
        let slots = targets
            .entry(target)
            .or_default()
            .entry(binding.event_type.clone())
            .or_default();
        let index = slots.len();
        slots.push(Some(binding.clone()));
        binding.state.index.set(Some(index));
        index
    }

    /// Live bindings for a type, or `None` when there are none
    pub(crate) fn lookup(&self, target: TargetId, event_type: &str) -> Option<Vec<Binding>> {
        let targets = self.inner.targets.borrow();
        let live: Vec<Binding> = targets
            .get(&target)?
            .get(event_type)?
            .iter()
            .flatten()
            .cloned()
            .collect();
        (!live.is_empty()).then_some(live)
    }

    /// Live bindings matching `filter` across all types, or `None` if the target
    /// has no registry
    pub(crate) fn collect(
        &self,
        target: TargetId,
        filter: impl Fn(&Binding) -> bool,
    ) -> Option<Vec<Binding>> {
        let targets = self.inner.targets.borrow();
        let types = targets.get(&target)?;
        Some(
            types
                .values()
                .flat_map(|slots| slots.iter().flatten())
                .filter(|binding| filter(binding))
                .cloned()
                .collect(),
        )
    }

    pub(crate) fn find_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
    ) -> Option<Binding> {
        let targets = self.inner.targets.borrow();
        targets
            .get(&target)?
            .get(event_type)?
            .iter()
            .flatten()
            .find(|binding| binding.listener_id() == Some(id))
            .cloned()
    }

    /// Clear the slots of `bindings`, compact touched types, drop the target once
    /// it is empty and detach the native listeners. Returns how many slots were
    /// cleared.
    pub(crate) fn remove(&self, target: TargetId, bindings: Vec<Binding>) -> usize {
        let mut detached = Vec::new();
        {
            let mut targets = self.inner.targets.borrow_mut();
            let Some(types) = targets.get_mut(&target) else {
                return 0;
            };

            let mut touched = BTreeSet::new();
            for binding in bindings {
                let Some(slots) = types.get_mut(&binding.event_type) else {
                    continue;
                };
                let holds = |slot: &Option<Binding>| {
                    slot.as_ref().is_some_and(|s| s.same_slot(&binding))
                };
                let position = match binding.state.index.get() {
                    Some(i) if slots.get(i).is_some_and(holds) => Some(i),
                    _ => slots.iter().position(holds),
                };
                if let Some(position) = position {
                    slots[position] = None;
                    binding.state.index.set(None);
                    touched.insert(binding.event_type.clone());
                    detached.push(binding);
                }
            }

            for event_type in touched {
                let Some(slots) = types.get_mut(&event_type) else {
                    continue;
                };
                slots.retain(Option::is_some);
                if slots.is_empty() {
                    types.remove(&event_type);
                } else {
                    for (i, binding) in slots.iter().flatten().enumerate() {
                        binding.state.index.set(Some(i));
                    }
                }
            }

            if types.is_empty() {
                targets.remove(&target);
            }
        }

        for binding in &detached {
            if let Some(id) = binding.listener_id() {
                self.inner.host.remove_event_listener(
                    target,
                    &binding.event_type,
                    id,
                    binding.use_capture,
                );
            }
        }

        tracing::debug!("Removed {} event(s) from target {:?}", detached.len(), target);
        detached.len()
    }

    /// Remove exactly one binding (used by `once` before its handler runs)
    pub(crate) fn detach(&self, binding: &Binding) {
        if let Some(target) = binding.target {
            self.remove(target, vec![binding.clone()]);
        }
    }

    /// Listener attached to the host for a binding. Holds the registry weakly.
    pub(crate) fn native_listener(
        &self,
        target: TargetId,
        event_type: &str,
        id: ListenerId,
    ) -> NativeListener {
        let registry = Rc::downgrade(&self.inner);
        let event_type = event_type.to_string();
        Rc::new(move |event: &mut NativeEvent| {
            let Some(inner) = registry.upgrade() else {
                return;
            };
            let registry = Registry { inner };
            if let Some(binding) = registry.find_listener(target, &event_type, id) {
                binding.invoke(&registry, event);
            }
        })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("targets", &self.inner.targets.borrow().len())
            .finish()
    }
}
