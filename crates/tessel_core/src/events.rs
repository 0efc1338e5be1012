//! Component events
//!
//! Components emit named events carrying an arbitrary detail payload.
//! Listeners are kept per event name in insertion order, which is also the
//! order they are invoked in. Dispatch works on a snapshot of the listener
//! list, so listeners added or removed while an event is being delivered
//! only affect later dispatches.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Listener callback for component events
pub type Listener = Rc<dyn Fn(&mut ComponentEvent)>;

/// An event emitted by a component
pub struct ComponentEvent {
    name: String,
    detail: Box<dyn Any>,
    cancelable: bool,
    default_prevented: bool,
}

impl ComponentEvent {
    pub fn new(name: &str, detail: impl Any, cancelable: bool) -> Self {
        Self {
            name: name.to_string(),
            detail: Box::new(detail),
            cancelable,
            default_prevented: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The detail payload, if it has type `T`
    pub fn detail<T: 'static>(&self) -> Option<&T> {
        self.detail.downcast_ref::<T>()
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Cancel the event; ignored for non-cancelable events
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl std::fmt::Debug for ComponentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentEvent")
            .field("name", &self.name)
            .field("cancelable", &self.cancelable)
            .field("default_prevented", &self.default_prevented)
            .finish_non_exhaustive()
    }
}

/// Per-instance listener registry
#[derive(Default)]
pub struct EventListeners {
    next_id: Cell<u64>,
    by_name: RefCell<FxHashMap<String, Vec<(u64, Listener)>>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `name`, returning its id
    pub fn add(&self, name: &str, listener: Listener) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.by_name
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a listener; unknown ids are ignored
    pub fn remove(&self, name: &str, id: u64) {
        let mut by_name = self.by_name.borrow_mut();
        if let Some(list) = by_name.get_mut(name) {
            list.retain(|(existing, _)| *existing != id);
            if list.is_empty() {
                by_name.remove(name);
            }
        }
    }

    pub fn count(&self, name: &str) -> usize {
        self.by_name.borrow().get(name).map(Vec::len).unwrap_or(0)
    }

    /// Deliver an event to the listeners registered for its name
    ///
    /// Returns `true` unless a listener cancelled the event. An event
    /// nobody listens to is not cancelled.
    pub fn dispatch(&self, mut event: ComponentEvent) -> bool {
        let snapshot: SmallVec<[Listener; 4]> = match self.by_name.borrow().get(&event.name) {
            Some(list) => list.iter().map(|(_, l)| l.clone()).collect(),
            None => return true,
        };
        tracing::trace!(event = %event.name, listeners = snapshot.len(), "dispatch");
        for listener in snapshot {
            listener(&mut event);
        }
        !event.default_prevented
    }
}

/// Removal handle returned when a listener is registered
///
/// Removing is idempotent, and removing after the owning component is gone
/// does nothing.
#[must_use = "dropping the handle keeps the listener registered"]
pub struct ListenerHandle {
    listeners: Weak<EventListeners>,
    name: String,
    id: u64,
}

impl ListenerHandle {
    pub(crate) fn new(listeners: &Rc<EventListeners>, name: &str, id: u64) -> Self {
        Self {
            listeners: Rc::downgrade(listeners),
            name: name.to_string(),
            id,
        }
    }

    pub fn remove(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(&self.name, self.id);
        }
    }
}
