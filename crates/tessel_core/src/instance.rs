//! Component instances
//!
//! A component is a plain Rust struct implementing [`Component`]. Each
//! reactive field gets a stable `usize` slot; writing a field through
//! [`Cx::set`] compares, assigns, notifies a bound parent and marks the slot
//! dirty. The runtime wraps the struct in an instance record that owns the
//! dirty bits, the render fragment, lifecycle hooks, event listeners and the
//! inherited context, and hands out a [`Handle`] to it.
//!
//! # Example
//!
//! ```rust
//! use tessel_core::{Component, Cx, MountOptions, Runtime, Scope, Setup, SharedFragment};
//!
//! #[derive(Default)]
//! struct Inputs {
//!     count: Option<i32>,
//! }
//!
//! struct Counter {
//!     count: i32,
//!     doubled: i32,
//! }
//!
//! impl Counter {
//!     const COUNT: usize = 0;
//!     const DOUBLED: usize = 1;
//! }
//!
//! impl Component for Counter {
//!     type Inputs = Inputs;
//!     const NAME: &'static str = "Counter";
//!
//!     fn create(inputs: Inputs, _setup: &mut Setup<'_, Self>) -> Self {
//!         Counter { count: inputs.count.unwrap_or(0), doubled: 0 }
//!     }
//!
//!     fn set_inputs(&mut self, inputs: Inputs, cx: &mut Cx<'_, Self>) {
//!         if let Some(count) = inputs.count {
//!             cx.set(Self::COUNT, &mut self.count, count);
//!         }
//!     }
//!
//!     fn derive(&mut self, cx: &mut Cx<'_, Self>) -> anyhow::Result<()> {
//!         if cx.is_dirty(Self::COUNT) {
//!             cx.set(Self::DOUBLED, &mut self.doubled, self.count * 2);
//!         }
//!         Ok(())
//!     }
//!
//!     fn render(&self, _scope: &Scope<Self>) -> anyhow::Result<Option<SharedFragment<Self>>> {
//!         Ok(None)
//!     }
//! }
//!
//! let runtime = Runtime::new();
//! let counter = runtime.mount(MountOptions::<Counter>::new(Inputs { count: Some(2) })).unwrap();
//! assert_eq!(counter.read(|c| c.doubled), Some(4));
//!
//! counter.set_inputs(Inputs { count: Some(5) });
//! runtime.tick().unwrap();
//! assert_eq!(counter.read(|c| c.doubled), Some(10));
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::context::ContextMap;
use crate::dirty::DirtyBits;
use crate::error::{Phase, Result, RuntimeError};
use crate::events::{ComponentEvent, EventListeners, ListenerHandle};
use crate::fragment::SharedFragment;
use crate::host::{NodeId, SharedHost};
use crate::runtime::Runtime;
use crate::scheduler::{InstanceId, RenderCallback, Schedulable};

/// Cleanup returned by a mount callback, run when the component is destroyed
pub type Cleanup = Box<dyn FnOnce()>;

type MountFn = Box<dyn FnOnce() -> Option<Cleanup>>;
type HookFn = Rc<RefCell<dyn FnMut() -> anyhow::Result<()>>>;
type BoundFn = Rc<dyn Fn(&dyn Any)>;

/// A component type
pub trait Component: Sized + 'static {
    /// Inputs accepted at construction and by [`Handle::set_inputs`].
    /// Fields left at their default (`None`) are "not provided" and keep the
    /// component's current value.
    type Inputs: Default;

    /// Name used in logs and errors
    const NAME: &'static str;

    /// Initialize state from the construction inputs
    fn create(inputs: Self::Inputs, setup: &mut Setup<'_, Self>) -> Self;

    /// Apply a partial input update
    fn set_inputs(&mut self, inputs: Self::Inputs, cx: &mut Cx<'_, Self>) {
        let _ = (inputs, cx);
    }

    /// Recompute derived slots. Runs once at construction (every slot reads
    /// dirty) and at the start of every update; slots set here are visible
    /// to later checks in the same call.
    fn derive(&mut self, cx: &mut Cx<'_, Self>) -> anyhow::Result<()> {
        let _ = cx;
        Ok(())
    }

    /// Build the render fragment; `None` for a non-visual component
    fn render(&self, scope: &Scope<Self>) -> anyhow::Result<Option<SharedFragment<Self>>>;

    /// Current value of a slot, for two-way bindings
    fn slot_value(&self, slot: usize) -> Option<&dyn Any> {
        let _ = slot;
        None
    }
}

/// Lifecycle of an instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Constructing,
    Mounted,
    Updating,
    Destroyed,
}

enum FragmentSlot<C> {
    Absent,
    Live(SharedFragment<C>),
    Destroyed,
}

#[derive(Default)]
struct Hooks {
    on_mount: RefCell<Vec<MountFn>>,
    before_update: RefCell<Vec<HookFn>>,
    after_update: RefCell<Vec<RenderCallback>>,
    // `None` once destroyed; late cleanups then run immediately
    on_destroy: RefCell<Option<Vec<Cleanup>>>,
}

/// Options for [`Handle::new`]
pub struct MountOptions<C: Component> {
    pub target: Option<NodeId>,
    pub anchor: Option<NodeId>,
    pub inputs: C::Inputs,
    /// Inherited context; defaults to an empty map
    pub context: Option<ContextMap>,
    /// Replace the target's existing children
    pub hydrate: bool,
    /// Play entry animations on first mount
    pub intro: bool,
}

impl<C: Component> MountOptions<C> {
    pub fn new(inputs: C::Inputs) -> Self {
        Self {
            target: None,
            anchor: None,
            inputs,
            context: None,
            hydrate: false,
            intro: false,
        }
    }

    pub fn target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn anchor(mut self, anchor: NodeId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn context(mut self, context: ContextMap) -> Self {
        self.context = Some(context);
        self
    }

    pub fn hydrate(mut self, hydrate: bool) -> Self {
        self.hydrate = hydrate;
        self
    }

    pub fn intro(mut self, intro: bool) -> Self {
        self.intro = intro;
        self
    }
}

impl<C: Component> Default for MountOptions<C> {
    fn default() -> Self {
        Self::new(C::Inputs::default())
    }
}

// =============================================================================
// INSTANCE RECORD
// =============================================================================

pub(crate) struct Instance<C: Component> {
    id: InstanceId,
    runtime: Runtime,
    weak_self: Weak<Instance<C>>,
    state: RefCell<Option<C>>,
    fragment: RefCell<FragmentSlot<C>>,
    dirty: RefCell<DirtyBits>,
    ready: Cell<bool>,
    skip_bound: Cell<bool>,
    lifecycle: Cell<LifecycleState>,
    bound: RefCell<FxHashMap<usize, BoundFn>>,
    hooks: Hooks,
    listeners: Rc<EventListeners>,
    context: RefCell<ContextMap>,
}

impl<C: Component> Instance<C> {
    fn mark_dirty(&self, slot: usize) {
        let first = {
            let mut dirty = self.dirty.borrow_mut();
            let first = dirty.is_all();
            if first {
                *dirty = DirtyBits::empty();
            }
            dirty.insert(slot);
            first
        };
        tracing::trace!(component = C::NAME, slot, "mark dirty");
        if first {
            if let Some(record) = self.weak_self.upgrade() {
                self.runtime.scheduler().enqueue(record);
            }
        }
    }

    fn notify(&self, slot: usize, value: &dyn Any) {
        if !self.skip_bound.get() {
            let bound = self.bound.borrow().get(&slot).cloned();
            if let Some(callback) = bound {
                callback(value);
            }
        }
        if self.ready.get() {
            self.mark_dirty(slot);
        }
    }

    fn is_destroyed(&self) -> bool {
        matches!(*self.fragment.borrow(), FragmentSlot::Destroyed)
    }

    fn live_fragment(&self) -> Option<SharedFragment<C>> {
        match &*self.fragment.borrow() {
            FragmentSlot::Live(fragment) => Some(fragment.clone()),
            _ => None,
        }
    }

    fn run_derive(&self) -> Result<()> {
        let mut cx = Cx::new(self);
        let result = match self.state.borrow_mut().as_mut() {
            Some(state) => state.derive(&mut cx),
            None => Ok(()),
        };
        cx.finish();
        result.map_err(|e| RuntimeError::hook(C::NAME, Phase::Derive, e))
    }

    fn run_before_update(&self) -> Result<()> {
        let hooks: SmallVec<[HookFn; 2]> =
            self.hooks.before_update.borrow().iter().cloned().collect();
        for hook in hooks {
            let mut hook = hook.borrow_mut();
            (&mut *hook)().map_err(|e| RuntimeError::hook(C::NAME, Phase::BeforeUpdate, e))?;
        }
        Ok(())
    }

    fn queue_after_update(&self) {
        let scheduler = self.runtime.scheduler();
        for callback in self.hooks.after_update.borrow().iter() {
            scheduler.add_render_callback(callback.clone());
        }
    }

    fn run_mount_callbacks(&self) {
        let callbacks = std::mem::take(&mut *self.hooks.on_mount.borrow_mut());
        let cleanups: Vec<Cleanup> = callbacks.into_iter().filter_map(|f| f()).collect();
        let orphaned = match self.hooks.on_destroy.borrow_mut().as_mut() {
            Some(on_destroy) => {
                on_destroy.extend(cleanups);
                None
            }
            None => Some(cleanups),
        };
        if let Some(cleanups) = orphaned {
            tracing::debug!(component = C::NAME, "mounted after destroy");
            for cleanup in cleanups {
                cleanup();
            }
        }
        if self.lifecycle.get() == LifecycleState::Constructing {
            self.lifecycle.set(LifecycleState::Mounted);
        }
    }
}

impl<C: Component> Schedulable for Instance<C> {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn component_name(&self) -> &'static str {
        C::NAME
    }

    fn update(&self) -> Result<()> {
        let fragment = match &*self.fragment.borrow() {
            FragmentSlot::Destroyed => return Ok(()),
            FragmentSlot::Live(fragment) => Some(fragment.clone()),
            FragmentSlot::Absent => None,
        };

        if let Err(err) = self.run_derive().and_then(|()| self.run_before_update()) {
            // Already off the pending queue; the next mark must enqueue again
            self.dirty.replace(DirtyBits::all());
            return Err(err);
        }
        let dirty = self.dirty.replace(DirtyBits::all());

        if let Some(fragment) = fragment {
            let mounted = self.lifecycle.get() == LifecycleState::Mounted;
            if mounted {
                self.lifecycle.set(LifecycleState::Updating);
            }
            let result = match self.state.borrow().as_ref() {
                Some(state) => fragment.borrow_mut().patch(state, &dirty),
                None => Ok(()),
            };
            if mounted && self.lifecycle.get() == LifecycleState::Updating {
                self.lifecycle.set(LifecycleState::Mounted);
            }
            result.map_err(|e| RuntimeError::hook(C::NAME, Phase::Patch, e))?;
        }

        self.queue_after_update();
        Ok(())
    }
}

// =============================================================================
// CONTEXTS
// =============================================================================

/// Mutation context passed to component code
///
/// Events dispatched through a `Cx` are delivered once the component's state
/// is released, so listeners may freely call back into the component.
pub struct Cx<'a, C: Component> {
    instance: &'a Instance<C>,
    events: SmallVec<[ComponentEvent; 1]>,
}

impl<'a, C: Component> Cx<'a, C> {
    fn new(instance: &'a Instance<C>) -> Self {
        Self {
            instance,
            events: SmallVec::new(),
        }
    }

    /// Assign `value` to a reactive field; returns whether it changed
    pub fn set<T: PartialEq + 'static>(&mut self, slot: usize, field: &mut T, value: T) -> bool {
        if *field == value {
            return false;
        }
        *field = value;
        self.instance.notify(slot, &*field);
        true
    }

    /// Report an in-place change of a reactive field
    pub fn invalidate<T: 'static>(&mut self, slot: usize, value: &T) {
        self.instance.notify(slot, value);
    }

    /// Whether `slot` is in the current dirty set
    pub fn is_dirty(&self, slot: usize) -> bool {
        self.instance.dirty.borrow().contains(slot)
    }

    pub fn any_dirty(&self, slots: &[usize]) -> bool {
        self.instance.dirty.borrow().any(slots)
    }

    /// Queue a non-cancelable event for this component's listeners
    pub fn dispatch<T: Any>(&mut self, name: &str, detail: T) {
        self.events.push(ComponentEvent::new(name, detail, false));
    }

    pub fn get_context<T: 'static>(&self, key: &str) -> Option<Rc<T>> {
        self.instance.context.borrow().get(key)
    }

    pub fn has_context(&self, key: &str) -> bool {
        self.instance.context.borrow().contains(key)
    }

    pub fn handle(&self) -> WeakHandle<C> {
        WeakHandle(self.instance.weak_self.clone())
    }

    pub fn runtime(&self) -> &Runtime {
        &self.instance.runtime
    }

    fn finish(self) {
        for event in self.events {
            self.instance.listeners.dispatch(event);
        }
    }
}

/// Construction-time context: a [`Cx`] that can also register lifecycle
/// hooks and context values
pub struct Setup<'a, C: Component> {
    cx: Cx<'a, C>,
}

impl<'a, C: Component> Setup<'a, C> {
    /// Run after the component is first mounted; the returned cleanup runs
    /// on destroy
    pub fn on_mount<F>(&mut self, f: F)
    where
        F: FnOnce() -> Option<Cleanup> + 'static,
    {
        self.cx.instance.hooks.on_mount.borrow_mut().push(Box::new(f));
    }

    /// Run at construction and before every patch
    pub fn before_update<F>(&mut self, f: F)
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        let hook: HookFn = Rc::new(RefCell::new(f));
        self.cx.instance.hooks.before_update.borrow_mut().push(hook);
    }

    /// Run after mount and after every patch, at most once per flush
    pub fn after_update<F>(&mut self, f: F)
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        let scheduler = self.cx.instance.runtime.scheduler();
        let callback = RenderCallback::new(scheduler.new_callback_id(), C::NAME, f);
        self.cx.instance.hooks.after_update.borrow_mut().push(callback);
    }

    pub fn on_destroy<F>(&mut self, f: F)
    where
        F: FnOnce() + 'static,
    {
        if let Some(on_destroy) = self.cx.instance.hooks.on_destroy.borrow_mut().as_mut() {
            on_destroy.push(Box::new(f));
        }
    }

    /// Set a context value visible to this component and its descendants
    pub fn set_context<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.cx.instance.context.borrow_mut().insert(key, value);
    }
}

impl<'a, C: Component> Deref for Setup<'a, C> {
    type Target = Cx<'a, C>;

    fn deref(&self) -> &Self::Target {
        &self.cx
    }
}

impl<'a, C: Component> DerefMut for Setup<'a, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cx
    }
}

/// What a component sees while building its render fragment
pub struct Scope<C: Component> {
    handle: WeakHandle<C>,
    runtime: Runtime,
    context: ContextMap,
}

impl<C: Component> Scope<C> {
    pub fn handle(&self) -> &WeakHandle<C> {
        &self.handle
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn host(&self) -> &SharedHost {
        self.runtime.host()
    }

    /// Context to pass on to child components
    pub fn context(&self) -> &ContextMap {
        &self.context
    }
}

// =============================================================================
// HANDLES
// =============================================================================

/// Owning handle to a component instance
pub struct Handle<C: Component>(Rc<Instance<C>>);

impl<C: Component> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Handle(self.0.clone())
    }
}

impl<C: Component> Handle<C> {
    /// Construct a component
    ///
    /// Runs `create`, then `derive` with every slot dirty, then the
    /// pre-update hooks, then builds the render fragment. With a target the
    /// fragment is created and mounted and the scheduler flushed before
    /// returning; otherwise the owner calls [`create_fragment`] and
    /// [`mount`] itself.
    ///
    /// [`create_fragment`]: Self::create_fragment
    /// [`mount`]: Self::mount
    pub fn new(runtime: &Runtime, options: MountOptions<C>) -> Result<Self> {
        let MountOptions {
            target,
            anchor,
            inputs,
            context,
            hydrate,
            intro,
        } = options;

        let id = runtime.scheduler().new_instance_id();
        let instance = Rc::new_cyclic(|weak_self| Instance {
            id,
            runtime: runtime.clone(),
            weak_self: weak_self.clone(),
            state: RefCell::new(None),
            fragment: RefCell::new(FragmentSlot::Absent),
            dirty: RefCell::new(DirtyBits::all()),
            ready: Cell::new(false),
            skip_bound: Cell::new(false),
            lifecycle: Cell::new(LifecycleState::Constructing),
            bound: RefCell::new(FxHashMap::default()),
            hooks: Hooks {
                on_destroy: RefCell::new(Some(Vec::new())),
                ..Hooks::default()
            },
            listeners: Rc::new(EventListeners::new()),
            context: RefCell::new(context.unwrap_or_default()),
        });
        tracing::debug!(component = C::NAME, id = ?id, "construct");

        let state = {
            let mut setup = Setup {
                cx: Cx::new(&instance),
            };
            let state = C::create(inputs, &mut setup);
            setup.cx.finish();
            state
        };
        *instance.state.borrow_mut() = Some(state);

        instance.run_derive()?;
        instance.ready.set(true);
        instance.run_before_update()?;

        let scope = Scope {
            handle: WeakHandle(Rc::downgrade(&instance)),
            runtime: runtime.clone(),
            context: instance.context.borrow().clone(),
        };
        let fragment = instance
            .state
            .borrow()
            .as_ref()
            .map(|state| state.render(&scope))
            .transpose()
            .map_err(|e| RuntimeError::hook(C::NAME, Phase::Render, e))?
            .flatten();
        if let Some(fragment) = fragment {
            *instance.fragment.borrow_mut() = FragmentSlot::Live(fragment);
        }

        let handle = Handle(instance);
        if let Some(target) = target {
            if hydrate {
                runtime.host().borrow_mut().clear_children(target);
            }
            handle.create_fragment();
            if intro {
                if let Some(fragment) = handle.fragment() {
                    runtime.transitions().transition_in(&fragment, false);
                }
            }
            handle.mount(target, anchor);
            runtime.flush()?;
        }
        Ok(handle)
    }

    pub fn id(&self) -> InstanceId {
        self.0.id
    }

    pub fn downgrade(&self) -> WeakHandle<C> {
        WeakHandle(Rc::downgrade(&self.0))
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.0.lifecycle.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.is_destroyed()
    }

    /// The live render fragment, for parents driving transitions
    pub fn fragment(&self) -> Option<SharedFragment<C>> {
        self.0.live_fragment()
    }

    /// Context map to hand to child components
    pub fn context(&self) -> ContextMap {
        self.0.context.borrow().clone()
    }

    /// Build the fragment's host nodes
    pub fn create_fragment(&self) {
        if let Some(fragment) = self.fragment() {
            fragment.borrow_mut().create();
        }
    }

    /// Insert the fragment under `target` and queue the mount callbacks
    /// followed by the post-update hooks
    pub fn mount(&self, target: NodeId, anchor: Option<NodeId>) {
        if let Some(fragment) = self.fragment() {
            fragment.borrow_mut().mount(target, anchor);
        }

        let scheduler = self.0.runtime.scheduler();
        let weak = self.downgrade();
        scheduler.add_render_callback(RenderCallback::once(
            scheduler.new_callback_id(),
            C::NAME,
            move || {
                if let Some(handle) = weak.upgrade() {
                    handle.0.run_mount_callbacks();
                }
                Ok(())
            },
        ));
        self.0.queue_after_update();
    }

    /// Read the component's state; `None` once destroyed
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        self.0.state.borrow().as_ref().map(f)
    }

    /// Mutate the component's state, as event handlers do
    ///
    /// Returns `None` without calling `f` once the component is destroyed.
    pub fn update<R>(&self, f: impl FnOnce(&mut C, &mut Cx<'_, C>) -> R) -> Option<R> {
        if self.is_destroyed() {
            return None;
        }
        let mut cx = Cx::new(&self.0);
        let result = self
            .0
            .state
            .borrow_mut()
            .as_mut()
            .map(|state| f(state, &mut cx));
        cx.finish();
        result
    }

    /// Apply a partial input update; bound callbacks are not notified of
    /// the writes it causes
    pub fn set_inputs(&self, inputs: C::Inputs) {
        if self.is_destroyed() {
            return;
        }
        self.0.skip_bound.set(true);
        self.update(|state, cx| state.set_inputs(inputs, cx));
        self.0.skip_bound.set(false);
    }

    /// Register a two-way binding on `slot`
    ///
    /// `callback` runs now with the slot's current value, then on every
    /// change made by the component itself.
    pub fn bind<T, F>(&self, slot: usize, callback: F)
    where
        T: Clone + 'static,
        F: Fn(T) + 'static,
    {
        let callback = Rc::new(callback);
        let on_change = callback.clone();
        let bound: BoundFn = Rc::new(move |value: &dyn Any| {
            if let Some(value) = value.downcast_ref::<T>() {
                on_change(value.clone());
            }
        });
        self.0.bound.borrow_mut().insert(slot, bound);

        let current = self
            .read(|state| {
                state
                    .slot_value(slot)
                    .and_then(|value| value.downcast_ref::<T>())
                    .cloned()
            })
            .flatten();
        if let Some(value) = current {
            callback(value);
        }
    }

    pub fn add_event_listener<F>(&self, name: &str, listener: F) -> ListenerHandle
    where
        F: Fn(&mut ComponentEvent) + 'static,
    {
        let id = self.0.listeners.add(name, Rc::new(listener));
        ListenerHandle::new(&self.0.listeners, name, id)
    }

    /// Emit a non-cancelable event; see [`dispatch_cancelable`](Self::dispatch_cancelable)
    pub fn dispatch<T: Any>(&self, name: &str, detail: T) -> bool {
        self.0
            .listeners
            .dispatch(ComponentEvent::new(name, detail, false))
    }

    /// Emit a cancelable event; returns `false` if a listener cancelled it
    pub fn dispatch_cancelable<T: Any>(&self, name: &str, detail: T) -> bool {
        self.0
            .listeners
            .dispatch(ComponentEvent::new(name, detail, true))
    }

    /// Tear the component down, removing its nodes from the host tree
    pub fn destroy(&self) {
        self.destroy_with(true);
    }

    /// Tear the component down; without `detaching` the nodes stay in the
    /// tree, for parents that remove a common ancestor themselves
    pub fn destroy_with(&self, detaching: bool) {
        let previous = std::mem::replace(&mut *self.0.fragment.borrow_mut(), FragmentSlot::Destroyed);
        let fragment = match previous {
            FragmentSlot::Destroyed => return,
            FragmentSlot::Live(fragment) => Some(fragment),
            FragmentSlot::Absent => None,
        };
        tracing::debug!(component = C::NAME, id = ?self.0.id, "destroy");

        let on_destroy = self.0.hooks.on_destroy.borrow_mut().take().unwrap_or_default();
        for cleanup in on_destroy {
            cleanup();
        }
        if let Some(fragment) = fragment {
            fragment.borrow_mut().detach(detaching);
        }
        // Still borrowed when a component destroys itself from an update
        if let Ok(mut state) = self.0.state.try_borrow_mut() {
            *state = None;
        }
        self.0.bound.borrow_mut().clear();
        self.0.lifecycle.set(LifecycleState::Destroyed);
    }
}

/// Non-owning handle, held by fragments and event handlers
pub struct WeakHandle<C: Component>(Weak<Instance<C>>);

impl<C: Component> Clone for WeakHandle<C> {
    fn clone(&self) -> Self {
        WeakHandle(self.0.clone())
    }
}

impl<C: Component> WeakHandle<C> {
    pub fn upgrade(&self) -> Option<Handle<C>> {
        self.0.upgrade().map(Handle)
    }

    /// [`Handle::update`] if the component is still alive
    pub fn update<R>(&self, f: impl FnOnce(&mut C, &mut Cx<'_, C>) -> R) -> Option<R> {
        self.upgrade()?.update(f)
    }

    /// [`Handle::dispatch`]; an event for a dropped component is not cancelled
    pub fn dispatch<T: Any>(&self, name: &str, detail: T) -> bool {
        match self.upgrade() {
            Some(handle) => handle.dispatch(name, detail),
            None => true,
        }
    }
}
