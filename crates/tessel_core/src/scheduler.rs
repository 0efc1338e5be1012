//! Scheduler and flush pipeline
//!
//! A single [`Scheduler`] per runtime coalesces every dirty mark made during
//! one turn into one flush. Marking a record arms the scheduler, which hands
//! a flush task to its [`Defer`] primitive; the task runs at the next
//! scheduling opportunity (for the default [`MicrotaskQueue`], the next
//! [`MicrotaskQueue::run_until_idle`]).
//!
//! A flush runs in rounds. Each round:
//!
//! 1. drains the pending queue in FIFO order, updating each record
//!    (derive, pre-update hooks, patch). Records marked while draining are
//!    appended and picked up by the same loop.
//! 2. runs binding callbacks, last registered first (children before
//!    parents).
//! 3. runs post-update callbacks in registration order, skipping any that
//!    already ran during this flush.
//!
//! Rounds repeat while the pending queue is non-empty. After the last round
//! the one-shot flush callbacks run and the scheduler disarms.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;

use crate::config::RuntimeConfig;
use crate::error::{Phase, Result, RuntimeError};

/// Deferred unit of work
pub type Task = Box<dyn FnOnce() -> Result<()>>;

/// Primitive that runs a task at the next scheduling opportunity
///
/// Implementations must not run the task synchronously inside `defer`,
/// otherwise same-turn mutations would not coalesce.
pub trait Defer {
    fn defer(&self, task: Task);
}

/// FIFO queue of deferred tasks, drained explicitly by the host loop
#[derive(Default)]
pub struct MicrotaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl MicrotaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run tasks until the queue is empty, including tasks queued while
    /// draining. Stops at the first error; the remaining tasks stay queued.
    pub fn run_until_idle(&self) -> Result<()> {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task()?,
                None => return Ok(()),
            }
        }
    }
}

impl Defer for MicrotaskQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Identifier of a component instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Identifier of a post-update callback, used for per-flush deduplication
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Something the flush pipeline can update
pub(crate) trait Schedulable {
    fn instance_id(&self) -> InstanceId;
    fn component_name(&self) -> &'static str;
    fn update(&self) -> Result<()>;
}

type HookFn = dyn FnMut() -> anyhow::Result<()>;

/// A post-update callback
///
/// Clones share identity: a callback queued several times during one flush
/// runs once.
#[derive(Clone)]
pub struct RenderCallback {
    id: CallbackId,
    component: &'static str,
    run: Rc<RefCell<HookFn>>,
}

impl RenderCallback {
    pub fn new<F>(id: CallbackId, component: &'static str, f: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        Self {
            id,
            component,
            run: Rc::new(RefCell::new(f)),
        }
    }

    /// A callback whose body runs at most once, however often it is invoked
    pub fn once<F>(id: CallbackId, component: &'static str, f: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        let mut slot = Some(f);
        Self::new(id, component, move || match slot.take() {
            Some(f) => f(),
            None => Ok(()),
        })
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }

    fn invoke(&self) -> Result<()> {
        let mut run = self.run.borrow_mut();
        (&mut *run)().map_err(|e| RuntimeError::hook(self.component, Phase::AfterUpdate, e))
    }
}

type BindingCallback = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Process-wide coalescing point for component updates
pub struct Scheduler {
    defer: Rc<dyn Defer>,
    config: RuntimeConfig,
    self_ref: Weak<Scheduler>,
    pending: RefCell<VecDeque<Rc<dyn Schedulable>>>,
    binding_callbacks: RefCell<Vec<(&'static str, BindingCallback)>>,
    render_callbacks: RefCell<Vec<RenderCallback>>,
    flush_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
    seen: RefCell<FxHashSet<CallbackId>>,
    armed: Cell<bool>,
    generation: Cell<u64>,
    flushing: Cell<bool>,
    next_callback: Cell<u64>,
    next_instance: Cell<u64>,
}

impl Scheduler {
    pub fn new(defer: Rc<dyn Defer>, config: RuntimeConfig) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            defer,
            config,
            self_ref: self_ref.clone(),
            pending: RefCell::new(VecDeque::new()),
            binding_callbacks: RefCell::new(Vec::new()),
            render_callbacks: RefCell::new(Vec::new()),
            flush_callbacks: RefCell::new(Vec::new()),
            seen: RefCell::new(FxHashSet::default()),
            armed: Cell::new(false),
            generation: Cell::new(0),
            flushing: Cell::new(false),
            next_callback: Cell::new(0),
            next_instance: Cell::new(0),
        })
    }

    /// Whether a flush is scheduled and has not completed yet
    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    pub fn is_flushing(&self) -> bool {
        self.flushing.get()
    }

    /// Number of records waiting for the next drain
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn new_callback_id(&self) -> CallbackId {
        let id = self.next_callback.get();
        self.next_callback.set(id + 1);
        CallbackId(id)
    }

    pub(crate) fn new_instance_id(&self) -> InstanceId {
        let id = self.next_instance.get();
        self.next_instance.set(id + 1);
        InstanceId(id)
    }

    // =========================================================================
    // ARMING
    // =========================================================================

    /// Arm the scheduler; a no-op while already armed
    pub fn schedule_update(&self) {
        if self.armed.get() {
            return;
        }
        self.armed.set(true);
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let scheduler = self.self_ref.clone();
        self.defer.defer(Box::new(move || match scheduler.upgrade() {
            // A flush that already ran synchronously consumed this arming
            Some(s) if s.armed.get() && s.generation.get() == generation => s.flush(),
            _ => Ok(()),
        }));
    }

    pub(crate) fn enqueue(&self, record: Rc<dyn Schedulable>) {
        tracing::trace!(
            component = record.component_name(),
            id = ?record.instance_id(),
            "enqueue"
        );
        self.pending.borrow_mut().push_back(record);
        self.schedule_update();
    }

    /// Queue a binding callback for the binding phase of the current or
    /// next flush
    pub fn add_binding_callback<F>(&self, component: &'static str, f: F)
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        self.binding_callbacks
            .borrow_mut()
            .push((component, Box::new(f)));
    }

    /// Queue a post-update callback for the current or next flush
    pub fn add_render_callback(&self, callback: RenderCallback) {
        self.render_callbacks.borrow_mut().push(callback);
    }

    /// Queue a one-shot callback that runs once the whole flush completed
    pub fn add_flush_callback<F>(&self, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.flush_callbacks.borrow_mut().push(Box::new(f));
    }

    // =========================================================================
    // FLUSH
    // =========================================================================

    /// Run the flush pipeline to a fixpoint
    ///
    /// Calling `flush` while a flush is running returns immediately; the
    /// running flush picks up whatever was queued. An error from any
    /// component callback halts the flush and is returned as is. Records,
    /// bindings and post-update callbacks not reached at that point stay
    /// queued and the scheduler re-arms; the failing callback is dropped.
    pub fn flush(&self) -> Result<()> {
        if self.flushing.replace(true) {
            return Ok(());
        }

        let result = self.run_rounds();
        if result.is_err() {
            // Keep what this flush never reached, mount callbacks included
            let seen = self.seen.borrow();
            self.render_callbacks
                .borrow_mut()
                .retain(|callback| !seen.contains(&callback.id));
        }
        self.run_flush_callbacks();
        self.seen.borrow_mut().clear();
        self.flushing.set(false);
        self.armed.set(false);

        // Work queued by flush callbacks, or left behind by a failed round
        if self.has_work() {
            self.schedule_update();
        }

        match result {
            Ok(rounds) => {
                if self.config.trace_flushes {
                    tracing::debug!(rounds, "flush complete");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "flush aborted");
                Err(err)
            }
        }
    }

    fn run_rounds(&self) -> Result<u32> {
        let mut rounds = 0u32;
        loop {
            rounds += 1;
            if let Some(limit) = self.config.flush_round_limit {
                if rounds > limit {
                    return Err(RuntimeError::FlushRoundLimit(limit));
                }
            }

            while let Some(record) = self.pop_pending() {
                tracing::trace!(
                    component = record.component_name(),
                    id = ?record.instance_id(),
                    "update"
                );
                record.update()?;
            }

            loop {
                let next = self.binding_callbacks.borrow_mut().pop();
                let Some((component, callback)) = next else {
                    break;
                };
                callback().map_err(|e| RuntimeError::hook(component, Phase::Binding, e))?;
            }

            let mut index = 0;
            loop {
                let next = self.render_callbacks.borrow().get(index).cloned();
                let Some(callback) = next else {
                    break;
                };
                index += 1;
                if self.seen.borrow_mut().insert(callback.id) {
                    callback.invoke()?;
                }
            }
            self.render_callbacks.borrow_mut().clear();

            if self.pending.borrow().is_empty() {
                return Ok(rounds);
            }
        }
    }

    fn has_work(&self) -> bool {
        !self.pending.borrow().is_empty()
            || !self.binding_callbacks.borrow().is_empty()
            || !self.render_callbacks.borrow().is_empty()
    }

    fn pop_pending(&self) -> Option<Rc<dyn Schedulable>> {
        self.pending.borrow_mut().pop_front()
    }

    fn run_flush_callbacks(&self) {
        loop {
            let next = self.flush_callbacks.borrow_mut().pop();
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}
