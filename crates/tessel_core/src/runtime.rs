//! Runtime façade
//!
//! A [`Runtime`] bundles the pieces every component instance shares: the
//! scheduler, the transition coordinator, the host tree and the deferral
//! primitive. It is a cheap handle; clones refer to the same runtime.
//!
//! ```rust
//! use tessel_core::{Runtime, RuntimeConfig};
//!
//! let runtime = Runtime::builder()
//!     .config(RuntimeConfig::new().flush_round_limit(32))
//!     .build();
//! runtime.tick().unwrap();
//! ```

use std::rc::Rc;

use crate::instance::{Component, Handle, MountOptions};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::host::{HostTree, SharedHost};
use crate::scheduler::{Defer, MicrotaskQueue, Scheduler};
use crate::transition::TransitionCoordinator;

struct RuntimeInner {
    config: RuntimeConfig,
    scheduler: Rc<Scheduler>,
    transitions: Rc<TransitionCoordinator>,
    host: SharedHost,
    microtasks: Rc<MicrotaskQueue>,
}

/// Shared runtime handle
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    /// Runtime with default config, a fresh host tree and a microtask queue
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.inner.scheduler
    }

    pub fn transitions(&self) -> &Rc<TransitionCoordinator> {
        &self.inner.transitions
    }

    pub fn host(&self) -> &SharedHost {
        &self.inner.host
    }

    /// Run deferred work until none is left
    ///
    /// With the built-in microtask queue this is where scheduled flushes
    /// happen. With a custom [`Defer`] it only drains the built-in queue,
    /// which then stays empty.
    pub fn tick(&self) -> Result<()> {
        self.inner.microtasks.run_until_idle()
    }

    /// Flush synchronously, ahead of the scheduled flush
    pub fn flush(&self) -> Result<()> {
        self.inner.scheduler.flush()
    }

    /// Construct a component; see [`Handle::new`]
    pub fn mount<C: Component>(&self, options: MountOptions<C>) -> Result<Handle<C>> {
        Handle::new(self, options)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Runtime`]
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    host: Option<SharedHost>,
    defer: Option<Rc<dyn Defer>>,
}

impl RuntimeBuilder {
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Render into an existing host tree
    pub fn host(mut self, host: SharedHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Replace the built-in microtask queue as the deferral primitive
    pub fn defer(mut self, defer: Rc<dyn Defer>) -> Self {
        self.defer = Some(defer);
        self
    }

    pub fn build(self) -> Runtime {
        let microtasks = Rc::new(MicrotaskQueue::new());
        let defer = self
            .defer
            .unwrap_or_else(|| microtasks.clone() as Rc<dyn Defer>);
        tracing::debug!(config = ?self.config, "runtime created");
        Runtime {
            inner: Rc::new(RuntimeInner {
                scheduler: Scheduler::new(defer, self.config.clone()),
                transitions: Rc::new(TransitionCoordinator::new()),
                host: self.host.unwrap_or_else(HostTree::shared),
                microtasks,
                config: self.config,
            }),
        }
    }
}
