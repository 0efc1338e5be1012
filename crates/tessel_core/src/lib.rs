//! Tessel Core Runtime
//!
//! This crate provides the update machinery shared by every Tessel widget:
//!
//! - **Dirty Tracking**: one bit per reactive slot, coalesced per component
//! - **Batched Flushes**: every mutation made in one turn patches once, in
//!   deterministic parent-before-child order
//! - **Lifecycle Hooks**: mount, pre-update, post-update and destroy
//!   callbacks, plus two-way bindings between parent and child
//! - **Transitions**: outroing-set and outro groups for exit animations
//! - **Host Tree**: the display tree render fragments patch in place
//!
//! # Example
//!
//! ```rust
//! use tessel_core::dirty::DirtyBits;
//!
//! let mut dirty = DirtyBits::empty();
//! dirty.insert(0);
//! dirty.insert(3);
//! assert!(dirty.any(&[3, 4]));
//! ```

pub mod config;
pub mod context;
pub mod dirty;
pub mod error;
pub mod events;
pub mod fragment;
pub mod host;
pub mod instance;
pub mod runtime;
pub mod scheduler;
pub mod transition;

pub use config::RuntimeConfig;
pub use context::ContextMap;
pub use dirty::DirtyBits;
pub use error::{Phase, Result, RuntimeError};
pub use events::{ComponentEvent, EventListeners, Listener, ListenerHandle};
pub use fragment::{share, RenderFragment, SharedFragment};
pub use host::{
    dispatch, HostEvent, HostEventKind, HostHandler, HostTree, ListenerId, Modifiers, MouseButton,
    NodeId, NodeKind, SharedHost,
};
pub use instance::{
    Cleanup, Component, Cx, Handle, LifecycleState, MountOptions, Scope, Setup, WeakHandle,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use scheduler::{CallbackId, Defer, InstanceId, MicrotaskQueue, RenderCallback, Scheduler, Task};
pub use transition::{OutroTicket, TransitionCoordinator};
