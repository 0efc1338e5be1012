//! Render fragments
//!
//! A fragment is the opaque unit a component renders into. It owns a set of
//! host nodes and knows how to create them, insert them under a target,
//! patch them from component state and a dirty set, and remove them again.
//! Fragments with exit or entry animations also take part in the
//! [`TransitionCoordinator`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::dirty::DirtyBits;
use crate::host::NodeId;
use crate::transition::TransitionCoordinator;

/// Render output of a component with state `S`
pub trait RenderFragment<S: ?Sized> {
    /// Build the host nodes without attaching them
    fn create(&mut self);

    /// Insert the nodes under `target`, before `anchor` when given
    fn mount(&mut self, target: NodeId, anchor: Option<NodeId>);

    /// Bring the nodes in line with `state`; only slots in `dirty` changed
    fn patch(&mut self, state: &S, dirty: &DirtyBits) -> anyhow::Result<()>;

    /// Tear down; `detaching` removes the nodes from the host tree, otherwise
    /// only listeners and child components are released
    fn detach(&mut self, detaching: bool);

    /// Whether this fragment, or any child fragment, animates on entry/exit
    fn has_transitions(&self) -> bool {
        false
    }

    fn intro(&mut self, _local: bool, _transitions: &TransitionCoordinator) {}

    /// Start exit animations; each running animation should hold an
    /// [`OutroTicket`](crate::transition::OutroTicket) from `transitions`
    fn outro(&mut self, _local: bool, _transitions: &TransitionCoordinator) {}
}

/// Fragment shared between its component and the transition coordinator
pub type SharedFragment<S> = Rc<RefCell<dyn RenderFragment<S>>>;

/// Box a concrete fragment as a [`SharedFragment`]
pub fn share<S, F>(fragment: F) -> SharedFragment<S>
where
    S: ?Sized,
    F: RenderFragment<S> + 'static,
{
    Rc::new(RefCell::new(fragment))
}
