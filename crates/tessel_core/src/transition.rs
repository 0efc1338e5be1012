//! Transition coordinator
//!
//! Tracks fragments that are playing an exit animation and batches their
//! completions into outro groups.
//!
//! Calling [`TransitionCoordinator::transition_out`] registers the fragment
//! as outroing and asks it to start its exit animations. Each running
//! animation holds an [`OutroTicket`] on the current group; the group's
//! completion callbacks run once it has been closed with
//! [`TransitionCoordinator::check_outros`] and every ticket has completed.
//! A [`TransitionCoordinator::transition_in`] on an outroing fragment
//! cancels its pending completion.
//!
//! ```rust
//! use tessel_core::transition::TransitionCoordinator;
//!
//! let transitions = TransitionCoordinator::new();
//! transitions.group_outros();
//! let ticket = transitions.hold();
//! transitions.check_outros();
//! ticket.complete();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::fragment::SharedFragment;

type Completion = Box<dyn FnOnce()>;

#[derive(Default)]
struct OutroGroup {
    remaining: Cell<usize>,
    closed: Cell<bool>,
    callbacks: RefCell<Vec<Completion>>,
}

impl OutroGroup {
    fn finish_if_settled(&self) {
        if !self.closed.get() || self.remaining.get() > 0 {
            return;
        }
        let callbacks = std::mem::take(&mut *self.callbacks.borrow_mut());
        for callback in callbacks {
            callback();
        }
    }
}

/// Keeps an outro group open until the animation holding it completes
///
/// Dropping an uncompleted ticket completes it.
#[must_use = "dropping a ticket completes it immediately"]
pub struct OutroTicket {
    group: Option<Rc<OutroGroup>>,
}

impl OutroTicket {
    pub fn complete(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(group) = self.group.take() {
            group.remaining.set(group.remaining.get().saturating_sub(1));
            group.finish_if_settled();
        }
    }
}

impl Drop for OutroTicket {
    fn drop(&mut self) {
        self.release();
    }
}

/// Outroing-set and outro-group bookkeeping for one runtime
#[derive(Default)]
pub struct TransitionCoordinator {
    // Keyed by fragment address; the value is the generation of the pending
    // completion so a re-intro can invalidate it
    outroing: Rc<RefCell<FxHashMap<usize, u64>>>,
    groups: RefCell<Vec<Rc<OutroGroup>>>,
    next_generation: Cell<u64>,
}

fn fragment_key<S: ?Sized>(fragment: &SharedFragment<S>) -> usize {
    Rc::as_ptr(fragment) as *const () as usize
}

impl TransitionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new outro group, nested in the current one
    pub fn group_outros(&self) {
        self.groups.borrow_mut().push(Rc::new(OutroGroup::default()));
    }

    /// Close the current group; its callbacks run now if no animation is
    /// still holding it, otherwise when the last one completes
    pub fn check_outros(&self) {
        let group = self.groups.borrow_mut().pop();
        if let Some(group) = group {
            group.closed.set(true);
            group.finish_if_settled();
        }
    }

    /// Hold the current group open; a no-op ticket outside any group
    pub fn hold(&self) -> OutroTicket {
        let group = self.groups.borrow().last().cloned();
        if let Some(group) = &group {
            group.remaining.set(group.remaining.get() + 1);
        }
        OutroTicket { group }
    }

    pub fn is_outroing<S: ?Sized>(&self, fragment: &SharedFragment<S>) -> bool {
        self.outroing.borrow().contains_key(&fragment_key(fragment))
    }

    /// Play a fragment's entry animations, cancelling a pending outro
    pub fn transition_in<S: ?Sized + 'static>(&self, fragment: &SharedFragment<S>, local: bool) {
        if !fragment.borrow().has_transitions() {
            return;
        }
        if self
            .outroing
            .borrow_mut()
            .remove(&fragment_key(fragment))
            .is_some()
        {
            tracing::trace!("outro cancelled by intro");
        }
        fragment.borrow_mut().intro(local, self);
    }

    /// Play a fragment's exit animations
    ///
    /// `callback` runs once the enclosing group settles, after detaching the
    /// fragment when `detach` is set. A second call while the fragment is
    /// still outroing is ignored. Fragments without animations complete
    /// immediately.
    pub fn transition_out<S: ?Sized + 'static>(
        &self,
        fragment: &SharedFragment<S>,
        local: bool,
        detach: bool,
        callback: Option<Box<dyn FnOnce()>>,
    ) {
        if !fragment.borrow().has_transitions() {
            if let Some(callback) = callback {
                if detach {
                    fragment.borrow_mut().detach(true);
                }
                callback();
            }
            return;
        }

        let key = fragment_key(fragment);
        if self.outroing.borrow().contains_key(&key) {
            return;
        }
        let generation = self.next_generation.get();
        self.next_generation.set(generation + 1);
        self.outroing.borrow_mut().insert(key, generation);

        let implicit = self.groups.borrow().is_empty();
        if implicit {
            self.group_outros();
        }

        let outroing = self.outroing.clone();
        let target = fragment.clone();
        let completion: Completion = Box::new(move || {
            let current = {
                let mut outroing = outroing.borrow_mut();
                match outroing.get(&key) {
                    Some(&pending) if pending == generation => {
                        outroing.remove(&key);
                        true
                    }
                    _ => false,
                }
            };
            if !current {
                return;
            }
            if let Some(callback) = callback {
                if detach {
                    target.borrow_mut().detach(true);
                }
                callback();
            }
        });
        if let Some(group) = self.groups.borrow().last() {
            group.callbacks.borrow_mut().push(completion);
        }

        fragment.borrow_mut().outro(local, self);

        if implicit {
            self.check_outros();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::DirtyBits;
    use crate::fragment::{share, RenderFragment};
    use crate::host::NodeId;

    /// Fragment whose exit animation runs until its ticket is completed
    #[derive(Default)]
    struct Fade {
        animated: bool,
        running: Rc<RefCell<Vec<OutroTicket>>>,
        intros: usize,
        outros: usize,
        detached: bool,
    }

    impl RenderFragment<()> for Fade {
        fn create(&mut self) {}
        fn mount(&mut self, _target: NodeId, _anchor: Option<NodeId>) {}
        fn patch(&mut self, _state: &(), _dirty: &DirtyBits) -> anyhow::Result<()> {
            Ok(())
        }
        fn detach(&mut self, detaching: bool) {
            self.detached = detaching;
        }
        fn has_transitions(&self) -> bool {
            self.animated
        }
        fn intro(&mut self, _local: bool, _transitions: &TransitionCoordinator) {
            self.intros += 1;
        }
        fn outro(&mut self, _local: bool, transitions: &TransitionCoordinator) {
            self.outros += 1;
            self.running.borrow_mut().push(transitions.hold());
        }
    }

    fn counter() -> (Rc<Cell<u32>>, Box<dyn FnOnce()>) {
        let calls = Rc::new(Cell::new(0));
        let inner = calls.clone();
        (calls, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn test_static_fragment_completes_immediately() {
        let transitions = TransitionCoordinator::new();
        let fragment = Rc::new(RefCell::new(Fade::default()));
        let shared: SharedFragment<()> = fragment.clone();

        let (calls, callback) = counter();
        transitions.transition_out(&shared, false, true, Some(callback));
        assert_eq!(calls.get(), 1);
        assert!(fragment.borrow().detached);
        assert!(!transitions.is_outroing(&shared));
    }

    #[test]
    fn test_completion_waits_for_ticket() {
        let transitions = TransitionCoordinator::new();
        let fragment = Rc::new(RefCell::new(Fade {
            animated: true,
            ..Fade::default()
        }));
        let running = fragment.borrow().running.clone();
        let shared: SharedFragment<()> = fragment.clone();

        let (calls, callback) = counter();
        transitions.transition_out(&shared, true, true, Some(callback));
        assert!(transitions.is_outroing(&shared));
        assert_eq!(calls.get(), 0);

        let ticket = running.borrow_mut().pop().unwrap();
        ticket.complete();
        assert_eq!(calls.get(), 1);
        assert!(fragment.borrow().detached);
        assert!(!transitions.is_outroing(&shared));
    }

    #[test]
    fn test_second_transition_out_is_ignored() {
        let transitions = TransitionCoordinator::new();
        let fragment = Rc::new(RefCell::new(Fade {
            animated: true,
            ..Fade::default()
        }));
        let running = fragment.borrow().running.clone();
        let shared: SharedFragment<()> = fragment.clone();

        let (first, callback) = counter();
        transitions.transition_out(&shared, true, false, Some(callback));
        let (second, callback) = counter();
        transitions.transition_out(&shared, true, false, Some(callback));
        assert_eq!(fragment.borrow().outros, 1);

        running.borrow_mut().clear();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_transition_in_cancels_pending_outro() {
        let transitions = TransitionCoordinator::new();
        let fragment = Rc::new(RefCell::new(Fade {
            animated: true,
            ..Fade::default()
        }));
        let running = fragment.borrow().running.clone();
        let shared: SharedFragment<()> = fragment.clone();

        let (calls, callback) = counter();
        transitions.transition_out(&shared, true, true, Some(callback));
        transitions.transition_in(&shared, true);
        assert_eq!(fragment.borrow().intros, 1);
        assert!(!transitions.is_outroing(&shared));

        running.borrow_mut().clear();
        assert_eq!(calls.get(), 0);
        assert!(!fragment.borrow().detached);
    }

    #[test]
    fn test_explicit_group_settles_on_check() {
        let transitions = TransitionCoordinator::new();
        let running = Rc::new(RefCell::new(Vec::new()));
        let a: SharedFragment<()> = share(Fade {
            animated: true,
            running: running.clone(),
            ..Fade::default()
        });
        let b: SharedFragment<()> = share(Fade::default());

        transitions.group_outros();
        let (calls, callback) = counter();
        transitions.transition_out(&a, false, false, Some(callback));
        let (static_calls, callback) = counter();
        transitions.transition_out(&b, false, false, Some(callback));
        assert_eq!(static_calls.get(), 1);
        assert_eq!(calls.get(), 0);

        // Closed, but `a` still holds a ticket
        transitions.check_outros();
        assert_eq!(calls.get(), 0);
        assert!(transitions.is_outroing(&a));

        let tickets: Vec<OutroTicket> = running.borrow_mut().drain(..).collect();
        for ticket in tickets {
            ticket.complete();
        }
        assert_eq!(calls.get(), 1);
        assert!(!transitions.is_outroing(&a));
    }

    #[test]
    fn test_group_waits_for_check() {
        let transitions = TransitionCoordinator::new();
        let fragment = Rc::new(RefCell::new(Fade {
            animated: true,
            ..Fade::default()
        }));
        let running = fragment.borrow().running.clone();
        let shared: SharedFragment<()> = fragment.clone();

        transitions.group_outros();
        let (calls, callback) = counter();
        transitions.transition_out(&shared, false, true, Some(callback));

        let tickets: Vec<OutroTicket> = running.borrow_mut().drain(..).collect();
        for ticket in tickets {
            ticket.complete();
        }
        // Every animation finished but the group is still open
        assert_eq!(calls.get(), 0);
        assert!(!fragment.borrow().detached);

        transitions.check_outros();
        assert_eq!(calls.get(), 1);
        assert!(fragment.borrow().detached);
        assert!(!transitions.is_outroing(&shared));
    }

    #[test]
    fn test_ticket_outside_group_is_inert() {
        let transitions = TransitionCoordinator::new();
        let ticket = transitions.hold();
        ticket.complete();

        // A stray ticket must not release a group opened later
        let stray = transitions.hold();
        transitions.group_outros();
        let held = transitions.hold();
        drop(stray);
        let (calls, callback) = counter();
        let fragment: SharedFragment<()> = share(Fade::default());
        transitions.transition_out(&fragment, false, false, Some(callback));
        assert_eq!(calls.get(), 1);

        let settled = Rc::new(Cell::new(false));
        let flag = settled.clone();
        let animated = Rc::new(RefCell::new(Fade {
            animated: true,
            ..Fade::default()
        }));
        let running = animated.borrow().running.clone();
        let shared: SharedFragment<()> = animated.clone();
        transitions.transition_out(&shared, false, false, Some(Box::new(move || flag.set(true))));
        running.borrow_mut().clear();
        transitions.check_outros();
        assert!(!settled.get());
        held.complete();
        assert!(settled.get());
    }
}
