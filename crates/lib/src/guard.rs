//! Reentrancy guard for walks over possibly cyclic mappings.
//!
//! A mapping may hold a handle to itself, directly or through other mappings.
//! Rendering, digesting and comparing all recurse into values, so
//! each of them registers the identity of the mapping it is currently inside.
//! Seeing the same identity again on the same thread means the walk has come
//! back around a cycle.

use std::{cell::RefCell, collections::HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Scope {
    Render,
    Digest,
    Compare,
}

type Key = (Scope, usize, usize);

thread_local! {
    static ACTIVE: RefCell<HashSet<Key>> = RefCell::new(HashSet::new());
}

/// Marks an identity as active until dropped.
#[must_use]
pub(crate) struct Reentry {
    key: Key,
}

impl Reentry {
    /// Enter `id` for `scope`, or `None` if it is already active.
    pub(crate) fn enter(scope: Scope, id: usize) -> Option<Self> {
        Self::enter_pair(scope, id, 0)
    }

    /// Enter an ordered pair of identities, used by comparisons.
    pub(crate) fn enter_pair(scope: Scope, left: usize, right: usize) -> Option<Self> {
        let key = (scope, left, right);
        let inserted = ACTIVE.with(|active| active.borrow_mut().insert(key));
        if inserted {
            Some(Self { key })
        } else {
            tracing::trace!(?scope, left, right, "cycle detected");
            None
        }
    }
}

impl Drop for Reentry {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|active| active.borrow_mut().remove(&self.key));
    }
}

/// True when no walk of this scope is in progress on the current thread.
pub(crate) fn is_idle(scope: Scope) -> bool {
    ACTIVE.with(|active| !active.borrow().iter().any(|(s, _, _)| *s == scope))
}
