//! Per-thread GraphQL field-context hand-off
//!
//! The host sets the current operation's selection tree on the execution
//! thread before a rewrite-eligible query runs and clears it immediately
//! after, so a reused thread never leaks context into unrelated queries.
//! The engine never reads this slot itself; the interceptor passes the
//! tree as an explicit argument.

use std::cell::RefCell;
use std::sync::Arc;

use gqlprune_engine::SelectionTree;

thread_local! {
    static CURRENT: RefCell<Option<Arc<SelectionTree>>> = const { RefCell::new(None) };
}

pub struct FieldContext;

impl FieldContext {
    /// Install `tree` for queries issued by this thread and return a guard
    /// that clears the slot when dropped.
    #[must_use = "dropping the guard clears the context immediately"]
    pub fn enter(tree: SelectionTree) -> ContextGuard {
        Self::set(tree);
        ContextGuard { _priv: () }
    }

    /// Install `tree` without a guard. The caller owns the matching
    /// [`FieldContext::clear`].
    pub fn set(tree: SelectionTree) {
        CURRENT.with(|slot| *slot.borrow_mut() = Some(Arc::new(tree)));
    }

    /// The selection tree for the operation in flight on this thread.
    pub fn current() -> Option<Arc<SelectionTree>> {
        CURRENT.with(|slot| slot.borrow().clone())
    }

    pub fn clear() {
        CURRENT.with(|slot| *slot.borrow_mut() = None);
    }
}

/// Clears the thread's field context on drop.
pub struct ContextGuard {
    _priv: (),
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        FieldContext::clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlprune_engine::FieldSelection;

    fn sample() -> SelectionTree {
        SelectionTree::new(vec![FieldSelection::new("id")])
    }

    #[test]
    fn test_set_current_clear() {
        assert!(FieldContext::current().is_none());
        FieldContext::set(sample());
        assert!(FieldContext::current().is_some());
        FieldContext::clear();
        assert!(FieldContext::current().is_none());
    }

    #[test]
    fn test_guard_clears_on_drop() {
        {
            let _guard = FieldContext::enter(sample());
            assert!(FieldContext::current().is_some());
        }
        assert!(FieldContext::current().is_none());
    }

    #[test]
    fn test_context_is_thread_local() {
        FieldContext::set(sample());
        let seen_elsewhere = std::thread::spawn(|| FieldContext::current().is_some())
            .join()
            .unwrap();
        assert!(!seen_elsewhere);
        FieldContext::clear();
    }
}
