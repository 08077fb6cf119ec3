//! Type aliases for commonly used complex types.
//!
//! Complex types like `Arc<RwLock<Option<Arc<T>>>>` are hard to read at a
//! glance; these aliases give them names that convey intent.

use parking_lot::RwLock;
use std::sync::Arc;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Uses `parking_lot::RwLock`, so readers never deal with lock poisoning.
/// Multiple readers can access concurrently, writes require exclusive access.
///
/// # Example
/// ```rust
/// use gcodeview_core::types::{thread_safe_rw, ThreadSafeRw};
///
/// let slot: ThreadSafeRw<Option<u32>> = thread_safe_rw(None);
/// *slot.write() = Some(3);
/// assert_eq!(*slot.read(), Some(3));
/// ```
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// A single-threaded callback receiving a borrowed event.
///
/// Used for UI-side hooks such as the double-click pick handler, which run
/// on the event thread and may capture `Rc` state.
pub type EventCallback<T> = Box<dyn FnMut(&T)>;

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_safe_rw_shares_value() {
        let slot = thread_safe_rw(1u32);
        let clone = Arc::clone(&slot);
        *clone.write() += 1;
        assert_eq!(*slot.read(), 2);
    }

    #[test]
    fn test_event_callback_captures_state() {
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        let mut cb: EventCallback<u32> = Box::new(move |v| sink.borrow_mut().push(*v));
        cb(&4);
        cb(&5);
        assert_eq!(*seen.borrow(), vec![4, 5]);
    }
}
