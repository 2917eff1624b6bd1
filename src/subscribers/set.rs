//! # SubscriberSet: registration surface for a runner's observers.
//!
//! [`SubscriberSet`] keeps the current subscriber list behind a mutex and
//! hands the dispatcher an ordered snapshot per event. Registration returns
//! a [`SubscriptionId`] that can later be used to unregister.
//!
//! ## Rules
//! - Subscribers are notified in registration order.
//! - Registering/unregistering is safe at any time; an event already being
//!   delivered keeps the snapshot it started with.
//! - An empty set is valid; firing into it is a no-op.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::subscribers::subscribe::Subscribe;

/// Handle returned by [`subscribe`](crate::ProgressRunner::subscribe);
/// pass it back to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry<O, P>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    id: u64,
    sub: Arc<dyn Subscribe<O, P>>,
}

/// Ordered, mutable collection of subscribers.
pub struct SubscriberSet<O, P = ()>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    entries: Mutex<Vec<Entry<O, P>>>,
    next_id: AtomicU64,
}

impl<O, P> SubscriberSet<O, P>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a subscriber and returns its id.
    pub fn insert(&self, sub: Arc<dyn Subscribe<O, P>>) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(Entry { id, sub });
        SubscriptionId(id)
    }

    /// Unregisters a subscriber; returns `false` when the id is unknown
    /// (already removed, or from another runner).
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id.0);
        entries.len() != before
    }

    /// Returns the current subscribers in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Subscribe<O, P>>> {
        self.lock().iter().map(|e| Arc::clone(&e.sub)).collect()
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Entry<O, P>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O, P> Default for SubscriberSet<O, P>
where
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Nop;

    #[async_trait]
    impl Subscribe<u32> for Nop {
        fn name(&self) -> &'static str {
            "nop"
        }
    }

    #[test]
    fn insert_and_remove_round_trip() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        assert!(set.is_empty());

        let a = set.insert(Arc::new(Nop));
        let b = set.insert(Arc::new(Nop));
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);

        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert_eq!(set.len(), 1);
        assert!(set.remove(b));
        assert!(set.is_empty());
    }

    #[test]
    fn snapshot_keeps_registration_order() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let first = set.insert(Arc::new(Nop));
        let _second = set.insert(Arc::new(Nop));

        assert_eq!(set.snapshot().len(), 2);
        set.remove(first);
        assert_eq!(set.snapshot().len(), 1);
    }
}
