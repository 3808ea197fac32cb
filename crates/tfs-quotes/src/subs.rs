use std::collections::BTreeSet;
use std::sync::Mutex;

/// Owned subscribed-symbol state shared between the poll loop (which drains
/// the subscribe/unsubscribe queues) and the push listener (which checks
/// membership before writing projections).
///
/// An explicit state object passed to whoever needs it, not a process-wide
/// singleton. The mutex only guards this set; projection files themselves
/// need no lock because the two actors write disjoint paths.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    inner: Mutex<BTreeSet<String>>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a subscription. Returns false if the symbol was already
    /// subscribed (the caller then skips the duplicate subscribe call and
    /// just clears the trigger file).
    pub fn mark_subscribed(&self, symbol: &str) -> bool {
        self.lock().insert(symbol.to_string())
    }

    /// Record an unsubscription. Returns false if the symbol was not
    /// subscribed to begin with.
    pub fn mark_unsubscribed(&self, symbol: &str) -> bool {
        self.lock().remove(symbol)
    }

    pub fn is_subscribed(&self, symbol: &str) -> bool {
        self.lock().contains(symbol)
    }

    /// Sorted snapshot of the current subscriptions.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        // A poisoned lock only means another thread panicked mid-mutation of
        // a set of strings; the set itself is still coherent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
