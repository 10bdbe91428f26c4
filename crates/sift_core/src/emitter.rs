//! Emitter - typed notification fan-out with subscription handles
//!
//! An [`Emitter`] keeps an ordered list of listeners. `emit` snapshots the
//! list before calling anyone, so a listener may unsubscribe itself (or any
//! other listener) while a notification is in flight without deadlocking.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use sift_core::emitter::Emitter;
//!
//! let closed: Emitter<()> = Emitter::new();
//! let count = Arc::new(AtomicUsize::new(0));
//!
//! let counter = count.clone();
//! let handle = closed.subscribe(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! closed.emit(&());
//! closed.unsubscribe(handle);
//! closed.emit(&());
//!
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Listener callback type
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Process-wide id source so handles from different emitters never collide
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`Emitter::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ordered fan-out of `&T` notifications
pub struct Emitter<T> {
    listeners: Mutex<Vec<(SubscriptionHandle, Listener<T>)>>,
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<T> Emitter<T> {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionHandle, Listener<T>)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionHandle
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let handle = SubscriptionHandle::next();
        self.lock().push((handle, Arc::new(listener)));
        handle
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(h, _)| *h != handle);
        listeners.len() != before
    }

    /// Check whether a handle is still registered
    pub fn is_subscribed(&self, handle: SubscriptionHandle) -> bool {
        self.lock().iter().any(|(h, _)| *h == handle)
    }

    /// Notify every listener registered at the time of the call
    ///
    /// Returns the number of listeners invoked. Listeners removed by an
    /// earlier listener during the same emission are skipped.
    pub fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<_> = self.lock().clone();
        let mut called = 0;
        for (handle, listener) in snapshot {
            if !self.is_subscribed(handle) {
                continue;
            }
            listener(value);
            called += 1;
        }
        called
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nobody is listening
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.lock().clear();
    }
}
