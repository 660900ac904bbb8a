//! Lifecycle/observer bridge
//!
//! The seam at which a host UI layer learns that the back stack
//! changed and rebuilds its visible screen. Successful mutations,
//! rejected operations, and session termination all flow through the
//! same channel as typed values.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use nav_graph::DestinationInstance;

use crate::error::NavError;

/// One notification emitted after a controller operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavigationUpdate {
    /// The stack was mutated
    Changed {
        /// New top of stack
        current: DestinationInstance,
        /// Entries removed by the mutation, top-first, for teardown
        torn_down: Vec<DestinationInstance>,
    },
    /// An operation was rejected; the stack is unchanged
    Failed {
        /// Why the operation was rejected
        error: NavError,
    },
    /// The session was torn down; no further updates will follow
    Terminated {
        /// All entries that were alive, top-first
        torn_down: Vec<DestinationInstance>,
    },
}

/// Receives navigation updates
#[cfg_attr(test, mockall::automock)]
pub trait NavigationObserver: Send + Sync {
    /// Called after every controller operation that commits or rejects
    fn on_update(&self, update: &NavigationUpdate);
}

/// Handle identifying one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct FnObserver<F>(F);

impl<F> NavigationObserver for FnObserver<F>
where
    F: Fn(&NavigationUpdate) + Send + Sync,
{
    fn on_update(&self, update: &NavigationUpdate) {
        (self.0)(update);
    }
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    observers: Vec<(SubscriptionId, Arc<dyn NavigationObserver>)>,
}

/// Observer list safe against re-entrant subscription changes
///
/// Notification clones the observer list under the lock and invokes
/// callbacks with the lock released, so an observer may subscribe or
/// unsubscribe from inside its own callback without corrupting the
/// list.
#[derive(Default)]
pub struct ObserverRegistry {
    inner: Mutex<RegistryInner>,
}

impl ObserverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn subscribe(&self, observer: Arc<dyn NavigationObserver>) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.observers.push((id, observer));
        id
    }

    /// Register a closure as an observer
    pub fn subscribe_fn<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NavigationUpdate) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver(callback)))
    }

    /// Remove a subscription; returns whether it was present
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(sub, _)| *sub != id);
        inner.observers.len() != before
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.inner.lock().observers.len()
    }

    /// Whether no observers are registered
    pub fn is_empty(&self) -> bool {
        self.inner.lock().observers.is_empty()
    }

    /// Deliver an update to every observer registered at call time
    pub fn notify(&self, update: &NavigationUpdate) {
        let snapshot: Vec<Arc<dyn NavigationObserver>> = {
            let inner = self.inner.lock();
            inner
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };
        for observer in snapshot {
            observer.on_update(update);
        }
    }
}
