//! Navigation controller: the public façade over resolver and stack
//!
//! One controller owns one session's back stack; sessions are
//! constructed explicitly and passed to whatever builds screens,
//! never fetched from shared global state. Mutations and the
//! notifications that follow them run under one exclusive lock, so
//! two concurrent `navigate` calls cannot interleave; reads go
//! through an immutable snapshot and never wait on a mutation.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use nav_graph::{DestinationInstance, GraphResolver};

use crate::error::{NavError, NavResult, StackError};
use crate::observer::{NavigationObserver, NavigationUpdate, ObserverRegistry, SubscriptionId};
use crate::request::NavRequest;
use crate::stack::BackStack;

/// Outcome of [`NavigationController::navigate_back`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackDisposition {
    /// The top entry was popped
    Popped,
    /// Back was pressed on the root entry; the stack is unchanged
    /// until the host confirms with
    /// [`NavigationController::terminate_session`]
    TerminateRequested,
}

struct Inner {
    stack: BackStack,
    terminated: bool,
}

/// Session-scoped navigation façade
///
/// Observer callbacks run inside the serialized mutate-and-notify
/// section: subscribing and unsubscribing from a callback is safe,
/// issuing further navigation from one is not.
pub struct NavigationController {
    resolver: GraphResolver,
    inner: Mutex<Inner>,
    snapshot: RwLock<Arc<Vec<DestinationInstance>>>,
    observers: ObserverRegistry,
}

impl NavigationController {
    /// Start a session at the destination named by `start`
    ///
    /// Fails with the start request's resolution error; a session
    /// never exists without a valid root entry.
    pub fn new(resolver: GraphResolver, start: &NavRequest) -> NavResult<Self> {
        let root = resolver.resolve_target(&start.target, &start.args)?;
        let snapshot = Arc::new(vec![root.clone()]);
        Ok(Self {
            resolver,
            inner: Mutex::new(Inner {
                stack: BackStack::new(root),
                terminated: false,
            }),
            snapshot: RwLock::new(snapshot),
            observers: ObserverRegistry::new(),
        })
    }

    /// The resolver this session navigates with
    pub fn resolver(&self) -> &GraphResolver {
        &self.resolver
    }

    /// Resolve and apply a navigation request
    ///
    /// Resolution failures and rejected stack transitions leave the
    /// stack unchanged; both are returned as typed errors and emitted
    /// as [`NavigationUpdate::Failed`] on the notification channel.
    /// Returns the new top of stack.
    pub fn navigate(&self, request: &NavRequest) -> NavResult<DestinationInstance> {
        let mut inner = self.inner.lock();
        self.check_alive(&inner)?;

        let resolved = match self.resolver.resolve_target(&request.target, &request.args) {
            Ok(instance) => instance,
            Err(err) => return Err(self.reject(err.into())),
        };

        let mut torn_down = Vec::new();
        if let Some(policy) = &request.pop_up_to {
            // A push follows in this same atomic step, so clearing the
            // whole stack is allowed here.
            match inner
                .stack
                .pop_up_to_allowing_empty(&policy.destination, policy.inclusive)
            {
                Ok(removed) => torn_down.extend(removed),
                Err(err) => return Err(self.reject(err.into())),
            }
        }

        if request.single_top
            && inner.stack.depth() > 0
            && inner.stack.current().definition_id == resolved.definition_id
        {
            // Entries popped by the policy sat above the replaced top,
            // so the replaced entry tears down last.
            torn_down.push(inner.stack.replace_top(resolved.clone()));
        } else {
            inner.stack.push(resolved.clone());
        }

        self.commit(&inner);
        tracing::debug!(
            "Navigated to `{}` ({} torn down, depth {})",
            resolved.definition_id,
            torn_down.len(),
            inner.stack.depth()
        );
        self.observers.notify(&NavigationUpdate::Changed {
            current: resolved.clone(),
            torn_down,
        });
        Ok(resolved)
    }

    /// Resolve a deep-link URI and navigate to it
    ///
    /// [`nav_graph::ResolutionError::UnresolvedDeepLink`] is
    /// recoverable: the caller typically falls back to the start
    /// destination instead of treating it as fatal.
    pub fn navigate_deep_link(&self, uri: &str) -> NavResult<DestinationInstance> {
        let mut inner = self.inner.lock();
        self.check_alive(&inner)?;

        let resolved = match self.resolver.resolve_deep_link(uri) {
            Ok(instance) => instance,
            Err(err) => {
                tracing::warn!("Deep link rejected: {}", err);
                return Err(self.reject(err.into()));
            }
        };

        inner.stack.push(resolved.clone());
        self.commit(&inner);
        self.observers.notify(&NavigationUpdate::Changed {
            current: resolved.clone(),
            torn_down: Vec::new(),
        });
        Ok(resolved)
    }

    /// Pop the top entry
    ///
    /// At the root this returns [`BackDisposition::TerminateRequested`]
    /// and leaves the stack unchanged; the host decides whether to
    /// call [`NavigationController::terminate_session`] or defer to an
    /// enclosing navigation scope.
    pub fn navigate_back(&self) -> NavResult<BackDisposition> {
        let mut inner = self.inner.lock();
        self.check_alive(&inner)?;

        if !inner.stack.can_pop() {
            tracing::debug!("Back on root entry; surfacing terminate request");
            return Ok(BackDisposition::TerminateRequested);
        }

        let popped = inner.stack.pop().expect("can_pop checked above");
        self.commit(&inner);
        self.observers.notify(&NavigationUpdate::Changed {
            current: inner.stack.current().clone(),
            torn_down: vec![popped],
        });
        Ok(BackDisposition::Popped)
    }

    /// Pop entries up to (and optionally including) a destination
    pub fn pop_up_to(&self, definition_id: &str, inclusive: bool) -> NavResult<()> {
        let mut inner = self.inner.lock();
        self.check_alive(&inner)?;

        let torn_down = match inner.stack.pop_up_to(definition_id, inclusive) {
            Ok(removed) => removed,
            Err(err) => return Err(self.reject(err.into())),
        };
        if torn_down.is_empty() {
            // Target was already on top; nothing changed, nothing to emit.
            return Ok(());
        }

        self.commit(&inner);
        self.observers.notify(&NavigationUpdate::Changed {
            current: inner.stack.current().clone(),
            torn_down,
        });
        Ok(())
    }

    /// Tear down the session
    ///
    /// Empties the stack, emits [`NavigationUpdate::Terminated`], and
    /// fails every later operation with
    /// [`StackError::SessionTerminated`]. Returns the torn-down
    /// entries, top-first.
    pub fn terminate_session(&self) -> NavResult<Vec<DestinationInstance>> {
        let mut inner = self.inner.lock();
        self.check_alive(&inner)?;

        inner.terminated = true;
        let torn_down = inner.stack.drain_for_termination();
        *self.snapshot.write() = Arc::new(Vec::new());
        tracing::debug!("Session terminated ({} entries torn down)", torn_down.len());
        self.observers.notify(&NavigationUpdate::Terminated {
            torn_down: torn_down.clone(),
        });
        Ok(torn_down)
    }

    /// The currently visible destination
    ///
    /// Reads an immutable snapshot; never waits on an in-flight
    /// mutation. `None` only after session termination.
    pub fn current_destination(&self) -> Option<DestinationInstance> {
        self.snapshot.read().last().cloned()
    }

    /// Snapshot of the whole stack, bottom to top
    pub fn stack_snapshot(&self) -> Arc<Vec<DestinationInstance>> {
        Arc::clone(&self.snapshot.read())
    }

    /// Register an observer for stack changes
    pub fn subscribe(&self, observer: Arc<dyn NavigationObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    /// Register a closure for stack changes
    pub fn subscribe_fn<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NavigationUpdate) + Send + Sync + 'static,
    {
        self.observers.subscribe_fn(callback)
    }

    /// Remove a subscription
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn check_alive(&self, inner: &Inner) -> NavResult<()> {
        if inner.terminated {
            return Err(self.reject(StackError::SessionTerminated.into()));
        }
        Ok(())
    }

    /// Publish the committed stack as the read snapshot
    fn commit(&self, inner: &Inner) {
        *self.snapshot.write() = Arc::new(inner.stack.entries().to_vec());
    }

    /// Emit a typed failure on the notification channel and hand the
    /// error back to the caller; the stack is untouched
    fn reject(&self, error: NavError) -> NavError {
        tracing::warn!("Navigation rejected: {}", error);
        self.observers
            .notify(&NavigationUpdate::Failed {
                error: error.clone(),
            });
        error
    }
}
