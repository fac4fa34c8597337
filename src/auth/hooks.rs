//! Extra authorization predicates registered by application code.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::request::Parts;

/// A predicate that must also hold for a request to be authorized.
pub type AuthHook = Arc<dyn Fn(&Parts) -> bool + Send + Sync>;

/// Append-only list of [`AuthHook`]s, readable without locking.
#[derive(Default)]
pub struct AuthHooks {
    hooks: ArcSwap<Vec<AuthHook>>,
}

impl AuthHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook and hand it back unchanged.
    pub fn push(&self, hook: AuthHook) -> AuthHook {
        self.hooks.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(hook.clone());
            next
        });
        tracing::debug!(count = self.len(), "Authorization hook registered");
        hook
    }

    /// Register a closure as a hook.
    pub fn register<F>(&self, f: F) -> AuthHook
    where
        F: Fn(&Parts) -> bool + Send + Sync + 'static,
    {
        self.push(Arc::new(f))
    }

    /// True if every hook accepts the request, evaluated in registration order.
    /// Stops at the first rejection. An empty list accepts.
    pub fn all_pass(&self, parts: &Parts) -> bool {
        self.hooks.load().iter().all(|hook| hook(parts))
    }

    pub fn len(&self) -> usize {
        self.hooks.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for AuthHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHooks")
            .field("count", &self.len())
            .finish()
    }
}
