//! Public route registry.
//!
//! # Responsibilities
//! - Store the compiled public-route patterns
//! - Answer "is this path public?" for every inbound request
//! - Accept new patterns at any time, including while serving
//!
//! # Design Decisions
//! - Readers load an immutable `RouteSet` snapshot (lock-free via `ArcSwap`)
//! - Writers compile the whole batch first, then publish with one `rcu` swap
//! - Append-only: there is no removal operation
//! - Duplicates are kept; matching is existential so they change nothing

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::routing::pattern::{PatternError, RoutePattern};

/// An immutable, point-in-time set of public-route patterns.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    patterns: Vec<RoutePattern>,
}

impl RouteSet {
    /// True iff at least one pattern matches `path`.
    pub fn is_public(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// True if a pattern with this exact raw string is registered.
    pub fn contains(&self, raw: &str) -> bool {
        self.patterns.iter().any(|p| p.as_str() == raw)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutePattern> {
        self.patterns.iter()
    }
}

/// Shared handle to the application's public routes.
///
/// Cloning is cheap and every clone observes the same set.
#[derive(Debug, Clone, Default)]
pub struct PublicRoutes {
    inner: Arc<ArcSwap<RouteSet>>,
}

impl PublicRoutes {
    /// Create an empty registry. Every path is non-public until routes are added.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry from an initial list of patterns.
    ///
    /// Fails without building anything if any pattern is malformed.
    pub fn new<I, S>(initial: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = compile_all(initial)?;
        metrics::record_public_routes(patterns.len());
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(RouteSet { patterns })),
        })
    }

    /// Compile and append a batch of patterns.
    ///
    /// Either the whole batch is added or, on the first malformed pattern,
    /// none of it is. Returns the number of patterns appended.
    pub fn add_routes<I, S>(&self, patterns: I) -> Result<usize, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let batch = compile_all(patterns)?;
        if batch.is_empty() {
            return Ok(0);
        }

        let previous = self.inner.rcu(|current| {
            let mut patterns = Vec::with_capacity(current.len() + batch.len());
            patterns.extend(current.patterns.iter().cloned());
            patterns.extend(batch.iter().cloned());
            RouteSet { patterns }
        });

        let total = previous.len() + batch.len();
        tracing::info!(
            added = batch.len(),
            total,
            routes = ?batch.iter().map(RoutePattern::as_str).collect::<Vec<_>>(),
            "Public routes registered"
        );
        metrics::record_public_routes(total);
        Ok(batch.len())
    }

    /// True iff `path` matches at least one registered pattern.
    pub fn is_public(&self, path: &str) -> bool {
        self.inner.load().is_public(path)
    }

    /// A consistent view of the registry at this instant.
    pub fn snapshot(&self) -> Arc<RouteSet> {
        self.inner.load_full()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.inner.load().contains(raw)
    }

    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }

    /// Bring the registry up to date with a reloaded route list.
    ///
    /// Only patterns not yet registered are appended. Registered patterns that
    /// disappeared from the list stay public until restart.
    pub fn sync_from_config(&self, patterns: &[String]) -> Result<usize, PatternError> {
        let current = self.snapshot();
        let missing: Vec<&str> = patterns
            .iter()
            .map(String::as_str)
            .filter(|raw| !current.contains(raw))
            .collect();

        let stale: Vec<&str> = current
            .iter()
            .map(RoutePattern::as_str)
            .filter(|raw| !patterns.iter().any(|p| p.as_str() == *raw))
            .collect();
        if !stale.is_empty() {
            tracing::warn!(
                routes = ?stale,
                "Public routes removed from config stay registered until restart"
            );
        }

        self.add_routes(missing)
    }
}

fn compile_all<I, S>(patterns: I) -> Result<Vec<RoutePattern>, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| RoutePattern::compile(p.as_ref()))
        .collect()
}
