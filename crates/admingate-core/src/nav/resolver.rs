//! Recursive child-query fan-out that materializes resource trees.
//!
//! The resolver walks the hierarchy level by level: every node in the
//! current frontier gets a staggered, bounded-concurrency child query,
//! each query carries its own retry budget, and the fetched levels are
//! merged bottom-up into the root set. Depth is driven entirely by the
//! data.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::config::Config;
use crate::models::{sort_siblings, ResourceNode, ROOT_CODE};

// ============================================================================
// Constants
// ============================================================================

/// Total attempts per child query before its subtree is given up on.
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Delay step between child-query dispatches within one level.
const DEFAULT_STAGGER_MS: u64 = 100;

/// Upper bound on concurrently running child queries.
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Initial backoff delay between retry attempts; doubles per attempt.
const INITIAL_BACKOFF_MS: u64 = 250;

/// One level-by-level child query: the records directly under
/// `parent_code`, no descendants populated.
///
/// Implemented by [`ResourceEndpoint`] over HTTP and by scripted fetchers
/// in tests. The resolver owns the retry budget; implementations report
/// each failure as-is.
///
/// [`ResourceEndpoint`]: crate::api::ResourceEndpoint
pub trait ResourceFetcher: Send + Sync {
    fn fetch_children(
        &self,
        parent_code: &str,
        tenant_code: &str,
    ) -> impl Future<Output = Result<Vec<ResourceNode>, ApiError>> + Send;
}

/// Drives a [`ResourceFetcher`] recursively to assemble full parent/child
/// trees from a flat root set.
///
/// `resolve` is a plain future: dropping it (e.g. on navigation away)
/// aborts every in-flight child query. The resolver holds no session
/// state, so an abandoned resolution leaves nothing to corrupt.
pub struct TreeResolver<F> {
    fetcher: F,
    tenant_code: String,
    retry_attempts: u32,
    stagger: Duration,
    max_in_flight: usize,
}

impl<F: ResourceFetcher> TreeResolver<F> {
    pub fn new(fetcher: F, tenant_code: impl Into<String>) -> Self {
        Self {
            fetcher,
            tenant_code: tenant_code.into(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            stagger: Duration::from_millis(DEFAULT_STAGGER_MS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Build a resolver with the tunables from an application [`Config`].
    pub fn from_config(fetcher: F, config: &Config) -> Self {
        Self::new(fetcher, config.tenant_code.clone().unwrap_or_default())
            .with_retry_attempts(config.retry_attempts)
            .with_stagger(config.stagger())
            .with_max_in_flight(config.max_in_flight)
    }

    /// Total attempts per child query (default 3).
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    /// Delay step between dispatches within a level (default 100ms).
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// In-flight child query cap (default 8).
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Resolve the tree under the `"0"` sentinel root.
    pub async fn resolve_roots(&self) -> Result<Vec<ResourceNode>, ApiError> {
        self.resolve(ROOT_CODE).await
    }

    /// Materialize the full tree below `root_filter`.
    ///
    /// A root-set failure (after the retry budget) is the only error that
    /// propagates. A child query that exhausts its retries, or fails
    /// permanently, costs exactly that subtree: it is logged and omitted,
    /// and sibling subtrees are unaffected.
    pub async fn resolve(&self, root_filter: &str) -> Result<Vec<ResourceNode>, ApiError> {
        let mut roots = self.fetch_with_retry(root_filter).await?;
        sort_siblings(&mut roots);
        if roots.is_empty() {
            return Ok(roots);
        }

        // Codes already fetched or queued. The node graph is declared a
        // tree, but malformed data must not loop the frontier.
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(root_filter.to_string());
        seen.extend(roots.iter().map(|n| n.code.clone()));

        let mut frontier: Vec<String> = roots.iter().map(|n| n.code.clone()).collect();
        // levels[d] maps a parent code at depth d to its fetched children.
        let mut levels: Vec<HashMap<String, Vec<ResourceNode>>> = Vec::new();

        while !frontier.is_empty() {
            debug!(width = frontier.len(), depth = levels.len(), "Expanding frontier");
            let fetched = self.fetch_level(&frontier).await;

            let mut level: HashMap<String, Vec<ResourceNode>> = HashMap::new();
            let mut next: Vec<String> = Vec::new();
            for (code, result) in fetched {
                match result {
                    Ok(mut children) if !children.is_empty() => {
                        sort_siblings(&mut children);
                        for child in &children {
                            if seen.insert(child.code.clone()) {
                                next.push(child.code.clone());
                            } else {
                                warn!(code = %child.code, parent = %code, "Duplicate code in hierarchy; not expanding again");
                            }
                        }
                        level.insert(code, children);
                    }
                    // Leaves keep `children` empty rather than an
                    // attached empty list.
                    Ok(_) => {}
                    Err(e) => {
                        warn!(parent = %code, error = %e, "Subtree omitted after failed child query");
                    }
                }
            }
            levels.push(level);
            frontier = next;
        }

        // All queries have settled; merge bottom-up, keyed by parent
        // code, so sibling completion order cannot shape the tree.
        for upper_idx in (0..levels.len().saturating_sub(1)).rev() {
            let (upper, lower) = levels.split_at_mut(upper_idx + 1);
            let upper_level = &mut upper[upper_idx];
            let lower_level = &mut lower[0];
            for children in upper_level.values_mut() {
                for child in children.iter_mut() {
                    if let Some(grandchildren) = lower_level.remove(&child.code) {
                        child.children = grandchildren;
                    }
                }
            }
        }
        if let Some(first) = levels.first_mut() {
            for root in roots.iter_mut() {
                if let Some(children) = first.remove(&root.code) {
                    root.children = children;
                }
            }
        }

        Ok(roots)
    }

    /// Fan out one frontier's child queries: staggered dispatch, bounded
    /// in-flight count, gathered in completion order.
    async fn fetch_level(
        &self,
        frontier: &[String],
    ) -> Vec<(String, Result<Vec<ResourceNode>, ApiError>)> {
        stream::iter(frontier.iter().enumerate())
            .map(|(i, code)| async move {
                tokio::time::sleep(self.stagger * i as u32).await;
                (code.clone(), self.fetch_with_retry(code).await)
            })
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await
    }

    async fn fetch_with_retry(&self, parent_code: &str) -> Result<Vec<ResourceNode>, ApiError> {
        let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempt = 1;

        loop {
            match self
                .fetcher
                .fetch_children(parent_code, &self.tenant_code)
                .await
            {
                Ok(children) => return Ok(children),
                Err(e) if attempt < self.retry_attempts && e.is_transient() => {
                    warn!(
                        pcode = parent_code,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Child query failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
