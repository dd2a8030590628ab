// src/runner.rs
//! Fan-out/fan-in execution of all collaborators.
//!
//! One task per collaborator, each wrapped in its own rate limiter, retry
//! policy and independent timeout. Statuses travel in the returned
//! [`CollaboratorResult`] values rather than through shared mutable state,
//! and the whole set is joined at a single barrier: aggregation never starts
//! before every collaborator has settled, and no collaborator's failure
//! cancels or blocks another.

use futures::future::join_all;
use metrics::{counter, histogram};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::evidence::{Collaborator, CollaboratorResult, CollaboratorStatus, QueryContext};
use crate::rate_limit::RateLimiter;
use crate::retry::RetryPolicy;

pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the barrier produced: one settled result per collaborator plus
/// the merged error list for user-visible reporting.
#[derive(Debug)]
pub struct RunOutcome {
    pub results: Vec<CollaboratorResult>,
    pub errors: Vec<String>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == CollaboratorStatus::Success)
            .count()
    }
}

pub struct AgentRunner {
    collaborators: Vec<Arc<dyn Collaborator>>,
    limiters: HashMap<&'static str, Arc<RateLimiter>>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl AgentRunner {
    /// Collaborators, limiters and the retry policy are injected here; the
    /// runner holds no process-global state.
    pub fn new(collaborators: Vec<Arc<dyn Collaborator>>) -> Self {
        let limiters = collaborators
            .iter()
            .map(|c| (c.name(), Arc::new(RateLimiter::new(c.rate_per_sec()))))
            .collect();
        Self {
            collaborators,
            limiters,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.collaborators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collaborators.is_empty()
    }

    /// Invoke every collaborator concurrently and wait for all of them.
    pub async fn run(&self, query: &QueryContext) -> RunOutcome {
        let futures = self.collaborators.iter().map(|collab| {
            let collab = Arc::clone(collab);
            let limiter = Arc::clone(&self.limiters[collab.name()]);
            let retry = self.retry;
            let budget = self.timeout;
            let query = query.clone();
            async move { Self::run_one(collab, limiter, retry, budget, &query).await }
        });

        let results = join_all(futures).await;

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| format!("{}: {}", r.collaborator, e)))
            .collect();

        RunOutcome { results, errors }
    }

    async fn run_one(
        collab: Arc<dyn Collaborator>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
        budget: Duration,
        query: &QueryContext,
    ) -> CollaboratorResult {
        let name = collab.name();
        debug!(collaborator = name, "running");
        let t0 = Instant::now();

        let attempt = retry.run(name, || {
            let collab = Arc::clone(&collab);
            let limiter = Arc::clone(&limiter);
            let query = query.clone();
            async move {
                limiter.acquire().await;
                let raw = collab.fetch(&query).await?;
                collab.process(raw, &query)
            }
        });

        let result = match tokio::time::timeout(budget, attempt).await {
            Ok(Ok(items)) => {
                debug!(collaborator = name, items = items.len(), "success");
                CollaboratorResult::success(name, items, t0.elapsed())
            }
            Ok(Err(err)) => {
                warn!(collaborator = name, error = %err, "collaborator failed (isolated)");
                counter!("runner_collaborator_errors_total").increment(1);
                CollaboratorResult::failure(name, &err, t0.elapsed())
            }
            Err(_) => {
                warn!(
                    collaborator = name,
                    budget_ms = budget.as_millis() as u64,
                    "collaborator timed out (isolated)"
                );
                counter!("runner_collaborator_timeouts_total").increment(1);
                CollaboratorResult::timeout(name, budget)
            }
        };

        histogram!("runner_collaborator_elapsed_ms").record(result.elapsed_ms as f64);
        result
    }
}
