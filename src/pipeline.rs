// src/pipeline.rs
//! End-to-end pipeline: fan-out to collaborators, aggregate, score, rank,
//! and optionally refine. Failures are contained to the smallest unit — one
//! collaborator or one indication; the only fatal error is having nothing to
//! run. A run with partial failures still returns a fully ranked (possibly
//! shorter) list plus a visible record of what failed and why.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;

use crate::aggregate::{EvidenceAggregator, IndicationAliases};
use crate::config::ScoringConfig;
use crate::enrichment::{EnrichmentMap, RefinementMap};
use crate::error::PipelineError;
use crate::evidence::{Collaborator, CollaboratorResult, QueryContext};
use crate::rank;
use crate::refine::ScoreRefiner;
use crate::retry::RetryPolicy;
use crate::runner::AgentRunner;
use crate::score::RankedResult;
use crate::scoring::CompositeScorer;

/// One-time metrics registration (so series show up on exporters).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "runner_collaborator_errors_total",
            "Collaborator invocations that settled with an error."
        );
        describe_counter!(
            "runner_collaborator_timeouts_total",
            "Collaborator invocations that hit their independent timeout."
        );
        describe_counter!(
            "aggregate_items_skipped_total",
            "Evidence items dropped for a missing/unknown indication."
        );
        describe_counter!(
            "pipeline_indications_scored_total",
            "Indication groups successfully scored."
        );
        describe_counter!(
            "pipeline_indications_omitted_total",
            "Indication groups omitted after a scoring failure."
        );
        describe_histogram!(
            "runner_collaborator_elapsed_ms",
            "Per-collaborator wall time in milliseconds."
        );
        describe_gauge!("pipeline_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Everything a run produced, including the failure record.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub ranked: Vec<RankedResult>,
    /// One settled result per collaborator (success, error or timeout).
    pub collaborators: Vec<CollaboratorResult>,
    /// Merged `collaborator: reason` error strings.
    pub collaborator_errors: Vec<String>,
    /// Evidence items dropped for unusable indications.
    pub skipped_items: usize,
    /// Indications omitted by a scoring failure, with the reason.
    pub omitted_indications: Vec<(String, String)>,
}

pub struct Pipeline {
    runner: AgentRunner,
    aggregator: EvidenceAggregator,
    scorer: CompositeScorer,
    refiner: ScoreRefiner,
    aliases: IndicationAliases,
}

impl Pipeline {
    /// Collaborators and configuration are injected; the pipeline keeps no
    /// process-global state. Fails when there is nothing to run or the
    /// configured weights do not sum to 1.0.
    pub fn new(
        collaborators: Vec<Arc<dyn Collaborator>>,
        config: &ScoringConfig,
    ) -> Result<Self, PipelineError> {
        if collaborators.is_empty() {
            return Err(PipelineError::NoCollaborators);
        }
        let aliases = config.indication_aliases();
        Ok(Self {
            runner: AgentRunner::new(collaborators),
            aggregator: EvidenceAggregator::new(aliases.clone()),
            scorer: CompositeScorer::new(config.weights(), aliases.clone())?,
            refiner: ScoreRefiner::new(),
            aliases,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.runner = self.runner.with_retry(retry);
        self
    }

    pub fn with_collaborator_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    /// Full first-pass run: fetch from every collaborator, aggregate, score
    /// each indication group and rank. Enrichment is optional per indication.
    pub async fn run(&self, query: &QueryContext, enrichment: &EnrichmentMap) -> RunReport {
        ensure_metrics_described();

        let outcome = self.runner.run(query).await;
        tracing::info!(
            compound = %query.compound,
            collaborators = outcome.results.len(),
            succeeded = outcome.succeeded(),
            "collaborator barrier settled"
        );

        let aggregated = self.aggregator.aggregate(&outcome.results);

        let mut scored = Vec::with_capacity(aggregated.groups.len());
        let mut omitted = Vec::new();
        for group in &aggregated.groups {
            match self.scorer.score_group(group, enrichment.get(&group.key)) {
                Ok(cs) => {
                    counter!("pipeline_indications_scored_total").increment(1);
                    let sources: Vec<String> = group.sources.iter().cloned().collect();
                    scored.push((cs, sources));
                }
                Err(e) => {
                    // Contained: one bad group never aborts the run.
                    tracing::warn!(indication = %group.display, error = %e, "scoring failed; omitting");
                    counter!("pipeline_indications_omitted_total").increment(1);
                    omitted.push((group.display.clone(), e.to_string()));
                }
            }
        }

        let ranked = rank::rank(scored);
        gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!(
            ranked = ranked.len(),
            skipped = aggregated.skipped,
            omitted = omitted.len(),
            "run complete"
        );

        RunReport {
            ranked,
            collaborators: outcome.results,
            collaborator_errors: outcome.errors,
            skipped_items: aggregated.skipped,
            omitted_indications: omitted,
        }
    }

    /// Second pass: apply bounded refinement to indications that have deeper
    /// data, keep the unrefined score for any that fail, and re-rank.
    pub fn refine(&self, report: RunReport, refinements: &RefinementMap) -> RunReport {
        let RunReport {
            ranked,
            collaborators,
            collaborator_errors,
            skipped_items,
            omitted_indications,
        } = report;

        let rescored = ranked
            .into_iter()
            .map(|r| {
                let key = self
                    .aliases
                    .canonical_key(&r.indication)
                    .unwrap_or_else(|| r.indication.clone());
                let score = match refinements.get(&key) {
                    Some(data) => match self.refiner.refine_one(&r.score, data) {
                        Ok(refined) => refined,
                        Err(e) => {
                            tracing::warn!(indication = %r.indication, error = %e, "refinement failed; keeping base score");
                            r.score
                        }
                    },
                    None => r.score,
                };
                (score, r.supporting_sources)
            })
            .collect();

        RunReport {
            ranked: rank::rank(rescored),
            collaborators,
            collaborator_errors,
            skipped_items,
            omitted_indications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collaborator_set_is_fatal() {
        assert!(matches!(
            Pipeline::new(Vec::new(), &ScoringConfig::default()),
            Err(PipelineError::NoCollaborators)
        ));
    }
}
