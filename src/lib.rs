// src/lib.rs
// Public library surface for integration tests (and downstream consumers).

pub mod aggregate;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod evidence;
pub mod pipeline;
pub mod rank;
pub mod rate_limit;
pub mod refine;
pub mod retry;
pub mod runner;
pub mod score;
pub mod scoring;

// ---- Re-exports for a stable public API ----
pub use crate::aggregate::{EvidenceAggregator, IndicationAliases, IndicationGroup};
pub use crate::config::ScoringConfig;
pub use crate::enrichment::{
    CompetitorData, EnrichmentMap, IndicationEnrichment, MarketData, PatentData, RefinementData,
    RefinementMap,
};
pub use crate::error::{CollaboratorError, PipelineError};
pub use crate::evidence::{
    Collaborator, CollaboratorResult, CollaboratorStatus, EvidenceItem, QueryContext, RawEvidence,
    SourceKind, TrialPhase,
};
pub use crate::pipeline::{Pipeline, RunReport};
pub use crate::rate_limit::RateLimiter;
pub use crate::refine::ScoreRefiner;
pub use crate::retry::RetryPolicy;
pub use crate::runner::AgentRunner;
pub use crate::score::{
    CompositeScore, ConfidenceLevel, Dimension, DimensionWeights, Insight, InsightKind,
    RankedResult, SubScore,
};
pub use crate::scoring::CompositeScorer;

/// Install a fmt tracing subscriber honoring `RUST_LOG`. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
