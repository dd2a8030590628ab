// src/scoring/mod.rs
//! Composite scoring: four weighted sub-scores per indication group, an
//! overall score that is always their literal weighted sum, a discrete
//! confidence band and derived insights.
//!
//! Scoring is a pure, synchronous transform over already-collected data; the
//! only inputs are the indication group and optional enrichment.

pub mod competition;
pub mod feasibility;
pub mod insights;
pub mod market;
pub mod market_estimates;
pub mod rules;
pub mod scientific;

use anyhow::{bail, Result};
use chrono::Utc;

use crate::aggregate::{IndicationAliases, IndicationGroup};
use crate::enrichment::IndicationEnrichment;
use crate::error::PipelineError;
use crate::score::{CompositeScore, ConfidenceLevel, DimensionWeights};

pub struct CompositeScorer {
    weights: DimensionWeights,
    aliases: IndicationAliases,
}

impl CompositeScorer {
    /// Weights are validated up front; a set that does not sum to 1.0 is a
    /// configuration error, not something to paper over at scoring time.
    pub fn new(weights: DimensionWeights, aliases: IndicationAliases) -> Result<Self, PipelineError> {
        if (weights.sum() - 1.0).abs() > 1e-9 {
            return Err(PipelineError::InvalidWeights(weights.sum()));
        }
        Ok(Self { weights, aliases })
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: DimensionWeights::default(),
            aliases: IndicationAliases::default_seed(),
        }
    }

    pub fn weights(&self) -> DimensionWeights {
        self.weights
    }

    /// Score one indication group. Groups with zero usable evidence are
    /// refused rather than given a zero score.
    pub fn score_group(
        &self,
        group: &IndicationGroup,
        enrichment: Option<&IndicationEnrichment>,
    ) -> Result<CompositeScore> {
        if group.items.is_empty() {
            bail!("indication '{}' has no usable evidence", group.display);
        }

        let market_data = enrichment.and_then(|e| e.market.as_ref());
        let competitor_data = enrichment.and_then(|e| e.competitors.as_ref());
        let patent_data = enrichment.and_then(|e| e.patent.as_ref());

        let scientific = scientific::score(group, self.weights.scientific);
        let market = market::score(group, market_data, &self.aliases, self.weights.market);
        let competitive = competition::score(group, competitor_data, self.weights.competitive);
        let feasibility = feasibility::score(group, patent_data, self.weights.feasibility);

        let mut cs = CompositeScore {
            indication: group.display.clone(),
            overall_score: 0.0,
            confidence_level: ConfidenceLevel::Minimal,
            scientific,
            market,
            competitive,
            feasibility,
            strengths: Vec::new(),
            risks: Vec::new(),
            recommendations: Vec::new(),
            evidence_count: group.evidence_count(),
            data_completeness: 0.0,
            scored_at: Utc::now(),
        };
        cs.recompute_overall();

        let derived = insights::derive(&cs);
        cs.strengths = derived.strengths;
        cs.risks = derived.risks;
        cs.recommendations = derived.recommendations;

        Ok(cs)
    }
}
