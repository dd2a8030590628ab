// src/enrichment.rs
//! Optional per-indication enrichment inputs.
//!
//! Everything here is independently nullable: the scorer silently falls back
//! to estimates or smaller defaults when a field is absent, and records the
//! degradation in `data_completeness` instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pricing headroom category for the market dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPotential {
    Premium,
    Standard,
    GenericPressure,
}

/// Explicit market figures for an indication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    /// Addressable market in USD billions.
    pub size_usd_b: f64,
    /// Compound annual growth rate, percent.
    pub cagr_pct: f64,
    /// Unmet medical need, 0-100.
    pub unmet_need: f64,
    pub pricing: PricingPotential,
    /// True when the figures come from the curated estimate table rather
    /// than a real market feed.
    pub estimated: bool,
}

/// Competitive field for an indication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorData {
    pub names: Vec<String>,
    /// Any competitor in phase 3 or already approved.
    pub late_stage_or_approved: bool,
    /// Any large incumbent active in the indication.
    pub large_incumbents: bool,
}

impl CompetitorData {
    pub fn count(&self) -> usize {
        self.names.len()
    }
}

/// Patent position relevant to development feasibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatentData {
    /// Composition-of-matter protection expired or expiring soon.
    pub expired_or_expiring: bool,
    /// Indication qualifies for orphan drug incentives.
    pub orphan_potential: bool,
}

/// First-pass enrichment available at scoring time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicationEnrichment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<CompetitorData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patent: Option<PatentData>,
}

/// Enrichment keyed by normalized indication key.
pub type EnrichmentMap = HashMap<String, IndicationEnrichment>;

// ---- Second-pass (refinement) inputs ----

/// Deeper mechanism/potency detail for an indication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScientificDetails {
    /// Best binding/functional potency seen (IC50/EC50/Ki/Kd), nanomolar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_potency_nm: Option<f64>,
    /// Disease pathways the compound's targets overlap.
    pub pathway_overlap: usize,
    pub biomarker_available: bool,
    pub preclinical_model_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedLevel {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitiveIntensity {
    Low,
    Moderate,
    High,
}

/// Segment-level market detail for refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSegment {
    pub name: String,
    pub unmet_need_level: NeedLevel,
    pub growth_pct: f64,
    pub competitive_intensity: CompetitiveIntensity,
}

/// A concrete advantage over a named comparator drug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeAdvantage {
    pub comparator: String,
    pub description: String,
}

/// Side-effect profile vs. a named comparator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideEffectComparison {
    pub comparator: String,
    /// Safety advantage, 0-100; >50 favors this compound.
    pub advantage_score: f64,
}

/// Second-pass data for one indication. All parts optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefinementData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific: Option<ScientificDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<MarketSegment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advantages: Vec<ComparativeAdvantage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<SideEffectComparison>,
}

/// Refinement data keyed by normalized indication key.
pub type RefinementMap = HashMap<String, RefinementData>;
