// src/score.rs
//! Score model: sub-scores, composite scores, confidence bands, insights and
//! the final ranked shape. These are the structures downstream consumers
//! (chat orchestration, API, exporters) read — nothing downstream recomputes
//! a score, so `CompositeScore` is the single source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ScientificEvidence,
    MarketOpportunity,
    CompetitiveLandscape,
    DevelopmentFeasibility,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::ScientificEvidence => "scientific_evidence",
            Dimension::MarketOpportunity => "market_opportunity",
            Dimension::CompetitiveLandscape => "competitive_landscape",
            Dimension::DevelopmentFeasibility => "development_feasibility",
        }
    }
}

/// Per-dimension weights. Must sum to exactly 1.0 (validated at load).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub scientific: f64,
    pub market: f64,
    pub competitive: f64,
    pub feasibility: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            scientific: 0.40,
            market: 0.25,
            competitive: 0.20,
            feasibility: 0.15,
        }
    }
}

impl DimensionWeights {
    pub fn sum(&self) -> f64 {
        self.scientific + self.market + self.competitive + self.feasibility
    }

    pub fn for_dimension(&self, d: Dimension) -> f64 {
        match d {
            Dimension::ScientificEvidence => self.scientific,
            Dimension::MarketOpportunity => self.market,
            Dimension::CompetitiveLandscape => self.competitive,
            Dimension::DevelopmentFeasibility => self.feasibility,
        }
    }
}

/// Discrete confidence band; a pure step function of the overall score.
/// Breakpoints: >= 80 High, >= 60 Moderate, >= 40 Low, else Minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
    Minimal,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ConfidenceLevel::High
        } else if score >= 60.0 {
            ConfidenceLevel::Moderate
        } else if score >= 40.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Minimal
        }
    }
}

/// One dimension's score with its named factor contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScore {
    pub dimension: Dimension,
    /// Clamped to [0, 100].
    pub score: f64,
    pub weight: f64,
    /// Always `score * weight`; kept in lockstep by `set_score`.
    pub weighted_score: f64,
    pub confidence: ConfidenceLevel,
    /// Named factor -> points. Deductions carry negative points.
    pub factors: BTreeMap<String, f64>,
    /// Share of inputs backed by real (vs. estimated/defaulted) data, [0,1].
    pub data_completeness: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Known competitor names, when the competitive dimension saw them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<String>>,
}

impl SubScore {
    pub fn new(dimension: Dimension, weight: f64) -> Self {
        Self {
            dimension,
            score: 0.0,
            weight,
            weighted_score: 0.0,
            confidence: ConfidenceLevel::Minimal,
            factors: BTreeMap::new(),
            data_completeness: 0.0,
            notes: Vec::new(),
            competitors: None,
        }
    }

    /// Record a named factor contribution and return the points for chaining
    /// into the running total.
    pub fn add_factor(&mut self, name: impl Into<String>, points: f64) -> f64 {
        self.factors.insert(name.into(), points);
        points
    }

    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.get(name).copied()
    }

    /// Set the score (clamped) and keep `weighted_score` and the band in sync.
    pub fn set_score(&mut self, score: f64) {
        self.score = clamp100(score);
        self.weighted_score = self.score * self.weight;
        self.confidence = ConfidenceLevel::from_score(self.score);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// Kind of derived insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Strength,
    Risk,
    Recommendation,
}

/// A qualitative statement derived from a numeric threshold. Always carries
/// the concrete number it was derived from, never a bare label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    /// The metric value the message cites.
    pub value: f64,
}

impl Insight {
    pub fn new(kind: InsightKind, message: impl Into<String>, value: f64) -> Self {
        Self {
            kind,
            message: message.into(),
            value,
        }
    }
}

/// Full assessment of one indication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeScore {
    pub indication: String,
    /// The literal weighted sum of the four sub-scores, clamped to [0,100].
    pub overall_score: f64,
    pub confidence_level: ConfidenceLevel,
    pub scientific: SubScore,
    pub market: SubScore,
    pub competitive: SubScore,
    pub feasibility: SubScore,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<Insight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<Insight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Insight>,
    pub evidence_count: usize,
    /// Mean of the four per-dimension completeness values.
    pub data_completeness: f64,
    pub scored_at: DateTime<Utc>,
}

impl CompositeScore {
    pub fn sub_scores(&self) -> [&SubScore; 4] {
        [&self.scientific, &self.market, &self.competitive, &self.feasibility]
    }

    /// The one place the overall score is computed: the weighted sum of the
    /// four current sub-scores. Scorer and refiner both go through here.
    pub fn recompute_overall(&mut self) {
        let sum: f64 = self.sub_scores().iter().map(|s| s.weighted_score).sum();
        self.overall_score = clamp100(sum);
        self.confidence_level = ConfidenceLevel::from_score(self.overall_score);
        self.data_completeness =
            self.sub_scores().iter().map(|s| s.data_completeness).sum::<f64>() / 4.0;
    }
}

/// Final ranked entry handed to downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub indication: String,
    /// Equal to `score.overall_score`; kept as a top-level field for readers
    /// that only need the ranking key.
    pub confidence_score: f64,
    pub score: CompositeScore,
    pub evidence_count: usize,
    pub supporting_sources: Vec<String>,
}

pub(crate) fn clamp100(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = DimensionWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn confidence_band_boundaries() {
        // Table-driven boundary check, including the 79.9 vs 80.0 edge.
        let table = [
            (100.0, ConfidenceLevel::High),
            (80.0, ConfidenceLevel::High),
            (79.9, ConfidenceLevel::Moderate),
            (60.0, ConfidenceLevel::Moderate),
            (59.9, ConfidenceLevel::Low),
            (40.0, ConfidenceLevel::Low),
            (39.9, ConfidenceLevel::Minimal),
            (0.0, ConfidenceLevel::Minimal),
        ];
        for (score, want) in table {
            assert_eq!(ConfidenceLevel::from_score(score), want, "score {score}");
        }
    }

    #[test]
    fn set_score_clamps_and_syncs_weighted() {
        let mut s = SubScore::new(Dimension::ScientificEvidence, 0.4);
        s.set_score(123.0);
        assert_eq!(s.score, 100.0);
        assert!((s.weighted_score - 40.0).abs() < 1e-9);
        assert_eq!(s.confidence, ConfidenceLevel::High);

        s.set_score(-5.0);
        assert_eq!(s.score, 0.0);
        assert_eq!(s.weighted_score, 0.0);
    }
}
