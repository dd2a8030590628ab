// src/rank.rs
//! Final ranking: overall score descending, ties broken by evidence count
//! descending. The tie-break is an explicit comparator rule, not an accident
//! of sort stability.

use std::cmp::Ordering;

use crate::score::{CompositeScore, RankedResult};

pub fn rank(mut scores: Vec<(CompositeScore, Vec<String>)>) -> Vec<RankedResult> {
    scores.sort_by(|(a, _), (b, _)| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.evidence_count.cmp(&a.evidence_count))
    });

    scores
        .into_iter()
        .map(|(score, supporting_sources)| RankedResult {
            indication: score.indication.clone(),
            confidence_score: score.overall_score,
            evidence_count: score.evidence_count,
            supporting_sources,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{ConfidenceLevel, Dimension, DimensionWeights, SubScore};
    use chrono::Utc;

    fn score(indication: &str, overall: f64, evidence_count: usize) -> CompositeScore {
        let w = DimensionWeights::default();
        CompositeScore {
            indication: indication.into(),
            overall_score: overall,
            confidence_level: ConfidenceLevel::from_score(overall),
            scientific: SubScore::new(Dimension::ScientificEvidence, w.scientific),
            market: SubScore::new(Dimension::MarketOpportunity, w.market),
            competitive: SubScore::new(Dimension::CompetitiveLandscape, w.competitive),
            feasibility: SubScore::new(Dimension::DevelopmentFeasibility, w.feasibility),
            strengths: Vec::new(),
            risks: Vec::new(),
            recommendations: Vec::new(),
            evidence_count,
            data_completeness: 1.0,
            scored_at: Utc::now(),
        }
    }

    #[test]
    fn orders_by_overall_descending() {
        let ranked = rank(vec![
            (score("a", 40.0, 3), vec![]),
            (score("b", 80.0, 1), vec![]),
            (score("c", 60.0, 2), vec![]),
        ]);
        let names: Vec<&str> = ranked.iter().map(|r| r.indication.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn ties_break_by_evidence_count_descending() {
        let ranked = rank(vec![
            (score("few", 70.0, 2), vec![]),
            (score("many", 70.0, 15), vec![]),
        ]);
        assert_eq!(ranked[0].indication, "many");
        assert_eq!(ranked[1].indication, "few");
    }

    #[test]
    fn confidence_score_mirrors_overall() {
        let ranked = rank(vec![(score("a", 72.5, 4), vec!["pubmed".into()])]);
        assert_eq!(ranked[0].confidence_score, ranked[0].score.overall_score);
        assert_eq!(ranked[0].supporting_sources, vec!["pubmed".to_string()]);
    }
}
