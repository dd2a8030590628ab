// tests/scoring_fixture.rs
//
// Pinned scoring scenario: one Phase-3 trial, 12 items across 4 sources,
// mean relevance 0.8, a large (>= $10B) market with unmet need 85, one
// approved competitor, and existing official safety-database evidence.

use std::collections::BTreeSet;

use repurpose_ranker::aggregate::IndicationGroup;
use repurpose_ranker::enrichment::{
    CompetitorData, IndicationEnrichment, MarketData, PricingPotential,
};
use repurpose_ranker::{CompositeScorer, ConfidenceLevel, EvidenceItem, SourceKind};

fn fixture_group() -> IndicationGroup {
    let mut items = Vec::new();
    items.push(
        EvidenceItem::new("trials", SourceKind::ClinicalTrials, "pivotal study")
            .with_indication("Pulmonary Arterial Hypertension")
            .with_relevance(0.8)
            .with_meta("phase", serde_json::json!("Phase 3")),
    );
    for i in 0..6 {
        items.push(
            EvidenceItem::new("pubmed", SourceKind::Literature, format!("paper {i}"))
                .with_indication("Pulmonary Arterial Hypertension")
                .with_relevance(0.8),
        );
    }
    for i in 0..3 {
        items.push(
            EvidenceItem::new("chembl", SourceKind::Bioactivity, format!("assay {i}"))
                .with_indication("Pulmonary Arterial Hypertension")
                .with_relevance(0.8),
        );
    }
    for i in 0..2 {
        items.push(
            EvidenceItem::new("faers", SourceKind::SafetyReports, format!("report {i}"))
                .with_indication("Pulmonary Arterial Hypertension")
                .with_relevance(0.8),
        );
    }
    assert_eq!(items.len(), 12);

    let sources: BTreeSet<String> = items.iter().map(|i| i.source.clone()).collect();
    assert_eq!(sources.len(), 4);

    IndicationGroup {
        key: "pulmonary arterial hypertension".into(),
        display: "Pulmonary Arterial Hypertension".into(),
        items,
        sources,
    }
}

fn fixture_enrichment() -> IndicationEnrichment {
    IndicationEnrichment {
        market: Some(MarketData {
            size_usd_b: 12.0,
            cagr_pct: 8.0,
            unmet_need: 85.0,
            pricing: PricingPotential::Premium,
            estimated: false,
        }),
        competitors: Some(CompetitorData {
            names: vec!["approved-comparator".into()],
            late_stage_or_approved: true,
            large_incumbents: false,
        }),
        patent: None,
    }
}

#[test]
fn pinned_fixture_scores_as_documented() {
    let scorer = CompositeScorer::with_defaults();
    let cs = scorer
        .score_group(&fixture_group(), Some(&fixture_enrichment()))
        .unwrap();

    // Scientific sub-score in its upper band:
    // 12 items (20) + 4 sources (16) + phase 3 (20) + 0.8*15 (12) + 3 mech (6) = 74
    assert!((cs.scientific.score - 74.0).abs() < 1e-9, "got {}", cs.scientific.score);
    assert!(cs.scientific.score >= 70.0);

    // Market: large bracket (28) + CAGR 8% (15) + 85*0.30 (25.5) + premium (15) = 83.5
    assert!((cs.market.score - 83.5).abs() < 1e-9, "got {}", cs.market.score);

    // Competitive: baseline 85 minus count (4) minus approved-competitor (15) = 66
    assert!((cs.competitive.score - 66.0).abs() < 1e-9, "got {}", cs.competitive.score);
    assert_eq!(cs.competitive.factor("late_stage_competitors"), Some(-15.0));

    // Feasibility: baseline 40 + safety evidence (20) = 60
    assert!((cs.feasibility.score - 60.0).abs() < 1e-9, "got {}", cs.feasibility.score);
    assert_eq!(cs.feasibility.factor("safety_database_evidence"), Some(20.0));

    // Overall is the documented weighted sum:
    // 74*0.40 + 83.5*0.25 + 66*0.20 + 60*0.15 = 72.675
    let expected = 74.0 * 0.40 + 83.5 * 0.25 + 66.0 * 0.20 + 60.0 * 0.15;
    assert!((cs.overall_score - expected).abs() < 1e-9, "got {}", cs.overall_score);
    assert!((65.0..=80.0).contains(&cs.overall_score));
    assert_eq!(cs.confidence_level, ConfidenceLevel::Moderate);

    // Explainability: approved competitor shows up as a risk with its number.
    assert!(cs
        .risks
        .iter()
        .any(|r| r.message.contains("late-stage competitor") || r.message.contains("-15")));
    assert!(cs.strengths.iter().any(|s| s.message.contains("85")));
}

#[test]
fn fixture_scoring_is_deterministic() {
    let scorer = CompositeScorer::with_defaults();
    let a = scorer
        .score_group(&fixture_group(), Some(&fixture_enrichment()))
        .unwrap();
    let b = scorer
        .score_group(&fixture_group(), Some(&fixture_enrichment()))
        .unwrap();
    assert_eq!(a.overall_score, b.overall_score);
    for (x, y) in a.sub_scores().iter().zip(b.sub_scores().iter()) {
        assert_eq!(x.factors, y.factors);
    }
}
