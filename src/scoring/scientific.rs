// src/scoring/scientific.rs
//! Scientific Evidence dimension: how much, how independent, how mature and
//! how mechanistically supported the evidence for the indication is.

use crate::aggregate::IndicationGroup;
use crate::score::{Dimension, SubScore};
use crate::scoring::rules;

pub fn score(group: &IndicationGroup, weight: f64) -> SubScore {
    let mut sub = SubScore::new(Dimension::ScientificEvidence, weight);
    let mut total = 0.0;

    total += sub.add_factor(
        "evidence_count",
        rules::bracket_points(group.evidence_count() as f64, rules::EVIDENCE_COUNT),
    );
    total += sub.add_factor(
        "unique_sources",
        rules::bracket_points(group.sources.len() as f64, rules::UNIQUE_SOURCES),
    );

    let best_phase = group.items.iter().filter_map(|i| i.trial_phase()).max();
    total += sub.add_factor("trial_phase", rules::phase_points(best_phase));

    let mean_relevance = group.mean_relevance();
    total += sub.add_factor("mean_relevance", mean_relevance * rules::MEAN_RELEVANCE_SCALE);

    let mechanistic = group.items.iter().filter(|i| i.kind.is_mechanistic()).count();
    total += sub.add_factor(
        "mechanistic_support",
        rules::bracket_points(mechanistic as f64, rules::MECHANISTIC_SUPPORT),
    );

    sub.set_score(total);

    // Counts, sources and relevance come straight from evidence; phase and
    // mechanism coverage may simply be absent from the record set.
    let mut completeness = 0.6;
    if best_phase.is_some() {
        completeness += 0.2;
    } else {
        sub.note("no clinical trial phase information in evidence");
    }
    if mechanistic > 0 {
        completeness += 0.2;
    } else {
        sub.note("no mechanistic (bioactivity/target/pathway) evidence");
    }
    sub.data_completeness = completeness;

    sub
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{EvidenceItem, SourceKind};
    use std::collections::BTreeSet;

    fn group(items: Vec<EvidenceItem>) -> IndicationGroup {
        let sources: BTreeSet<String> = items.iter().map(|i| i.source.clone()).collect();
        IndicationGroup {
            key: "test".into(),
            display: "Test".into(),
            items,
            sources,
        }
    }

    fn item(source: &str, kind: SourceKind, relevance: f64) -> EvidenceItem {
        EvidenceItem::new(source, kind, "s").with_relevance(relevance)
    }

    #[test]
    fn strong_group_lands_in_upper_band() {
        let mut items: Vec<EvidenceItem> = (0..12)
            .map(|i| {
                item(
                    ["pubmed", "trials", "chembl", "opentargets"][i % 4],
                    if i % 4 >= 2 { SourceKind::Bioactivity } else { SourceKind::Literature },
                    0.8,
                )
            })
            .collect();
        items[0] = item("trials", SourceKind::ClinicalTrials, 0.8)
            .with_meta("phase", serde_json::json!("Phase 3"));

        let sub = score(&group(items), 0.4);
        // 12 items -> 20, 4 sources -> 16, phase 3 -> 20, 0.8*15 = 12, 6 mech -> 10
        assert!((sub.score - 78.0).abs() < 1e-9, "got {}", sub.score);
        assert_eq!(sub.factor("trial_phase"), Some(20.0));
        assert!(sub.data_completeness >= 0.99);
    }

    #[test]
    fn sparse_group_scores_low_with_notes() {
        let sub = score(&group(vec![item("pubmed", SourceKind::Literature, 0.4)]), 0.4);
        // 1 item -> 5, 1 source -> 4, no phase, 0.4*15 = 6, no mech
        assert!((sub.score - 15.0).abs() < 1e-9, "got {}", sub.score);
        assert_eq!(sub.notes.len(), 2);
        assert!((sub.data_completeness - 0.6).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_idempotent() {
        let g = group(vec![
            item("pubmed", SourceKind::Literature, 0.7),
            item("chembl", SourceKind::Bioactivity, 0.9),
        ]);
        let a = score(&g, 0.4);
        let b = score(&g, 0.4);
        assert_eq!(a.score, b.score);
        assert_eq!(a.factors, b.factors);
    }
}
