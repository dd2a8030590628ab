// src/refine.rs
//! Second-pass score refinement.
//!
//! Once deeper per-indication data arrives (potency detail, market segment,
//! comparator advantages, side-effect comparison), each dimension takes a
//! small set of named point deltas. The per-dimension sum is clamped to ±20
//! before it is added to the existing sub-score, which is then re-clamped to
//! [0,100]. Refinement appends factors and notes; base contributions are
//! never discarded or recomputed. A refinement failure falls back to the
//! unrefined score upstream.

use anyhow::{bail, Result};

use crate::enrichment::{CompetitiveIntensity, NeedLevel, RefinementData};
use crate::score::{CompositeScore, SubScore};

/// Hard bound on any per-dimension refinement delta.
pub const DELTA_CAP: f64 = 20.0;

#[derive(Debug, Default)]
pub struct ScoreRefiner;

/// Named delta contributions for one dimension.
type Deltas = Vec<(&'static str, f64)>;

impl ScoreRefiner {
    pub fn new() -> Self {
        Self
    }

    /// Refine one composite score with deeper data. Pure; the input score is
    /// left untouched so the caller can fall back to it on error.
    pub fn refine_one(&self, base: &CompositeScore, data: &RefinementData) -> Result<CompositeScore> {
        validate(data)?;

        let mut refined = base.clone();
        apply(&mut refined.scientific, scientific_deltas(data));
        apply(&mut refined.market, market_deltas(data));
        apply(&mut refined.competitive, competitive_deltas(data));
        apply(&mut refined.feasibility, feasibility_deltas(data));
        refined.recompute_overall();
        Ok(refined)
    }
}

/// Refinement inputs come from outer layers; reject non-finite numbers so a
/// bad feed degrades to the unrefined score instead of poisoning the math.
fn validate(data: &RefinementData) -> Result<()> {
    if let Some(sci) = &data.scientific {
        if sci.best_potency_nm.is_some_and(|p| !p.is_finite()) {
            bail!("non-finite potency in refinement data");
        }
    }
    if let Some(seg) = &data.segment {
        if !seg.growth_pct.is_finite() {
            bail!("non-finite segment growth in refinement data");
        }
    }
    if let Some(se) = &data.side_effects {
        if !se.advantage_score.is_finite() {
            bail!("non-finite safety advantage in refinement data");
        }
    }
    Ok(())
}

fn apply(sub: &mut SubScore, deltas: Deltas) {
    if deltas.is_empty() {
        return;
    }
    let raw: f64 = deltas.iter().map(|(_, p)| p).sum();
    let clamped = raw.clamp(-DELTA_CAP, DELTA_CAP);
    for (name, points) in deltas {
        sub.add_factor(format!("refined_{name}"), points);
    }
    sub.note(format!("refinement delta {clamped:+.1} (raw {raw:+.1})"));
    sub.set_score(sub.score + clamped);
}

fn scientific_deltas(data: &RefinementData) -> Deltas {
    let Some(sci) = &data.scientific else { return Vec::new() };
    let mut out = Vec::new();
    if let Some(potency) = sci.best_potency_nm {
        // Lower is more potent.
        let pts = if potency <= 10.0 {
            8.0
        } else if potency <= 100.0 {
            5.0
        } else if potency <= 1000.0 {
            2.0
        } else {
            0.0
        };
        out.push(("binding_affinity", pts));
    }
    if sci.pathway_overlap >= 3 {
        out.push(("pathway_overlap", 6.0));
    } else if sci.pathway_overlap >= 1 {
        out.push(("pathway_overlap", 3.0));
    }
    if sci.biomarker_available {
        out.push(("biomarker_available", 3.0));
    }
    if sci.preclinical_model_available {
        out.push(("preclinical_model", 3.0));
    }
    out
}

fn market_deltas(data: &RefinementData) -> Deltas {
    let Some(seg) = &data.segment else { return Vec::new() };
    let mut out = Vec::new();
    out.push((
        "segment_unmet_need",
        match seg.unmet_need_level {
            NeedLevel::High => 8.0,
            NeedLevel::Moderate => 4.0,
            NeedLevel::Low => -4.0,
        },
    ));
    let growth = if seg.growth_pct >= 10.0 {
        6.0
    } else if seg.growth_pct >= 5.0 {
        3.0
    } else if seg.growth_pct < 0.0 {
        -4.0
    } else {
        0.0
    };
    out.push(("segment_growth", growth));
    out
}

fn competitive_deltas(data: &RefinementData) -> Deltas {
    let mut out = Vec::new();
    if let Some(seg) = &data.segment {
        out.push((
            "segment_competitive_intensity",
            match seg.competitive_intensity {
                CompetitiveIntensity::Low => 8.0,
                CompetitiveIntensity::Moderate => 0.0,
                CompetitiveIntensity::High => -10.0,
            },
        ));
    }
    match data.advantages.len() {
        0 => {}
        1 => out.push(("comparator_advantages", 3.0)),
        _ => out.push(("comparator_advantages", 6.0)),
    }
    out
}

fn feasibility_deltas(data: &RefinementData) -> Deltas {
    let Some(se) = &data.side_effects else { return Vec::new() };
    let pts = if se.advantage_score >= 70.0 {
        10.0
    } else if se.advantage_score >= 50.0 {
        5.0
    } else if se.advantage_score < 30.0 {
        -5.0
    } else {
        0.0
    };
    vec![("safety_advantage", pts)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{IndicationAliases, IndicationGroup};
    use crate::enrichment::{MarketSegment, ScientificDetails, SideEffectComparison};
    use crate::evidence::{EvidenceItem, SourceKind};
    use crate::score::DimensionWeights;
    use crate::scoring::CompositeScorer;
    use std::collections::BTreeSet;

    fn base_score() -> CompositeScore {
        let items: Vec<EvidenceItem> = (0..6)
            .map(|i| {
                EvidenceItem::new("pubmed", SourceKind::Literature, format!("p{i}"))
                    .with_indication("IPF")
                    .with_relevance(0.6)
            })
            .collect();
        let sources: BTreeSet<String> = items.iter().map(|i| i.source.clone()).collect();
        let group = IndicationGroup {
            key: "idiopathic pulmonary fibrosis".into(),
            display: "IPF".into(),
            items,
            sources,
        };
        CompositeScorer::new(DimensionWeights::default(), IndicationAliases::default_seed())
            .unwrap()
            .score_group(&group, None)
            .unwrap()
    }

    fn rich_data() -> RefinementData {
        RefinementData {
            scientific: Some(ScientificDetails {
                best_potency_nm: Some(4.0),
                pathway_overlap: 5,
                biomarker_available: true,
                preclinical_model_available: true,
            }),
            segment: Some(MarketSegment {
                name: "progressive fibrosing ILD".into(),
                unmet_need_level: NeedLevel::High,
                growth_pct: 11.0,
                competitive_intensity: CompetitiveIntensity::Low,
            }),
            advantages: vec![],
            side_effects: Some(SideEffectComparison {
                comparator: "pirfenidone".into(),
                advantage_score: 75.0,
            }),
        }
    }

    #[test]
    fn deltas_are_capped_at_twenty_per_dimension() {
        let base = base_score();
        let refined = ScoreRefiner::new().refine_one(&base, &rich_data()).unwrap();
        for (b, r) in base.sub_scores().iter().zip(refined.sub_scores().iter()) {
            let applied = r.score - b.score;
            assert!(
                applied.abs() <= DELTA_CAP + 1e-9,
                "{:?} moved by {applied}",
                r.dimension
            );
        }
    }

    #[test]
    fn overall_is_reweighted_after_refinement() {
        let base = base_score();
        let refined = ScoreRefiner::new().refine_one(&base, &rich_data()).unwrap();
        let expected: f64 = refined.sub_scores().iter().map(|s| s.score * s.weight).sum();
        assert!((refined.overall_score - expected).abs() < 1e-9);
        assert!(refined.overall_score > base.overall_score);
    }

    #[test]
    fn base_factors_survive_refinement() {
        let base = base_score();
        let refined = ScoreRefiner::new().refine_one(&base, &rich_data()).unwrap();
        for (b, r) in base.sub_scores().iter().zip(refined.sub_scores().iter()) {
            for (name, points) in &b.factors {
                assert_eq!(r.factors.get(name), Some(points), "base factor {name} changed");
            }
        }
        assert!(refined
            .scientific
            .factors
            .keys()
            .any(|k| k.starts_with("refined_")));
    }

    #[test]
    fn empty_refinement_data_is_a_no_op_on_scores() {
        let base = base_score();
        let refined = ScoreRefiner::new()
            .refine_one(&base, &RefinementData::default())
            .unwrap();
        assert_eq!(refined.overall_score, base.overall_score);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let base = base_score();
        let mut data = rich_data();
        data.side_effects.as_mut().unwrap().advantage_score = f64::NAN;
        assert!(ScoreRefiner::new().refine_one(&base, &data).is_err());
    }

    #[test]
    fn adversarial_sums_still_respect_the_cap() {
        // Max out every delta source at once.
        let mut data = rich_data();
        data.advantages = (0..10)
            .map(|i| crate::enrichment::ComparativeAdvantage {
                comparator: format!("drug-{i}"),
                description: "better".into(),
            })
            .collect();
        let base = base_score();
        let refined = ScoreRefiner::new().refine_one(&base, &data).unwrap();
        for (b, r) in base.sub_scores().iter().zip(refined.sub_scores().iter()) {
            assert!((r.score - b.score).abs() <= DELTA_CAP + 1e-9);
        }
    }
}
