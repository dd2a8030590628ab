// src/scoring/competition.rs
//! Competitive Landscape dimension. Starts from a high baseline and deducts
//! for how crowded the indication is; a higher score means less competition.
//! Without competitor data the deduction is inferred, more gently, from the
//! volume of clinical-trial evidence in the group.

use crate::aggregate::IndicationGroup;
use crate::enrichment::CompetitorData;
use crate::evidence::SourceKind;
use crate::score::{Dimension, SubScore};
use crate::scoring::rules;

pub fn score(group: &IndicationGroup, competitors: Option<&CompetitorData>, weight: f64) -> SubScore {
    let mut sub = SubScore::new(Dimension::CompetitiveLandscape, weight);
    let mut total = sub.add_factor("baseline", rules::COMPETITIVE_BASELINE);

    match competitors {
        Some(data) => {
            total += sub.add_factor(
                "competitor_count",
                -rules::bracket_points(data.count() as f64, rules::COMPETITOR_COUNT_DEDUCTION),
            );
            if data.late_stage_or_approved {
                total += sub.add_factor(
                    "late_stage_competitors",
                    -rules::LATE_STAGE_COMPETITOR_DEDUCTION,
                );
            }
            if data.large_incumbents {
                total += sub.add_factor("large_incumbents", -rules::LARGE_INCUMBENT_DEDUCTION);
            }
            sub.competitors = Some(data.names.clone());
            sub.data_completeness = 0.9;
        }
        None => {
            let trial_items = group
                .items
                .iter()
                .filter(|i| i.kind == SourceKind::ClinicalTrials)
                .count();
            total += sub.add_factor(
                "inferred_competition",
                -rules::bracket_points(trial_items as f64, rules::INFERRED_TRIAL_DEDUCTION),
            );
            sub.note(format!(
                "no competitor data; competition inferred from {trial_items} trial records"
            ));
            sub.data_completeness = 0.35;
        }
    }

    sub.set_score(total);
    sub
}
