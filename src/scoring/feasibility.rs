// src/scoring/feasibility.rs
//! Development Feasibility dimension: how much existing safety, regulatory
//! and patent groundwork shortens the development path. Existing official
//! safety-database and approved-label evidence both suggest a 505(b)(2)-style
//! route; expired/expiring patents and orphan potential add incentives.

use crate::aggregate::IndicationGroup;
use crate::enrichment::PatentData;
use crate::evidence::SourceKind;
use crate::score::{Dimension, SubScore};
use crate::scoring::rules;

pub fn score(group: &IndicationGroup, patent: Option<&PatentData>, weight: f64) -> SubScore {
    let mut sub = SubScore::new(Dimension::DevelopmentFeasibility, weight);
    let mut total = sub.add_factor("baseline", rules::FEASIBILITY_BASELINE);

    let safety_items = group
        .items
        .iter()
        .filter(|i| i.kind == SourceKind::SafetyReports)
        .count();
    if safety_items > 0 {
        total += sub.add_factor("safety_database_evidence", rules::SAFETY_EVIDENCE_BONUS);
        sub.note(format!("{safety_items} official safety-database records"));
    }

    let label_items = group
        .items
        .iter()
        .filter(|i| i.kind == SourceKind::DrugLabels)
        .count();
    if label_items > 0 {
        total += sub.add_factor("approved_label_evidence", rules::APPROVED_LABEL_BONUS);
        sub.note(format!("{label_items} approved-label records (faster regulatory path)"));
    }

    match patent {
        Some(p) => {
            if p.expired_or_expiring {
                total += sub.add_factor("patent_expiry", rules::PATENT_EXPIRY_BONUS);
            }
            if p.orphan_potential {
                total += sub.add_factor("orphan_potential", rules::ORPHAN_POTENTIAL_BONUS);
            }
            sub.data_completeness = 1.0;
        }
        None => {
            sub.note("no patent data; patent factors defaulted to zero");
            sub.data_completeness = 0.6;
        }
    }

    sub.set_score(total);
    sub
}
