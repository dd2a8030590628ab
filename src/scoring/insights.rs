// src/scoring/insights.rs
//! Qualitative insight derivation. Each rule inspects named factors against a
//! fixed threshold and emits a record citing the concrete number it fired on.
//! At most five insights per kind are kept.

use crate::score::{CompositeScore, Insight, InsightKind};

pub const MAX_PER_KIND: usize = 5;

pub struct Insights {
    pub strengths: Vec<Insight>,
    pub risks: Vec<Insight>,
    pub recommendations: Vec<Insight>,
}

pub fn derive(cs: &CompositeScore) -> Insights {
    let mut strengths = Vec::new();
    let mut risks = Vec::new();
    let mut recommendations = Vec::new();

    let sci = &cs.scientific;
    let market = &cs.market;
    let comp = &cs.competitive;
    let feas = &cs.feasibility;

    // Unmet need comes back out of its factor points.
    let unmet_need = market
        .factor("unmet_need")
        .map(|p| p / super::rules::UNMET_NEED_SCALE);
    let phase_points = sci.factor("trial_phase").unwrap_or(0.0);

    // ---- Strengths ----
    if cs.evidence_count >= 10 {
        strengths.push(Insight::new(
            InsightKind::Strength,
            format!("Broad evidence base: {} items", cs.evidence_count),
            cs.evidence_count as f64,
        ));
    }
    if phase_points >= 20.0 {
        strengths.push(Insight::new(
            InsightKind::Strength,
            format!("Late-stage clinical validation ({phase_points:.0} phase points)"),
            phase_points,
        ));
    }
    if let Some(u) = unmet_need.filter(|&u| u >= 70.0) {
        strengths.push(Insight::new(
            InsightKind::Strength,
            format!("High unmet medical need (score {u:.0}/100)"),
            u,
        ));
    }
    if comp.score >= 70.0 {
        strengths.push(Insight::new(
            InsightKind::Strength,
            format!("Favorable competitive position (landscape score {:.1})", comp.score),
            comp.score,
        ));
    }
    if let Some(m) = sci.factor("mechanistic_support").filter(|&m| m >= 10.0) {
        strengths.push(Insight::new(
            InsightKind::Strength,
            format!("Strong mechanistic support ({m:.0} factor points)"),
            m,
        ));
    }
    if market.factor("market_size").unwrap_or(0.0) >= 28.0 {
        let pts = market.factor("market_size").unwrap_or(0.0);
        strengths.push(Insight::new(
            InsightKind::Strength,
            format!("Large addressable market ({pts:.0} size points)"),
            pts,
        ));
    }

    // ---- Risks ----
    if cs.evidence_count < 5 {
        risks.push(Insight::new(
            InsightKind::Risk,
            format!("Thin evidence base: only {} items", cs.evidence_count),
            cs.evidence_count as f64,
        ));
    }
    if phase_points == 0.0 {
        risks.push(Insight::new(
            InsightKind::Risk,
            "No clinical trial evidence yet (0 phase points)",
            0.0,
        ));
    }
    if let Some(p) = comp.factor("late_stage_competitors") {
        risks.push(Insight::new(
            InsightKind::Risk,
            format!("Approved or late-stage competitor present ({p:.0} points)"),
            p,
        ));
    }
    if let Some(p) = comp.factor("competitor_count").filter(|&p| p <= -15.0) {
        risks.push(Insight::new(
            InsightKind::Risk,
            format!("Crowded competitive field ({p:.0} points)"),
            p,
        ));
    }
    if market.data_completeness < 0.5 {
        risks.push(Insight::new(
            InsightKind::Risk,
            format!(
                "Market dimension relies on estimates (completeness {:.2})",
                market.data_completeness
            ),
            market.data_completeness,
        ));
    }

    // ---- Recommendations ----
    if feas.factor("safety_database_evidence").is_some() && phase_points < 20.0 {
        recommendations.push(Insight::new(
            InsightKind::Recommendation,
            format!(
                "Existing safety-database evidence supports an expedited (505(b)(2)-style) path (+{:.0} feasibility points)",
                super::rules::SAFETY_EVIDENCE_BONUS
            ),
            super::rules::SAFETY_EVIDENCE_BONUS,
        ));
    }
    if let Some(p) = feas.factor("orphan_potential") {
        recommendations.push(Insight::new(
            InsightKind::Recommendation,
            format!("Pursue orphan drug designation (+{p:.0} feasibility points)"),
            p,
        ));
    }
    if let Some(u) = unmet_need.filter(|&u| u >= 80.0) {
        if comp.score >= 60.0 {
            recommendations.push(Insight::new(
                InsightKind::Recommendation,
                format!(
                    "Prioritize: unmet need {u:.0}/100 with landscape score {:.1}",
                    comp.score
                ),
                u,
            ));
        }
    }
    if cs.data_completeness < 0.7 {
        recommendations.push(Insight::new(
            InsightKind::Recommendation,
            format!(
                "Commission deeper market/competitor diligence (overall completeness {:.2})",
                cs.data_completeness
            ),
            cs.data_completeness,
        ));
    }
    if comp.factor("late_stage_competitors").is_some() && feas.score >= 50.0 {
        recommendations.push(Insight::new(
            InsightKind::Recommendation,
            format!(
                "Plan differentiation vs. the approved competitor; feasibility score {:.1} supports a comparative program",
                feas.score
            ),
            feas.score,
        ));
    }

    strengths.truncate(MAX_PER_KIND);
    risks.truncate(MAX_PER_KIND);
    recommendations.truncate(MAX_PER_KIND);

    Insights {
        strengths,
        risks,
        recommendations,
    }
}
