// src/scoring/rules.rs
//! Table-driven factor rules.
//!
//! Every "+= N if condition" contribution in the scorer is expressed as an
//! entry in one of these tables so the rule sets are enumerable and testable
//! on their own. A bracket table is scanned top-down; the first row whose
//! threshold the value meets wins, otherwise the contribution is 0.

use crate::evidence::TrialPhase;

/// One bracket row: `value >= min` yields `points`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub min: f64,
    pub points: f64,
}

pub const fn b(min: f64, points: f64) -> Bracket {
    Bracket { min, points }
}

/// First matching bracket's points; 0 when nothing matches.
pub fn bracket_points(value: f64, table: &[Bracket]) -> f64 {
    table.iter().find(|r| value >= r.min).map(|r| r.points).unwrap_or(0.0)
}

// ---- Scientific Evidence (weight 0.40, factors cap at 100) ----

/// Total evidence items for the indication.
pub const EVIDENCE_COUNT: &[Bracket] = &[b(20.0, 25.0), b(10.0, 20.0), b(5.0, 15.0), b(2.0, 10.0), b(1.0, 5.0)];

/// Distinct collaborators contributing evidence.
pub const UNIQUE_SOURCES: &[Bracket] = &[b(5.0, 20.0), b(4.0, 16.0), b(3.0, 12.0), b(2.0, 8.0), b(1.0, 4.0)];

/// Items from mechanistic sources (bioactivity / target / pathway).
pub const MECHANISTIC_SUPPORT: &[Bracket] = &[b(10.0, 15.0), b(5.0, 10.0), b(2.0, 6.0), b(1.0, 3.0)];

/// Points for the mean relevance factor: `mean_relevance * 15`.
pub const MEAN_RELEVANCE_SCALE: f64 = 15.0;

/// Fixed points for the highest trial phase reached.
pub fn phase_points(phase: Option<TrialPhase>) -> f64 {
    match phase {
        Some(TrialPhase::Phase4) => 25.0,
        Some(TrialPhase::Phase3) => 20.0,
        Some(TrialPhase::Phase2) => 12.0,
        Some(TrialPhase::Phase1) => 6.0,
        Some(TrialPhase::Early) => 3.0,
        None => 0.0,
    }
}

// ---- Market Opportunity (weight 0.25) ----

/// Market size in USD billions: mega / large / medium / small / niche.
pub const MARKET_SIZE_USD_B: &[Bracket] = &[b(50.0, 35.0), b(10.0, 28.0), b(1.0, 20.0), b(0.1, 12.0), b(0.0, 6.0)];

/// Compound annual growth rate, percent.
pub const MARKET_CAGR_PCT: &[Bracket] = &[b(12.0, 20.0), b(8.0, 15.0), b(4.0, 10.0), b(0.01, 5.0)];

/// Unmet-need score contributes `unmet_need * 0.30`.
pub const UNMET_NEED_SCALE: f64 = 0.30;

// ---- Competitive Landscape (weight 0.20; deductions from a baseline) ----

pub const COMPETITIVE_BASELINE: f64 = 85.0;

/// Deduction (positive points, applied as minus) by competitor count.
pub const COMPETITOR_COUNT_DEDUCTION: &[Bracket] =
    &[b(20.0, 30.0), b(10.0, 22.0), b(5.0, 15.0), b(2.0, 8.0), b(1.0, 4.0)];

pub const LATE_STAGE_COMPETITOR_DEDUCTION: f64 = 15.0;
pub const LARGE_INCUMBENT_DEDUCTION: f64 = 10.0;

/// Without competitor data, a smaller deduction inferred from trial volume.
pub const INFERRED_TRIAL_DEDUCTION: &[Bracket] =
    &[b(15.0, 20.0), b(8.0, 14.0), b(3.0, 8.0), b(1.0, 4.0)];

// ---- Development Feasibility (weight 0.15) ----

pub const FEASIBILITY_BASELINE: f64 = 40.0;
pub const SAFETY_EVIDENCE_BONUS: f64 = 20.0;
pub const APPROVED_LABEL_BONUS: f64 = 20.0;
pub const PATENT_EXPIRY_BONUS: f64 = 10.0;
pub const ORPHAN_POTENTIAL_BONUS: f64 = 10.0;
