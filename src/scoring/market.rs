// src/scoring/market.rs
//! Market Opportunity dimension: size, growth, unmet need and pricing
//! headroom. Missing market data degrades to the curated estimate table
//! rather than a zero score.

use crate::aggregate::{IndicationAliases, IndicationGroup};
use crate::enrichment::{MarketData, PricingPotential};
use crate::score::{Dimension, SubScore};
use crate::scoring::{market_estimates, rules};

pub fn score(
    group: &IndicationGroup,
    market: Option<&MarketData>,
    aliases: &IndicationAliases,
    weight: f64,
) -> SubScore {
    let mut sub = SubScore::new(Dimension::MarketOpportunity, weight);

    let estimated;
    let data = match market {
        Some(m) => {
            estimated = m.estimated;
            m.clone()
        }
        None => {
            estimated = true;
            market_estimates::estimate_for(&group.display, aliases)
        }
    };

    let mut total = 0.0;
    total += sub.add_factor(
        "market_size",
        rules::bracket_points(data.size_usd_b, rules::MARKET_SIZE_USD_B),
    );
    total += sub.add_factor("cagr", rules::bracket_points(data.cagr_pct, rules::MARKET_CAGR_PCT));
    total += sub.add_factor(
        "unmet_need",
        data.unmet_need.clamp(0.0, 100.0) * rules::UNMET_NEED_SCALE,
    );
    total += sub.add_factor("pricing_potential", pricing_points(data.pricing));

    sub.set_score(total);
    sub.data_completeness = if estimated { 0.4 } else { 1.0 };
    if estimated {
        sub.note(format!(
            "market figures estimated (size ${:.1}B, CAGR {:.1}%)",
            data.size_usd_b, data.cagr_pct
        ));
    }

    sub
}

fn pricing_points(p: PricingPotential) -> f64 {
    match p {
        PricingPotential::Premium => 15.0,
        PricingPotential::Standard => 10.0,
        PricingPotential::GenericPressure => 5.0,
    }
}
