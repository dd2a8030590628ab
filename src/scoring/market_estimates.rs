// src/scoring/market_estimates.rs
//! Curated market estimates used when no explicit market data is supplied,
//! so the market dimension is never zero-starved by a missing feed.
//!
//! Lookup order mirrors the indication alias handling: normalize, resolve
//! aliases, exact table hit, then a category-keyword fallback, then a
//! conservative default. Every estimate is tagged `estimated: true` so the
//! completeness accounting stays honest.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::aggregate::{normalize_indication, IndicationAliases};
use crate::enrichment::{MarketData, PricingPotential};

/// (size USD billions, CAGR %, unmet need 0-100, pricing)
type Row = (f64, f64, f64, PricingPotential);

static ESTIMATES: Lazy<HashMap<&'static str, Row>> = Lazy::new(|| {
    use PricingPotential::*;
    HashMap::from([
        ("non small cell lung cancer", (28.0, 9.5, 80.0, Premium)),
        ("small cell lung cancer", (4.5, 8.0, 85.0, Premium)),
        ("acute myeloid leukemia", (3.5, 9.0, 85.0, Premium)),
        ("chronic lymphocytic leukemia", (6.0, 7.5, 70.0, Premium)),
        ("breast cancer", (32.0, 8.5, 70.0, Premium)),
        ("pancreatic cancer", (3.0, 10.0, 95.0, Premium)),
        ("glioblastoma", (1.5, 8.5, 95.0, Premium)),
        ("type 2 diabetes", (60.0, 6.0, 55.0, Standard)),
        ("rheumatoid arthritis", (25.0, 4.5, 55.0, Standard)),
        ("inflammatory bowel disease", (18.0, 5.5, 65.0, Premium)),
        ("chronic obstructive pulmonary disease", (15.0, 4.5, 65.0, Standard)),
        ("idiopathic pulmonary fibrosis", (3.5, 9.0, 90.0, Premium)),
        ("multiple sclerosis", (24.0, 4.0, 60.0, Premium)),
        ("nonalcoholic steatohepatitis", (2.5, 25.0, 90.0, Premium)),
        ("heart failure", (14.0, 6.5, 70.0, Standard)),
        ("hypertension", (24.0, 3.0, 35.0, GenericPressure)),
        ("alzheimers disease", (8.0, 16.0, 95.0, Premium)),
        ("parkinsons disease", (5.5, 8.5, 85.0, Premium)),
        ("major depressive disorder", (13.0, 4.0, 60.0, Standard)),
        ("pulmonary fibrosis", (3.0, 8.5, 88.0, Premium)),
    ])
});

/// Keyword fallbacks applied in order against the normalized key.
const CATEGORY_FALLBACKS: &[(&[&str], Row)] = &[
    (
        &["cancer", "carcinoma", "leukemia", "lymphoma", "melanoma", "sarcoma", "tumor"],
        (8.0, 8.0, 75.0, PricingPotential::Premium),
    ),
    (&["diabetes", "diabetic"], (20.0, 5.5, 55.0, PricingPotential::Standard)),
    (&["fibrosis", "sclerosis"], (3.0, 7.5, 80.0, PricingPotential::Premium)),
    (&["syndrome", "rare", "orphan"], (0.8, 7.0, 85.0, PricingPotential::Premium)),
    (&["infection", "viral", "bacterial"], (5.0, 5.0, 60.0, PricingPotential::GenericPressure)),
];

/// Conservative default when nothing else matches.
const DEFAULT_ROW: Row = (1.0, 4.0, 50.0, PricingPotential::Standard);

/// Estimate market data for an indication. Never fails; always `estimated`.
pub fn estimate_for(indication: &str, aliases: &IndicationAliases) -> MarketData {
    let key = aliases
        .canonical_key(indication)
        .unwrap_or_else(|| normalize_indication(indication));

    let row = ESTIMATES
        .get(key.as_str())
        .copied()
        .or_else(|| {
            CATEGORY_FALLBACKS
                .iter()
                .find(|(words, _)| words.iter().any(|w| key.contains(w)))
                .map(|(_, row)| *row)
        })
        .unwrap_or(DEFAULT_ROW);

    let (size_usd_b, cagr_pct, unmet_need, pricing) = row;
    MarketData {
        size_usd_b,
        cagr_pct,
        unmet_need,
        pricing,
        estimated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> IndicationAliases {
        IndicationAliases::default_seed()
    }

    #[test]
    fn exact_table_hit_via_alias() {
        let m = estimate_for("NSCLC", &aliases());
        assert_eq!(m.size_usd_b, 28.0);
        assert!(m.estimated);
    }

    #[test]
    fn category_keyword_fallback() {
        let m = estimate_for("gastric cancer", &aliases());
        assert_eq!(m.size_usd_b, 8.0);
        assert_eq!(m.pricing, PricingPotential::Premium);
    }

    #[test]
    fn unmatched_indication_gets_conservative_default() {
        let m = estimate_for("restless leg", &aliases());
        assert_eq!(m.size_usd_b, 1.0);
        assert_eq!(m.unmet_need, 50.0);
    }
}
