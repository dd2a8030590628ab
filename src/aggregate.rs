// src/aggregate.rs
//! Evidence aggregation: merge collaborator outputs into per-indication groups.
//!
//! Items with no indication, or the provider sentinel "Unknown Indication",
//! are dropped before grouping and counted in the skip log. Grouping is by a
//! normalized key: lowercase, punctuation collapsed, then an alias/abbreviation
//! table (e.g. "NSCLC" → "non small cell lung cancer"). Matching is exact on
//! the normalized key — near-duplicate strings that are not aliased stay
//! separate groups. That can under-count evidence for some indications; it is
//! a known limitation kept deliberately, because fuzzy merging could silently
//! change rankings.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::evidence::{CollaboratorResult, EvidenceItem};

/// Sentinel some providers emit when they could not resolve an indication.
pub const UNKNOWN_INDICATION: &str = "unknown indication";

/// Evidence for one indication, keyed by the normalized indication string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicationGroup {
    /// Normalized grouping key.
    pub key: String,
    /// First-seen original spelling, kept for display.
    pub display: String,
    /// Evidence in arrival order (display only, never correctness).
    pub items: Vec<EvidenceItem>,
    /// Distinct collaborators that contributed.
    pub sources: BTreeSet<String>,
}

impl IndicationGroup {
    pub fn evidence_count(&self) -> usize {
        self.items.len()
    }

    pub fn mean_relevance(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.items.iter().map(|i| i.relevance).sum::<f64>() / self.items.len() as f64
    }
}

/// Alias/abbreviation table mapping normalized spellings to canonical keys.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicationAliases {
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for IndicationAliases {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl IndicationAliases {
    /// Built-in seed of common abbreviations. Hand-maintained; extended via
    /// the config loader rather than fuzzy matching.
    pub fn default_seed() -> Self {
        let mut aliases = HashMap::new();
        for (a, c) in [
            ("nsclc", "non small cell lung cancer"),
            ("sclc", "small cell lung cancer"),
            ("aml", "acute myeloid leukemia"),
            ("cll", "chronic lymphocytic leukemia"),
            ("t2d", "type 2 diabetes"),
            ("t2dm", "type 2 diabetes"),
            ("type 2 diabetes mellitus", "type 2 diabetes"),
            ("ra", "rheumatoid arthritis"),
            ("ibd", "inflammatory bowel disease"),
            ("copd", "chronic obstructive pulmonary disease"),
            ("ipf", "idiopathic pulmonary fibrosis"),
            ("ms", "multiple sclerosis"),
            ("nash", "nonalcoholic steatohepatitis"),
            ("chf", "heart failure"),
            ("congestive heart failure", "heart failure"),
            ("htn", "hypertension"),
            ("alzheimer disease", "alzheimers disease"),
            ("parkinson disease", "parkinsons disease"),
            ("mdd", "major depressive disorder"),
        ] {
            aliases.insert(a.to_string(), c.to_string());
        }
        Self { aliases }
    }

    /// Canonical key for an indication label, or `None` when the label is
    /// unusable (empty or the unknown sentinel).
    pub fn canonical_key(&self, raw: &str) -> Option<String> {
        let norm = normalize_indication(raw);
        if norm.is_empty() || norm == UNKNOWN_INDICATION {
            return None;
        }
        Some(self.aliases.get(&norm).cloned().unwrap_or(norm))
    }
}

/// Lowercase, drop apostrophes, turn punctuation/dashes into spaces and
/// collapse runs of whitespace.
pub fn normalize_indication(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.trim().chars() {
        match ch {
            '\'' | '\u{2019}' => {} // "Alzheimer's" -> "alzheimers"
            c if c.is_alphanumeric() => out.extend(c.to_lowercase()),
            _ => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Result of one aggregation pass.
#[derive(Debug)]
pub struct AggregateOutcome {
    pub groups: Vec<IndicationGroup>,
    /// Items dropped for a missing/unknown indication.
    pub skipped: usize,
}

pub struct EvidenceAggregator {
    aliases: IndicationAliases,
}

impl EvidenceAggregator {
    pub fn new(aliases: IndicationAliases) -> Self {
        Self { aliases }
    }

    /// Merge all successful collaborator outputs into indication groups.
    /// Order of `results` is irrelevant to group membership: grouping is by
    /// key, and groups come back sorted by key.
    pub fn aggregate(&self, results: &[CollaboratorResult]) -> AggregateOutcome {
        let mut groups: BTreeMap<String, IndicationGroup> = BTreeMap::new();
        let mut skipped = 0usize;

        for result in results {
            for item in &result.items {
                let key = item
                    .indication
                    .as_deref()
                    .and_then(|raw| self.aliases.canonical_key(raw));
                let Some(key) = key else {
                    skipped += 1;
                    tracing::debug!(
                        source = %item.source,
                        summary = %item.summary,
                        "skipping item with unusable indication"
                    );
                    continue;
                };

                let group = groups.entry(key.clone()).or_insert_with(|| IndicationGroup {
                    key,
                    display: item.indication.clone().unwrap_or_default(),
                    items: Vec::new(),
                    sources: BTreeSet::new(),
                });
                group.sources.insert(item.source.clone());
                group.items.push(item.clone());
            }
        }

        counter!("aggregate_items_skipped_total").increment(skipped as u64);
        if skipped > 0 {
            tracing::info!(skipped, "aggregation skip log");
        }

        AggregateOutcome {
            groups: groups.into_values().collect(),
            skipped,
        }
    }
}
