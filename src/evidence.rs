// src/evidence.rs
//! Core evidence model and the collaborator contract.
//!
//! Every external data source sits behind [`Collaborator`]: `fetch` pulls the
//! provider's raw payload, `process` turns it into [`EvidenceItem`]s. The rest
//! of the pipeline only ever sees the concrete types defined here — raw JSON
//! never leaks past `process`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::CollaboratorError;

/// Raw provider payload, opaque until `process` runs.
pub type RawEvidence = serde_json::Value;

/// Coarse classification of what a source contributes to scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Trial registries (phases, enrollment, status).
    ClinicalTrials,
    /// Assay/potency databases (IC50, EC50, Ki, Kd).
    Bioactivity,
    /// Target and pathway association databases.
    TargetPathway,
    /// Publication abstracts and citations.
    Literature,
    /// Official adverse-event / safety databases.
    SafetyReports,
    /// Approved product labels.
    DrugLabels,
    /// Patent filings and expirations.
    Patents,
    /// Market research feeds.
    Market,
    Other,
}

impl SourceKind {
    /// Sources that count as mechanistic support for the scientific dimension.
    pub fn is_mechanistic(self) -> bool {
        matches!(self, SourceKind::Bioactivity | SourceKind::TargetPathway)
    }
}

/// Highest clinical development stage seen in evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    Early,
    Phase1,
    Phase2,
    Phase3,
    Phase4,
}

impl TrialPhase {
    /// Parse registry-style phase labels ("Phase 3", "PHASE3", "3", "IV").
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim().to_ascii_lowercase();
        let tail = s.strip_prefix("phase").map(str::trim_start).unwrap_or(&s);
        match tail {
            "4" | "iv" => Some(TrialPhase::Phase4),
            "3" | "iii" => Some(TrialPhase::Phase3),
            "2" | "ii" | "2/3" | "ii/iii" => Some(TrialPhase::Phase2),
            "1" | "i" | "1/2" | "i/ii" => Some(TrialPhase::Phase1),
            "0" | "early" | "early phase 1" | "preclinical" => Some(TrialPhase::Early),
            _ => None,
        }
    }
}

/// One record of evidence produced by a collaborator. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Collaborator that produced the item (e.g. "clinicaltrials", "chembl").
    pub source: String,
    /// What the source contributes to scoring.
    pub kind: SourceKind,
    /// Indication the evidence pertains to, when the source states one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indication: Option<String>,
    /// Short human-readable summary or title.
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Source-assigned relevance in [0,1].
    pub relevance: f64,
    /// Open bag of source-specific fields (e.g. "phase", "ic50_nm").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EvidenceItem {
    pub fn new(source: impl Into<String>, kind: SourceKind, summary: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            indication: None,
            summary: summary.into(),
            date: None,
            relevance: 0.0,
            metadata: BTreeMap::new(),
            url: None,
        }
    }

    pub fn with_indication(mut self, indication: impl Into<String>) -> Self {
        self.indication = Some(indication.into());
        self
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = relevance.clamp(0.0, 1.0);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Trial phase declared in metadata, if any. This is the one place the
    /// metadata bag is interpreted for scoring.
    pub fn trial_phase(&self) -> Option<TrialPhase> {
        match self.metadata.get("phase")? {
            serde_json::Value::String(s) => TrialPhase::parse(s),
            serde_json::Value::Number(n) => {
                TrialPhase::parse(&n.to_string())
            }
            _ => None,
        }
    }
}

/// Terminal state of one collaborator invocation. Results only exist once an
/// invocation has settled, so there is no in-flight state to represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorStatus {
    Success,
    Error,
    Timeout,
}

/// Outcome of one collaborator after fetch + process, including failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorResult {
    pub collaborator: String,
    pub status: CollaboratorStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<EvidenceItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time the invocation took, including retries.
    pub elapsed_ms: u64,
}

impl CollaboratorResult {
    pub fn success(collaborator: impl Into<String>, items: Vec<EvidenceItem>, elapsed: Duration) -> Self {
        Self {
            collaborator: collaborator.into(),
            status: CollaboratorStatus::Success,
            items,
            error: None,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn failure(collaborator: impl Into<String>, err: &CollaboratorError, elapsed: Duration) -> Self {
        Self {
            collaborator: collaborator.into(),
            status: CollaboratorStatus::Error,
            items: Vec::new(),
            error: Some(err.to_string()),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn timeout(collaborator: impl Into<String>, budget: Duration) -> Self {
        Self {
            collaborator: collaborator.into(),
            status: CollaboratorStatus::Timeout,
            items: Vec::new(),
            error: Some(format!("timed out after {}ms", budget.as_millis())),
            elapsed_ms: budget.as_millis() as u64,
        }
    }
}

/// Shared query context handed to every collaborator in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    /// Compound under assessment (canonical name).
    pub compound: String,
    /// Known synonyms / identifiers collaborators may need.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    /// Soft cap on items per collaborator.
    pub max_results: usize,
}

impl QueryContext {
    pub fn new(compound: impl Into<String>) -> Self {
        Self {
            compound: compound.into(),
            synonyms: Vec::new(),
            max_results: 50,
        }
    }
}

/// Contract every evidence source implements. Network and parsing details stay
/// behind this boundary; the pipeline only consumes `EvidenceItem`s.
#[async_trait::async_trait]
pub trait Collaborator: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> SourceKind;

    /// Requests per second this source tolerates. Drives the rate limiter.
    fn rate_per_sec(&self) -> f64 {
        2.0
    }

    /// Pull the provider's raw payload for the query.
    async fn fetch(&self, query: &QueryContext) -> Result<RawEvidence, CollaboratorError>;

    /// Turn a raw payload into evidence records. Pure; no I/O.
    fn process(&self, raw: RawEvidence, query: &QueryContext) -> Result<Vec<EvidenceItem>, CollaboratorError>;
}
