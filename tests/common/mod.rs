// tests/common/mod.rs
// Shared fake collaborators for pipeline-level tests.

use std::time::Duration;

use repurpose_ranker::{
    Collaborator, CollaboratorError, EvidenceItem, QueryContext, RawEvidence, SourceKind,
};

/// A scripted collaborator that serves canned items, fails, or hangs.
pub struct Scripted {
    pub name: &'static str,
    pub kind: SourceKind,
    pub items: Vec<EvidenceItem>,
    pub fail: bool,
    pub hang: bool,
}

impl Scripted {
    pub fn serving(name: &'static str, kind: SourceKind, items: Vec<EvidenceItem>) -> Self {
        Self {
            name,
            kind,
            items,
            fail: false,
            hang: false,
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            kind: SourceKind::Other,
            items: Vec::new(),
            fail: true,
            hang: false,
        }
    }

    pub fn hanging(name: &'static str) -> Self {
        Self {
            name,
            kind: SourceKind::Other,
            items: Vec::new(),
            fail: false,
            hang: true,
        }
    }
}

#[async_trait::async_trait]
impl Collaborator for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn rate_per_sec(&self) -> f64 {
        1000.0 // effectively unthrottled in tests
    }

    async fn fetch(&self, _query: &QueryContext) -> Result<RawEvidence, CollaboratorError> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail {
            return Err(CollaboratorError::Server { status: 502 });
        }
        Ok(serde_json::to_value(&self.items).expect("serializable items"))
    }

    fn process(&self, raw: RawEvidence, _query: &QueryContext) -> Result<Vec<EvidenceItem>, CollaboratorError> {
        serde_json::from_value(raw).map_err(|e| CollaboratorError::Parse(e.to_string()))
    }
}

pub fn item(source: &str, kind: SourceKind, indication: &str, relevance: f64) -> EvidenceItem {
    EvidenceItem::new(source, kind, format!("{indication} evidence from {source}"))
        .with_indication(indication)
        .with_relevance(relevance)
}
