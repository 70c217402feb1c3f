// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Candidate documents and the document-source port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Maximum characters of document content carried in a transport summary.
const SUMMARY_CONTENT_CHARS: usize = 240;

/// One retrievable unit of content, eligible as generation context before
/// authorization filtering. Scoped to a single orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A candidate document trimmed for transport back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl From<&CandidateDocument> for DocumentSummary {
    fn from(doc: &CandidateDocument) -> Self {
        let mut content: String = doc.content.chars().take(SUMMARY_CONTENT_CHARS).collect();
        if content.len() < doc.content.len() {
            content.push('…');
        }
        Self {
            id: doc.id.clone(),
            content,
            metadata: doc.metadata.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retriever unreachable: {0}")]
    Network(String),

    #[error("retrieval source error: {0}")]
    Source(String),

    #[error("malformed retriever response: {0}")]
    Malformed(String),
}

/// Port for the document retriever collaborator.
///
/// The query hint may be ignored (full-corpus retrieval) or used for
/// similarity ranking; callers must not assume ranking. Each call must be
/// idempotent with respect to the source corpus.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn retrieve(&self, query_hint: &str) -> Result<Vec<CandidateDocument>, RetrievalError>;
}
