// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP document source.
//!
//! Talks to the retrieval worker, which either returns the full corpus
//! (query hint ignored) or ranks by similarity when a `top_k` is configured.
//! Both satisfy the same contract; callers must not assume ranking. Each
//! call is read-only against the source corpus.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::config::RetrieverConfig;
use crate::domain::document::{CandidateDocument, DocumentSource, RetrievalError};

#[derive(Debug, Deserialize)]
struct WorkerDocument {
    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    content: String,

    #[serde(default)]
    metadata: serde_json::Value,
}

pub struct HttpDocumentSource {
    http: reqwest::Client,
    endpoint: String,
    folder_id: Option<String>,
    top_k: Option<u32>,
}

impl HttpDocumentSource {
    pub fn new(config: &RetrieverConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            folder_id: config.folder_id.clone(),
            top_k: config.top_k,
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn retrieve(&self, query_hint: &str) -> Result<Vec<CandidateDocument>, RetrievalError> {
        let url = format!("{}/query", self.endpoint);
        let body = serde_json::json!({
            "query": if self.top_k.is_some() { query_hint } else { "" },
            "topK": self.top_k,
            "folderId": self.folder_id,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Source(format!("HTTP {status}: {text}")));
        }

        let raw: Vec<WorkerDocument> = response
            .json()
            .await
            .map_err(|e| RetrievalError::Malformed(e.to_string()))?;

        let documents = raw
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                // The worker stores the source id in the metadata when the
                // store cannot return it as a first-class field.
                let id = doc
                    .id
                    .or_else(|| {
                        doc.metadata
                            .get("id")
                            .and_then(|v| v.as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| index.to_string());
                CandidateDocument {
                    id,
                    content: doc.content,
                    metadata: doc.metadata,
                }
            })
            .collect::<Vec<_>>();

        debug!(count = documents.len(), "retrieved documents");
        Ok(documents)
    }
}
