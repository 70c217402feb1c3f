// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Sensitive-content redaction adapter.
//!
//! The same service endpoint serves both directions; the recipe decides
//! which ruleset applies. The pipeline holds one instance per direction.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::guard::{GuardError, RedactionVerdict, TextGuard};
use crate::infrastructure::http::{ServiceClient, ServiceClientError, TokenKind};

const SERVICE: &str = "ai-guard";
const ENDPOINT: &str = "v1/text/guard";

/// Redaction ruleset for user input.
pub const INPUT_RECIPE: &str = "user_input_guard";

/// Redaction ruleset for model output.
pub const OUTPUT_RECIPE: &str = "llm_response_guard";

pub struct TextGuardClient {
    client: Arc<ServiceClient>,
    recipe: &'static str,
}

impl TextGuardClient {
    pub fn for_input(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            recipe: INPUT_RECIPE,
        }
    }

    pub fn for_output(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            recipe: OUTPUT_RECIPE,
        }
    }
}

#[async_trait]
impl TextGuard for TextGuardClient {
    async fn redact(&self, text: &str) -> Result<RedactionVerdict, GuardError> {
        let body = json!({
            "recipe": self.recipe,
            "text": text,
        });

        let envelope = self
            .client
            .post(SERVICE, ENDPOINT, &body, TokenKind::Service)
            .await
            .map_err(|e| match e {
                ServiceClientError::Network(msg) => GuardError::Network(msg),
                ServiceClientError::Malformed(msg) => GuardError::Malformed(msg),
            })?;

        if !envelope.is_success() {
            return Err(GuardError::Service(envelope.failure_summary()));
        }

        // An absent redacted text means nothing was rewritten.
        let redacted_text = envelope
            .result
            .get("redacted_prompt")
            .and_then(|v| v.as_str())
            .unwrap_or(text)
            .to_string();
        let findings = envelope
            .result
            .get("findings")
            .cloned()
            .unwrap_or(Value::Null);
        let audit = serde_json::to_value(&envelope)
            .map_err(|e| GuardError::Malformed(e.to_string()))?;

        Ok(RedactionVerdict {
            findings,
            redacted_text,
            audit,
        })
    }
}
