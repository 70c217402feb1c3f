// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Prompt-injection screening adapter.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::guard::{GuardError, PromptScreen, PromptVerdict, RawVerdict};
use crate::infrastructure::http::{ServiceClient, ServiceClientError, TokenKind};

const SERVICE: &str = "prompt-guard";
const API_VERSION: &str = "v1beta";

pub struct PromptGuardClient {
    client: Arc<ServiceClient>,
}

impl PromptGuardClient {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self { client }
    }

    fn endpoint() -> String {
        format!("{API_VERSION}/guard")
    }
}

fn map_client_error(e: ServiceClientError) -> GuardError {
    match e {
        ServiceClientError::Network(msg) => GuardError::Network(msg),
        ServiceClientError::Malformed(msg) => GuardError::Malformed(msg),
    }
}

#[async_trait]
impl PromptScreen for PromptGuardClient {
    async fn screen(&self, prompt: &str) -> Result<PromptVerdict, GuardError> {
        let body = json!({
            "messages": [{ "content": prompt, "role": "user" }],
        });

        let envelope = self
            .client
            .post(SERVICE, &Self::endpoint(), &body, TokenKind::Service)
            .await
            .map_err(map_client_error)?;

        if !envelope.is_success() {
            return Err(GuardError::Service(envelope.failure_summary()));
        }

        let detected = envelope
            .result
            .get("detected")
            .and_then(|v| v.as_bool())
            .ok_or_else(|| GuardError::Malformed("missing detected flag".into()))?;

        let audit = serde_json::to_value(&envelope)
            .map_err(|e| GuardError::Malformed(e.to_string()))?;

        Ok(PromptVerdict { detected, audit })
    }

    async fn screen_raw(&self, body: &Value) -> Result<RawVerdict, GuardError> {
        let envelope = self
            .client
            .post(SERVICE, &Self::endpoint(), body, TokenKind::Service)
            .await
            .map_err(map_client_error)?;

        let success = envelope.is_success();
        let body = serde_json::to_value(&envelope)
            .map_err(|e| GuardError::Malformed(e.to_string()))?;
        Ok(RawVerdict { success, body })
    }
}
