// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::Value;

use aegis_chat_gateway::presentation::api::{ChatRequestBody, ChatResponseBody};

/// Client for the AEGIS chat gateway.
pub struct ChatGatewayClient {
    base_url: String,
    client: Client,
    bearer_token: String,
}

impl ChatGatewayClient {
    /// Create a new gateway client authenticated as the given user.
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Run one guarded chat request through the pipeline.
    pub async fn send_chat(&self, request: &ChatRequestBody) -> Result<ChatResponseBody> {
        let url = format!("{}/api/ai", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("chat request failed (HTTP {status}): {text}"));
        }

        Ok(response.json().await?)
    }

    /// Screen an arbitrary message list against the prompt guard.
    pub async fn screen_prompt(&self, user_prompt: &str) -> Result<Value> {
        let url = format!("{}/api/prompt", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "messages": [{ "content": user_prompt, "role": "user" }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("prompt screen failed (HTTP {status}): {text}"));
        }

        Ok(response.json().await?)
    }
}
