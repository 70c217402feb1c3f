// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Shared HTTP client for the guard platform.
//!
//! All platform services (identity, guards, authorization) answer on
//! `https://{service}.{domain}/{endpoint}` with a common response envelope.
//! Long-running operations answer `202 Accepted` with a correlation id; the
//! bounded completion helper polls `GET /request/{id}` up to
//! [`MAX_POLL_ATTEMPTS`] times with `attempt² × 1s` backoff and then
//! surfaces whatever status was last observed. Nothing retries beyond that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::config::PlatformConfig;

/// Upper bound on async-completion polls; with the quadratic backoff the
/// total wait is 1 + 4 + 9 seconds.
pub const MAX_POLL_ATTEMPTS: u32 = 3;

/// Which credential a call is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Server-side service token.
    Service,
    /// Client-facing token (token verification).
    Client,
}

/// Common platform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEnvelope {
    pub status: String,

    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub request_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub response_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub result: Value,
}

impl ServiceEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == "Success"
    }

    /// Human-readable reason for a non-success envelope.
    pub fn failure_summary(&self) -> String {
        self.summary.clone().unwrap_or_else(|| self.status.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceClientError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("malformed service response: {0}")]
    Malformed(String),
}

pub struct ServiceClient {
    http: reqwest::Client,
    domain: String,
    service_token: String,
    client_token: String,
    base_url_override: Option<String>,
}

impl ServiceClient {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            domain: config.domain.clone(),
            service_token: config.service_token.clone(),
            client_token: config.client_token.clone(),
            base_url_override: config.base_url_override.clone(),
        }
    }

    fn bearer(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Service => &self.service_token,
            TokenKind::Client => &self.client_token,
        }
    }

    fn service_url(&self, service: &str, endpoint: &str) -> String {
        match &self.base_url_override {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), endpoint),
            None => format!("https://{}.{}/{}", service, self.domain, endpoint),
        }
    }

    fn request_url(&self, request_id: &str) -> String {
        match &self.base_url_override {
            Some(base) => format!("{}/request/{}", base.trim_end_matches('/'), request_id),
            None => format!("https://{}/request/{}", self.domain, request_id),
        }
    }

    /// POST a JSON body to a platform service and return the parsed
    /// envelope, transparently waiting on async `202` completions.
    pub async fn post(
        &self,
        service: &str,
        endpoint: &str,
        body: &Value,
        kind: TokenKind,
    ) -> Result<ServiceEnvelope, ServiceClientError> {
        let url = self.service_url(service, endpoint);
        debug!(%url, "platform call");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.bearer(kind))
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceClientError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::ACCEPTED {
            let accepted = Self::parse_envelope(response).await?;
            return self.await_completion(accepted, kind).await;
        }

        Self::parse_envelope(response).await
    }

    /// Poll the request endpoint until the operation leaves `202`, bounded
    /// by [`MAX_POLL_ATTEMPTS`].
    async fn await_completion(
        &self,
        accepted: ServiceEnvelope,
        kind: TokenKind,
    ) -> Result<ServiceEnvelope, ServiceClientError> {
        let request_id = match &accepted.request_id {
            Some(id) => id.clone(),
            // Accepted without a correlation id cannot be polled; surface
            // the envelope as observed.
            None => return Ok(accepted),
        };
        let url = self.request_url(&request_id);

        let mut last = accepted;
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(Duration::from_secs(u64::from(attempt * attempt))).await;

            let response = self
                .http
                .get(&url)
                .bearer_auth(self.bearer(kind))
                .send()
                .await
                .map_err(|e| ServiceClientError::Network(e.to_string()))?;

            let still_pending = response.status() == reqwest::StatusCode::ACCEPTED;
            last = Self::parse_envelope(response).await?;
            if !still_pending {
                return Ok(last);
            }
            debug!(%request_id, attempt, "operation still pending");
        }

        warn!(%request_id, "async completion still pending after {MAX_POLL_ATTEMPTS} polls");
        Ok(last)
    }

    async fn parse_envelope(
        response: reqwest::Response,
    ) -> Result<ServiceEnvelope, ServiceClientError> {
        let text = response
            .text()
            .await
            .map_err(|e| ServiceClientError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ServiceClientError::Malformed(e.to_string()))
    }
}
