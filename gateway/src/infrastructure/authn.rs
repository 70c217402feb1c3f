// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Token verification against the identity service.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::domain::identity::{AuthnError, CredentialValidator, SessionIdentity, UserProfile};
use crate::infrastructure::http::{ServiceClient, TokenKind};

const SERVICE: &str = "authn";
const ENDPOINT: &str = "v2/client/token/check";

pub struct TokenCheckValidator {
    client: Arc<ServiceClient>,
}

impl TokenCheckValidator {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialValidator for TokenCheckValidator {
    async fn validate(&self, bearer_token: &str) -> Result<SessionIdentity, AuthnError> {
        if bearer_token.is_empty() {
            return Err(AuthnError::MissingToken);
        }

        let envelope = self
            .client
            .post(SERVICE, ENDPOINT, &json!({ "token": bearer_token }), TokenKind::Client)
            .await
            .map_err(|e| {
                warn!(error = %e, "token check call failed");
                AuthnError::Verification
            })?;

        if !envelope.is_success() {
            warn!(status = %envelope.status, "token rejected");
            return Err(AuthnError::Verification);
        }

        let owner = envelope
            .result
            .get("owner")
            .and_then(|v| v.as_str())
            .ok_or(AuthnError::Verification)?
            .to_string();
        let profile: UserProfile = envelope
            .result
            .get("profile")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|_| AuthnError::Verification)?
            .unwrap_or_default();

        Ok(SessionIdentity {
            subject_id: owner,
            profile,
        })
    }
}
