// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Authorization service adapter: relation checks and tuple creation.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::domain::authz::{AuthzAudit, AuthzChecker, AuthzError, CheckOutcome, RelationTuple};
use crate::infrastructure::http::{ServiceClient, ServiceClientError, TokenKind};

const SERVICE: &str = "authz";
const CHECK_ENDPOINT: &str = "v1/check";
const TUPLE_CREATE_ENDPOINT: &str = "v1/tuple/create";

const SUBJECT_KIND: &str = "user";
const RESOURCE_KIND: &str = "file";

pub struct RelationCheckClient {
    client: Arc<ServiceClient>,
}

impl RelationCheckClient {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self { client }
    }

    /// Create relationship tuples in the store. Used by corpus seeding, not
    /// by the request pipeline.
    pub async fn create_tuples(&self, tuples: &[RelationTuple]) -> Result<usize, AuthzError> {
        let envelope = self
            .client
            .post(
                SERVICE,
                TUPLE_CREATE_ENDPOINT,
                &json!({ "tuples": tuples }),
                TokenKind::Service,
            )
            .await
            .map_err(map_client_error)?;

        if !envelope.is_success() {
            return Err(AuthzError::Service(envelope.failure_summary()));
        }
        Ok(tuples.len())
    }
}

fn map_client_error(e: ServiceClientError) -> AuthzError {
    match e {
        ServiceClientError::Network(msg) => AuthzError::Network(msg),
        ServiceClientError::Malformed(msg) => AuthzError::Service(msg),
    }
}

#[async_trait]
impl AuthzChecker for RelationCheckClient {
    async fn check(
        &self,
        subject: &str,
        action: &str,
        resource: &str,
    ) -> Result<CheckOutcome, AuthzError> {
        let body = json!({
            "subject": { "type": SUBJECT_KIND, "id": subject },
            "action": action,
            "resource": { "type": RESOURCE_KIND, "id": resource },
        });

        let envelope = self
            .client
            .post(SERVICE, CHECK_ENDPOINT, &body, TokenKind::Service)
            .await
            .map_err(map_client_error)?;

        if !envelope.is_success() {
            return Err(AuthzError::Service(envelope.failure_summary()));
        }

        let allowed = envelope
            .result
            .get("allowed")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Ok(CheckOutcome {
            allowed,
            audit: AuthzAudit {
                request_id: envelope.request_id.clone(),
                request_time: envelope.request_time,
                response_time: envelope.response_time,
                status: envelope.status.clone(),
                summary: envelope.summary.clone(),
                error: None,
            },
        })
    }
}
