// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Authorization checks and their audit records.
//!
//! One check is issued per candidate document. The audit record is opaque to
//! the pipeline beyond its correlation identifier and timing; it is carried
//! through unchanged for display.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit trail of a single authorization check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthzAudit {
    /// Correlation identifier assigned by the authorization service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<DateTime<Utc>>,

    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Set when the check call itself failed; the document is then denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthzAudit {
    /// Audit record for a check call that errored before producing a verdict.
    pub fn from_error(error: &AuthzError) -> Self {
        Self {
            status: "Error".to_string(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Result of one successful check call against the authorization service.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub allowed: bool,
    pub audit: AuthzAudit,
}

/// The per-document decision recorded by the authorization filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthzDecision {
    pub document_id: String,
    pub allowed: bool,
    pub audit: AuthzAudit,
}

/// A subject-relation-resource tuple in the authorization store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationTuple {
    pub subject: TupleActor,
    pub relation: String,
    pub resource: TupleActor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TupleActor {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("authorization service unreachable: {0}")]
    Network(String),

    #[error("authorization service error: {0}")]
    Service(String),
}

/// Port for the authorization-check collaborator.
#[async_trait]
pub trait AuthzChecker: Send + Sync {
    /// Issue one `{subject, action, resource}` permission check.
    async fn check(
        &self,
        subject: &str,
        action: &str,
        resource: &str,
    ) -> Result<CheckOutcome, AuthzError>;
}
