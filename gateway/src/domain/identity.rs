// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Session identity resolved from a bearer token.
//!
//! One identity is derived per request and discarded with the response; there
//! is no server-side session store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Profile attributes returned by the identity provider for a subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Any further provider-specific attributes, passed through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// Identity of the authenticated caller, immutable for the request's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Stable subject identifier (the token's owner).
    pub subject_id: String,

    pub profile: UserProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthnError {
    #[error("missing or malformed bearer token")]
    MissingToken,

    /// Verification errors fail closed: network failures, provider errors,
    /// and rejected tokens all collapse into this variant.
    #[error("token verification failed")]
    Verification,
}

/// Port for the identity-token-check collaborator.
///
/// Implementations must fail closed: any verification error is
/// [`AuthnError`], never a fabricated identity.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn validate(&self, bearer_token: &str) -> Result<SessionIdentity, AuthnError>;
}
