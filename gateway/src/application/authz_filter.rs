// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Per-document authorization filtering.
//!
//! Checks are independent, so they fan out concurrently; the join reassembles
//! results in original candidate order, which `join_all` guarantees
//! regardless of completion order. A check call that errors denies its
//! document — fail closed, never fail open — and the error is still captured
//! in the decision's audit record.

use futures::future::join_all;
use metrics::counter;
use std::sync::Arc;
use tracing::warn;

use crate::domain::authz::{AuthzAudit, AuthzChecker, AuthzDecision};
use crate::domain::document::CandidateDocument;

const READ_ACTION: &str = "read";

pub struct AuthzFilter {
    checker: Arc<dyn AuthzChecker>,
}

impl AuthzFilter {
    pub fn new(checker: Arc<dyn AuthzChecker>) -> Self {
        Self { checker }
    }

    /// Drop every candidate the subject may not read.
    ///
    /// Returns the surviving documents and one decision per candidate, both
    /// in candidate order.
    pub async fn filter(
        &self,
        subject_id: &str,
        documents: Vec<CandidateDocument>,
    ) -> (Vec<CandidateDocument>, Vec<AuthzDecision>) {
        let checks = documents
            .iter()
            .map(|doc| self.checker.check(subject_id, READ_ACTION, &doc.id));
        let outcomes = join_all(checks).await;

        let mut surviving = Vec::with_capacity(documents.len());
        let mut decisions = Vec::with_capacity(documents.len());

        for (doc, outcome) in documents.into_iter().zip(outcomes) {
            let decision = match outcome {
                Ok(check) => AuthzDecision {
                    document_id: doc.id.clone(),
                    allowed: check.allowed,
                    audit: check.audit,
                },
                Err(e) => {
                    warn!(document_id = %doc.id, error = %e, "authorization check failed, denying document");
                    AuthzDecision {
                        document_id: doc.id.clone(),
                        allowed: false,
                        audit: AuthzAudit::from_error(&e),
                    }
                }
            };

            if decision.allowed {
                surviving.push(doc);
            } else {
                counter!("aegis_chat_authz_denied_total").increment(1);
            }
            decisions.push(decision);
        }

        (surviving, decisions)
    }
}
