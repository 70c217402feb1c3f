// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Adapter implementations for the domain ports.

pub mod authn;
pub mod authz_client;
pub mod guard;
pub mod http;
pub mod llm;
pub mod retriever;

pub use authn::TokenCheckValidator;
pub use authz_client::RelationCheckClient;
pub use guard::{PromptGuardClient, TextGuardClient};
pub use http::{ServiceClient, ServiceClientError, ServiceEnvelope, TokenKind};
pub use llm::OpenAiChatModel;
pub use retriever::HttpDocumentSource;
