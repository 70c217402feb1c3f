// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application services: the orchestration pipeline and its helpers.

pub mod authz_filter;
pub mod chat_service;
pub mod generation;

pub use authz_filter::AuthzFilter;
pub use chat_service::{ChatService, GuardedChatService};
pub use generation::AnswerGenerator;
