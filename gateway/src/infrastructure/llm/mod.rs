// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Completion model adapters.

pub mod openai;

pub use openai::OpenAiChatModel;
