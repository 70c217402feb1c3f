// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Answer generation.
//!
//! Builds one prompt from the fixed system template, the subject's profile,
//! the surviving documents (blank-line separated, original order), and the
//! possibly-redacted question, then makes a single completion call. Failure
//! is fatal to the request; no fallback reply is synthesized.

use handlebars::Handlebars;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::domain::document::CandidateDocument;
use crate::domain::identity::UserProfile;
use crate::domain::llm::{CompletionModel, GenerationOptions, LlmError};

const ANSWER_TEMPLATE: &str = "\
You are an assistant for question-answering tasks. Use the following pieces of retrieved context to answer the question. If you don't know the answer, just say that the user may not be authorized to know the answer. Use three sentences maximum and keep the answer concise.
Question: {{question}}
User's first name: {{first_name}}
User's last name: {{last_name}}
Context: {{context}}
Answer:";

pub struct AnswerGenerator {
    model: Arc<dyn CompletionModel>,
    options: GenerationOptions,
    handlebars: Handlebars<'static>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn CompletionModel>, options: GenerationOptions) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        Self {
            model,
            options,
            handlebars,
        }
    }

    /// Render the answer prompt and invoke the model once.
    pub async fn generate(
        &self,
        profile: &UserProfile,
        question: &str,
        context_documents: &[CandidateDocument],
    ) -> Result<String, LlmError> {
        let context = context_documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = self
            .handlebars
            .render_template(
                ANSWER_TEMPLATE,
                &json!({
                    "question": question,
                    "first_name": profile.first_name,
                    "last_name": profile.last_name,
                    "context": context,
                }),
            )
            .map_err(|e| LlmError::InvalidInput(e.to_string()))?;

        debug!(prompt_chars = prompt.len(), documents = context_documents.len(), "invoking completion model");
        let completion = self.model.complete(&prompt, &self.options).await?;
        Ok(completion.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::Completion;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CapturingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionModel for CapturingModel {
        async fn complete(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<Completion, LlmError> {
            self.prompts.lock().push(prompt.to_string());
            Ok(Completion {
                text: "the policy allows 20 days".to_string(),
                model: "test".to_string(),
            })
        }
    }

    fn doc(id: &str, content: &str) -> CandidateDocument {
        CandidateDocument {
            id: id.into(),
            content: content.into(),
            metadata: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_prompt_contains_profile_question_and_ordered_context() {
        let model = Arc::new(CapturingModel::default());
        let generator = AnswerGenerator::new(model.clone(), GenerationOptions::default());

        let profile = UserProfile {
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            ..UserProfile::default()
        };
        let reply = generator
            .generate(
                &profile,
                "What is the vacation policy?",
                &[doc("a", "first document"), doc("b", "second document")],
            )
            .await
            .unwrap();

        assert_eq!(reply, "the policy allows 20 days");
        let prompts = model.prompts.lock();
        let prompt = &prompts[0];
        assert!(prompt.contains("Question: What is the vacation policy?"));
        assert!(prompt.contains("User's first name: Alice"));
        assert!(prompt.contains("User's last name: Liddell"));
        assert!(prompt.contains("first document\n\nsecond document"));
    }

    #[tokio::test]
    async fn test_empty_context_renders_empty_section() {
        let model = Arc::new(CapturingModel::default());
        let generator = AnswerGenerator::new(model.clone(), GenerationOptions::default());

        generator
            .generate(&UserProfile::default(), "anything", &[])
            .await
            .unwrap();

        let prompts = model.prompts.lock();
        assert!(prompts[0].contains("Context: \n"));
    }
}
