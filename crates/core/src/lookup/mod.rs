//! Word-gloss and sentence-translation lookups backed by a language model.
//!
//! [`LookupGateway`] owns the prompts and the answer validation; the transport
//! lives behind the [`CompletionClient`] trait so tests and alternative
//! providers can stand in for [`ChatClient`].
//!
//! Every lookup is a single completion call with no retry.

mod client;
mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::LookupError;

pub use client::{ChatClient, LookupConfig};
pub use prompt::{TRANSLATE_SYSTEM_PROMPT, WORD_SYSTEM_PROMPT, parse_translation, parse_word_meaning};

/// Gloss of a word in the sentence it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMeaning {
    /// Meaning in Japanese
    pub meaning: String,
    /// Part of speech
    #[serde(alias = "part_of_speech")]
    pub pos: String,
    /// Example sentence using the word
    pub example: String,
}

/// One completion request: a system prompt and a user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Ask the model for a single JSON object.
    pub json: bool,
}

/// A language model that answers one prompt with text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LookupError>;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LookupError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Box<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LookupError> {
        (**self).complete(request).await
    }
}

/// Builds prompts, calls the model once and validates the answer.
#[derive(Debug, Clone)]
pub struct LookupGateway<C> {
    client: C,
}

impl<C: CompletionClient> LookupGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Japanese meaning, part of speech and an example for `word` as used in `context`.
    pub async fn word_meaning(&self, word: &str, context: &str) -> Result<WordMeaning, LookupError> {
        let (word, context) = (word.trim(), context.trim());
        if word.is_empty() || context.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let request = CompletionRequest {
            system: WORD_SYSTEM_PROMPT.to_string(),
            prompt: prompt::word_prompt(word, context),
            json: true,
        };
        let answer = self.client.complete(&request).await?;
        tracing::debug!(word, answer_len = answer.len(), "word lookup answered");

        parse_word_meaning(&answer)
    }

    /// Natural Japanese translation of `sentence`.
    pub async fn translate_sentence(&self, sentence: &str) -> Result<String, LookupError> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let request = CompletionRequest {
            system: TRANSLATE_SYSTEM_PROMPT.to_string(),
            prompt: prompt::translate_prompt(sentence),
            json: false,
        };
        let answer = self.client.complete(&request).await?;
        tracing::debug!(answer_len = answer.len(), "translation answered");

        parse_translation(&answer)
    }
}
