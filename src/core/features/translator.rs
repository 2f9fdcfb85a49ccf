//! Translator feature
//!
//! Turns user text into one request against the configured backend and
//! normalizes whatever comes back.

pub mod backend;
pub mod debounce;
pub mod fence;
pub mod phrasebook;
pub mod types;

use tracing::{debug, info};

use crate::shared::error::AppResult;
use crate::shared::types::{Language, SourceLanguage};

use backend::TranslationBackend;
use types::{TranslationOutcome, TranslationRequest, MAX_SOURCE_CHARS};

/// Request orchestrator.
///
/// Never guesses languages: an `Auto` source is forwarded as "no
/// `source_lang`" and left to the backend. One call is one attempt.
pub struct Orchestrator<B> {
    backend: B,
    max_chars: usize,
}

impl<B: TranslationBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, max_chars: MAX_SOURCE_CHARS }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars.clamp(1, MAX_SOURCE_CHARS);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn build_request(&self, text: &str, source: SourceLanguage, target: Language) -> TranslationRequest {
        TranslationRequest::new(text, source, target, self.max_chars)
    }

    pub async fn translate(
        &self,
        text: &str,
        source: SourceLanguage,
        target: Language,
    ) -> AppResult<TranslationOutcome> {
        let request = self.build_request(text, source, target);
        self.execute(&request).await
    }

    pub async fn execute(&self, request: &TranslationRequest) -> AppResult<TranslationOutcome> {
        if request.is_empty() {
            debug!("empty input, skipping translation request");
            return Ok(TranslationOutcome::Empty);
        }

        info!(
            backend = self.backend.id(),
            source = %request.source,
            target = %request.target,
            "translating"
        );
        let response = self.backend.translate(request).await?;
        Ok(TranslationOutcome::Translated(response))
    }
}
