use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use crate::shared::settings::LanguageWireFormat;
use crate::shared::types::{Language, QualityMetrics, QualityPercentages, SourceLanguage};

/// Upper bound on characters sent per request.
pub const MAX_SOURCE_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub source: SourceLanguage,
    pub target: Language,
}

impl TranslationRequest {
    /// Trims the text and clamps it to `max_chars` characters.
    pub fn new(text: &str, source: SourceLanguage, target: Language, max_chars: usize) -> Self {
        let trimmed = text.trim();
        let text = match trimmed.char_indices().nth(max_chars) {
            Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
            None => trimmed.to_string(),
        };
        Self { text, source, target }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn to_wire(&self, format: LanguageWireFormat) -> WireRequest {
        let spell = |lang: Language| match format {
            LanguageWireFormat::Code => lang.code().to_string(),
            LanguageWireFormat::Name => lang.name().to_string(),
        };
        WireRequest {
            text: self.text.clone(),
            source_lang: self.source.explicit().map(spell),
            target_lang: spell(self.target),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub metrics: Option<QualityMetrics>,
    pub percentages: Option<QualityPercentages>,
}

/// Result of one orchestrator call.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// Nothing to translate; no request was sent.
    Empty,
    Translated(TranslationResponse),
}

/// JSON body posted to the translation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    pub target_lang: String,
}

/// JSON body returned by the translation endpoint, success or failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireResponse {
    #[serde(alias = "translated_text")]
    pub translation: Option<String>,
    pub metrics: Option<QualityMetrics>,
    pub percentages: Option<QualityPercentages>,
    pub error: Option<String>,
    pub details: Option<String>,
}

impl WireResponse {
    /// Normalizes a decoded body given the HTTP status it came with.
    pub fn into_response(self, status: u16) -> Result<TranslationResponse, AppError> {
        let failed = !(200..300).contains(&status);
        if failed || self.error.is_some() {
            return Err(AppError::Upstream {
                status,
                message: self.error.unwrap_or_default(),
                details: self.details,
            });
        }

        let translated_text = self.translation.ok_or_else(|| AppError::Upstream {
            status,
            message: String::new(),
            details: Some("response carried no translation".to_string()),
        })?;

        let percentages = self
            .percentages
            .or_else(|| self.metrics.as_ref().map(QualityPercentages::from));

        Ok(TranslationResponse {
            translated_text,
            metrics: self.metrics,
            percentages,
        })
    }
}
