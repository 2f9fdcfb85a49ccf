use serde::{Serialize, Deserialize};
use ts_rs::TS;
use super::types::{DisplayedTranslation, Language};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
#[ts(export, export_to = "events.ts")]
pub enum AppEvent {
    #[serde(rename = "translation://started")]
    TranslationStarted {
        #[ts(type = "number")]
        request_id: u64,
        source: Language,
        target: Language,
    },

    #[serde(rename = "translation://succeeded")]
    TranslationSucceeded {
        #[ts(type = "number")]
        request_id: u64,
        translation: DisplayedTranslation,
    },

    #[serde(rename = "translation://failed")]
    TranslationFailed {
        #[ts(type = "number")]
        request_id: u64,
        message: String,
    },

    #[serde(rename = "language://changed")]
    LanguageChanged { language: Language },
}

impl AppEvent {
    /// Wire name of the event, as the front end subscribes to it.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::TranslationStarted { .. } => "translation://started",
            AppEvent::TranslationSucceeded { .. } => "translation://succeeded",
            AppEvent::TranslationFailed { .. } => "translation://failed",
            AppEvent::LanguageChanged { .. } => "language://changed",
        }
    }
}
