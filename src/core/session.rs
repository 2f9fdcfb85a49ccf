//! Translator session: the single owner of what the page shows.
//!
//! All UI mutations go through the methods here. Responses are fenced by
//! request id, so a slow answer to an old request can never overwrite the
//! result of a newer one.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::context::detect_language;
use crate::core::features::heatmap;
use crate::core::features::translator::backend::{AppBackend, TranslationBackend};
use crate::core::features::translator::fence::RequestFence;
use crate::core::features::translator::types::TranslationOutcome;
use crate::core::features::translator::Orchestrator;
use crate::shared::emit::{emit_event, EventBus};
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::settings::AppSettings;
use crate::shared::types::{DisplayedTranslation, Language, SourceLanguage};

/// Language assumed when detection has nothing to go on.
const DETECTION_FALLBACK: Language = Language::English;

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub source: SourceLanguage,
    pub target: Language,
    pub source_text: String,
    pub detected: Option<Language>,
    pub displayed: Option<DisplayedTranslation>,
    pub error: Option<String>,
}

impl UiState {
    fn new(source: SourceLanguage, target: Language) -> Self {
        Self {
            source,
            target,
            source_text: String::new(),
            detected: None,
            displayed: None,
            error: None,
        }
    }

    fn clear_output(&mut self) {
        self.detected = None;
        self.displayed = None;
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was blank; the output panel was cleared without a request.
    Cleared,
    Applied(DisplayedTranslation),
    Failed { request_id: u64, message: String },
    /// A newer request was issued while this one was in flight.
    Stale { request_id: u64 },
}

pub struct TranslatorSession<B> {
    orchestrator: Orchestrator<B>,
    fence: RequestFence,
    state: Mutex<UiState>,
    bus: EventBus,
    rng: Mutex<StdRng>,
}

impl TranslatorSession<AppBackend> {
    pub fn from_settings(settings: &AppSettings, bus: EventBus) -> AppResult<Self> {
        let backend = AppBackend::from_settings(&settings.endpoint)?;
        let orchestrator = Orchestrator::new(backend).with_max_chars(settings.interface.max_source_chars);
        let source: SourceLanguage = settings.preferences.default_source_lang.parse()?;
        let target: Language = settings.preferences.default_target_lang.parse()?;
        Ok(Self::new(orchestrator, source, target, bus))
    }
}

impl<B: TranslationBackend> TranslatorSession<B> {
    pub fn new(orchestrator: Orchestrator<B>, source: SourceLanguage, target: Language, bus: EventBus) -> Self {
        Self {
            orchestrator,
            fence: RequestFence::new(),
            state: Mutex::new(UiState::new(source, target)),
            bus,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the heatmap's random source, e.g. with a seeded one.
    pub fn with_rng(self, rng: StdRng) -> Self {
        Self { rng: Mutex::new(rng), ..self }
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    fn lock_state(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("[Session] state mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn snapshot(&self) -> UiState {
        self.lock_state().clone()
    }

    pub fn set_source_language(&self, source: SourceLanguage) {
        self.lock_state().source = source;
        if let SourceLanguage::Explicit(language) = source {
            emit_event(&self.bus, AppEvent::LanguageChanged { language });
        }
    }

    pub fn set_target_language(&self, target: Language) {
        self.lock_state().target = target;
        emit_event(&self.bus, AppEvent::LanguageChanged { language: target });
    }

    /// Forget the current output and drop any request still in flight.
    pub fn clear(&self) {
        let mut state = self.lock_state();
        self.fence.invalidate();
        state.source_text.clear();
        state.clear_output();
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let (request, request_id) = {
            let mut state = self.lock_state();
            let mut request = self.orchestrator.build_request(text, state.source, state.target);
            state.source_text = request.text.clone();

            if request.is_empty() {
                self.fence.invalidate();
                state.clear_output();
                debug!("[Session] blank input, output cleared");
                return SubmitOutcome::Cleared;
            }

            // Issued under the state lock so ticket order matches apply order.
            let request_id = self.fence.issue();
            if request.source == SourceLanguage::Auto {
                let detected = detect_language(&request.text).unwrap_or(DETECTION_FALLBACK);
                debug!(request_id, detected = %detected, "[Session] resolved auto source");
                state.detected = Some(detected);
                request.source = SourceLanguage::Explicit(detected);
            } else {
                state.detected = None;
            }
            (request, request_id)
        };

        let source = request.source.explicit().unwrap_or(DETECTION_FALLBACK);
        emit_event(
            &self.bus,
            AppEvent::TranslationStarted { request_id, source, target: request.target },
        );

        let result = self.orchestrator.execute(&request).await;

        let mut state = self.lock_state();
        if !self.fence.is_current(request_id) {
            warn!(request_id, latest = self.fence.latest(), "[Session] discarding stale response");
            return SubmitOutcome::Stale { request_id };
        }

        match result {
            Ok(TranslationOutcome::Translated(response)) => {
                let heatmap = {
                    let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
                    heatmap::render(&response.translated_text, response.metrics.as_ref(), request.target, &mut *rng)
                };
                let displayed = DisplayedTranslation {
                    request_id,
                    translated_text: response.translated_text,
                    source,
                    target: request.target,
                    metrics: response.metrics,
                    percentages: response.percentages,
                    heatmap,
                };
                state.displayed = Some(displayed.clone());
                state.error = None;
                drop(state);

                emit_event(
                    &self.bus,
                    AppEvent::TranslationSucceeded { request_id, translation: displayed.clone() },
                );
                SubmitOutcome::Applied(displayed)
            }
            Ok(TranslationOutcome::Empty) => {
                state.clear_output();
                SubmitOutcome::Cleared
            }
            Err(err) => {
                let message = err.user_message();
                warn!(request_id, error = %err, "[Session] translation failed");
                state.displayed = None;
                state.error = Some(message.clone());
                drop(state);

                emit_event(
                    &self.bus,
                    AppEvent::TranslationFailed { request_id, message: message.clone() },
                );
                SubmitOutcome::Failed { request_id, message }
            }
        }
    }
}

impl<B: TranslationBackend + 'static> TranslatorSession<B> {
    /// Submit settled edits as they arrive, each on its own task, and hand
    /// every outcome to `report`.
    ///
    /// Returns once `settled` closes and the last request has finished,
    /// yielding the most tasks that were ever held at once.
    pub async fn serve<F>(self: Arc<Self>, mut settled: mpsc::UnboundedReceiver<String>, report: F) -> usize
    where
        F: Fn(&SubmitOutcome) + Send + Sync + 'static,
    {
        let report = Arc::new(report);
        let mut in_flight = JoinSet::new();
        let mut peak = 0;

        while let Some(text) = settled.recv().await {
            while in_flight.try_join_next().is_some() {}

            let session = Arc::clone(&self);
            let report = Arc::clone(&report);
            in_flight.spawn(async move {
                let outcome = session.submit(&text).await;
                report(&outcome);
            });
            peak = peak.max(in_flight.len());
        }

        while in_flight.join_next().await.is_some() {}
        debug!(peak, "[Session] input closed, all requests finished");
        peak
    }
}
