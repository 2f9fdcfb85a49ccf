use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::{BackendKind, EndpointSettings, LanguageWireFormat};

use super::phrasebook::PhrasebookBackend;
use super::types::{TranslationRequest, TranslationResponse, WireResponse};

/// Something that turns one request into one response.
///
/// Implementations make a single attempt; retrying is never their job.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    fn id(&self) -> &str;

    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse>;
}

/// Client for the hosted inference endpoint.
pub struct HttpBackend {
    http: Client,
    url: String,
    wire_format: LanguageWireFormat,
}

impl HttpBackend {
    pub fn new(settings: &EndpointSettings) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("nmt-console/translator")
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: settings.translate_url(),
            wire_format: settings.wire_format,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TranslationBackend for HttpBackend {
    fn id(&self) -> &str {
        "http"
    }

    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse> {
        let body = request.to_wire(self.wire_format);
        debug!(url = %self.url, target = %body.target_lang, chars = body.text.chars().count(), "posting translation request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Translation API request failed: {}", e);
                AppError::Network(format!("Translation API request failed: {}", e))
            })?;

        let status = response.status().as_u16();
        let raw = response.text().await.map_err(|e| {
            warn!("Failed to read translation response: {}", e);
            AppError::Network(format!("Failed to read translation response: {}", e))
        })?;

        let parsed = match serde_json::from_str::<WireResponse>(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(status, "Failed to parse translation response: {}", e);
                return Err(AppError::Upstream {
                    status,
                    message: String::new(),
                    details: Some(format!("unparseable body: {}", e)),
                });
            }
        };

        parsed.into_response(status).map_err(|e| {
            warn!(status, "Translation API returned error: {}", e);
            e
        })
    }
}

/// Backends selectable from settings.
pub enum AppBackend {
    Http(HttpBackend),
    Phrasebook(PhrasebookBackend),
}

impl AppBackend {
    pub fn from_settings(settings: &EndpointSettings) -> AppResult<Self> {
        Ok(match settings.backend {
            BackendKind::Http => AppBackend::Http(HttpBackend::new(settings)?),
            BackendKind::Phrasebook => AppBackend::Phrasebook(PhrasebookBackend::new()),
        })
    }
}

#[async_trait]
impl TranslationBackend for AppBackend {
    fn id(&self) -> &str {
        match self {
            AppBackend::Http(b) => b.id(),
            AppBackend::Phrasebook(b) => b.id(),
        }
    }

    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse> {
        match self {
            AppBackend::Http(b) => b.translate(request).await,
            AppBackend::Phrasebook(b) => b.translate(request).await,
        }
    }
}
