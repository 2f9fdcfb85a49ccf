//! End-to-end tests against a mocked translation endpoint.

use mockito::{Matcher, Server};
use nmt_console_lib::core::features::translator::backend::{AppBackend, HttpBackend, TranslationBackend};
use nmt_console_lib::core::features::translator::Orchestrator;
use nmt_console_lib::core::features::translator::types::TranslationRequest;
use nmt_console_lib::shared::emit::EventBus;
use nmt_console_lib::shared::error::{AppError, MSG_NETWORK_FAILURE, MSG_UPSTREAM_FALLBACK};
use nmt_console_lib::shared::settings::{AppSettings, BackendKind, EndpointSettings, LanguageWireFormat};
use nmt_console_lib::shared::types::{Language, SourceLanguage};
use nmt_console_lib::{SubmitOutcome, TranslatorSession};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tempfile::TempDir;

fn endpoint(base_url: &str, wire_format: LanguageWireFormat) -> EndpointSettings {
    EndpointSettings {
        backend: BackendKind::Http,
        base_url: base_url.to_string(),
        timeout_secs: 5,
        wire_format,
        ..EndpointSettings::default()
    }
}

fn request(text: &str, source: SourceLanguage, target: Language) -> TranslationRequest {
    TranslationRequest::new(text, source, target, 5000)
}

fn success_body() -> serde_json::Value {
    json!({
        "translation": "こんにちは",
        "metrics": {"bleu": 0.8, "rouge": 0.7, "meteor": 0.6, "quality": 0.7},
        "percentages": {"bleu": 80.0, "rouge": 70.0, "meteor": 60.0, "quality": 70.0}
    })
}

#[tokio::test]
async fn test_success_response_is_parsed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "text": "Hello",
            "source_lang": "en",
            "target_lang": "ja"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success_body().to_string())
        .create_async()
        .await;

    let backend = HttpBackend::new(&endpoint(&server.url(), LanguageWireFormat::Code)).unwrap();
    let response = backend
        .translate(&request(" Hello ", Language::English.into(), Language::Japanese))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.translated_text, "こんにちは");
    assert_eq!(response.metrics.unwrap().bleu, 0.8);
    assert_eq!(response.percentages.unwrap().quality, 70.0);
}

#[tokio::test]
async fn test_auto_source_omits_source_lang() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .match_body(Matcher::Json(json!({"text": "Hello", "target_lang": "th"})))
        .with_status(200)
        .with_body(json!({"translation": "สวัสดี"}).to_string())
        .create_async()
        .await;

    let orchestrator = Orchestrator::new(AppBackend::from_settings(&endpoint(&server.url(), LanguageWireFormat::Code)).unwrap());
    orchestrator
        .translate("Hello", SourceLanguage::Auto, Language::Thai)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_field_is_shown_verbatim() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(400)
        .with_body(json!({"error": "Language fr is not supported"}).to_string())
        .create_async()
        .await;

    let backend = HttpBackend::new(&endpoint(&server.url(), LanguageWireFormat::Code)).unwrap();
    let err = backend
        .translate(&request("Hello", SourceLanguage::Auto, Language::Japanese))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Upstream { status: 400, .. }));
    assert_eq!(err.user_message(), "Language fr is not supported");
}

#[tokio::test]
async fn test_server_error_without_body_uses_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(500)
        .create_async()
        .await;

    let backend = HttpBackend::new(&endpoint(&server.url(), LanguageWireFormat::Code)).unwrap();
    let err = backend
        .translate(&request("Hello", SourceLanguage::Auto, Language::Japanese))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), MSG_UPSTREAM_FALLBACK);
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // Nothing listens on port 1.
    let backend = HttpBackend::new(&endpoint("http://127.0.0.1:1", LanguageWireFormat::Code)).unwrap();
    let err = backend
        .translate(&request("Hello", SourceLanguage::Auto, Language::Japanese))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(err.user_message(), MSG_NETWORK_FAILURE);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stalled_service_times_out_as_network_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(br#"{"translation": "too late"}"#)
        })
        .create_async()
        .await;

    let settings = EndpointSettings {
        timeout_secs: 1,
        ..endpoint(&server.url(), LanguageWireFormat::Code)
    };
    let backend = HttpBackend::new(&settings).unwrap();
    let err = backend
        .translate(&request("Hello", SourceLanguage::Auto, Language::Japanese))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Network(_)), "{:?}", err);
    assert_eq!(err.user_message(), MSG_NETWORK_FAILURE);
}

#[tokio::test]
async fn test_bonjour_detected_and_sent_by_name() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/translate")
        .match_body(Matcher::Json(json!({
            "text": "Bonjour",
            "source_lang": "French",
            "target_lang": "English"
        })))
        .with_status(200)
        .with_body(json!({
            "translation": "Hello there",
            "metrics": {"bleu": 0.9, "rouge": 0.9, "meteor": 0.9, "quality": 0.9}
        }).to_string())
        .create_async()
        .await;

    let mut settings = AppSettings::default();
    settings.endpoint = endpoint(&server.url(), LanguageWireFormat::Name);
    settings.preferences.default_target_lang = "English".to_string();

    let session = TranslatorSession::from_settings(&settings, EventBus::new()).unwrap();
    let outcome = session.submit("Bonjour").await;

    mock.assert_async().await;
    match outcome {
        SubmitOutcome::Applied(shown) => {
            assert_eq!(shown.source, Language::French);
            assert_eq!(shown.translated_text, "Hello there");
            assert_eq!(shown.heatmap.len(), 2);
            // Derived from metrics when the service sends none.
            assert_eq!(shown.percentages.unwrap().quality, 90.0);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_japanese_heatmap_has_one_cell_per_character() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/translate")
        .with_status(200)
        .with_body(success_body().to_string())
        .create_async()
        .await;

    let mut settings = AppSettings::default();
    settings.endpoint = endpoint(&server.url(), LanguageWireFormat::Code);
    let session = TranslatorSession::from_settings(&settings, EventBus::new()).unwrap();

    match session.submit("Hello").await {
        SubmitOutcome::Applied(shown) => {
            assert_eq!(shown.target, Language::Japanese);
            assert_eq!(shown.heatmap.len(), "こんにちは".chars().count());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_request_clears_previous_translation() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("POST", "/translate")
        .match_body(Matcher::PartialJson(json!({"text": "Hello"})))
        .with_status(200)
        .with_body(success_body().to_string())
        .create_async()
        .await;
    let failing = server
        .mock("POST", "/translate")
        .match_body(Matcher::PartialJson(json!({"text": "Goodbye"})))
        .with_status(503)
        .with_body(json!({"error": "Model is loading"}).to_string())
        .create_async()
        .await;

    let mut settings = AppSettings::default();
    settings.endpoint = endpoint(&server.url(), LanguageWireFormat::Code);
    let session = TranslatorSession::from_settings(&settings, EventBus::new()).unwrap();

    session.submit("Hello").await;
    assert!(session.snapshot().displayed.is_some());

    let outcome = session.submit("Goodbye").await;
    ok.assert_async().await;
    failing.assert_async().await;

    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    let state = session.snapshot();
    assert!(state.displayed.is_none());
    assert_eq!(state.error.as_deref(), Some("Model is loading"));
}

#[tokio::test]
async fn test_phrasebook_backend_through_session() {
    let mut settings = AppSettings::default();
    settings.endpoint.backend = BackendKind::Phrasebook;
    let session = TranslatorSession::from_settings(&settings, EventBus::new()).unwrap();
    session.set_target_language(Language::Chinese);

    match session.submit("thank you").await {
        SubmitOutcome::Applied(shown) => assert_eq!(shown.translated_text, "谢谢"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_settings_written_on_first_load_and_read_back() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("settings.json");

    let first = AppSettings::load_from(&path).await.unwrap();
    assert_eq!(first, AppSettings::default());
    assert!(path.exists());

    let mut changed = first.clone();
    changed.endpoint.wire_format = LanguageWireFormat::Name;
    changed.interface.debounce_ms = 250;
    changed.save_to(&path).await.unwrap();

    let reloaded = AppSettings::load_from(&path).await.unwrap();
    assert_eq!(reloaded, changed);
}

#[tokio::test]
async fn test_partial_settings_file_keeps_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    tokio::fs::write(&path, r#"{"endpoint": {"base_url": "http://10.0.0.2:8000"}}"#)
        .await
        .unwrap();

    let settings = AppSettings::load_from(&path).await.unwrap();
    assert_eq!(settings.endpoint.base_url, "http://10.0.0.2:8000");
    assert_eq!(settings.endpoint.translate_path, "/translate");
    assert_eq!(settings.interface.max_source_chars, 5000);
}

#[tokio::test]
async fn test_env_overrides_apply_on_top_of_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    tokio::fs::write(&path, r#"{"interface": {"debounce_ms": 250}}"#)
        .await
        .unwrap();

    let settings = AppSettings::load_with(&path, |key| {
        (key == "NMT_API_URL").then(|| "http://10.0.0.9:5000".to_string())
    })
    .await
    .unwrap();
    assert_eq!(settings.endpoint.base_url, "http://10.0.0.9:5000");
    assert_eq!(settings.interface.debounce_ms, 250);
}

#[tokio::test]
async fn test_bad_env_override_fails_instead_of_using_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");

    let result = AppSettings::load_with(&path, |key| match key {
        "NMT_API_URL" => Some("http://10.0.0.9:5000".to_string()),
        "NMT_BACKEND" => Some("carrier-pigeon".to_string()),
        _ => None,
    })
    .await;

    assert!(matches!(result, Err(AppError::Config(_))));
}
