//! Offline backend answering from small reference phrase tables.
//!
//! Used for demos when the hosted model is unavailable. Known phrases get
//! their reference translation and metrics scored against it; anything
//! else gets a canned "automatically translated" sentence with fixed
//! modest scores.

use async_trait::async_trait;
use tracing::debug;

use crate::core::features::evaluation::evaluate_translation;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Language, QualityMetrics, QualityPercentages};

use super::backend::TranslationBackend;
use super::types::{TranslationRequest, TranslationResponse};

const JAPANESE: &[(&str, &str)] = &[
    ("hello", "こんにちは"),
    ("good morning", "おはようございます"),
    ("thank you", "ありがとうございます"),
    ("welcome", "ようこそ"),
    ("goodbye", "さようなら"),
    ("yes", "はい"),
    ("no", "いいえ"),
    ("please", "お願いします"),
    ("sorry", "すみません"),
    ("how are you", "お元気ですか"),
    ("good night", "おやすみなさい"),
    ("nice to meet you", "はじめまして"),
    ("i don't understand", "わかりません"),
    ("where is", "どこですか"),
];

const CHINESE: &[(&str, &str)] = &[
    ("hello", "你好"),
    ("good morning", "早上好"),
    ("thank you", "谢谢"),
    ("welcome", "欢迎"),
    ("goodbye", "再见"),
    ("yes", "是的"),
    ("no", "不是"),
    ("please", "请"),
    ("sorry", "对不起"),
    ("how are you", "你好吗"),
    ("good night", "晚安"),
    ("nice to meet you", "很高兴认识你"),
    ("i don't understand", "我不明白"),
    ("where is", "在哪里"),
];

const HINDI: &[(&str, &str)] = &[
    ("hello", "नमस्ते"),
    ("good morning", "सुप्रभात"),
    ("thank you", "धन्यवाद"),
    ("welcome", "स्वागत है"),
    ("goodbye", "अलविदा"),
    ("yes", "हां"),
    ("no", "नहीं"),
    ("please", "कृपया"),
    ("sorry", "माफ़ कीजिए"),
];

const THAI: &[(&str, &str)] = &[
    ("hello", "สวัสดี"),
    ("thank you", "ขอบคุณ"),
    ("goodbye", "ลาก่อน"),
    ("yes", "ใช่"),
    ("no", "ไม่"),
];

const VIETNAMESE: &[(&str, &str)] = &[
    ("hello", "xin chào"),
    ("thank you", "cảm ơn"),
    ("goodbye", "tạm biệt"),
    ("yes", "vâng"),
    ("no", "không"),
];

// What the hosted service reports when it had to fall back.
const FALLBACK_SCORES: (f64, f64, f64) = (0.45, 0.52, 0.38);

fn phrases(target: Language) -> &'static [(&'static str, &'static str)] {
    match target {
        Language::Japanese => JAPANESE,
        Language::Chinese => CHINESE,
        Language::Hindi => HINDI,
        Language::Thai => THAI,
        Language::Vietnamese => VIETNAMESE,
        _ => &[],
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'))
        .to_lowercase()
}

fn fallback_sentence(text: &str, target: Language) -> String {
    match target {
        Language::Japanese => format!("「{}」の翻訳: この文章は自動翻訳されました。翻訳モデルが最適化されていない可能性があります。", text),
        Language::Chinese => format!("「{}」的翻译: 此文本已自动翻译。翻译模型可能尚未优化。", text),
        Language::Hindi => format!("「{}」का अनुवाद: इस पाठ का स्वचालित रूप से अनुवाद किया गया है।", text),
        Language::Bengali => format!("「{}」এর অনুবাদ: এই পাঠ্যটি স্বয়ংক্রিয়ভাবে অনুবাদ করা হয়েছে।", text),
        Language::Thai => format!("การแปล「{}」: ข้อความนี้ได้รับการแปลโดยอัตโนมัติ", text),
        _ => format!("Translation of '{}': This text was automatically translated. The translation model may not be optimized.", text),
    }
}

#[derive(Debug, Default, Clone)]
pub struct PhrasebookBackend;

impl PhrasebookBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn lookup(text: &str, target: Language) -> Option<&'static str> {
        let key = normalize(text);
        phrases(target)
            .iter()
            .find(|(source, _)| *source == key)
            .map(|(_, reference)| *reference)
    }
}

#[async_trait]
impl TranslationBackend for PhrasebookBackend {
    fn id(&self) -> &str {
        "phrasebook"
    }

    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse> {
        if request.is_empty() {
            return Err(AppError::Upstream {
                status: 400,
                message: "Text is required".to_string(),
                details: None,
            });
        }
        if !request.target.is_target_supported() {
            return Err(AppError::Upstream {
                status: 400,
                message: format!("Language {} is not supported", request.target.code()),
                details: None,
            });
        }

        let (translated_text, metrics) = match Self::lookup(&request.text, request.target) {
            Some(reference) => {
                debug!(target = %request.target, "phrasebook hit");
                let metrics = evaluate_translation(&request.text, reference, Some(reference));
                (reference.to_string(), metrics)
            }
            None => {
                let (bleu, rouge, meteor) = FALLBACK_SCORES;
                (
                    fallback_sentence(&request.text, request.target),
                    QualityMetrics::from_scores(bleu, rouge, meteor),
                )
            }
        };

        Ok(TranslationResponse {
            translated_text,
            percentages: Some(QualityPercentages::from(&metrics)),
            metrics: Some(metrics),
        })
    }
}
