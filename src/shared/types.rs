use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use super::error::AppError;

/// Languages the demo knows about.
///
/// The first thirteen are the ALT corpus languages the hosted model was
/// fine-tuned on; the rest only ever come out of the heuristic detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub enum Language {
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fil")]
    Filipino,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "km")]
    Khmer,
    #[serde(rename = "lo")]
    Lao,
    #[serde(rename = "ms")]
    Malay,
    #[serde(rename = "my")]
    Myanmar,
    #[serde(rename = "th")]
    Thai,
    #[serde(rename = "vi")]
    Vietnamese,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "ml")]
    Malayalam,
}

impl Language {
    pub const ALL: [Language; 20] = [
        Language::Bengali,
        Language::English,
        Language::Filipino,
        Language::Hindi,
        Language::Indonesian,
        Language::Japanese,
        Language::Khmer,
        Language::Lao,
        Language::Malay,
        Language::Myanmar,
        Language::Thai,
        Language::Vietnamese,
        Language::Chinese,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Malayalam,
    ];

    /// (code, display name, ISO 639-3)
    const fn table(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Language::Bengali => ("bn", "Bengali", "ben"),
            Language::English => ("en", "English", "eng"),
            Language::Filipino => ("fil", "Filipino", "fil"),
            Language::Hindi => ("hi", "Hindi", "hin"),
            Language::Indonesian => ("id", "Indonesian", "ind"),
            Language::Japanese => ("ja", "Japanese", "jpn"),
            Language::Khmer => ("km", "Khmer", "khm"),
            Language::Lao => ("lo", "Lao", "lao"),
            Language::Malay => ("ms", "Malay", "msa"),
            Language::Myanmar => ("my", "Myanmar", "mya"),
            Language::Thai => ("th", "Thai", "tha"),
            Language::Vietnamese => ("vi", "Vietnamese", "vie"),
            Language::Chinese => ("zh", "Chinese", "zho"),
            Language::French => ("fr", "French", "fra"),
            Language::Spanish => ("es", "Spanish", "spa"),
            Language::German => ("de", "German", "deu"),
            Language::Tamil => ("ta", "Tamil", "tam"),
            Language::Telugu => ("te", "Telugu", "tel"),
            Language::Kannada => ("kn", "Kannada", "kan"),
            Language::Malayalam => ("ml", "Malayalam", "mal"),
        }
    }

    pub fn code(self) -> &'static str {
        self.table().0
    }

    pub fn name(self) -> &'static str {
        self.table().1
    }

    /// Whether the hosted model accepts this language as a target.
    pub fn is_target_supported(self) -> bool {
        !matches!(
            self,
            Language::French
                | Language::Spanish
                | Language::German
                | Language::Tamil
                | Language::Telugu
                | Language::Kannada
                | Language::Malayalam
        )
    }

    /// Scripts written without spaces between words.
    pub fn lacks_word_boundaries(self) -> bool {
        matches!(
            self,
            Language::Japanese
                | Language::Chinese
                | Language::Thai
                | Language::Khmer
                | Language::Lao
                | Language::Myanmar
        )
    }

    pub fn supported_targets() -> impl Iterator<Item = Language> {
        Self::ALL.into_iter().filter(|lang| lang.is_target_supported())
    }

    fn from_iso(raw: &str) -> Option<Self> {
        let iso = isolang::Language::from_639_1(raw).or_else(|| isolang::Language::from_639_3(raw))?;
        let three = iso.to_639_3();
        Self::ALL.into_iter().find(|lang| lang.table().2 == three)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == raw || lang.name().to_ascii_lowercase() == raw)
            .or_else(|| Self::from_iso(&raw))
            .ok_or_else(|| AppError::Validation(format!("Unknown language: {}", s.trim())))
    }
}

/// Source language as picked in the UI: either a concrete language or
/// a request to run the detector first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLanguage {
    #[default]
    Auto,
    Explicit(Language),
}

impl SourceLanguage {
    pub fn explicit(self) -> Option<Language> {
        match self {
            SourceLanguage::Auto => None,
            SourceLanguage::Explicit(lang) => Some(lang),
        }
    }
}

impl From<Language> for SourceLanguage {
    fn from(lang: Language) -> Self {
        SourceLanguage::Explicit(lang)
    }
}

impl FromStr for SourceLanguage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(SourceLanguage::Auto)
        } else {
            s.parse().map(SourceLanguage::Explicit)
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Auto => f.write_str("auto"),
            SourceLanguage::Explicit(lang) => f.write_str(lang.code()),
        }
    }
}

impl Serialize for SourceLanguage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SourceLanguage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: AppError| serde::de::Error::custom(e.to_string()))
    }
}

/// Scores computed by the translation service, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct QualityMetrics {
    pub bleu: f64,
    pub rouge: f64,
    pub meteor: f64,
    pub quality: f64,
}

impl QualityMetrics {
    /// Builds metrics with `quality` as the mean of the three scores.
    pub fn from_scores(bleu: f64, rouge: f64, meteor: f64) -> Self {
        Self {
            bleu,
            rouge,
            meteor,
            quality: (bleu + rouge + meteor) / 3.0,
        }
    }
}

/// The same scores scaled to [0, 100] with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct QualityPercentages {
    pub bleu: f64,
    pub rouge: f64,
    pub meteor: f64,
    pub quality: f64,
}

fn as_percentage(score: f64) -> f64 {
    (score.clamp(0.0, 1.0) * 1000.0).round() / 10.0
}

impl From<&QualityMetrics> for QualityPercentages {
    fn from(metrics: &QualityMetrics) -> Self {
        Self {
            bleu: as_percentage(metrics.bleu),
            rouge: as_percentage(metrics.rouge),
            meteor: as_percentage(metrics.meteor),
            quality: as_percentage(metrics.quality),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum HeatmapTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// One rendered token of the quality heatmap.
///
/// `synthetic_score` is a simulated confidence derived from the overall
/// quality plus noise. It is not produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct HeatmapToken {
    pub text: String,
    pub synthetic_score: f64,
    pub tier: HeatmapTier,
}

/// What the page currently shows in the output panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct DisplayedTranslation {
    #[ts(type = "number")]
    pub request_id: u64,
    pub translated_text: String,
    pub source: Language,
    pub target: Language,
    pub metrics: Option<QualityMetrics>,
    pub percentages: Option<QualityPercentages>,
    pub heatmap: Vec<HeatmapToken>,
}
