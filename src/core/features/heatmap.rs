//! Quality heatmap over the translated text.
//!
//! The per-token scores here are a **simulated confidence**: they are the
//! overall quality score plus noise, not anything the model reported.
//! Rendering the same translation twice gives different scores unless the
//! caller passes a seeded RNG.

use rand::Rng;

use crate::shared::types::{HeatmapTier, HeatmapToken, Language, QualityMetrics};

/// Base score when the service sent no metrics.
pub const DEFAULT_QUALITY: f64 = 0.5;
pub const JITTER: f64 = 0.2;
pub const OUTLIER_PROBABILITY: f64 = 0.05;
pub const OUTLIER_MIN_SHIFT: f64 = 0.25;
pub const OUTLIER_MAX_SHIFT: f64 = 0.45;
pub const MIN_SCORE: f64 = 0.05;
pub const MAX_SCORE: f64 = 0.98;

pub const EXCELLENT_THRESHOLD: f64 = 0.7;
pub const GOOD_THRESHOLD: f64 = 0.4;
pub const FAIR_THRESHOLD: f64 = 0.2;

/// Presentation variant; both share scoring and tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatmapStyle {
    #[default]
    Classic,
    Futuristic,
}

impl HeatmapTier {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            HeatmapTier::Excellent
        } else if score >= GOOD_THRESHOLD {
            HeatmapTier::Good
        } else if score >= FAIR_THRESHOLD {
            HeatmapTier::Fair
        } else {
            HeatmapTier::Poor
        }
    }

    pub fn label(self, style: HeatmapStyle) -> &'static str {
        match (style, self) {
            (HeatmapStyle::Classic, HeatmapTier::Excellent) => "excellent",
            (HeatmapStyle::Classic, HeatmapTier::Good) => "good",
            (HeatmapStyle::Classic, HeatmapTier::Fair) => "fair",
            (HeatmapStyle::Classic, HeatmapTier::Poor) => "poor",
            (HeatmapStyle::Futuristic, HeatmapTier::Excellent) => "█",
            (HeatmapStyle::Futuristic, HeatmapTier::Good) => "▓",
            (HeatmapStyle::Futuristic, HeatmapTier::Fair) => "▒",
            (HeatmapStyle::Futuristic, HeatmapTier::Poor) => "░",
        }
    }
}

/// Split the translation into heatmap cells.
///
/// Scripts written without spaces get one cell per character, the rest
/// one cell per whitespace-separated word.
pub fn tokenize(text: &str, language: Language) -> Vec<String> {
    if language.lacks_word_boundaries() {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect()
    } else {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Draw one simulated confidence value around `base`.
pub fn simulated_confidence<R: Rng + ?Sized>(base: f64, rng: &mut R) -> f64 {
    let mut score = base + rng.gen_range(-JITTER..=JITTER);

    if rng.gen_bool(OUTLIER_PROBABILITY) {
        let shift = rng.gen_range(OUTLIER_MIN_SHIFT..=OUTLIER_MAX_SHIFT);
        score += if rng.gen_bool(0.5) { shift } else { -shift };
    }

    score.clamp(MIN_SCORE, MAX_SCORE)
}

pub fn render<R: Rng + ?Sized>(
    translated_text: &str,
    metrics: Option<&QualityMetrics>,
    language: Language,
    rng: &mut R,
) -> Vec<HeatmapToken> {
    let base = metrics.map(|m| m.quality).unwrap_or(DEFAULT_QUALITY);

    tokenize(translated_text, language)
        .into_iter()
        .map(|text| {
            let synthetic_score = simulated_confidence(base, rng);
            HeatmapToken {
                text,
                synthetic_score,
                tier: HeatmapTier::from_score(synthetic_score),
            }
        })
        .collect()
}

/// One-line textual rendering, `token[label]` per cell.
pub fn format_line(tokens: &[HeatmapToken], style: HeatmapStyle) -> String {
    tokens
        .iter()
        .map(|t| format!("{}[{}]", t.text, t.tier.label(style)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn metrics(quality: f64) -> QualityMetrics {
        QualityMetrics { bleu: quality, rouge: quality, meteor: quality, quality }
    }

    fn mean_score(quality: f64, rng: &mut StdRng) -> f64 {
        let text = vec!["word"; 2000].join(" ");
        let tokens = render(&text, Some(&metrics(quality)), Language::English, rng);
        tokens.iter().map(|t| t.synthetic_score).sum::<f64>() / tokens.len() as f64
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(HeatmapTier::from_score(0.7), HeatmapTier::Excellent);
        assert_eq!(HeatmapTier::from_score(0.69), HeatmapTier::Good);
        assert_eq!(HeatmapTier::from_score(0.4), HeatmapTier::Good);
        assert_eq!(HeatmapTier::from_score(0.39), HeatmapTier::Fair);
        assert_eq!(HeatmapTier::from_score(0.2), HeatmapTier::Fair);
        assert_eq!(HeatmapTier::from_score(0.19), HeatmapTier::Poor);
    }

    #[test]
    fn test_tokenize_by_script() {
        assert_eq!(tokenize("hello  big world", Language::English), vec!["hello", "big", "world"]);
        assert_eq!(tokenize("你好 世界", Language::Chinese), vec!["你", "好", "世", "界"]);
        assert_eq!(tokenize("สวัสดี", Language::Thai).len(), "สวัสดี".chars().count());
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for base in [0.0, 0.05, 0.5, 0.98, 1.0] {
            for _ in 0..1000 {
                let s = simulated_confidence(base, &mut rng);
                assert!((MIN_SCORE..=MAX_SCORE).contains(&s), "{} out of range", s);
            }
        }
    }

    #[test]
    fn test_high_quality_scores_higher_on_average() {
        let mut rng = StdRng::seed_from_u64(42);
        let high = mean_score(0.9, &mut rng);
        let low = mean_score(0.1, &mut rng);
        assert!(high > low + 0.5, "high={} low={}", high, low);
    }

    #[test]
    fn test_missing_metrics_centre_on_default() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = vec!["w"; 4000].join(" ");
        let tokens = render(&text, None, Language::English, &mut rng);
        let mean = tokens.iter().map(|t| t.synthetic_score).sum::<f64>() / tokens.len() as f64;
        assert!((mean - DEFAULT_QUALITY).abs() < 0.03, "mean={}", mean);
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let m = metrics(0.6);
        let a = render("one two three", Some(&m), Language::English, &mut StdRng::seed_from_u64(9));
        let b = render("one two three", Some(&m), Language::English, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_translation_renders_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(render("   ", None, Language::Japanese, &mut rng).is_empty());
    }

    #[test]
    fn test_format_line_styles() {
        let tokens = vec![HeatmapToken { text: "hi".to_string(), synthetic_score: 0.8, tier: HeatmapTier::Excellent }];
        assert_eq!(format_line(&tokens, HeatmapStyle::Classic), "hi[excellent]");
        assert_eq!(format_line(&tokens, HeatmapStyle::Futuristic), "hi[█]");
    }
}
