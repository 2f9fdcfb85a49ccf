//! Local translation quality scores.
//!
//! Mirrors what the hosted service reports: sentence BLEU with add-epsilon
//! smoothing, the mean F-measure of ROUGE-1/2/L, and a METEOR-like unigram
//! F1 (no stemming, synonyms or chunk penalty). All scores are in [0, 1].

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::shared::types::QualityMetrics;

const BLEU_MAX_ORDER: usize = 4;
const SMOOTHING_EPSILON: f64 = 0.1;

/// Scores `translated` against `reference`, falling back to the source
/// text when no reference translation is known.
pub fn evaluate_translation(source: &str, translated: &str, reference: Option<&str>) -> QualityMetrics {
    let reference = reference.unwrap_or(source);
    let hyp = tokenize(translated);
    let refs = tokenize(reference);

    QualityMetrics::from_scores(bleu(&hyp, &refs), rouge(&hyp, &refs), meteor(&hyp, &refs))
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .unicode_words()
        .map(str::to_string)
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn overlap<'a>(hyp: &HashMap<&'a [String], usize>, refs: &HashMap<&'a [String], usize>) -> usize {
    hyp.iter()
        .map(|(gram, count)| (*count).min(refs.get(gram).copied().unwrap_or(0)))
        .sum()
}

fn bleu(hyp: &[String], refs: &[String]) -> f64 {
    if hyp.is_empty() || refs.is_empty() {
        return 0.0;
    }

    let mut log_sum = 0.0;
    for n in 1..=BLEU_MAX_ORDER {
        let hyp_grams = ngram_counts(hyp, n);
        let matches = overlap(&hyp_grams, &ngram_counts(refs, n));
        if n == 1 && matches == 0 {
            return 0.0;
        }
        let total = hyp.len().saturating_sub(n - 1).max(1) as f64;
        let precision = if matches == 0 {
            SMOOTHING_EPSILON / total
        } else {
            matches as f64 / total
        };
        log_sum += precision.ln() / BLEU_MAX_ORDER as f64;
    }

    let (c, r) = (hyp.len() as f64, refs.len() as f64);
    let brevity = if c > r { 1.0 } else { (1.0 - r / c).exp() };
    (brevity * log_sum.exp()).clamp(0.0, 1.0)
}

fn f_measure(matches: usize, hyp_total: usize, ref_total: usize) -> f64 {
    if matches == 0 || hyp_total == 0 || ref_total == 0 {
        return 0.0;
    }
    let precision = matches as f64 / hyp_total as f64;
    let recall = matches as f64 / ref_total as f64;
    2.0 * precision * recall / (precision + recall)
}

fn rouge_n(hyp: &[String], refs: &[String], n: usize) -> f64 {
    let matches = overlap(&ngram_counts(hyp, n), &ngram_counts(refs, n));
    f_measure(
        matches,
        hyp.len().saturating_sub(n - 1),
        refs.len().saturating_sub(n - 1),
    )
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    for x in a {
        let mut row = vec![0usize; b.len() + 1];
        for (j, y) in b.iter().enumerate() {
            row[j + 1] = if x == y { prev[j] + 1 } else { row[j].max(prev[j + 1]) };
        }
        prev = row;
    }
    prev[b.len()]
}

fn rouge(hyp: &[String], refs: &[String]) -> f64 {
    if hyp.is_empty() || refs.is_empty() {
        return 0.0;
    }
    let rouge_l = f_measure(lcs_len(hyp, refs), hyp.len(), refs.len());
    (rouge_n(hyp, refs, 1) + rouge_n(hyp, refs, 2) + rouge_l) / 3.0
}

fn meteor(hyp: &[String], refs: &[String]) -> f64 {
    let matches = overlap(&ngram_counts(hyp, 1), &ngram_counts(refs, 1));
    f_measure(matches, hyp.len(), refs.len())
}
