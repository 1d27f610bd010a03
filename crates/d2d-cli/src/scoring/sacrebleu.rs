use std::collections::HashMap;
use std::sync::OnceLock;

use d2d_core::core::{GenerationScorer, ScoringError};
use regex::Regex;

// ---------------------------------------------------------------------------
// 13a tokenizer (mteval-v13a)
// ---------------------------------------------------------------------------

static TOKENIZER_13A: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn rules_13a() -> &'static [(Regex, &'static str)] {
    TOKENIZER_13A.get_or_init(|| {
        [
            // punctuation other than period, comma, dash and apostrophe
            (r"([\x7B-\x7E\x5B-\x60\x20-\x26\x28-\x2B\x3A-\x40/])", " ${1} "),
            // period and comma unless preceded by a digit
            (r"([^0-9])([.,])", "${1} ${2} "),
            // period and comma unless followed by a digit
            (r"([.,])([^0-9])", " ${1} ${2}"),
            // dash preceded by a digit
            (r"([0-9])(-)", "${1} ${2} "),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("static 13a pattern"), replacement)
        })
        .collect()
    })
}

pub fn tokenize_13a(line: &str) -> Vec<String> {
    let mut line = line
        .replace("<skipped>", "")
        .replace("-\n", "")
        .replace('\n', " ");
    if line.contains('&') {
        line = line
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
    }

    let mut padded = format!(" {line} ");
    for (pattern, replacement) in rules_13a() {
        padded = pattern.replace_all(&padded, *replacement).into_owned();
    }
    padded.split_whitespace().map(str::to_owned).collect()
}

// ---------------------------------------------------------------------------
// Sufficient statistics
// ---------------------------------------------------------------------------

fn ngram_counts(tokens: &[String], order: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for n in 1..=order {
        for window in tokens.windows(n) {
            *counts.entry(window).or_default() += 1;
        }
    }
    counts
}

/// Reference length closest to `hyp_len`, the shorter one on ties.
fn closest_ref_len(hyp_len: usize, ref_lens: &[usize]) -> usize {
    ref_lens
        .iter()
        .copied()
        .min_by_key(|len| (len.abs_diff(hyp_len), *len))
        .unwrap_or(0)
}

#[derive(Debug, Default)]
struct BleuStats {
    sys_len: usize,
    ref_len: usize,
    correct: Vec<usize>,
    total: Vec<usize>,
}

impl BleuStats {
    fn new(order: usize) -> Self {
        Self {
            correct: vec![0; order],
            total: vec![0; order],
            ..Self::default()
        }
    }

    fn add(&mut self, hypothesis: &str, references: &[String]) {
        let order = self.correct.len();
        let hyp_tokens = tokenize_13a(hypothesis.trim_end());
        let ref_tokens: Vec<Vec<String>> = references
            .iter()
            .map(|r| tokenize_13a(r.trim_end()))
            .collect();

        let ref_lens: Vec<usize> = ref_tokens.iter().map(Vec::len).collect();
        self.sys_len += hyp_tokens.len();
        self.ref_len += closest_ref_len(hyp_tokens.len(), &ref_lens);

        let mut max_ref_counts: HashMap<&[String], usize> = HashMap::new();
        for tokens in &ref_tokens {
            for (ngram, count) in ngram_counts(tokens, order) {
                let entry = max_ref_counts.entry(ngram).or_default();
                *entry = (*entry).max(count);
            }
        }

        for (ngram, count) in ngram_counts(&hyp_tokens, order) {
            let clipped = count.min(max_ref_counts.get(ngram).copied().unwrap_or(0));
            self.correct[ngram.len() - 1] += clipped;
        }
        for n in 1..=order {
            self.total[n - 1] += (hyp_tokens.len() + 1).saturating_sub(n);
        }
    }

    /// Corpus BLEU with `exp` smoothing, on a 0–100 scale.
    fn score(&self) -> f64 {
        if self.correct.iter().all(|&c| c == 0) {
            return 0.0;
        }

        let brevity_penalty = if self.sys_len >= self.ref_len {
            1.0
        } else if self.sys_len == 0 {
            0.0
        } else {
            (1.0 - self.ref_len as f64 / self.sys_len as f64).exp()
        };

        let order = self.correct.len();
        let mut precisions = vec![0.0; order];
        let mut smooth = 1.0;
        for n in 0..order {
            if self.total[n] == 0 {
                break;
            }
            precisions[n] = if self.correct[n] == 0 {
                smooth *= 2.0;
                100.0 / (smooth * self.total[n] as f64)
            } else {
                100.0 * self.correct[n] as f64 / self.total[n] as f64
            };
        }

        let log_sum: f64 = precisions
            .iter()
            .map(|&p| if p > 0.0 { p.ln() } else { -9_999_999_999.0 })
            .sum();
        brevity_penalty * (log_sum / order as f64).exp()
    }
}

// ---------------------------------------------------------------------------
// SacreBleuScorer
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct SacreBleuScorer {
    pub max_order: usize,
}

impl Default for SacreBleuScorer {
    fn default() -> Self {
        Self { max_order: 4 }
    }
}

impl GenerationScorer for SacreBleuScorer {
    fn score(
        &self,
        predictions: &[String],
        references: &[Vec<String>],
    ) -> Result<f64, ScoringError> {
        if predictions.len() != references.len() {
            return Err(ScoringError::LengthMismatch {
                predictions: predictions.len(),
                references: references.len(),
            });
        }
        if predictions.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        let mut stats = BleuStats::new(self.max_order);
        for (hypothesis, refs) in predictions.iter().zip(references) {
            stats.add(hypothesis, refs);
        }

        let score = stats.score();
        tracing::debug!(
            sys_len = stats.sys_len,
            ref_len = stats.ref_len,
            score,
            "computed corpus bleu"
        );
        Ok(score)
    }
}
