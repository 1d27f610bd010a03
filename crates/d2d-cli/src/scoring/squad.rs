use std::collections::HashMap;
use std::sync::OnceLock;

use d2d_core::core::{ScoringError, SpanPrediction, SpanReference, SpanScorer, SpanScores};
use regex::Regex;

static ARTICLES: OnceLock<Regex> = OnceLock::new();

fn articles() -> &'static Regex {
    ARTICLES.get_or_init(|| Regex::new(r"\b(a|an|the)\b").expect("static article pattern"))
}

/// Lowercases, drops ASCII punctuation and articles, collapses whitespace.
pub fn normalize_answer(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_punct: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let without_articles = articles().replace_all(&without_punct, " ");
    without_articles
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn exact_match(gold: &str, prediction: &str) -> f64 {
    if normalize_answer(gold) == normalize_answer(prediction) {
        1.0
    } else {
        0.0
    }
}

fn token_f1(gold: &str, prediction: &str) -> f64 {
    let gold_norm = normalize_answer(gold);
    let pred_norm = normalize_answer(prediction);
    let gold_tokens: Vec<&str> = gold_norm.split_whitespace().collect();
    let pred_tokens: Vec<&str> = pred_norm.split_whitespace().collect();

    if gold_tokens.is_empty() || pred_tokens.is_empty() {
        return if gold_tokens == pred_tokens { 1.0 } else { 0.0 };
    }

    let mut gold_counts: HashMap<&str, usize> = HashMap::new();
    for token in &gold_tokens {
        *gold_counts.entry(*token).or_default() += 1;
    }
    let mut same = 0usize;
    for token in &pred_tokens {
        if let Some(count) = gold_counts.get_mut(token) {
            if *count > 0 {
                *count -= 1;
                same += 1;
            }
        }
    }
    if same == 0 {
        return 0.0;
    }

    let precision = same as f64 / pred_tokens.len() as f64;
    let recall = same as f64 / gold_tokens.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

// ---------------------------------------------------------------------------
// SquadV2Scorer
// ---------------------------------------------------------------------------

/// SQuAD v2 exact match and token F1, reported on a 0–100 scale.
#[derive(Clone, Debug)]
pub struct SquadV2Scorer {
    /// Predictions whose no-answer probability exceeds this are scored as "".
    pub no_answer_threshold: f64,
}

impl Default for SquadV2Scorer {
    fn default() -> Self {
        Self {
            no_answer_threshold: 1.0,
        }
    }
}

#[derive(Default)]
struct Tally {
    exact: f64,
    f1: f64,
    total: usize,
}

impl Tally {
    fn add(&mut self, exact: f64, f1: f64) {
        self.exact += exact;
        self.f1 += f1;
        self.total += 1;
    }

    fn exact(&self) -> f64 {
        100.0 * self.exact / self.total as f64
    }

    fn f1(&self) -> f64 {
        100.0 * self.f1 / self.total as f64
    }
}

impl SpanScorer for SquadV2Scorer {
    fn score(
        &self,
        predictions: &[SpanPrediction],
        references: &[SpanReference],
    ) -> Result<SpanScores, ScoringError> {
        let by_id: HashMap<&str, &SpanPrediction> =
            predictions.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut all = Tally::default();
        let mut has_ans = Tally::default();
        let mut no_ans = Tally::default();

        for reference in references {
            let Some(prediction) = by_id.get(reference.id.as_str()) else {
                tracing::warn!(id = %reference.id, "missing prediction for reference");
                continue;
            };

            let answerable = !reference.answers.text.is_empty();
            let mut gold: Vec<&str> = reference
                .answers
                .text
                .iter()
                .map(String::as_str)
                .filter(|a| !normalize_answer(a).is_empty())
                .collect();
            if gold.is_empty() {
                gold.push("");
            }

            let (exact, f1) = if prediction.no_answer_probability > self.no_answer_threshold {
                let abstained = if answerable { 0.0 } else { 1.0 };
                (abstained, abstained)
            } else {
                let text = prediction.prediction_text.as_str();
                let exact = gold.iter().map(|g| exact_match(g, text)).fold(0.0, f64::max);
                let f1 = gold.iter().map(|g| token_f1(g, text)).fold(0.0, f64::max);
                (exact, f1)
            };

            all.add(exact, f1);
            if answerable {
                has_ans.add(exact, f1);
            } else {
                no_ans.add(exact, f1);
            }
        }

        if all.total == 0 {
            return Err(ScoringError::EmptyBatch);
        }

        let breakdown = |tally: &Tally| {
            (tally.total > 0).then(|| (tally.exact(), tally.f1(), tally.total))
        };
        let has = breakdown(&has_ans);
        let no = breakdown(&no_ans);

        Ok(SpanScores {
            exact: all.exact(),
            f1: all.f1(),
            total: all.total,
            has_ans_exact: has.map(|(e, _, _)| e),
            has_ans_f1: has.map(|(_, f, _)| f),
            has_ans_total: has.map(|(_, _, t)| t),
            no_ans_exact: no.map(|(e, _, _)| e),
            no_ans_f1: no.map(|(_, f, _)| f),
            no_ans_total: no.map(|(_, _, t)| t),
        })
    }
}
