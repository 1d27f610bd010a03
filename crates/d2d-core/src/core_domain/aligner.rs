use std::collections::{HashMap, HashSet};

use crate::core::{
    generation_example_id, AlignmentError, DatasetSource, Dialogue, EvaluationError,
    GenerationPrediction, GenerationScorer, Role, SpanPrediction, SpanReference, SpanScorer,
    SpanScores, Split,
};

// ---------------------------------------------------------------------------
// Span extraction (subtask1)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct SpanAlignment {
    pub predictions: Vec<SpanPrediction>,
    pub references: Vec<SpanReference>,
}

/// Keeps the gold records whose id appears among `predictions`.
///
/// Fails unless every prediction id is distinct and matched by exactly one
/// gold record.
pub fn align_span_predictions(
    predictions: Vec<SpanPrediction>,
    gold: impl IntoIterator<Item = SpanReference>,
) -> Result<SpanAlignment, AlignmentError> {
    let prediction_ids: HashSet<&str> = predictions.iter().map(|p| p.id.as_str()).collect();

    let mut reference_ids: HashSet<String> = HashSet::new();
    let mut references = Vec::new();
    for record in gold {
        if !prediction_ids.contains(record.id.as_str()) {
            continue;
        }
        reference_ids.insert(record.id.clone());
        references.push(record);
    }

    let counts = [
        predictions.len(),
        references.len(),
        prediction_ids.len(),
        reference_ids.len(),
    ];
    if counts.iter().any(|&count| count != predictions.len()) {
        return Err(AlignmentError::SpanCountMismatch {
            predictions: predictions.len(),
            references: references.len(),
            distinct_predictions: prediction_ids.len(),
            distinct_references: reference_ids.len(),
        });
    }

    Ok(SpanAlignment {
        predictions,
        references,
    })
}

// ---------------------------------------------------------------------------
// Response generation (subtask2)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationAlignment {
    pub ids: Vec<String>,
    pub predictions: Vec<String>,
    /// One group of gold utterances per prediction, same position.
    pub references: Vec<Vec<String>>,
}

/// Matches each prediction to the gold agent turn it was generated for.
///
/// An agent turn `n` of dialogue `d` answers prediction id `d_{n-1}`.
/// References come back in prediction order.
pub fn align_generation_predictions(
    predictions: Vec<GenerationPrediction>,
    dialogues: &[Dialogue],
) -> Result<GenerationAlignment, AlignmentError> {
    let prediction_ids: HashSet<&str> = predictions.iter().map(|p| p.id.as_str()).collect();

    let mut matched = 0usize;
    let mut gold: HashMap<String, &str> = HashMap::new();
    for dialogue in dialogues {
        for turn in dialogue.turns.iter().filter(|t| t.role == Role::Agent) {
            let id = generation_example_id(&dialogue.id, turn.turn_id);
            if !prediction_ids.contains(id.as_str()) {
                continue;
            }
            matched += 1;
            gold.entry(id).or_insert(turn.utterance.as_str());
        }
    }

    let total = predictions.len();
    let distinct = prediction_ids.len();
    if matched != total || distinct != total {
        return Err(AlignmentError::GenerationCountMismatch {
            predictions: total,
            references: matched,
            distinct_predictions: distinct,
        });
    }

    let mut alignment = GenerationAlignment {
        ids: Vec::with_capacity(total),
        predictions: Vec::with_capacity(total),
        references: Vec::with_capacity(total),
    };
    for prediction in predictions {
        // An id matched twice can hide another id that never matched.
        let Some(utterance) = gold.get(prediction.id.as_str()) else {
            return Err(AlignmentError::GenerationCountMismatch {
                predictions: total,
                references: gold.len(),
                distinct_predictions: distinct,
            });
        };
        alignment.references.push(vec![(*utterance).to_owned()]);
        alignment.ids.push(prediction.id);
        alignment.predictions.push(prediction.utterance);
    }

    Ok(alignment)
}

// ---------------------------------------------------------------------------
// Evaluation entry points
// ---------------------------------------------------------------------------

/// Aligns span predictions with the `doc2dial_rc` gold records of `split` and scores them.
pub fn evaluate_span_task(
    source: &dyn DatasetSource,
    scorer: &dyn SpanScorer,
    predictions: Vec<SpanPrediction>,
    split: Split,
) -> Result<SpanScores, EvaluationError> {
    let gold = source.span_references(split)?;
    let alignment = align_span_predictions(predictions, gold)?;
    let scores = scorer.score(&alignment.predictions, &alignment.references)?;
    Ok(scores)
}

/// Aligns generated utterances with the gold agent turns of `split` and scores them.
pub fn evaluate_generation_task(
    source: &dyn DatasetSource,
    scorer: &dyn GenerationScorer,
    predictions: Vec<GenerationPrediction>,
    split: Split,
) -> Result<f64, EvaluationError> {
    let dialogues = source.dialogues(split)?;
    let alignment = align_generation_predictions(predictions, &dialogues)?;
    let score = scorer.score(&alignment.predictions, &alignment.references)?;
    Ok(score)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
