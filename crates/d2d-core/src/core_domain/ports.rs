use crate::core::{
    DatasetError, Dialogue, Document, ReferenceLabel, Role, ScoringError, SpanPrediction,
    SpanReference, SpanScores, Split, TurnId,
};

// ---------------------------------------------------------------------------
// DatasetSource — read-only access to the doc2dial domains
// ---------------------------------------------------------------------------

/// `document_domain` only ships a `train` split; it holds every document.
pub const DOCUMENT_SPLIT: Split = Split::Train;

pub trait DatasetSource: Send + Sync {
    fn documents(&self, split: Split) -> Result<Vec<Document>, DatasetError>;

    fn dialogues(&self, split: Split) -> Result<Vec<Dialogue>, DatasetError>;

    fn span_references(&self, split: Split) -> Result<Vec<SpanReference>, DatasetError>;
}

// ---------------------------------------------------------------------------
// Scorers — metric computations over aligned batches
// ---------------------------------------------------------------------------

pub trait SpanScorer: Send + Sync {
    /// Scores predictions against references matched by id.
    fn score(
        &self,
        predictions: &[SpanPrediction],
        references: &[SpanReference],
    ) -> Result<SpanScores, ScoringError>;
}

pub trait GenerationScorer: Send + Sync {
    /// Scores `predictions[i]` against every utterance in `references[i]`.
    fn score(&self, predictions: &[String], references: &[Vec<String>])
        -> Result<f64, ScoringError>;
}

// ---------------------------------------------------------------------------
// DialogueActLabeler — maps a turn's annotation to the `da` context tag
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct DialogueActInput<'a> {
    pub raw_act: &'a str,
    pub role: Role,
    pub turn_id: TurnId,
    pub reference_label: ReferenceLabel,
    pub simplify: bool,
}

pub trait DialogueActLabeler: Send + Sync {
    fn label(&self, input: &DialogueActInput<'_>) -> String;
}
