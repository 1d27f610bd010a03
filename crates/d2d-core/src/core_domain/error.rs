use crate::core::{DialogueId, DocId, Domain, SpanId, Split, TurnId};

// ---------------------------------------------------------------------------
// Sub-error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("document {doc_id} not found in document index")]
    UnknownDocument { doc_id: DocId },
    #[error("span {span_id} not found in document {doc_id}")]
    UnknownSpan { doc_id: DocId, span_id: SpanId },
    #[error("turn {turn_id} of dialogue {dial_id} is a generation target but has no preceding turn")]
    MissingPrecedingTurn { dial_id: DialogueId, turn_id: TurnId },
    #[error("source and target must be same sized: {sources} sources, {targets} targets")]
    CountMismatch { sources: usize, targets: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum AlignmentError {
    #[error(
        "predictions and references must match one-to-one: {predictions} predictions, \
         {references} references, {distinct_predictions} distinct prediction ids, \
         {distinct_references} distinct reference ids"
    )]
    SpanCountMismatch {
        predictions: usize,
        references: usize,
        distinct_predictions: usize,
        distinct_references: usize,
    },
    #[error(
        "predictions and references must match one-to-one: {predictions} predictions, \
         {references} references, {distinct_predictions} distinct prediction ids"
    )]
    GenerationCountMismatch {
        predictions: usize,
        references: usize,
        distinct_predictions: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {domain}/{split}: {reason}")]
    Unavailable {
        domain: Domain,
        split: Split,
        reason: String,
    },
    #[error("malformed {domain}/{split} records: {reason}")]
    Malformed {
        domain: Domain,
        split: Split,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("cannot score an empty batch")]
    EmptyBatch,
    #[error("batch length mismatch: {predictions} predictions, {references} references")]
    LengthMismatch {
        predictions: usize,
        references: usize,
    },
}

// ---------------------------------------------------------------------------
// Top-level errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alignment_error_to_evaluation_error() {
        let err: EvaluationError = AlignmentError::GenerationCountMismatch {
            predictions: 2,
            references: 1,
            distinct_predictions: 2,
        }
        .into();
        assert!(matches!(
            err,
            EvaluationError::Alignment(AlignmentError::GenerationCountMismatch { .. })
        ));
    }

    #[test]
    fn test_from_serialize_error_to_prepare_error() {
        let err: PrepareError = SerializeError::UnknownDocument {
            doc_id: DocId::new("doc-a"),
        }
        .into();
        assert!(matches!(
            err,
            PrepareError::Serialize(SerializeError::UnknownDocument { .. })
        ));
    }

    #[test]
    fn test_display_span_count_mismatch() {
        let err = AlignmentError::SpanCountMismatch {
            predictions: 3,
            references: 2,
            distinct_predictions: 3,
            distinct_references: 2,
        };
        assert_eq!(
            err.to_string(),
            "predictions and references must match one-to-one: 3 predictions, 2 references, \
             3 distinct prediction ids, 2 distinct reference ids"
        );
    }

    #[test]
    fn test_display_missing_preceding_turn() {
        let err = SerializeError::MissingPrecedingTurn {
            dial_id: DialogueId::new("d1"),
            turn_id: TurnId::new(1),
        };
        assert_eq!(
            err.to_string(),
            "turn 1 of dialogue d1 is a generation target but has no preceding turn"
        );
    }

    #[test]
    fn test_display_unknown_span() {
        let err = SerializeError::UnknownSpan {
            doc_id: DocId::new("doc-a"),
            span_id: SpanId::new("7"),
        };
        assert_eq!(err.to_string(), "span 7 not found in document doc-a");
    }

    #[test]
    fn test_display_dataset_unavailable() {
        let err = DatasetError::Unavailable {
            domain: Domain::Dialogue,
            split: Split::Test,
            reason: "no such file".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read dialogue_domain/test: no such file"
        );
    }

    #[test]
    fn test_display_transparent_scoring() {
        let err: EvaluationError = ScoringError::EmptyBatch.into();
        assert_eq!(err.to_string(), "cannot score an empty batch");
    }
}
