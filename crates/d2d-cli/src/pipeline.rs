use anyhow::Context;
use d2d_core::core::{
    evaluate_generation_task, evaluate_span_task, prepare_corpus, DatasetSource, SpanScores,
};
use d2d_data::{
    load_generation_predictions, load_span_predictions, write_seq2seq_files, Seq2SeqPaths,
};
use serde::Serialize;

use crate::bootstrap::{EvaluateSettings, EvaluationTask, PrepareSettings};
use crate::scoring::{SacreBleuScorer, SquadV2Scorer};

// ---------------------------------------------------------------------------
// prepare
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PrepareReport {
    pub examples: usize,
    pub paths: Seq2SeqPaths,
}

pub fn run_prepare(
    settings: &PrepareSettings,
    source: &dyn DatasetSource,
) -> Result<PrepareReport, anyhow::Error> {
    let corpus = prepare_corpus(source, settings.split, settings.serializer.clone())
        .with_context(|| format!("failed to prepare {} split", settings.split))?;

    let paths = write_seq2seq_files(
        &settings.output_dir,
        settings.split,
        &corpus,
        settings.write_ids,
    )?;

    tracing::info!(
        split = settings.split.as_str(),
        examples = corpus.len(),
        output_dir = %settings.output_dir.display(),
        "prepared seq2seq corpus"
    );

    Ok(PrepareReport {
        examples: corpus.len(),
        paths,
    })
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationReport {
    Span(SpanScores),
    Generation { bleu: f64 },
}

pub fn run_evaluate(
    settings: &EvaluateSettings,
    source: &dyn DatasetSource,
) -> Result<EvaluationReport, anyhow::Error> {
    let report = match settings.task {
        EvaluationTask::SpanExtraction => {
            let predictions = load_span_predictions(&settings.prediction_json)?;
            let scores = evaluate_span_task(
                source,
                &SquadV2Scorer::default(),
                predictions,
                settings.split,
            )?;
            EvaluationReport::Span(scores)
        }
        EvaluationTask::Generation => {
            let predictions = load_generation_predictions(&settings.prediction_json)?;
            let bleu = evaluate_generation_task(
                source,
                &SacreBleuScorer::default(),
                predictions,
                settings.split,
            )?;
            EvaluationReport::Generation { bleu }
        }
    };

    tracing::info!(
        split = settings.split.as_str(),
        task = ?settings.task,
        "evaluation finished"
    );
    Ok(report)
}
