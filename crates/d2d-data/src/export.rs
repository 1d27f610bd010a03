use std::fs;
use std::path::{Path, PathBuf};

use d2d_core::core::{GenerationPrediction, Seq2SeqCorpus, SpanPrediction, Split};

use crate::store::{read_json_array, DataError};

// ---------------------------------------------------------------------------
// Prediction files
// ---------------------------------------------------------------------------

/// Loads a subtask1 prediction file: a JSON array of
/// `{"id", "prediction_text", "no_answer_probability"}` records.
pub fn load_span_predictions(path: &Path) -> Result<Vec<SpanPrediction>, DataError> {
    let predictions: Vec<SpanPrediction> = read_json_array(path)?;
    tracing::debug!(path = %path.display(), predictions = predictions.len(), "loaded span predictions");
    Ok(predictions)
}

/// Loads a subtask2 prediction file: a JSON array of `{"id", "utterance"}` records.
pub fn load_generation_predictions(path: &Path) -> Result<Vec<GenerationPrediction>, DataError> {
    let predictions: Vec<GenerationPrediction> = read_json_array(path)?;
    tracing::debug!(
        path = %path.display(),
        predictions = predictions.len(),
        "loaded generation predictions"
    );
    Ok(predictions)
}

// ---------------------------------------------------------------------------
// Seq2seq files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq2SeqPaths {
    pub source: PathBuf,
    pub target: PathBuf,
    pub ids: Option<PathBuf>,
}

/// Writes `{stem}.source` and `{stem}.target` (and `{stem}.id` when
/// `write_ids` is set) under `output_dir`, one example per line.
pub fn write_seq2seq_files(
    output_dir: &Path,
    split: Split,
    corpus: &Seq2SeqCorpus,
    write_ids: bool,
) -> Result<Seq2SeqPaths, DataError> {
    fs::create_dir_all(output_dir).map_err(|source| DataError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let stem = split.file_stem();
    let source = output_dir.join(format!("{stem}.source"));
    let target = output_dir.join(format!("{stem}.target"));
    write_lines(&source, corpus.sources())?;
    write_lines(&target, corpus.targets())?;

    let ids = if write_ids {
        let path = output_dir.join(format!("{stem}.id"));
        write_lines(&path, corpus.ids())?;
        Some(path)
    } else {
        None
    };

    tracing::info!(
        split = split.as_str(),
        examples = corpus.len(),
        source = %source.display(),
        target = %target.display(),
        "wrote seq2seq files"
    );

    Ok(Seq2SeqPaths {
        source,
        target,
        ids,
    })
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), DataError> {
    fs::write(path, lines.join("\n")).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}
