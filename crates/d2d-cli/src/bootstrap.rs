use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{ensure, Context};
use d2d_core::core::{ContextMode, DialogueActOptions, Role, SerializerOptions, Split};

use crate::config::{AppConfig, TaskConfig};

// ---------------------------------------------------------------------------
// Settings — fully validated per-command configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct PrepareSettings {
    pub cache_dir: PathBuf,
    pub split: Split,
    pub serializer: SerializerOptions,
    pub output_dir: PathBuf,
    pub write_ids: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationTask {
    SpanExtraction,
    Generation,
}

#[derive(Clone, Debug)]
pub struct EvaluateSettings {
    pub cache_dir: PathBuf,
    pub split: Split,
    pub task: EvaluationTask,
    pub prediction_json: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

// ---------------------------------------------------------------------------
// Conversions — raw AppConfig into validated settings
// ---------------------------------------------------------------------------

pub fn into_prepare_settings(config: AppConfig) -> Result<PrepareSettings, anyhow::Error> {
    let prepare = config.prepare;
    ensure!(!prepare.roles.is_empty(), "at least one target role required");
    ensure!(
        !prepare.output_dir.as_os_str().is_empty(),
        "output_dir must not be empty"
    );
    ensure!(
        !prepare.simplify_da || prepare.include_da,
        "simplify_da requires include_da"
    );

    let mut seen_roles = HashSet::with_capacity(prepare.roles.len());
    let mut target_roles = Vec::with_capacity(prepare.roles.len());
    for raw in &prepare.roles {
        let role: Role = raw
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid target role {raw:?}"))?;
        ensure!(seen_roles.insert(role), "duplicate target role: {role}");
        target_roles.push(role);
    }

    let context_mode = if prepare.full_doc {
        ContextMode::FullDocument
    } else {
        ContextMode::Grounded
    };
    let dialogue_act = prepare.include_da.then_some(DialogueActOptions {
        simplify: prepare.simplify_da,
        splice: prepare.da_splice,
    });

    Ok(PrepareSettings {
        cache_dir: config.dataset.cache_dir,
        split: config.dataset.split,
        serializer: SerializerOptions {
            target_roles,
            context_mode,
            dialogue_act,
        },
        output_dir: prepare.output_dir,
        write_ids: prepare.write_ids,
    })
}

pub fn into_evaluate_settings(config: AppConfig) -> Result<EvaluateSettings, anyhow::Error> {
    let Some(prediction_json) = config.evaluate.prediction_json else {
        anyhow::bail!("evaluate requires a prediction_json path");
    };
    ensure!(
        !prediction_json.as_os_str().is_empty(),
        "prediction_json must not be empty"
    );

    let task = match config.evaluate.task {
        TaskConfig::Subtask1 => EvaluationTask::SpanExtraction,
        TaskConfig::Subtask2 => EvaluationTask::Generation,
    };

    Ok(EvaluateSettings {
        cache_dir: config.dataset.cache_dir,
        split: config.dataset.split,
        task,
        prediction_json,
    })
}

pub fn into_log_settings(config: &AppConfig) -> Result<LogSettings, anyhow::Error> {
    let format = match config.logging.format.as_str() {
        "json" => LogFormat::Json,
        "pretty" => LogFormat::Pretty,
        other => anyhow::bail!("unknown log format {other:?}, expected \"json\" or \"pretty\""),
    };
    ensure!(
        !config.logging.level.trim().is_empty(),
        "log level must not be empty"
    );
    Ok(LogSettings {
        level: config.logging.level.clone(),
        format,
    })
}

/// Runs every validation `d2d validate` reports on. The evaluate section is
/// only checked once a prediction path is configured.
pub fn validate(config: &AppConfig) -> Result<(), anyhow::Error> {
    into_log_settings(config)?;
    into_prepare_settings(config.clone()).context("invalid [prepare] section")?;
    if config.evaluate.prediction_json.is_some() {
        into_evaluate_settings(config.clone()).context("invalid [evaluate] section")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
