use std::path::{Path, PathBuf};

use d2d_core::core::{DaSplicePolicy, Split};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub prepare: PrepareConfig,
    #[serde(default)]
    pub evaluate: EvaluateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory holding `{domain}/{split}.json` exports.
    pub cache_dir: PathBuf,
    pub split: Split,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            split: Split::Validation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    pub roles: Vec<String>,
    pub full_doc: bool,
    pub include_da: bool,
    pub simplify_da: bool,
    pub da_splice: DaSplicePolicy,
    pub output_dir: PathBuf,
    pub write_ids: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            roles: vec!["agent".to_owned()],
            full_doc: true,
            include_da: false,
            simplify_da: false,
            da_splice: DaSplicePolicy::default(),
            output_dir: PathBuf::from("seq2seq"),
            write_ids: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EvaluateConfig {
    pub task: TaskConfig,
    pub prediction_json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskConfig {
    /// Span extraction scored with SQuAD v2.
    #[default]
    Subtask1,
    /// Response generation scored with BLEU.
    Subtask2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "json".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests;
