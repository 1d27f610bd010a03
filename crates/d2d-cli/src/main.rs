use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use d2d_cli::bootstrap;
use d2d_cli::config::{AppConfig, TaskConfig};
use d2d_cli::logging;
use d2d_cli::pipeline;
use d2d_core::core::{DaSplicePolicy, Split};
use d2d_data::JsonDatasetStore;

#[derive(Parser)]
#[command(name = "d2d", about = "doc2dial seq2seq preparation and evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Write `{split}.source` / `{split}.target` files for seq2seq training.
    Prepare(PrepareArgs),
    /// Score a prediction file against the gold split.
    Evaluate(EvaluateArgs),
    /// Validate configuration file and exit.
    Validate,
}

#[derive(Args)]
struct DatasetArgs {
    /// Directory holding `{domain}/{split}.json` exports.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Dataset split: train, validation or test.
    #[arg(long)]
    split: Option<Split>,
}

#[derive(Args)]
struct PrepareArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Role whose turns become targets; repeat for several roles.
    #[arg(long = "role")]
    roles: Vec<String>,

    /// Use the whole document as context instead of the grounded sections.
    #[arg(long)]
    full_doc: Option<bool>,

    /// Append a dialogue-act block to every source.
    #[arg(long)]
    include_da: Option<bool>,

    /// Keep only the leading segment of each dialogue act.
    #[arg(long)]
    simplify_da: Option<bool>,

    #[arg(long, value_enum)]
    da_splice: Option<SpliceArg>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write `{split}.id` with one example id per line.
    #[arg(long)]
    write_ids: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[arg(long, value_enum)]
    task: Option<TaskConfig>,

    /// JSON array of predictions.
    #[arg(long)]
    prediction_json: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SpliceArg {
    Characters,
    Block,
}

impl From<SpliceArg> for DaSplicePolicy {
    fn from(arg: SpliceArg) -> Self {
        match arg {
            SpliceArg::Characters => DaSplicePolicy::Characters,
            SpliceArg::Block => DaSplicePolicy::Block,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Validate => run_validate(cli.config.as_deref(), &config),
        Command::Prepare(args) => run_prepare(config, args),
        Command::Evaluate(args) => run_evaluate(config, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, anyhow::Error> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn apply_dataset_args(config: &mut AppConfig, args: DatasetArgs) {
    if let Some(cache_dir) = args.cache_dir {
        config.dataset.cache_dir = cache_dir;
    }
    if let Some(split) = args.split {
        config.dataset.split = split;
    }
}

fn init_logging(config: &AppConfig) -> Result<(), anyhow::Error> {
    let settings = bootstrap::into_log_settings(config)?;
    logging::init(&settings);
    Ok(())
}

fn run_validate(path: Option<&Path>, config: &AppConfig) -> Result<(), anyhow::Error> {
    bootstrap::validate(config).context("Config invalid")?;
    match path {
        Some(path) => println!("Config valid: {}", path.display()),
        None => println!("Config valid: built-in defaults"),
    }
    Ok(())
}

fn run_prepare(mut config: AppConfig, args: PrepareArgs) -> Result<(), anyhow::Error> {
    apply_dataset_args(&mut config, args.dataset);
    let prepare = &mut config.prepare;
    if !args.roles.is_empty() {
        prepare.roles = args.roles;
    }
    if let Some(full_doc) = args.full_doc {
        prepare.full_doc = full_doc;
    }
    if let Some(include_da) = args.include_da {
        prepare.include_da = include_da;
    }
    if let Some(simplify_da) = args.simplify_da {
        prepare.simplify_da = simplify_da;
    }
    if let Some(splice) = args.da_splice {
        prepare.da_splice = splice.into();
    }
    if let Some(output_dir) = args.output_dir {
        prepare.output_dir = output_dir;
    }
    if args.write_ids {
        prepare.write_ids = true;
    }

    init_logging(&config)?;
    let settings = bootstrap::into_prepare_settings(config)?;
    let store = JsonDatasetStore::new(&settings.cache_dir);
    let report = pipeline::run_prepare(&settings, &store)?;

    println!(
        "Wrote {} examples to {} and {}",
        report.examples,
        report.paths.source.display(),
        report.paths.target.display()
    );
    Ok(())
}

fn run_evaluate(mut config: AppConfig, args: EvaluateArgs) -> Result<(), anyhow::Error> {
    apply_dataset_args(&mut config, args.dataset);
    if let Some(task) = args.task {
        config.evaluate.task = task;
    }
    if let Some(prediction_json) = args.prediction_json {
        config.evaluate.prediction_json = Some(prediction_json);
    }

    init_logging(&config)?;
    let settings = bootstrap::into_evaluate_settings(config)?;
    let store = JsonDatasetStore::new(&settings.cache_dir);
    let report = pipeline::run_evaluate(&settings, &store)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
