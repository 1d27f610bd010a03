use super::*;

#[test]
fn test_parse_full_config() {
    let toml_str = r#"
[dataset]
cache_dir = "/srv/doc2dial"
split = "test"

[prepare]
roles = ["agent", "user"]
full_doc = false
include_da = true
simplify_da = true
da_splice = "block"
output_dir = "out/seq2seq"
write_ids = true

[evaluate]
task = "subtask2"
prediction_json = "preds/generation.json"

[logging]
level = "debug"
format = "pretty"
"#;

    let config: AppConfig = toml::from_str(toml_str).unwrap();

    assert_eq!(config.dataset.cache_dir, PathBuf::from("/srv/doc2dial"));
    assert_eq!(config.dataset.split, Split::Test);

    assert_eq!(config.prepare.roles, vec!["agent", "user"]);
    assert!(!config.prepare.full_doc);
    assert!(config.prepare.include_da);
    assert!(config.prepare.simplify_da);
    assert_eq!(config.prepare.da_splice, DaSplicePolicy::Block);
    assert_eq!(config.prepare.output_dir, PathBuf::from("out/seq2seq"));
    assert!(config.prepare.write_ids);

    assert_eq!(config.evaluate.task, TaskConfig::Subtask2);
    assert_eq!(
        config.evaluate.prediction_json,
        Some(PathBuf::from("preds/generation.json"))
    );

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn test_defaults_applied() {
    let config: AppConfig = toml::from_str("").unwrap();

    // DatasetConfig defaults
    assert_eq!(config.dataset.cache_dir, PathBuf::from("data"));
    assert_eq!(config.dataset.split, Split::Validation);

    // PrepareConfig defaults
    assert_eq!(config.prepare.roles, vec!["agent"]);
    assert!(config.prepare.full_doc);
    assert!(!config.prepare.include_da);
    assert!(!config.prepare.simplify_da);
    assert_eq!(config.prepare.da_splice, DaSplicePolicy::Characters);
    assert!(!config.prepare.write_ids);

    // EvaluateConfig defaults
    assert_eq!(config.evaluate.task, TaskConfig::Subtask1);
    assert!(config.evaluate.prediction_json.is_none());

    // LoggingConfig defaults
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let toml_str = r#"
[prepare]
include_da = true
"#;

    let config: AppConfig = toml::from_str(toml_str).unwrap();

    assert!(config.prepare.include_da);
    assert!(config.prepare.full_doc);
    assert_eq!(config.prepare.roles, vec!["agent"]);
}

#[test]
fn test_unknown_split_rejected() {
    let toml_str = r#"
[dataset]
split = "dev"
"#;

    assert!(toml::from_str::<AppConfig>(toml_str).is_err());
}

#[test]
fn test_unknown_task_rejected() {
    let toml_str = r#"
[evaluate]
task = "subtask3"
"#;

    assert!(toml::from_str::<AppConfig>(toml_str).is_err());
}

#[test]
fn test_from_file_missing() {
    let result = AppConfig::from_file(Path::new("/nonexistent/d2d-config.toml"));
    assert!(result.is_err());
}
