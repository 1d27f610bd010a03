#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use d2d_cli::config::AppConfig;
use serde_json::{json, Value};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TestDataset — temporary `{domain}/{split}.json` tree, removed on drop
// ---------------------------------------------------------------------------

pub struct TestDataset {
    root: PathBuf,
}

impl TestDataset {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("d2d-it-{}", Uuid::new_v4()));
        fs::create_dir_all(&root).expect("create dataset root");
        Self { root }
    }

    /// Renewal document plus one validation dialogue and its RC questions.
    pub fn standard() -> Self {
        let dataset = Self::new();
        dataset.write("document_domain", "train", &json!([sample_document()]));
        dataset.write("dialogue_domain", "validation", &json!([sample_dialogue()]));
        dataset.write("doc2dial_rc", "validation", &sample_rc_examples());
        dataset
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    pub fn write(&self, domain: &str, split: &str, records: &Value) {
        let dir = self.cache_dir().join(domain);
        fs::create_dir_all(&dir).expect("create domain dir");
        fs::write(
            dir.join(format!("{split}.json")),
            serde_json::to_string_pretty(records).expect("serialize records"),
        )
        .expect("write split file");
    }

    pub fn write_predictions(&self, name: &str, predictions: &Value) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, predictions.to_string()).expect("write predictions");
        path
    }

    /// Default config pointed at this dataset.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.dataset.cache_dir = self.cache_dir();
        config.prepare.output_dir = self.output_dir();
        config
    }

    pub fn read_output(&self, file_name: &str) -> String {
        fs::read_to_string(self.output_dir().join(file_name)).expect("read output file")
    }
}

impl Drop for TestDataset {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.root).ok();
    }
}

// ---------------------------------------------------------------------------
// Sample records
// ---------------------------------------------------------------------------

pub const DOC_ID: &str = "Renew licence#1_0";

pub fn sample_document() -> Value {
    json!({
        "doc_id": DOC_ID,
        "domain": "dmv",
        "title": "Renew licence#1",
        "doc_text": "Renew your licence\nYou can renew online.\nEligibility\nYou must be a resident.",
        "spans": [
            {"id_sp": "1", "tag": "h2", "id_sec": "t_1",
             "text_sec": "Renew your licence", "text_sp": "Renew your licence"},
            {"id_sp": "2", "tag": "u", "id_sec": "1",
             "text_sec": "You can renew online.", "text_sp": "renew online"},
            {"id_sp": "3", "tag": "h2", "id_sec": "t_2",
             "text_sec": "Eligibility", "text_sp": "Eligibility"},
            {"id_sp": "4", "tag": "u", "id_sec": "2",
             "text_sec": "You must be a resident.", "text_sp": "be a resident"}
        ]
    })
}

/// Agent turns 2, 4 and 6 carry generation ids `d1_1`, `d1_3` and `d1_5`.
pub fn sample_dialogue() -> Value {
    json!({
        "dial_id": "d1",
        "doc_id": DOC_ID,
        "domain": "dmv",
        "turns": [
            {"turn_id": 1, "role": "user", "da": "query_condition",
             "references": [{"sp_id": "1", "label": "precondition"}],
             "utterance": "Can I renew my licence?"},
            {"turn_id": 2, "role": "agent", "da": "respond_solution",
             "references": [{"sp_id": "2", "label": "solution"}],
             "utterance": "Yes, you can renew online."},
            {"turn_id": 3, "role": "user", "da": "query_condition",
             "references": [{"sp_id": "4", "label": "precondition"}],
             "utterance": "Do I need to live here?"},
            {"turn_id": 4, "role": "agent", "da": "respond_solution",
             "references": [{"sp_id": "4", "label": "precondition"}],
             "utterance": "You must be a resident."},
            {"turn_id": 5, "role": "user", "da": "thank",
             "references": [],
             "utterance": "Thanks"},
            {"turn_id": 6, "role": "agent", "da": "respond_thank",
             "references": [],
             "utterance": "You are welcome."}
        ]
    })
}

pub fn sample_rc_examples() -> Value {
    json!([
        {"id": "d1_q1", "title": DOC_ID, "context": "You can renew online.",
         "question": "Can I renew my licence?",
         "answers": {"text": ["renew online"], "answer_start": [8]}, "domain": "dmv"},
        {"id": "d1_q2", "title": DOC_ID, "context": "You must be a resident.",
         "question": "Do I need to live here?",
         "answers": {"text": ["be a resident"], "answer_start": [9]}, "domain": "dmv"}
    ])
}
