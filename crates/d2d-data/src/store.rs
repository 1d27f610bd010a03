use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use d2d_core::core::{DatasetError, DatasetSource, Dialogue, Document, Domain, SpanReference, Split};
use serde::de::DeserializeOwned;

use crate::models::{RawDialogue, RawDocument, RcExample};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed json in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a JSON array of `T` from `path`.
pub(crate) fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// JsonDatasetStore — doc2dial domains exported as `{root}/{domain}/{split}.json`
// ---------------------------------------------------------------------------

pub struct JsonDatasetStore {
    root: PathBuf,
}

impl JsonDatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split_path(&self, domain: Domain, split: Split) -> PathBuf {
        self.root
            .join(domain.as_str())
            .join(format!("{}.json", split.as_str()))
    }

    fn load<T: DeserializeOwned>(
        &self,
        domain: Domain,
        split: Split,
    ) -> Result<Vec<T>, DatasetError> {
        let path = self.split_path(domain, split);
        let records = read_json_array(&path).map_err(|err| match err {
            DataError::Malformed { .. } => DatasetError::Malformed {
                domain,
                split,
                reason: err.to_string(),
            },
            DataError::Io { .. } => DatasetError::Unavailable {
                domain,
                split,
                reason: err.to_string(),
            },
        })?;
        tracing::debug!(
            domain = domain.as_str(),
            split = split.as_str(),
            records = records.len(),
            path = %path.display(),
            "loaded dataset split"
        );
        Ok(records)
    }
}

impl DatasetSource for JsonDatasetStore {
    fn documents(&self, split: Split) -> Result<Vec<Document>, DatasetError> {
        let raw: Vec<RawDocument> = self.load(Domain::Document, split)?;
        Ok(raw.into_iter().map(Document::from).collect())
    }

    fn dialogues(&self, split: Split) -> Result<Vec<Dialogue>, DatasetError> {
        let raw: Vec<RawDialogue> = self.load(Domain::Dialogue, split)?;
        Ok(raw.into_iter().map(Dialogue::from).collect())
    }

    fn span_references(&self, split: Split) -> Result<Vec<SpanReference>, DatasetError> {
        let raw: Vec<RcExample> = self.load(Domain::ReadingComprehension, split)?;
        Ok(raw.into_iter().map(SpanReference::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use d2d_core::core::{DialogueId, DocId, DOCUMENT_SPLIT};
    use uuid::Uuid;

    use super::*;

    fn temp_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("d2d-store-{}", Uuid::new_v4()));
        fs::create_dir_all(&root).expect("create temp root");
        root
    }

    fn write_split(root: &Path, domain: Domain, split: Split, body: &str) {
        let dir = root.join(domain.as_str());
        fs::create_dir_all(&dir).expect("create domain dir");
        fs::write(dir.join(format!("{}.json", split.as_str())), body).expect("write split");
    }

    #[test]
    fn test_split_path_layout() {
        let store = JsonDatasetStore::new("/data/doc2dial");
        assert_eq!(
            store.split_path(Domain::Dialogue, Split::Validation),
            PathBuf::from("/data/doc2dial/dialogue_domain/validation.json")
        );
        assert_eq!(
            store.split_path(Domain::ReadingComprehension, Split::Test),
            PathBuf::from("/data/doc2dial/doc2dial_rc/test.json")
        );
    }

    #[test]
    fn test_load_documents_and_dialogues() {
        let root = temp_root();
        write_split(
            &root,
            Domain::Document,
            DOCUMENT_SPLIT,
            r#"[{"doc_id": "doc-a", "doc_text": "Text", "spans": [
                {"id_sp": "1", "id_sec": "t_0", "text_sec": "Title", "text_sp": "Title", "tag": "h2"}
            ]}]"#,
        );
        write_split(
            &root,
            Domain::Dialogue,
            Split::Validation,
            r#"[{"dial_id": "d1", "doc_id": "doc-a", "turns": [
                {"turn_id": 1, "role": "user", "da": "query", "references": [], "utterance": "hi"}
            ]}]"#,
        );

        let store = JsonDatasetStore::new(&root);
        let documents = store.documents(DOCUMENT_SPLIT).expect("documents");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, DocId::new("doc-a"));
        assert_eq!(documents[0].spans.len(), 1);

        let dialogues = store.dialogues(Split::Validation).expect("dialogues");
        assert_eq!(dialogues.len(), 1);
        assert_eq!(dialogues[0].id, DialogueId::new("d1"));

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_load_span_references() {
        let root = temp_root();
        write_split(
            &root,
            Domain::ReadingComprehension,
            Split::Validation,
            r#"[{"id": "d1_q1", "answers": {"text": ["yes"], "answer_start": [3]}}]"#,
        );

        let store = JsonDatasetStore::new(&root);
        let references = store.span_references(Split::Validation).expect("references");
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].id, "d1_q1");
        assert_eq!(references[0].answers.answer_start, vec![3]);

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_missing_split_is_unavailable() {
        let root = temp_root();
        let store = JsonDatasetStore::new(&root);

        let err = store.dialogues(Split::Test).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Unavailable {
                domain: Domain::Dialogue,
                split: Split::Test,
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to read dialogue_domain/test"));

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_malformed_split() {
        let root = temp_root();
        write_split(&root, Domain::Dialogue, Split::Train, r#"[{"dial_id": 7}]"#);

        let store = JsonDatasetStore::new(&root);
        let err = store.dialogues(Split::Train).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));

        fs::remove_dir_all(root).ok();
    }
}
