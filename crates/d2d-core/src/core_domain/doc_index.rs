use std::collections::HashMap;

use crate::core::{DocId, Document, SerializeError, Span, SpanId};

// ---------------------------------------------------------------------------
// IndexedDocument — full text plus spans keyed by id
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct IndexedDocument {
    text: String,
    spans: HashMap<SpanId, Span>,
}

impl IndexedDocument {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self, span_id: &SpanId) -> Option<&Span> {
        self.spans.get(span_id)
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }
}

// ---------------------------------------------------------------------------
// DocumentIndex — read-only lookup used by the context serializer
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct DocumentIndex {
    documents: HashMap<DocId, IndexedDocument>,
}

impl DocumentIndex {
    /// Indexes `documents`. A repeated doc id replaces the full text and
    /// merges spans, later spans winning on id collision.
    pub fn build(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut index: HashMap<DocId, IndexedDocument> = HashMap::new();
        for document in documents {
            let entry = index.entry(document.id).or_default();
            entry.text = document.text;
            for span in document.spans {
                entry.spans.insert(span.id.clone(), span);
            }
        }
        Self { documents: index }
    }

    pub fn document(&self, doc_id: &DocId) -> Result<&IndexedDocument, SerializeError> {
        self.documents
            .get(doc_id)
            .ok_or_else(|| SerializeError::UnknownDocument {
                doc_id: doc_id.clone(),
            })
    }

    pub fn span(&self, doc_id: &DocId, span_id: &SpanId) -> Result<&Span, SerializeError> {
        self.document(doc_id)?
            .span(span_id)
            .ok_or_else(|| SerializeError::UnknownSpan {
                doc_id: doc_id.clone(),
                span_id: span_id.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
