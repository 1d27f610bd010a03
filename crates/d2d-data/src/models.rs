use d2d_core::core::{
    Answers, Dialogue, DialogueId, DialogueTurn, DocId, Document, Reference, Role, SectionId, Span,
    SpanId, SpanReference, TurnId,
};
use serde::{Deserialize, Serialize};

/// A `document_domain` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub doc_id: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub title: String,
    pub doc_text: String,
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

/// A span of a `document_domain` record, with its enclosing section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSpan {
    pub id_sp: String,
    #[serde(default)]
    pub tag: String,
    pub id_sec: String,
    #[serde(default)]
    pub text_sec: String,
    pub text_sp: String,
}

/// A `dialogue_domain` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDialogue {
    pub dial_id: String,
    pub doc_id: String,
    #[serde(default)]
    pub domain: String,
    pub turns: Vec<RawTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTurn {
    pub turn_id: u32,
    pub role: Role,
    #[serde(default)]
    pub da: String,
    #[serde(default, alias = "reference")]
    pub references: Vec<RawReference>,
    pub utterance: String,
}

/// Turn grounding. Older dataset dumps spell the fields `keys`/`values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReference {
    #[serde(alias = "keys")]
    pub sp_id: String,
    #[serde(alias = "values")]
    pub label: String,
}

/// A `doc2dial_rc` (reading comprehension) record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RcExample {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub question: String,
    pub answers: Answers,
    #[serde(default)]
    pub domain: String,
}

impl From<RawSpan> for Span {
    fn from(raw: RawSpan) -> Self {
        Span {
            id: SpanId::new(raw.id_sp),
            section_id: SectionId::new(raw.id_sec),
            section_text: raw.text_sec,
            text: raw.text_sp,
            tag: raw.tag,
        }
    }
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        Document {
            id: DocId::new(raw.doc_id),
            text: raw.doc_text,
            spans: raw.spans.into_iter().map(Span::from).collect(),
        }
    }
}

impl From<RawTurn> for DialogueTurn {
    fn from(raw: RawTurn) -> Self {
        DialogueTurn {
            turn_id: TurnId::new(raw.turn_id),
            role: raw.role,
            utterance: raw.utterance,
            dialogue_act: raw.da,
            references: raw
                .references
                .into_iter()
                .map(|r| Reference {
                    span_id: SpanId::new(r.sp_id),
                    label: r.label,
                })
                .collect(),
        }
    }
}

impl From<RawDialogue> for Dialogue {
    fn from(raw: RawDialogue) -> Self {
        Dialogue {
            id: DialogueId::new(raw.dial_id),
            doc_id: DocId::new(raw.doc_id),
            turns: raw.turns.into_iter().map(DialogueTurn::from).collect(),
        }
    }
}

impl From<RcExample> for SpanReference {
    fn from(raw: RcExample) -> Self {
        SpanReference {
            id: raw.id,
            answers: raw.answers,
        }
    }
}
