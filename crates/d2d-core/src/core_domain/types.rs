use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// String-based identity newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(DocId);
string_newtype!(DialogueId);
string_newtype!(SpanId);
string_newtype!(SectionId);

// ---------------------------------------------------------------------------
// TurnId — position of a turn inside its dialogue (1-based in doc2dial)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurnId(u32);

impl TurnId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier a generation prediction carries for the agent turn `turn_id`.
///
/// Predictions are keyed by the context that precedes the agent turn, so the
/// id uses `turn_id - 1`.
pub fn generation_example_id(dial_id: &DialogueId, turn_id: TurnId) -> String {
    format!("{dial_id}_{}", i64::from(turn_id.value()) - 1)
}

// ---------------------------------------------------------------------------
// Role — who produced a turn
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agent,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(Self::Agent),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role {other:?}, expected \"agent\" or \"user\"")),
        }
    }
}

// ---------------------------------------------------------------------------
// Split / Domain — dataset partitioning
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    #[default]
    Validation,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }

    /// Stem used for seq2seq output files (`validation` is shortened to `val`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Validation => "val",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Self::Train),
            "validation" => Ok(Self::Validation),
            "test" => Ok(Self::Test),
            other => Err(format!(
                "unknown split {other:?}, expected \"train\", \"validation\" or \"test\""
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    Document,
    Dialogue,
    ReadingComprehension,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document_domain",
            Self::Dialogue => "dialogue_domain",
            Self::ReadingComprehension => "doc2dial_rc",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub id: SpanId,
    pub section_id: SectionId,
    pub section_text: String,
    pub text: String,
    /// Semantic role of the span, e.g. "solution", "precondition", "reference".
    pub tag: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    pub spans: Vec<Span>,
}

// ---------------------------------------------------------------------------
// Dialogues
// ---------------------------------------------------------------------------

/// A grounding link from a turn to a document span.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub span_id: SpanId,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DialogueTurn {
    pub turn_id: TurnId,
    pub role: Role,
    pub utterance: String,
    pub dialogue_act: String,
    pub references: Vec<Reference>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dialogue {
    pub id: DialogueId,
    pub doc_id: DocId,
    pub turns: Vec<DialogueTurn>,
}

// ---------------------------------------------------------------------------
// Seq2seq examples
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingExample {
    pub id: String,
    pub source: String,
    pub target: String,
}

// ---------------------------------------------------------------------------
// Predictions and references
// ---------------------------------------------------------------------------

/// Subtask1 prediction. Only `id` is required for alignment.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpanPrediction {
    pub id: String,
    #[serde(default)]
    pub prediction_text: String,
    #[serde(default)]
    pub no_answer_probability: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub text: Vec<String>,
    pub answer_start: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpanReference {
    pub id: String,
    pub answers: Answers,
}

/// Subtask2 prediction: a generated agent utterance.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GenerationPrediction {
    pub id: String,
    pub utterance: String,
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Span-extraction metrics on a 0–100 scale.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpanScores {
    pub exact: f64,
    pub f1: f64,
    pub total: usize,
    #[serde(rename = "HasAns_exact", skip_serializing_if = "Option::is_none")]
    pub has_ans_exact: Option<f64>,
    #[serde(rename = "HasAns_f1", skip_serializing_if = "Option::is_none")]
    pub has_ans_f1: Option<f64>,
    #[serde(rename = "HasAns_total", skip_serializing_if = "Option::is_none")]
    pub has_ans_total: Option<usize>,
    #[serde(rename = "NoAns_exact", skip_serializing_if = "Option::is_none")]
    pub no_ans_exact: Option<f64>,
    #[serde(rename = "NoAns_f1", skip_serializing_if = "Option::is_none")]
    pub no_ans_f1: Option<f64>,
    #[serde(rename = "NoAns_total", skip_serializing_if = "Option::is_none")]
    pub no_ans_total: Option<usize>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
