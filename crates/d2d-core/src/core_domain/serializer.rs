use std::collections::BTreeMap;

use crate::core::{
    cumulative_section_blocks, generation_example_id, strip_tag, text_to_line, ContextBlock,
    DaSplicePolicy, DatasetSource, Dialogue, DialogueActInput, DialogueActLabeler, DialogueTurn,
    Doc2DialActLabeler, DocId, DocumentIndex, PrepareError, ReferenceLabel, Role, SectionRank,
    SerializeError, Split, TrainingExample, BLOCK_DELIMITER, DOCUMENT_SPLIT, NON_GROUNDING_LABEL, TAG_DIALOGUE_ACT, TAG_DOC_CONTEXT,
    TAG_GROUNDING, TAG_LAST_TURN, TAG_TITLE,
};

// ---------------------------------------------------------------------------
// SerializerOptions
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextMode {
    /// Whole document text as one `doc_context` block.
    FullDocument,
    /// Only the sections referenced by the turn, plus a `grounding` block.
    Grounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialogueActOptions {
    pub simplify: bool,
    pub splice: DaSplicePolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializerOptions {
    pub target_roles: Vec<Role>,
    pub context_mode: ContextMode,
    pub dialogue_act: Option<DialogueActOptions>,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            target_roles: vec![Role::Agent],
            context_mode: ContextMode::FullDocument,
            dialogue_act: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Seq2SeqCorpus — parallel source/target lines
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seq2SeqCorpus {
    ids: Vec<String>,
    sources: Vec<String>,
    targets: Vec<String>,
}

impl Seq2SeqCorpus {
    pub fn new(
        ids: Vec<String>,
        sources: Vec<String>,
        targets: Vec<String>,
    ) -> Result<Self, SerializeError> {
        if sources.len() != targets.len() || ids.len() != sources.len() {
            return Err(SerializeError::CountMismatch {
                sources: sources.len(),
                targets: targets.len(),
            });
        }
        Ok(Self {
            ids,
            sources,
            targets,
        })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grounding — everything a turn's references contribute to its context
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Grounding {
    sections: BTreeMap<SectionRank, String>,
    span_texts: Vec<String>,
    label: ReferenceLabel,
}

// ---------------------------------------------------------------------------
// ContextSerializer
// ---------------------------------------------------------------------------

pub struct ContextSerializer<'a> {
    index: &'a DocumentIndex,
    options: SerializerOptions,
    labeler: &'a dyn DialogueActLabeler,
}

impl<'a> ContextSerializer<'a> {
    pub fn new(index: &'a DocumentIndex, options: SerializerOptions) -> Self {
        Self {
            index,
            options,
            labeler: &Doc2DialActLabeler,
        }
    }

    pub fn with_labeler(self, labeler: &'a dyn DialogueActLabeler) -> Self {
        Self { labeler, ..self }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Serializes every dialogue, in order, into one corpus.
    pub fn serialize_all(&self, dialogues: &[Dialogue]) -> Result<Seq2SeqCorpus, SerializeError> {
        let mut ids = Vec::new();
        let mut sources = Vec::new();
        let mut targets = Vec::new();
        for dialogue in dialogues {
            for example in self.serialize_dialogue(dialogue)? {
                ids.push(example.id);
                sources.push(example.source);
                targets.push(example.target);
            }
        }
        Seq2SeqCorpus::new(ids, sources, targets)
    }

    /// Walks the turns of `dialogue`, emitting one example per target turn.
    pub fn serialize_dialogue(
        &self,
        dialogue: &Dialogue,
    ) -> Result<Vec<TrainingExample>, SerializeError> {
        let mut history: Vec<String> = Vec::with_capacity(dialogue.turns.len());
        let mut examples = Vec::new();

        for turn in &dialogue.turns {
            let utterance = text_to_line(&turn.utterance);

            if self.is_target(turn) {
                let source = self.build_source(dialogue, turn, &history)?;
                examples.push(TrainingExample {
                    id: generation_example_id(&dialogue.id, turn.turn_id),
                    source,
                    target: utterance.clone(),
                });
            }

            history.push(ContextBlock::new(turn.role.as_str(), &utterance).render());
        }

        Ok(examples)
    }

    fn is_target(&self, turn: &DialogueTurn) -> bool {
        !turn.references.is_empty() && self.options.target_roles.contains(&turn.role)
    }

    fn build_source(
        &self,
        dialogue: &Dialogue,
        turn: &DialogueTurn,
        history: &[String],
    ) -> Result<String, SerializeError> {
        let last = history
            .last()
            .ok_or_else(|| SerializeError::MissingPrecedingTurn {
                dial_id: dialogue.id.clone(),
                turn_id: turn.turn_id,
            })?;

        let mut segments = Vec::with_capacity(history.len() + 8);
        segments.push(ContextBlock::new(TAG_LAST_TURN, strip_tag(last)).render());
        segments.extend(history.iter().rev().cloned());

        let reference_label = match self.options.context_mode {
            ContextMode::FullDocument => {
                let document = self.index.document(&dialogue.doc_id)?;
                segments.push(ContextBlock::new(TAG_TITLE, dialogue.doc_id.as_str()).render());
                segments.push(ContextBlock::new(TAG_DOC_CONTEXT, document.text()).render());
                ReferenceLabel::Unset
            }
            ContextMode::Grounded => {
                let grounding = self.resolve_grounding(&dialogue.doc_id, turn)?;
                segments.extend(
                    cumulative_section_blocks(&dialogue.doc_id, &grounding.sections)
                        .iter()
                        .map(ContextBlock::render),
                );
                let grounding_text = grounding.span_texts.join(BLOCK_DELIMITER);
                segments.push(ContextBlock::new(TAG_GROUNDING, &grounding_text).render());
                grounding.label
            }
        };

        if let Some(da) = self.options.dialogue_act {
            let label = self.labeler.label(&DialogueActInput {
                raw_act: &turn.dialogue_act,
                role: turn.role,
                turn_id: turn.turn_id,
                reference_label,
                simplify: da.simplify,
            });
            let rendered = ContextBlock::new(TAG_DIALOGUE_ACT, &label).render();
            da.splice.splice(&mut segments, rendered);
        }

        Ok(segments.join(BLOCK_DELIMITER))
    }

    fn resolve_grounding(
        &self,
        doc_id: &DocId,
        turn: &DialogueTurn,
    ) -> Result<Grounding, SerializeError> {
        let mut grounding = Grounding::default();
        for reference in &turn.references {
            let span = self.index.span(doc_id, &reference.span_id)?;
            grounding.sections.insert(
                SectionRank::from_section_id(&span.section_id),
                span.section_text.clone(),
            );
            grounding.label = grounding.label.absorb(&reference.label);
            if !reference.label.contains(NON_GROUNDING_LABEL) {
                grounding.span_texts.push(span.text.clone());
            }
        }
        Ok(grounding)
    }
}

// ---------------------------------------------------------------------------
// prepare_corpus — dataset to seq2seq corpus
// ---------------------------------------------------------------------------

/// Indexes every document, then serializes the dialogues of `split`.
pub fn prepare_corpus(
    source: &dyn DatasetSource,
    split: Split,
    options: SerializerOptions,
) -> Result<Seq2SeqCorpus, PrepareError> {
    let index = DocumentIndex::build(source.documents(DOCUMENT_SPLIT)?);
    let dialogues = source.dialogues(split)?;
    let corpus = ContextSerializer::new(&index, options).serialize_all(&dialogues)?;
    Ok(corpus)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
