use serde::Deserialize;

use crate::core::{DialogueActInput, DialogueActLabeler};

// ---------------------------------------------------------------------------
// ReferenceLabel — grounding role derived from a turn's references
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceLabel {
    #[default]
    Unset,
    Solution,
    Precondition,
}

impl ReferenceLabel {
    /// Folds one reference label into the running value. "solution" is
    /// checked before "precondition"; a later match overrides an earlier one
    /// and a non-matching label leaves the value untouched.
    pub fn absorb(self, label: &str) -> Self {
        if label.contains("solution") {
            Self::Solution
        } else if label.contains("precondition") {
            Self::Precondition
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Solution => "solution",
            Self::Precondition => "precondition",
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

// ---------------------------------------------------------------------------
// DaSplicePolicy — how the `da` block enters the context
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DaSplicePolicy {
    /// Every character of the rendered block becomes its own element, so the
    /// final tab join separates the characters. Matches the published data.
    #[default]
    Characters,
    /// The rendered block is appended as a single element.
    Block,
}

impl DaSplicePolicy {
    pub fn splice(&self, segments: &mut Vec<String>, rendered: String) {
        match self {
            Self::Characters => segments.extend(rendered.chars().map(String::from)),
            Self::Block => segments.push(rendered),
        }
    }
}

// ---------------------------------------------------------------------------
// Doc2DialActLabeler — default `da` labels
// ---------------------------------------------------------------------------

/// Produces `{role}_{act}`. A simplified act keeps only its leading segment
/// (`respond_solution` -> `respond`); a set reference label is appended unless
/// the act already names it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Doc2DialActLabeler;

impl DialogueActLabeler for Doc2DialActLabeler {
    fn label(&self, input: &DialogueActInput<'_>) -> String {
        let raw = input.raw_act.trim();
        let mut act = if raw.is_empty() {
            "none".to_owned()
        } else if input.simplify {
            raw.split(['_', '/']).next().unwrap_or(raw).to_owned()
        } else {
            raw.to_owned()
        };

        let label = input.reference_label.as_str();
        if input.reference_label.is_set() && !act.contains(label) {
            act.push('_');
            act.push_str(label);
        }

        format!("{}_{act}", input.role)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Role, TurnId};

    fn input(raw_act: &str, label: ReferenceLabel, simplify: bool) -> DialogueActInput<'_> {
        DialogueActInput {
            raw_act,
            role: Role::Agent,
            turn_id: TurnId::new(2),
            reference_label: label,
            simplify,
        }
    }

    #[test]
    fn test_reference_label_last_match_wins() {
        let label = ReferenceLabel::Unset.absorb("solution").absorb("precondition");
        assert_eq!(label, ReferenceLabel::Precondition);

        let label = ReferenceLabel::Unset.absorb("precondition").absorb("solution");
        assert_eq!(label, ReferenceLabel::Solution);
    }

    #[test]
    fn test_reference_label_non_matching_keeps_value() {
        let label = ReferenceLabel::Unset.absorb("solution").absorb("reference");
        assert_eq!(label, ReferenceLabel::Solution);
        assert_eq!(
            ReferenceLabel::Unset.absorb("reference"),
            ReferenceLabel::Unset
        );
    }

    #[test]
    fn test_reference_label_solution_checked_first() {
        let label = ReferenceLabel::Unset.absorb("solution/precondition");
        assert_eq!(label, ReferenceLabel::Solution);
    }

    #[test]
    fn test_splice_characters() {
        let mut segments = vec!["<last_turn>\thi".to_owned()];
        DaSplicePolicy::Characters.splice(&mut segments, "<da>\tx".to_owned());
        assert_eq!(segments.len(), 7);
        assert_eq!(segments.join("\t"), "<last_turn>\thi\t<\td\ta\t>\t\t\tx");
    }

    #[test]
    fn test_splice_block() {
        let mut segments = vec!["<last_turn>\thi".to_owned()];
        DaSplicePolicy::Block.splice(&mut segments, "<da>\tx".to_owned());
        assert_eq!(segments, vec!["<last_turn>\thi", "<da>\tx"]);
    }

    #[test]
    fn test_labeler_full_act_with_label() {
        let label =
            Doc2DialActLabeler.label(&input("respond_solution", ReferenceLabel::Solution, false));
        assert_eq!(label, "agent_respond_solution");

        let label =
            Doc2DialActLabeler.label(&input("query_condition", ReferenceLabel::Precondition, false));
        assert_eq!(label, "agent_query_condition_precondition");
    }

    #[test]
    fn test_labeler_simplified() {
        let label =
            Doc2DialActLabeler.label(&input("respond_solution", ReferenceLabel::Solution, true));
        assert_eq!(label, "agent_respond_solution");

        let label =
            Doc2DialActLabeler.label(&input("respond_solution", ReferenceLabel::Unset, true));
        assert_eq!(label, "agent_respond");
    }

    #[test]
    fn test_labeler_empty_act() {
        let label =
            Doc2DialActLabeler.label(&input("  ", ReferenceLabel::Unset, false));
        assert_eq!(label, "agent_none");
    }
}
