use std::collections::BTreeMap;

use crate::core::{DocId, SectionId};

/// Delimiter between blocks, and the replacement for line breaks inside one.
pub const BLOCK_DELIMITER: &str = "\t";

pub const TAG_LAST_TURN: &str = "last_turn";
pub const TAG_TITLE: &str = "title";
pub const TAG_DOC_CONTEXT: &str = "doc_context";
pub const TAG_GROUNDING: &str = "grounding";
pub const TAG_DIALOGUE_ACT: &str = "da";

/// Label marking a reference that is cited but not used as grounding text.
pub const NON_GROUNDING_LABEL: &str = "reference";

/// Flattens `text` onto a single line: line breaks become tabs, then trimmed.
pub fn text_to_line(text: &str) -> String {
    text.replace(['\n', '\r'], BLOCK_DELIMITER).trim().to_owned()
}

/// Returns the text of a rendered block, dropping its `<tag>` prefix.
pub fn strip_tag(rendered: &str) -> &str {
    rendered
        .split_once(BLOCK_DELIMITER)
        .map_or(rendered, |(_, text)| text)
}

// ---------------------------------------------------------------------------
// ContextBlock — a tagged unit of model input
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextBlock {
    tag: String,
    text: String,
}

impl ContextBlock {
    pub fn new(tag: impl Into<String>, text: &str) -> Self {
        Self {
            tag: tag.into(),
            text: text_to_line(text),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `<tag>\t{text}`
    pub fn render(&self) -> String {
        format!("<{}>{BLOCK_DELIMITER}{}", self.tag, self.text)
    }
}

// ---------------------------------------------------------------------------
// SectionRank — sort key placing title sections before body sections
// ---------------------------------------------------------------------------

/// Ranks are compared as strings, so `"10_1"` sorts before `"2_1"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SectionRank(String);

impl SectionRank {
    const TITLE_MARKER: char = 't';

    pub fn from_section_id(section_id: &SectionId) -> Self {
        let raw = section_id.as_str();
        if raw.starts_with(Self::TITLE_MARKER) {
            let root = raw.split_once('_').map_or(raw, |(_, rest)| rest);
            Self(format!("{root}_0"))
        } else {
            Self(format!("{raw}_1"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Emits a `title` + `doc_context` pair per ranked section, where each
/// `doc_context` holds every section text up to and including that rank.
pub fn cumulative_section_blocks(
    doc_id: &DocId,
    sections: &BTreeMap<SectionRank, String>,
) -> Vec<ContextBlock> {
    let mut blocks = Vec::with_capacity(sections.len() * 2);
    let mut seen: Vec<&str> = Vec::with_capacity(sections.len());
    for text in sections.values() {
        seen.push(text);
        let joined = seen.join(BLOCK_DELIMITER);
        blocks.push(ContextBlock::new(TAG_TITLE, doc_id.as_str()));
        blocks.push(ContextBlock::new(TAG_DOC_CONTEXT, &joined));
    }
    blocks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_line_replaces_breaks_and_trims() {
        assert_eq!(text_to_line("  a\nb\r\nc \n"), "a\tb\t\tc");
    }

    #[test]
    fn test_render_block() {
        let block = ContextBlock::new("user", "how do I\napply?");
        assert_eq!(block.render(), "<user>\thow do I\tapply?");
    }

    #[test]
    fn test_strip_tag_keeps_inner_tabs() {
        assert_eq!(strip_tag("<user>\ta\tb"), "a\tb");
        assert_eq!(strip_tag("no-tab"), "no-tab");
        assert_eq!(strip_tag("<agent>\t"), "");
    }

    #[test]
    fn test_section_rank_title_and_body() {
        let title = SectionRank::from_section_id(&SectionId::new("t_3"));
        let body = SectionRank::from_section_id(&SectionId::new("3"));
        assert_eq!(title.as_str(), "3_0");
        assert_eq!(body.as_str(), "3_1");
        assert!(title < body);
    }

    #[test]
    fn test_section_rank_title_without_separator() {
        let rank = SectionRank::from_section_id(&SectionId::new("t7"));
        assert_eq!(rank.as_str(), "t7_0");
    }

    #[test]
    fn test_section_rank_title_sorts_first_for_every_root() {
        for root in ["0", "1", "9", "12", "104"] {
            let title = SectionRank::from_section_id(&SectionId::new(format!("t_{root}")));
            let body = SectionRank::from_section_id(&SectionId::new(root));
            assert!(title < body, "title rank for root {root} must sort first");
        }
    }

    #[test]
    fn test_cumulative_section_blocks_grow() {
        let mut sections = BTreeMap::new();
        sections.insert(
            SectionRank::from_section_id(&SectionId::new("2")),
            "body two".to_owned(),
        );
        sections.insert(
            SectionRank::from_section_id(&SectionId::new("t_2")),
            "Title two".to_owned(),
        );

        let rendered: Vec<String> = cumulative_section_blocks(&DocId::new("doc-a"), &sections)
            .iter()
            .map(ContextBlock::render)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "<title>\tdoc-a",
                "<doc_context>\tTitle two",
                "<title>\tdoc-a",
                "<doc_context>\tTitle two\tbody two",
            ]
        );
    }

    #[test]
    fn test_cumulative_section_blocks_empty() {
        let blocks = cumulative_section_blocks(&DocId::new("doc-a"), &BTreeMap::new());
        assert!(blocks.is_empty());
    }
}
