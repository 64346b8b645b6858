//! Rich text document model.
//!
//! Documents arrive as a JSON array of typed blocks. Parsing never fails on
//! content: a block that is not a recognised text block (or is malformed)
//! becomes an [`UnknownBlock`] holding whatever plain text it contains.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Ordered sequence of rich text blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichTextDocument {
    blocks: Vec<Block>,
}

impl RichTextDocument {
    /// Build a document from raw JSON.
    ///
    /// Arrays become one block per element; `null` is an empty document; any
    /// other value is a single unknown block.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let blocks = match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items.into_iter().map(Block::from_value).collect(),
            other => vec![Block::from_value(other)],
        };
        Self { blocks }
    }

    /// Blocks in source order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// True if the document has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<Block> for RichTextDocument {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RichTextDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// One top-level block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Paragraph, heading, quote or list item.
    Text(TextBlock),
    /// Anything else, reduced to its text.
    Unknown(UnknownBlock),
}

impl Block {
    /// Classify a raw block.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let block_type = value
            .get("_type")
            .and_then(Value::as_str)
            .map(str::to_owned);

        if block_type.as_deref() == Some("block") {
            match TextBlock::deserialize(&value) {
                Ok(block) => return Self::Text(block),
                Err(err) => {
                    tracing::debug!(error = %err, "Malformed text block, rendering as plain text");
                }
            }
        }

        let mut text = String::new();
        collect_text(&value, &mut text);
        Self::Unknown(UnknownBlock {
            block_type,
            text: text.trim().to_owned(),
        })
    }
}

/// Gather every string found under a `text` key, or the value itself if it
/// is a bare string.
fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => items.iter().for_each(|item| collect_text(item, out)),
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(s) if key == "text" => out.push_str(s),
                    Value::Array(_) | Value::Object(_) => collect_text(child, out),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// Block the renderer does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlock {
    /// Declared `_type`, if any.
    pub block_type: Option<String>,
    /// Plain text content, trimmed.
    pub text: String,
}

/// Text block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    /// Style name (`normal`, `h1`..`h6`, `blockquote`).
    #[serde(default)]
    pub style: Option<String>,
    /// List marker (`bullet`, `number`) when the block is a list item.
    #[serde(default)]
    pub list_item: Option<String>,
    /// Nesting level of a list item, starting at 1.
    #[serde(default)]
    pub level: Option<u32>,
    /// Inline content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Span>,
    /// Annotation definitions referenced by span marks.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mark_defs: Vec<MarkDef>,
}

/// Block-level style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `<p>`.
    Paragraph,
    /// `<h1>`..`<h6>`.
    Heading(u8),
    /// `<blockquote>`.
    Blockquote,
}

/// List flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `<ul>`.
    Unordered,
    /// `<ol>`.
    Ordered,
}

impl ListKind {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

impl TextBlock {
    /// Resolved style; unknown styles are paragraphs.
    #[must_use]
    pub fn block_style(&self) -> BlockStyle {
        match self.style.as_deref() {
            Some("h1") => BlockStyle::Heading(1),
            Some("h2") => BlockStyle::Heading(2),
            Some("h3") => BlockStyle::Heading(3),
            Some("h4") => BlockStyle::Heading(4),
            Some("h5") => BlockStyle::Heading(5),
            Some("h6") => BlockStyle::Heading(6),
            Some("blockquote") => BlockStyle::Blockquote,
            _ => BlockStyle::Paragraph,
        }
    }

    /// List flavour if this block is a list item. `number` is ordered,
    /// any other marker unordered.
    #[must_use]
    pub fn list_kind(&self) -> Option<ListKind> {
        self.list_item.as_deref().map(|marker| match marker {
            "number" => ListKind::Ordered,
            _ => ListKind::Unordered,
        })
    }

    /// List nesting level, at least 1.
    #[must_use]
    pub fn list_level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }

    /// Concatenated text of all spans.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Inline run of text with marks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Span {
    /// Declared `_type`; normally `span`.
    #[serde(rename = "_type", default)]
    pub span_type: Option<String>,
    /// Text content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Decorator names and mark definition keys.
    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

/// Annotation definition (links).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkDef {
    /// Key referenced from [`Span::marks`].
    #[serde(rename = "_key", default)]
    pub key: String,
    /// Annotation type (`link`).
    #[serde(rename = "_type", default)]
    pub def_type: String,
    /// Link target.
    #[serde(default)]
    pub href: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_null_is_empty_document() {
        let doc: RichTextDocument = serde_json::from_str("null").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_text_block_parsed() {
        let doc = RichTextDocument::from_value(json!([{
            "_type": "block",
            "_key": "a1",
            "style": "h3",
            "markDefs": null,
            "children": [{"_type": "span", "text": "Fees", "marks": []}]
        }]));

        let Block::Text(block) = &doc.blocks()[0] else {
            panic!("expected text block");
        };
        assert_eq!(block.block_style(), BlockStyle::Heading(3));
        assert_eq!(block.plain_text(), "Fees");
        assert!(block.mark_defs.is_empty());
    }

    #[test]
    fn test_list_item_fields() {
        let block: TextBlock = serde_json::from_value(json!({
            "listItem": "number",
            "level": 0,
            "children": []
        }))
        .unwrap();
        assert_eq!(block.list_kind(), Some(ListKind::Ordered));
        assert_eq!(block.list_level(), 1);
    }

    #[test]
    fn test_unknown_type_keeps_text() {
        let block = Block::from_value(json!({
            "_type": "callout",
            "tone": "warning",
            "content": [{"_type": "span", "text": "Apply early"}]
        }));
        assert_eq!(
            block,
            Block::Unknown(UnknownBlock {
                block_type: Some("callout".to_owned()),
                text: "Apply early".to_owned(),
            })
        );
    }

    #[test]
    fn test_malformed_text_block_falls_back() {
        let block = Block::from_value(json!({
            "_type": "block",
            "children": [{"_type": "span", "text": "ok"}, {"_type": "span", "text": 5}]
        }));
        assert!(matches!(block, Block::Unknown(ref u) if u.text == "ok"));
    }

    #[test]
    fn test_bare_string_is_unknown_text() {
        let doc = RichTextDocument::from_value(json!(["Valid passport"]));
        assert_eq!(
            doc.blocks(),
            &[Block::Unknown(UnknownBlock {
                block_type: None,
                text: "Valid passport".to_owned(),
            })]
        );
    }
}
