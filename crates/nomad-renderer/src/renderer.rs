//! Block-by-block HTML rendering.

use std::fmt::Write;

use crate::document::{Block, BlockStyle, ListKind, MarkDef, RichTextDocument, Span, TextBlock};
use crate::html::{TrustedHtml, escape_html, safe_href};

/// Render a rich text document to HTML.
///
/// `None` yields empty output. Blocks are emitted in source order; runs of
/// consecutive list items are grouped into (possibly nested) `<ul>`/`<ol>`
/// elements. The transformation is total: unknown blocks degrade to a
/// paragraph of their plain text, and blocks without text emit nothing.
pub fn render(doc: Option<&RichTextDocument>) -> TrustedHtml {
    let Some(doc) = doc else {
        return TrustedHtml::empty();
    };

    let mut out = String::new();
    let mut lists = OpenLists::default();

    for block in doc.blocks() {
        match block {
            Block::Text(text) => match text.list_kind() {
                Some(kind) => lists.item(kind, text.list_level(), &render_inline(text), &mut out),
                None => {
                    lists.close_all(&mut out);
                    render_text_block(text, &mut out);
                }
            },
            Block::Unknown(unknown) => {
                lists.close_all(&mut out);
                if unknown.text.is_empty() {
                    tracing::debug!(block_type = ?unknown.block_type, "Skipping block without text");
                } else {
                    write!(out, "<p>{}</p>", escape_html(&unknown.text)).unwrap();
                }
            }
        }
    }
    lists.close_all(&mut out);

    TrustedHtml::from_rendered(out)
}

fn render_text_block(block: &TextBlock, out: &mut String) {
    let inline = render_inline(block);
    match block.block_style() {
        BlockStyle::Paragraph => write!(out, "<p>{inline}</p>").unwrap(),
        BlockStyle::Heading(level) => write!(out, "<h{level}>{inline}</h{level}>").unwrap(),
        BlockStyle::Blockquote => write!(out, "<blockquote>{inline}</blockquote>").unwrap(),
    }
}

/// Stack of currently open lists, innermost last.
///
/// While a list is open, its last `<li>` is also open so that a deeper list
/// nests inside it.
#[derive(Default)]
struct OpenLists {
    open: Vec<(ListKind, u32)>,
}

impl OpenLists {
    fn item(&mut self, kind: ListKind, level: u32, content: &str, out: &mut String) {
        // Close lists deeper than this item, and a same-level list of the other kind.
        while let Some(&(top_kind, top_level)) = self.open.last() {
            if top_level > level || (top_level == level && top_kind != kind) {
                self.close_one(out);
            } else {
                break;
            }
        }

        match self.open.last() {
            Some(&(_, top_level)) if top_level == level => out.push_str("</li>"),
            _ => {
                write!(out, "<{}>", kind.tag()).unwrap();
                self.open.push((kind, level));
            }
        }
        write!(out, "<li>{content}").unwrap();
    }

    fn close_one(&mut self, out: &mut String) {
        if let Some((kind, _)) = self.open.pop() {
            write!(out, "</li></{}>", kind.tag()).unwrap();
        }
    }

    fn close_all(&mut self, out: &mut String) {
        while !self.open.is_empty() {
            self.close_one(out);
        }
    }
}

/// Render the spans of a block.
fn render_inline(block: &TextBlock) -> String {
    let mut out = String::new();
    for span in &block.children {
        render_span(span, &block.mark_defs, &mut out);
    }
    out
}

fn render_span(span: &Span, defs: &[MarkDef], out: &mut String) {
    let mut opened: Vec<&'static str> = Vec::new();

    for mark in &span.marks {
        let decorator = match mark.as_str() {
            "strong" => Some("strong"),
            "em" => Some("em"),
            "code" => Some("code"),
            "underline" => Some("u"),
            "strike-through" => Some("s"),
            _ => None,
        };
        match decorator {
            Some(tag) => {
                write!(out, "<{tag}>").unwrap();
                opened.push(tag);
            }
            None if open_annotation(mark, defs, out) => opened.push("a"),
            None => {}
        }
    }

    out.push_str(&escape_html(&span.text).replace('\n', "<br>"));

    for tag in opened.iter().rev() {
        write!(out, "</{tag}>").unwrap();
    }
}

/// Open an `<a>` for a link annotation. Returns false when the key has no
/// usable link definition, in which case the text renders unwrapped.
fn open_annotation(key: &str, defs: &[MarkDef], out: &mut String) -> bool {
    let Some(def) = defs.iter().find(|d| d.key == key && d.def_type == "link") else {
        return false;
    };
    let Some(href) = def.href.as_deref().and_then(safe_href) else {
        tracing::debug!(key, "Dropping link with disallowed target");
        return false;
    };

    write!(out, "<a href=\"{}\"", escape_html(href.href)).unwrap();
    if href.external {
        out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
    }
    out.push('>');
    true
}
