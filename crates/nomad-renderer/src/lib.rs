//! Rich text to HTML renderer.
//!
//! Converts the content store's block-structured rich text into HTML that
//! can be embedded into a page without further escaping.
//!
//! # Safety boundary
//!
//! [`TrustedHtml`] can only be produced inside this crate: by [`render`],
//! which emits a fixed tag set with every text and attribute value escaped,
//! or by [`TrustedHtml::escape`]. Anything typed `TrustedHtml` is therefore
//! safe to inject verbatim.
//!
//! # Example
//!
//! ```
//! use nomad_renderer::{RichTextDocument, render};
//!
//! let doc: RichTextDocument = serde_json::from_str(
//!     r#"[{"_type": "block", "style": "h2", "children": [{"_type": "span", "text": "Eligibility"}]}]"#,
//! ).unwrap();
//! assert_eq!(render(Some(&doc)).as_str(), "<h2>Eligibility</h2>");
//! assert_eq!(render(None).as_str(), "");
//! ```

mod document;
mod html;
mod renderer;

pub use document::{
    Block, BlockStyle, ListKind, MarkDef, RichTextDocument, Span, TextBlock, UnknownBlock,
};
pub use html::{TrustedHtml, escape_html};
pub use renderer::render;
