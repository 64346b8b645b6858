//! HTML escaping and the trusted output type.

use std::fmt;

use serde::Serialize;

/// HTML that is safe to inject into a page verbatim.
///
/// Constructed only by this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Empty output.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Escape plain text into trusted HTML.
    #[must_use]
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    pub(crate) fn from_rendered(html: String) -> Self {
        Self(html)
    }

    /// Borrow the HTML.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the HTML string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// True if nothing was rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrustedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escape HTML special characters for text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// A link target that passed the scheme allow-list.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SafeHref<'a> {
    pub(crate) href: &'a str,
    /// Leaves the site; opened in a new browsing context.
    pub(crate) external: bool,
}

/// Check a link target against the allowed schemes.
///
/// Allowed: `http`, `https`, protocol-relative `//`, `mailto`, `tel`,
/// root-relative `/` and fragment `#`. Everything else (`javascript:`,
/// `data:`, bare relative paths) is rejected.
pub(crate) fn safe_href(raw: &str) -> Option<SafeHref<'_>> {
    let href = raw.trim();
    let has_prefix = |prefix: &str| {
        href.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };

    if has_prefix("https://") || has_prefix("http://") || href.starts_with("//") {
        return Some(SafeHref {
            href,
            external: true,
        });
    }
    if has_prefix("mailto:") || has_prefix("tel:") || href.starts_with('/') || href.starts_with('#')
    {
        return Some(SafeHref {
            href,
            external: false,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("\"q\" 'a'"), "&quot;q&quot; &#x27;a&#x27;");
    }

    #[test]
    fn test_trusted_escape() {
        let html = TrustedHtml::escape("<b>");
        assert_eq!(html.as_str(), "&lt;b&gt;");
        assert_eq!(html.to_string(), "&lt;b&gt;");
    }

    #[test]
    fn test_trusted_serializes_as_string() {
        let html = TrustedHtml::escape("x");
        assert_eq!(serde_json::to_string(&html).unwrap(), "\"x\"");
    }

    #[test]
    fn test_safe_href_external() {
        let href = safe_href("https://vistos.mne.gov.pt").unwrap();
        assert!(href.external);
        assert!(safe_href("HTTP://example.com").unwrap().external);
        assert!(safe_href("//cdn.example.com/x").unwrap().external);
    }

    #[test]
    fn test_safe_href_internal() {
        assert!(!safe_href("/portugal").unwrap().external);
        assert!(!safe_href("#fees").unwrap().external);
        assert!(!safe_href("mailto:visa@example.com").unwrap().external);
    }

    #[test]
    fn test_safe_href_rejects_scripts() {
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href(" JavaScript:alert(1)"), None);
        assert_eq!(safe_href("data:text/html,<b>"), None);
        assert_eq!(safe_href("relative/page"), None);
    }
}
