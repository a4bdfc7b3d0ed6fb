// Document rendering: {document, page map} → one self-contained HTML string.
// The output is what the preview route serves and what an external PDF
// rasterizer would consume.

pub mod html;

pub use html::build_document_html;

/// Escapes text for element content.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escapes a value for a double-quoted attribute, leaving URLs readable.
pub fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_special_characters() {
        assert_eq!(
            escape_html("<b>Tom & Jerry</b> (1/3)"),
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt; (1/3)"
        );
    }

    #[test]
    fn test_escape_attr_keeps_slashes() {
        assert_eq!(escape_attr("/uploads/a.png"), "/uploads/a.png");
        assert_eq!(escape_attr(r#"x" onerror="y"#), "x&quot; onerror=&quot;y");
    }

    #[test]
    fn test_escape_html_keeps_unicode() {
        assert_eq!(escape_html("Introducción — año"), "Introducción — año");
    }
}
