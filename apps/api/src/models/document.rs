use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Section kind that adds a one-page cover in front of the content.
pub const COVER_SECTION: &str = "cover";
/// Section kind that adds a one-page index after the cover.
pub const TOC_SECTION: &str = "tableOfContents";
/// Page kind rendered with hanging-indent reference styling.
pub const BIBLIOGRAPHY_KIND: &str = "bibliography";

/// A generated academic document, edited in place while it lives in the store.
///
/// Every field defaults so that partial JSON (e.g. no `sections` or no `pages`)
/// deserializes into an empty collection rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Student id number printed on the cover.
    pub carnet: String,
    pub date: String,
    /// Front-matter kinds present. Only membership matters.
    pub sections: Vec<String>,
    pub pages: Vec<Page>,
    #[serde(flatten)]
    pub cover: CoverDetails,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn has_section(&self, kind: &str) -> bool {
        self.sections.iter().any(|s| s == kind)
    }
}

/// Institutional details for the cover page. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverDetails {
    pub university: String,
    pub faculty: String,
    pub degree: String,
    pub lecturer: String,
    pub course: String,
    pub semester: String,
    pub campus: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// snake_case section kind assigned by the generator (e.g. "introduction").
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    /// HTML fragment.
    pub content: String,
    pub images: Vec<PageImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageImage {
    pub url: String,
    pub caption: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let doc: Document = serde_json::from_str(r#"{"title": "Tarea"}"#).unwrap();
        assert_eq!(doc.title, "Tarea");
        assert!(doc.sections.is_empty());
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_page_kind_uses_type_key() {
        let page: Page =
            serde_json::from_str(r#"{"type": "bibliography", "title": "Refs"}"#).unwrap();
        assert_eq!(page.kind, BIBLIOGRAPHY_KIND);
        assert!(page.content.is_empty());
        assert!(page.images.is_empty());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["type"], "bibliography");
    }

    #[test]
    fn test_cover_details_are_flattened() {
        let doc: Document =
            serde_json::from_str(r#"{"university": "UMG", "campus": "Zona 1"}"#).unwrap();
        assert_eq!(doc.cover.university, "UMG");
        assert_eq!(doc.cover.campus, "Zona 1");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["university"], "UMG");
    }

    #[test]
    fn test_has_section() {
        let doc = Document {
            sections: vec![COVER_SECTION.to_string()],
            ..Document::default()
        };
        assert!(doc.has_section(COVER_SECTION));
        assert!(!doc.has_section(TOC_SECTION));
    }
}
