//! Static page geometry and per-element line costs for the pagination estimator.
//!
//! All numbers describe one assumed physical page: US letter, 2.5cm margins all
//! sides, 12pt body text at line-height 1.8. That leaves a text block of roughly
//! 16cm × 21.6cm, which holds ~28 lines of ~11 words each.
//!
//! Element costs are in "lines" and cover the vertical margins, borders and padding
//! a block element adds on top of its text. Text itself is counted separately
//! (words / `WORDS_PER_LINE`).

use serde::Serialize;

/// Usable text lines on one printed page.
pub const LINES_PER_PAGE: u32 = 28;

/// Average words that fit on one line of body text.
pub const WORDS_PER_LINE: u32 = 11;

/// Plain-text words per page, used by the tag-stripping fallback.
pub const WORDS_PER_PAGE: u32 = LINES_PER_PAGE * WORDS_PER_LINE;

/// Heading tags whose open/close toggles the estimator's heading flag.
pub const HEADING_TAGS: [&str; 4] = ["h1", "h2", "h3", "h4"];

// ────────────────────────────────────────────────────────────────────────────
// Element line costs
// ────────────────────────────────────────────────────────────────────────────

/// Line cost of each block element. Lookup is by lowercase tag name.
#[rustfmt::skip]
static ELEMENT_LINE_COSTS: [(&str, f64); 14] = [
    // headings: title text + margins (h2 also carries a bottom border)
    ("h1", 4.0), ("h2", 3.0), ("h3", 2.5), ("h4", 2.0),
    // paragraph bottom margin only; the text is counted apart
    ("p", 0.8),
    ("br", 1.0), ("hr", 2.0),
    ("li", 0.5), ("ul", 1.0), ("ol", 1.0),
    // an image box is ~10 lines tall at 80% width
    ("img", 10.0),
    ("table", 2.0), ("tr", 1.0),
    ("blockquote", 1.5),
];

/// Returns the line cost of a tag, or 0.0 for tags with no layout weight.
pub fn element_line_cost(tag: &str) -> f64 {
    ELEMENT_LINE_COSTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .map(|(_, cost)| *cost)
        .unwrap_or(0.0)
}

pub fn is_heading(tag: &str) -> bool {
    HEADING_TAGS.iter().any(|h| h.eq_ignore_ascii_case(tag))
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// The physical page the constants above were derived from.
///
/// Informational only: nothing is computed from these at runtime. The renderer's
/// print CSS uses the same values so the estimate and the output agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub paper: &'static str,
    pub margin_cm: f32,
    pub font_size_pt: u8,
    pub line_height: f32,
    pub lines_per_page: u32,
    pub words_per_line: u32,
}

pub const LETTER_GEOMETRY: PageGeometry = PageGeometry {
    paper: "letter",
    margin_cm: 2.5,
    font_size_pt: 12,
    line_height: 1.8,
    lines_per_page: LINES_PER_PAGE,
    words_per_line: WORDS_PER_LINE,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_per_page_is_308() {
        assert_eq!(WORDS_PER_PAGE, 308);
    }

    #[test]
    fn test_heading_costs_descend_by_level() {
        assert_eq!(element_line_cost("h1"), 4.0);
        assert_eq!(element_line_cost("h2"), 3.0);
        assert_eq!(element_line_cost("h3"), 2.5);
        assert_eq!(element_line_cost("h4"), 2.0);
    }

    #[test]
    fn test_block_element_costs() {
        assert_eq!(element_line_cost("p"), 0.8);
        assert_eq!(element_line_cost("br"), 1.0);
        assert_eq!(element_line_cost("hr"), 2.0);
        assert_eq!(element_line_cost("li"), 0.5);
        assert_eq!(element_line_cost("ul"), 1.0);
        assert_eq!(element_line_cost("ol"), 1.0);
        assert_eq!(element_line_cost("img"), 10.0);
        assert_eq!(element_line_cost("table"), 2.0);
        assert_eq!(element_line_cost("tr"), 1.0);
        assert_eq!(element_line_cost("blockquote"), 1.5);
    }

    #[test]
    fn test_unknown_tags_cost_nothing() {
        for tag in ["div", "span", "strong", "h5", "td", "section", ""] {
            assert_eq!(element_line_cost(tag), 0.0, "{tag} should be free");
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(element_line_cost("H2"), 3.0);
        assert!(is_heading("H1"));
    }

    #[test]
    fn test_h5_is_not_a_tracked_heading() {
        assert!(is_heading("h4"));
        assert!(!is_heading("h5"));
        assert!(!is_heading("header"));
    }

    #[test]
    fn test_letter_geometry_matches_constants() {
        assert_eq!(LETTER_GEOMETRY.lines_per_page, 28);
        assert_eq!(LETTER_GEOMETRY.words_per_line, 11);
        assert_eq!(LETTER_GEOMETRY.paper, "letter");
    }
}
