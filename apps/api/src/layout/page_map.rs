//! Page Map — start page of every content section, for the rendered index.
//!
//! The cover and the index page are charged exactly one page each when present.
//! Neither is ever estimated: the index lists page numbers, so measuring it would
//! make the numbers depend on themselves.

use serde::{Deserialize, Serialize};

use crate::layout::estimator::PageEstimator;
use crate::models::document::{Document, COVER_SECTION, TOC_SECTION};

/// Title shown in the index for a page whose title is blank.
pub const UNTITLED: &str = "Untitled";

/// One index row: a section title and the physical page its content starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMapEntry {
    pub title: String,
    pub start_page: u32,
}

/// First physical page available to content, after the fixed-cost front matter.
pub fn content_start_page<S: AsRef<str>>(sections: &[S]) -> u32 {
    let has = |kind: &str| sections.iter().any(|s| s.as_ref() == kind);

    let mut current_page = 1;
    if has(COVER_SECTION) {
        current_page += 1;
    }
    if has(TOC_SECTION) {
        current_page += 1;
    }
    current_page
}

impl PageEstimator {
    /// Walks the document's pages in order, accumulating estimated lengths.
    ///
    /// The result has exactly one entry per page, in page order.
    pub fn build_page_map(&self, doc: &Document) -> Vec<PageMapEntry> {
        let mut current_page = content_start_page(doc.sections.as_slice());

        doc.pages
            .iter()
            .map(|page| {
                let title = if page.title.trim().is_empty() {
                    UNTITLED.to_string()
                } else {
                    page.title.clone()
                };
                let entry = PageMapEntry {
                    title,
                    start_page: current_page,
                };
                current_page += self.estimate(&page.content);
                entry
            })
            .collect()
    }
}

/// Builds the page map with the default estimator.
pub fn build_page_map(doc: &Document) -> Vec<PageMapEntry> {
    PageEstimator::default().build_page_map(doc)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
