//! Full-document HTML assembly: cover, index, content sections, print CSS.
//!
//! Titles and metadata are escaped. Page content is HTML produced by the generator or
//! typed by the student in the editor and is inserted verbatim.

use std::fmt::Write;

use crate::layout::page_metrics::{PageGeometry, LETTER_GEOMETRY};
use crate::layout::PageMapEntry;
use crate::models::document::{Document, Page, BIBLIOGRAPHY_KIND, COVER_SECTION, TOC_SECTION};
use crate::render::{escape_attr, escape_html};

/// Heading of the index page.
pub const INDEX_HEADING: &str = "Index";

/// Styles that do not depend on the page geometry.
const BASE_STYLESHEET: &str = r#"
        body { font-family: 'Segoe UI', Arial, Helvetica, sans-serif; color: #222; text-align: justify; }

        .cover { height: 90vh; display: flex; flex-direction: column; justify-content: space-between;
                 align-items: center; text-align: center; border: 3px double #1a2332;
                 padding: 50px 40px; page-break-after: always; }
        .cover-header { margin-top: 20px; }
        .cover-header .uni-name { font-size: 1.4em; font-weight: bold; color: #1a2332; margin: 0; }
        .cover-header .uni-center { font-size: 1.1em; color: #333; margin: 4px 0 0 0; }
        .cover-middle { flex: 1; display: flex; flex-direction: column; justify-content: center; }
        .cover-middle .degree { font-size: 1.05em; color: #444; margin-bottom: 8px; }
        .cover-middle .lecturer { font-size: 0.95em; color: #555; margin-bottom: 6px; }
        .cover-middle .course { font-size: 1.1em; font-weight: bold; color: #333; margin-bottom: 6px; }
        .cover-middle .semester { font-size: 0.95em; color: #555; margin-bottom: 30px; }
        .cover-middle .work-title { font-size: 1.8em; font-weight: bold; color: #1a2332; line-height: 1.3; margin: 0; }
        .cover-footer { margin-bottom: 20px; }
        .cover-footer p { margin: 5px 0; font-size: 1em; color: #333; }

        .toc { page-break-after: always; }
        .toc h2 { color: #1a2332; border-bottom: 2px solid #1a2332; padding-bottom: 8px; margin-bottom: 25px; }
        .toc table { width: 100%; border-collapse: collapse; }
        .toc td { padding: 8px 4px; border-bottom: 1px dotted #ccc; font-size: 1.05em; }
        .toc td.toc-page { text-align: right; width: 50px; font-weight: bold; color: #1a2332; }

        .page-section { page-break-before: always; }
        .page-section:first-of-type { page-break-before: auto; }
        h1, h2, h3 { color: #1a2332; page-break-after: avoid; }
        h2 { border-bottom: 1px solid #ddd; padding-bottom: 6px; margin-top: 30px; }
        p { margin: 12px 0; }

        .page-image { text-align: center; margin: 20px 0; }
        .page-image img { max-width: 80%; height: auto; border: 1px solid #ddd; border-radius: 4px; }
        .page-image .caption { font-size: 0.9em; color: #666; font-style: italic; margin-top: 8px; }

        .bibliography p { text-indent: -2em; padding-left: 2em; margin: 8px 0; }
"#;

/// Builds the complete HTML document.
///
/// `page_map` fills the index rows and is ignored when the document has no index.
pub fn build_document_html(doc: &Document, page_map: &[PageMapEntry]) -> String {
    let mut sections: Vec<String> = Vec::new();

    if doc.has_section(COVER_SECTION) {
        sections.push(render_cover(doc));
    }
    if doc.has_section(TOC_SECTION) {
        sections.push(render_index(page_map));
    }
    sections.extend(doc.pages.iter().map(render_page));

    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <title>{title}</title>\n    <style>{page_rules}{BASE_STYLESHEET}    </style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>",
        title = escape_html(&doc.title),
        page_rules = page_rules(&LETTER_GEOMETRY),
        body = sections.join("\n"),
    )
}

/// `@page` box and body metrics, kept in step with the estimator's assumptions.
fn page_rules(geometry: &PageGeometry) -> String {
    format!(
        r#"
        @page {{
            size: {paper};
            margin: {margin}cm;
            @bottom-center {{ content: "Page " counter(page); font-size: 10pt; color: #888; }}
        }}
        body {{ font-size: {font}pt; line-height: {line_height}; }}"#,
        paper = geometry.paper,
        margin = geometry.margin_cm,
        font = geometry.font_size_pt,
        line_height = geometry.line_height,
    )
}

fn render_cover(doc: &Document) -> String {
    let cover = &doc.cover;
    let campus_date = if cover.campus.is_empty() {
        escape_html(&doc.date)
    } else {
        format!("{}, {}", escape_html(&cover.campus), escape_html(&doc.date))
    };

    // optional rows
    let lecturer = if cover.lecturer.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="lecturer">Lecturer: {}</p>"#,
            escape_html(&cover.lecturer)
        )
    };
    let semester = if cover.semester.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="semester">{}</p>"#, escape_html(&cover.semester))
    };

    format!(
        r#"
    <div class="cover">
        <div class="cover-header">
            <p class="uni-name">{university}</p>
            <p class="uni-center">{faculty}</p>
        </div>
        <div class="cover-middle">
            <p class="degree">{degree}</p>
            {lecturer}
            <p class="course">{course}</p>
            {semester}
            <h1 class="work-title">{title}</h1>
        </div>
        <div class="cover-footer">
            <p><strong>Name:</strong> {author}</p>
            <p><strong>Student ID:</strong> {carnet}</p>
            <p>{campus_date}</p>
        </div>
    </div>"#,
        university = escape_html(&cover.university),
        faculty = escape_html(&cover.faculty),
        degree = escape_html(&cover.degree),
        course = escape_html(&cover.course),
        title = escape_html(&doc.title),
        author = escape_html(&doc.author),
        carnet = escape_html(&doc.carnet),
    )
}

fn render_index(page_map: &[PageMapEntry]) -> String {
    let mut rows = String::new();
    for entry in page_map {
        let _ = writeln!(
            rows,
            r#"            <tr><td>{}</td><td class="toc-page">{}</td></tr>"#,
            escape_html(&entry.title),
            entry.start_page
        );
    }

    format!(
        r#"
    <div class="toc">
        <h2>{INDEX_HEADING}</h2>
        <table>
{rows}        </table>
    </div>"#
    )
}

fn render_page(page: &Page) -> String {
    let mut images = String::new();
    for image in &page.images {
        let caption = if image.caption.is_empty() {
            String::new()
        } else {
            format!(
                r#"<div class="caption">{}</div>"#,
                escape_html(&image.caption)
            )
        };
        let _ = write!(
            images,
            r#"
        <div class="page-image">
            <img src="{}" alt="{}">
            {caption}
        </div>"#,
            escape_attr(&image.url),
            escape_attr(&image.caption),
        );
    }

    let section_class = if page.kind == BIBLIOGRAPHY_KIND {
        "page-section bibliography"
    } else {
        "page-section"
    };

    format!(
        r#"
    <div class="{section_class}">
        <h2>{title}</h2>
        {content}
        {images}
    </div>"#,
        title = escape_html(&page.title),
        content = page.content,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_page_map;
    use crate::models::document::{CoverDetails, PageImage};

    fn make_doc(sections: &[&str]) -> Document {
        Document {
            id: "abcd1234".to_string(),
            title: "Energías <renovables>".to_string(),
            author: "Ana López".to_string(),
            carnet: "2024-001".to_string(),
            date: "March 02, 2026".to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
            pages: vec![
                Page {
                    kind: "introduction".to_string(),
                    title: "Introducción".to_string(),
                    content: "<p>Texto <em>inicial</em></p>".to_string(),
                    images: vec![],
                },
                Page {
                    kind: BIBLIOGRAPHY_KIND.to_string(),
                    title: "Bibliografía".to_string(),
                    content: "<p>Autor, A. (2020).</p>".to_string(),
                    images: vec![PageImage {
                        url: "/uploads/abc.png".to_string(),
                        caption: "Figura 1".to_string(),
                    }],
                },
            ],
            cover: CoverDetails {
                university: "Universidad Mariano Gálvez".to_string(),
                campus: "Guatemala".to_string(),
                ..CoverDetails::default()
            },
            ..Document::default()
        }
    }

    fn render(doc: &Document) -> String {
        build_document_html(doc, &build_page_map(doc))
    }

    #[test]
    fn test_full_document_has_cover_index_and_pages() {
        let html = render(&make_doc(&[COVER_SECTION, TOC_SECTION]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="cover">"#));
        assert!(html.contains(r#"<div class="toc">"#));
        assert_eq!(html.matches(r#"<div class="page-section"#).count(), 2);
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_sections_render_in_order() {
        let html = render(&make_doc(&[COVER_SECTION, TOC_SECTION]));
        let cover = html.find(r#"class="cover""#).unwrap();
        let toc = html.find(r#"class="toc""#).unwrap();
        let intro = html.find("<h2>Introducción</h2>").unwrap();
        let biblio = html.find("<h2>Bibliografía</h2>").unwrap();
        assert!(cover < toc && toc < intro && intro < biblio);
    }

    #[test]
    fn test_no_front_matter_without_sections() {
        let html = render(&make_doc(&[]));
        assert!(!html.contains(r#"<div class="cover">"#));
        assert!(!html.contains(r#"<div class="toc">"#));
        assert!(html.contains("<h2>Introducción</h2>"));
    }

    #[test]
    fn test_index_rows_carry_start_pages() {
        let html = render(&make_doc(&[COVER_SECTION, TOC_SECTION]));
        assert!(html.contains(r#"<tr><td>Introducción</td><td class="toc-page">3</td></tr>"#));
        assert!(html.contains(r#"<tr><td>Bibliografía</td><td class="toc-page">4</td></tr>"#));
    }

    #[test]
    fn test_metadata_is_escaped_content_is_not() {
        let html = render(&make_doc(&[COVER_SECTION]));
        assert!(html.contains("Energías &lt;renovables&gt;"));
        assert!(!html.contains("<renovables>"));
        assert!(html.contains("<p>Texto <em>inicial</em></p>"));
    }

    #[test]
    fn test_cover_optional_rows() {
        let mut doc = make_doc(&[COVER_SECTION]);
        let html = render(&doc);
        assert!(!html.contains(r#"class="lecturer""#));
        assert!(html.contains("<p>Guatemala, March 02, 2026</p>"));

        doc.cover.lecturer = "Ing. Pérez".to_string();
        doc.cover.campus.clear();
        let html = render(&doc);
        assert!(html.contains(r#"<p class="lecturer">Lecturer: Ing. Pérez</p>"#));
        assert!(html.contains("<p>March 02, 2026</p>"));
    }

    #[test]
    fn test_bibliography_class_and_images() {
        let html = render(&make_doc(&[]));
        assert!(html.contains(r#"<div class="page-section bibliography">"#));
        assert!(html.contains(r#"<img src="/uploads/abc.png" alt="Figura 1">"#));
        assert!(html.contains(r#"<div class="caption">Figura 1</div>"#));
    }

    #[test]
    fn test_page_rules_follow_letter_geometry() {
        let html = render(&make_doc(&[]));
        assert!(html.contains("size: letter;"));
        assert!(html.contains("margin: 2.5cm;"));
        assert!(html.contains("font-size: 12pt; line-height: 1.8;"));
    }
}
