//! Document Generation — turns a student's outline into HTML pages via the LLM.
//!
//! Flow: build prompt → LLM call (search-grounded) → parse `{"pages": [...]}` → `Vec<Page>`.
//!
//! Generation never fails the request. An LLM failure becomes a single "error" page and
//! a reply that is not the expected JSON becomes a single "content" page holding the raw
//! text, so the student always gets an editable document back.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{
    EDIT_PROMPT_TEMPLATE, EDIT_TEMPERATURE, GENERATE_PROMPT_TEMPLATE, GENERATE_TEMPERATURE,
};
use crate::llm_client::prompts::{ACADEMIC_ASSISTANT, HTML_CONTENT_RULES, NO_MARKDOWN_INSTRUCTION};
use crate::llm_client::{strip_code_fences, LlmClient};
use crate::models::document::Page;
use crate::render::escape_html;

/// Page kind of the placeholder page produced when generation fails.
pub const ERROR_KIND: &str = "error";
/// Page kind used when the LLM reply could not be parsed into pages.
pub const RAW_CONTENT_KIND: &str = "content";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One section of the student's outline.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_section_pages")]
    pub pages: u32,
}

fn default_section_pages() -> u32 {
    1
}

/// Everything the generator needs to write a document.
#[derive(Debug, Clone)]
pub struct GenerationBrief {
    pub title: String,
    pub author: String,
    pub carnet: String,
    pub language: String,
    pub sections: Vec<SectionRequest>,
}

#[derive(Debug, Deserialize)]
struct PagesEnvelope {
    pages: Vec<Page>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generator seam
// ────────────────────────────────────────────────────────────────────────────

/// Pluggable content source. Default: `GeminiGenerator`.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_pages(&self, brief: &GenerationBrief) -> Result<Vec<Page>, AppError>;

    /// Rewrites one page's HTML following free-form instructions.
    async fn edit_page(&self, current_html: &str, instructions: &str) -> Result<String, AppError>;
}

pub struct GeminiGenerator {
    llm: LlmClient,
}

impl GeminiGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate_pages(&self, brief: &GenerationBrief) -> Result<Vec<Page>, AppError> {
        let prompt = build_generate_prompt(brief);
        let raw = self
            .llm
            .call_text(&prompt, GENERATE_TEMPERATURE)
            .await
            .map_err(|e| AppError::Llm(format!("Generation LLM call failed: {e}")))?;

        Ok(parse_pages_response(&raw, &brief.title))
    }

    async fn edit_page(&self, current_html: &str, instructions: &str) -> Result<String, AppError> {
        let prompt = build_edit_prompt(current_html, instructions);
        let raw = self
            .llm
            .call_text(&prompt, EDIT_TEMPERATURE)
            .await
            .map_err(|e| AppError::Llm(format!("Edit LLM call failed: {e}")))?;

        Ok(strip_code_fences(&raw, "html").to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Failure-tolerant entry points used by the handlers
// ────────────────────────────────────────────────────────────────────────────

/// Generates pages, substituting a single error page if the generator fails.
pub async fn generate_or_error_page(
    generator: &dyn ContentGenerator,
    brief: &GenerationBrief,
) -> Vec<Page> {
    info!(
        "Generating '{}' ({} outline sections)",
        brief.title,
        brief.sections.len()
    );
    match generator.generate_pages(brief).await {
        Ok(pages) => pages,
        Err(e) => {
            warn!("Document generation failed: {e}");
            vec![Page {
                kind: ERROR_KIND.to_string(),
                title: "Generation error".to_string(),
                content: format!(
                    "<p>The content could not be generated: {}</p>",
                    escape_html(&e.to_string())
                ),
                images: Vec::new(),
            }]
        }
    }
}

/// Edits a page, substituting an error paragraph if the generator fails.
pub async fn edit_or_error_paragraph(
    generator: &dyn ContentGenerator,
    current_html: &str,
    instructions: &str,
) -> String {
    match generator.edit_page(current_html, instructions).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Page edit failed: {e}");
            format!("<p>The edit could not be applied: {}</p>", escape_html(&e.to_string()))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn build_generate_prompt(brief: &GenerationBrief) -> String {
    GENERATE_PROMPT_TEMPLATE
        .replace("{persona}", ACADEMIC_ASSISTANT)
        .replace("{language}", &brief.language)
        .replace("{title}", &brief.title)
        .replace("{author}", &brief.author)
        .replace("{carnet}", &brief.carnet)
        .replace("{sections}", &describe_sections(&brief.sections))
        .replace("{html_rules}", HTML_CONTENT_RULES)
}

pub(crate) fn build_edit_prompt(current_html: &str, instructions: &str) -> String {
    EDIT_PROMPT_TEMPLATE
        .replace("{persona}", ACADEMIC_ASSISTANT)
        .replace("{html_rules}", HTML_CONTENT_RULES)
        .replace("{no_markdown}", NO_MARKDOWN_INSTRUCTION)
        .replace("{instructions}", instructions)
        .replace("{content}", current_html)
}

/// Numbered outline, one line per section plus an optional instruction line.
fn describe_sections(sections: &[SectionRequest]) -> String {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let n = i + 1;
            let name = if section.name.trim().is_empty() {
                format!("Section {n}")
            } else {
                section.name.clone()
            };
            let mut line = format!("{n}. **{name}** — {} page(s)", section.pages);
            if !section.description.trim().is_empty() {
                line.push_str(&format!("\n   Instructions: {}", section.description));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

/// Turns the LLM reply into pages, wrapping unparseable replies in one page.
pub(crate) fn parse_pages_response(raw: &str, title: &str) -> Vec<Page> {
    match parse_json_reply::<PagesEnvelope>(raw) {
        Some(envelope) => envelope.pages,
        None => {
            warn!("LLM reply was not a pages object; keeping it as raw content");
            vec![Page {
                kind: RAW_CONTENT_KIND.to_string(),
                title: title.to_string(),
                content: format!("<p>{raw}</p>"),
                images: Vec::new(),
            }]
        }
    }
}

/// Parses JSON from a reply: fenced or bare first, then the outermost `{...}` span.
fn parse_json_reply<T: for<'de> Deserialize<'de>>(raw: &str) -> Option<T> {
    if let Ok(parsed) = serde_json::from_str(strip_code_fences(raw, "json")) {
        return Some(parsed);
    }
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
