// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Persona line that opens every prompt.
pub const ACADEMIC_ASSISTANT: &str = "You are an academic writing assistant.";

/// Markup rules shared by generation and editing.
pub const HTML_CONTENT_RULES: &str = "\
- Use <h2> for the section heading, <h3> for sub-headings and <p> for paragraphs.\n\
- Lists use <ul>/<ol> with <li>; tables use <table>/<tr>/<td>.\n\
- Do NOT include <html>, <head>, <body> or inline styles.";

/// Instruction that forbids wrapping the answer in prose or markdown.
pub const NO_MARKDOWN_INSTRUCTION: &str = "\
Respond ONLY with the requested output. No explanations, no markdown, no code fences.";
