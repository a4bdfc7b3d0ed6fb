// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Sampling temperature for whole-document generation.
pub const GENERATE_TEMPERATURE: f32 = 0.7;
/// Sampling temperature for instructed edits; lower to keep untouched text stable.
pub const EDIT_TEMPERATURE: f32 = 0.5;

/// Document generation prompt. Replace `{persona}`, `{title}`, `{author}`, `{carnet}`,
/// `{language}`, `{sections}`, `{html_rules}` before sending.
pub const GENERATE_PROMPT_TEMPLATE: &str = r#"{persona} Write a complete university assignment in {language}.

TITLE: {title}
AUTHOR: {author}
STUDENT ID: {carnet}

SECTIONS TO WRITE (with the amount of content requested by the student):
{sections}

INSTRUCTIONS:
- Research every section on the web to use real, current information.
- Write formal, well structured and detailed academic content.
- STRICTLY respect the number of pages requested for each section.
- One page of content is AT MOST 250 words (counting headings, sub-headings and spacing).
- A 1-page section is ONLY ~200-250 words. Do not exceed it.
- A 2-page section is ~400-500 words split into 2 blocks.
- Start every section with an <h2> heading.
{html_rules}
- Do NOT add extra content or sections that were not requested.
- Bibliography sections use APA format with real sources.
- Do NOT include a cover page or an index; those are generated automatically.

Respond EXCLUSIVELY with valid JSON (no markdown, no ```json), with this structure:
{
  "pages": [
    {
      "type": "section_name_in_snake_case",
      "title": "Visible section title",
      "content": "<p>HTML content here...</p>"
    }
  ]
}

When a section spans more than 1 page, emit several page objects with the same type and
different content. Example: if "Development" has 3 pages, emit 3 objects with
type="development" and titles "Development (1/3)", "Development (2/3)", "Development (3/3)".
Emit the sections in the order given by the student."#;

/// Page edit prompt. Replace `{persona}`, `{content}`, `{instructions}`, `{html_rules}`,
/// `{no_markdown}` before sending.
pub const EDIT_PROMPT_TEMPLATE: &str = r#"{persona} Edit the following HTML content according to the student's instructions.

CURRENT CONTENT:
{content}

STUDENT INSTRUCTIONS:
{instructions}

RULES:
- Keep the HTML structure (paragraphs, headings, lists, etc).
{html_rules}
- Only change what the student asked for; keep everything else the same.
- {no_markdown} Return ONLY the edited HTML."#;
