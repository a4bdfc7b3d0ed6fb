//! Page-length estimator: predicts how many printed pages an HTML fragment fills.
//!
//! # Two paths
//! - `markup_line_budget` walks the fragment with the html5ever tokenizer and sums a
//!   fractional line budget: every start tag adds its element cost, every text run
//!   adds `words / WORDS_PER_LINE`. Pages = budget / `LINES_PER_PAGE`.
//! - `estimate_plain_text` strips tags and divides the word count by `WORDS_PER_PAGE`.
//!
//! Both are pure. `EstimateMode` picks one; the tokenizer recovers from any malformed
//! input, so the markup path never has to bail out to the fallback mid-way.
//!
//! Rounding is half-to-even, and every fragment floors at 1 page.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::layout::page_metrics::{
    element_line_cost, is_heading, LINES_PER_PAGE, WORDS_PER_LINE, WORDS_PER_PAGE,
};

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"));

// ────────────────────────────────────────────────────────────────────────────
// Mode selection
// ────────────────────────────────────────────────────────────────────────────

/// Which estimation path to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMode {
    /// Tokenize the markup and weigh block elements.
    #[default]
    Markup,
    /// Strip tags and count words only.
    PlainText,
}

impl FromStr for EstimateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markup" => Ok(EstimateMode::Markup),
            "plain_text" | "plaintext" => Ok(EstimateMode::PlainText),
            other => Err(format!(
                "unknown estimate mode '{other}' (expected 'markup' or 'plain_text')"
            )),
        }
    }
}

impl fmt::Display for EstimateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateMode::Markup => f.write_str("markup"),
            EstimateMode::PlainText => f.write_str("plain_text"),
        }
    }
}

/// Stateless page estimator. Cheap to copy into handlers and blocking tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageEstimator {
    pub mode: EstimateMode,
}

impl PageEstimator {
    pub fn new(mode: EstimateMode) -> Self {
        Self { mode }
    }

    /// Estimated printed pages for one HTML fragment. Always ≥ 1.
    pub fn estimate(&self, html: &str) -> u32 {
        if html.is_empty() {
            return 1;
        }
        match self.mode {
            EstimateMode::Markup => pages_from_lines(markup_line_budget(html)),
            EstimateMode::PlainText => estimate_plain_text(html),
        }
    }
}

/// Estimates pages with the default (markup) path.
pub fn estimate_pages(html: &str) -> u32 {
    PageEstimator::default().estimate(html)
}

// ────────────────────────────────────────────────────────────────────────────
// Markup path
// ────────────────────────────────────────────────────────────────────────────

/// Total line budget of a fragment: element costs plus text lines.
pub fn markup_line_budget(html: &str) -> f64 {
    scan_markup(html).total_lines
}

fn scan_markup(html: &str) -> LineBudgetSink {
    let mut tokenizer = Tokenizer::new(LineBudgetSink::default(), TokenizerOpts::default());
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    let mut sink = tokenizer.sink;
    sink.flush_text();
    trace!(
        lines = sink.total_lines,
        headings = sink.headings_seen,
        unclosed_heading = sink.in_heading,
        "Fragment scanned"
    );
    sink
}

/// Token sink that accumulates the running line budget.
///
/// Text is buffered as runs. Consecutive character tokens extend the current run;
/// a comment or doctype starts a new one. Runs are joined with a space and counted
/// on every tag boundary and at end of input.
#[derive(Debug, Default)]
struct LineBudgetSink {
    total_lines: f64,
    pending: Vec<String>,
    in_text_run: bool,
    /// Set between an h1–h4 open and close. Not weighted yet.
    in_heading: bool,
    headings_seen: u32,
}

impl LineBudgetSink {
    fn push_text(&mut self, text: &str) {
        match self.pending.last_mut() {
            Some(run) if self.in_text_run => run.push_str(text),
            _ => self.pending.push(text.to_owned()),
        }
        self.in_text_run = true;
    }

    fn flush_text(&mut self) {
        self.in_text_run = false;
        if self.pending.is_empty() {
            return;
        }
        let text = self.pending.join(" ");
        self.pending.clear();

        let words = text.split_whitespace().count();
        if words == 0 {
            return;
        }
        self.total_lines += words as f64 / WORDS_PER_LINE as f64;
    }

    fn process_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        self.flush_text();
        let name: &str = &tag.name;

        match tag.kind {
            TagKind::StartTag => {
                self.total_lines += element_line_cost(name);
                if is_heading(name) {
                    self.headings_seen += 1;
                    // <h2/> opens and closes in one token
                    self.in_heading = !tag.self_closing;
                }
                if tag.self_closing {
                    return TokenSinkResult::Continue;
                }
                // script/style bodies are raw text, counted like any other run
                match name {
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" => TokenSinkResult::RawData(RawKind::Rawtext),
                    _ => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                if is_heading(name) {
                    self.in_heading = false;
                }
                TokenSinkResult::Continue
            }
        }
    }
}

impl TokenSink for LineBudgetSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => return self.process_tag(tag),
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::EOFToken => self.flush_text(),
            Token::CommentToken(_) | Token::DoctypeToken(_) => self.in_text_run = false,
            Token::NullCharacterToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }
}

fn pages_from_lines(total_lines: f64) -> u32 {
    round_pages(total_lines / LINES_PER_PAGE as f64)
}

fn round_pages(pages: f64) -> u32 {
    pages.round_ties_even().max(1.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text path
// ────────────────────────────────────────────────────────────────────────────

/// Tag-stripping estimate: `max(1, round(words / WORDS_PER_PAGE))`.
pub fn estimate_plain_text(html: &str) -> u32 {
    let text = TAG_PATTERN.replace_all(html, " ");
    let words = text.split_whitespace().count();
    round_pages(words as f64 / WORDS_PER_PAGE as f64)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["palabra"; n].join(" ")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ── floor of one page ───────────────────────────────────────────────────

    #[test]
    fn test_empty_content_is_one_page() {
        assert_eq!(estimate_pages(""), 1);
        assert_eq!(estimate_plain_text(""), 1);
    }

    #[test]
    fn test_whitespace_only_is_one_page() {
        assert_eq!(estimate_pages("   \n\t  "), 1);
        assert_eq!(markup_line_budget("  \n "), 0.0);
    }

    #[test]
    fn test_tags_without_text_is_one_page() {
        assert_eq!(estimate_pages("<div><span></span></div>"), 1);
    }

    #[test]
    fn test_lone_heading_floors_to_one_page() {
        let budget = markup_line_budget("<h2>Title</h2>");
        assert!(approx(budget, 3.0 + 1.0 / 11.0), "got {budget}");
        assert_eq!(estimate_pages("<h2>Title</h2>"), 1);
    }

    #[test]
    fn test_lone_image_floors_to_one_page() {
        assert!(approx(markup_line_budget("<img src='x'>"), 10.0));
        assert_eq!(estimate_pages("<img src='x'>"), 1);
    }

    // ── text runs ───────────────────────────────────────────────────────────

    #[test]
    fn test_308_plain_words_is_exactly_one_page_of_lines() {
        let html = words(308);
        assert!(approx(markup_line_budget(&html), 28.0));
        assert_eq!(estimate_pages(&html), 1);
    }

    #[test]
    fn test_paragraph_with_308_words() {
        let html = format!("<p>{}</p>", words(308));
        assert!(approx(markup_line_budget(&html), 28.8));
        assert_eq!(estimate_pages(&html), 1);
    }

    #[test]
    fn test_616_plain_words_is_two_pages() {
        assert_eq!(estimate_pages(&words(616)), 2);
    }

    #[test]
    fn test_500_plain_words_rounds_up_to_two_pages() {
        // 500 / 11 = 45.45 lines → 1.62 pages
        assert_eq!(estimate_pages(&words(500)), 2);
    }

    #[test]
    fn test_400_plain_words_rounds_down_to_one_page() {
        // 400 / 11 = 36.36 lines → 1.30 pages
        assert_eq!(estimate_pages(&words(400)), 1);
    }

    #[test]
    fn test_round_ties_to_even() {
        // 1.5 → 2 and 2.5 → 2 under banker's rounding
        assert_eq!(round_pages(1.5), 2);
        assert_eq!(round_pages(2.5), 2);
        assert_eq!(round_pages(0.49), 1);
    }

    #[test]
    fn test_estimate_is_monotonic_in_word_count() {
        let mut previous = 0;
        for n in (0..2000).step_by(37) {
            let pages = estimate_pages(&format!("<h2>Intro</h2><p>{}</p>", words(n)));
            assert!(pages >= previous, "{n} words gave {pages} < {previous}");
            previous = pages;
        }
    }

    #[test]
    fn test_text_split_by_inline_tags_counts_every_run() {
        // "uno dos" | "tres" | "cuatro" → 4 words, strong/em are free
        let budget = markup_line_budget("uno dos <strong>tres</strong> cuatro");
        assert!(approx(budget, 4.0 / 11.0), "got {budget}");
    }

    #[test]
    fn test_comment_separates_runs() {
        // the two runs are joined with a space, so "a" and "b" stay two words
        let budget = markup_line_budget("a<!-- note -->b");
        assert!(approx(budget, 2.0 / 11.0), "got {budget}");
    }

    #[test]
    fn test_entities_are_decoded_inside_a_run() {
        let budget = markup_line_budget("<p>salt&amp;pepper</p>");
        assert!(approx(budget, 0.8 + 1.0 / 11.0), "got {budget}");
    }

    // ── element costs ───────────────────────────────────────────────────────

    #[test]
    fn test_list_costs_container_and_items() {
        // ul 1 + 3 × li 0.5 + 3 words
        let budget = markup_line_budget("<ul><li>a</li><li>b</li><li>c</li></ul>");
        assert!(approx(budget, 1.0 + 1.5 + 3.0 / 11.0), "got {budget}");
    }

    #[test]
    fn test_table_costs_table_and_rows() {
        let budget = markup_line_budget("<table><tr><td></td></tr><tr><td></td></tr></table>");
        assert!(approx(budget, 2.0 + 2.0), "got {budget}");
    }

    #[test]
    fn test_uppercase_tags_are_weighted() {
        assert!(approx(markup_line_budget("<HR><BR>"), 3.0));
    }

    #[test]
    fn test_self_closing_break_counts_once() {
        assert!(approx(markup_line_budget("<br/>"), 1.0));
    }

    #[test]
    fn test_end_tags_cost_nothing() {
        assert!(approx(markup_line_budget("</p></h1></blockquote>"), 0.0));
    }

    #[test]
    fn test_image_heavy_content_spills_onto_extra_pages() {
        // 6 images = 60 lines → 2.14 pages
        let html = "<img src='a'>".repeat(6);
        assert_eq!(estimate_pages(&html), 2);
    }

    // ── heading flag ────────────────────────────────────────────────────────

    #[test]
    fn test_heading_flag_tracks_open_and_close() {
        let sink = scan_markup("<h3>Heading");
        assert!(sink.in_heading);
        let sink = scan_markup("<h3>Heading</h3><p>body</p>");
        assert!(!sink.in_heading);
        assert_eq!(sink.headings_seen, 1);
    }

    #[test]
    fn test_heading_flag_does_not_change_cost() {
        let inside = markup_line_budget("<h4>one two three</h4>");
        let outside = markup_line_budget("<h4></h4>one two three");
        assert!(approx(inside, outside));
    }

    // ── malformed markup ────────────────────────────────────────────────────

    #[test]
    fn test_malformed_markup_never_panics() {
        for html in [
            "<p",
            "<<<>>>",
            "</",
            "<p class='unterminated>text",
            "<![CDATA[ x ]]>",
            "<!DOCTYPE",
            "a < b > c",
            "\u{0}\u{0}",
        ] {
            assert!(estimate_pages(html) >= 1, "{html:?}");
        }
    }

    #[test]
    fn test_stray_less_than_stays_in_text() {
        // "<" followed by a space is text, not a tag
        let budget = markup_line_budget("a < b");
        assert!(approx(budget, 3.0 / 11.0), "got {budget}");
    }

    #[test]
    fn test_script_body_counts_as_raw_text() {
        // the "<p>" inside the script is not a paragraph
        let budget = markup_line_budget("<script>if (a <p> b) run()</script>");
        assert!(approx(budget, 5.0 / 11.0), "got {budget}");
    }

    // ── plain-text path ─────────────────────────────────────────────────────

    #[test]
    fn test_plain_text_strips_tags() {
        let html = format!("<h1>x</h1><p>{}</p>", words(615));
        // 616 words / 308 = 2
        assert_eq!(estimate_plain_text(&html), 2);
    }

    #[test]
    fn test_plain_text_tags_do_not_glue_words() {
        assert_eq!(
            TAG_PATTERN.replace_all("a<br>b", " ").split_whitespace().count(),
            2
        );
    }

    #[test]
    fn test_plain_text_ignores_images() {
        assert_eq!(estimate_plain_text(&"<img src='a'>".repeat(50)), 1);
    }

    #[test]
    fn test_both_paths_agree_on_plain_paragraphs() {
        for n in [100, 308, 700, 1000, 1500] {
            let html = words(n);
            assert_eq!(
                estimate_pages(&html),
                estimate_plain_text(&html),
                "{n} plain words"
            );
        }
    }

    #[test]
    fn test_estimator_mode_selects_path() {
        let html = "<img src='a'>".repeat(6);
        assert_eq!(PageEstimator::new(EstimateMode::Markup).estimate(&html), 2);
        assert_eq!(PageEstimator::new(EstimateMode::PlainText).estimate(&html), 1);
    }

    // ── mode parsing ────────────────────────────────────────────────────────

    #[test]
    fn test_estimate_mode_from_str() {
        assert_eq!("markup".parse::<EstimateMode>(), Ok(EstimateMode::Markup));
        assert_eq!(
            " Plain_Text ".parse::<EstimateMode>(),
            Ok(EstimateMode::PlainText)
        );
        assert!("pdf".parse::<EstimateMode>().is_err());
    }

    #[test]
    fn test_estimate_mode_display_round_trips() {
        for mode in [EstimateMode::Markup, EstimateMode::PlainText] {
            assert_eq!(mode.to_string().parse::<EstimateMode>(), Ok(mode));
        }
    }
}
