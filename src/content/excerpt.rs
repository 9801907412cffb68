//! Plain-text excerpt derivation

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 160;

/// Appended when the text had to be cut
const ELLIPSIS: char = '…';

/// Derive a plain-text excerpt from markdown source.
///
/// Markup is stripped: only prose text and inline code survive, while code
/// blocks, raw HTML, math and image alt text are dropped. Whitespace is
/// collapsed to single spaces. When the text is longer than `max_length`
/// characters it is cut at the last word boundary that leaves room for a
/// trailing `…`, so the result never exceeds `max_length` characters.
pub fn derive_excerpt(raw_body: &str, max_length: usize) -> String {
    let text = plain_text(raw_body);
    truncate_at_word(&text, max_length)
}

/// Markdown stripped down to collapsed plain text
pub fn plain_text(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH;

    let mut out = String::with_capacity(markdown.len());
    let mut skip_depth = 0usize;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Start(Tag::Image { .. }) => skip_depth += 1,
            Event::End(TagEnd::CodeBlock) | Event::End(TagEnd::Image) => {
                skip_depth = skip_depth.saturating_sub(1);
                out.push(' ');
            }
            Event::Text(text) | Event::Code(text) if skip_depth == 0 => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(end) if is_block_end(&end) => out.push(' '),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_block_end(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::TableCell
            | TagEnd::FootnoteDefinition
    )
}

/// Cut collapsed text to at most `max_length` characters on a word boundary
fn truncate_at_word(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    if max_length == 0 {
        return String::new();
    }

    let budget = max_length - 1;
    let chars: Vec<char> = text.chars().collect();

    // chars[budget] exists because the text is longer than max_length
    let cut = if chars[budget].is_whitespace() {
        budget
    } else {
        match chars[..budget].iter().rposition(|c| c.is_whitespace()) {
            Some(space) => space,
            // A single word longer than the budget: nothing to break on
            None => budget,
        }
    };

    let mut excerpt: String = chars[..cut].iter().collect();
    let kept = excerpt
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
        .len();
    excerpt.truncate(kept);
    excerpt.push(ELLIPSIS);
    excerpt
}
