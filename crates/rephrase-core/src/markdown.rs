//! Markdown input handling.
//!
//! Markdown documents are reduced to their prose paragraphs before they reach
//! the pipeline. Code, headings, tables, and frontmatter never get rephrased.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Prose paragraphs of a markdown document, in order.
///
/// Skipped entirely: code blocks, inline code, headings, tables, HTML, and
/// YAML frontmatter. Link text, emphasis, list items, and blockquotes keep
/// their visible words. Each paragraph or list item becomes one entry with
/// soft line breaks folded into spaces.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn prose_paragraphs(text: &str) -> Vec<String> {
    let body = strip_frontmatter(text);
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut skip_depth: usize = 0;

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::Table(_)) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::Table) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            Event::Text(t) if skip_depth == 0 => current.push_str(&t),
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => current.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if skip_depth == 0 => {
                flush(&mut current, &mut paragraphs);
            }
            _ => {}
        }
    }
    flush(&mut current, &mut paragraphs);
    paragraphs
}

/// Markdown reduced to plain prose, paragraphs separated by blank lines.
pub fn strip_to_prose(text: &str) -> String {
    prose_paragraphs(text).join("\n\n")
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    let collapsed = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        paragraphs.push(collapsed);
    }
    current.clear();
}

/// Drop a leading YAML frontmatter block delimited by `---` lines.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close) = after_opening.find("\n---") else {
        return text;
    };
    let remainder = &after_opening[close + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}
