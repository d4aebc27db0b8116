//! Text processing utilities.
//!
//! Sentence splitting here is span-based: stages rewrite sentences in place
//! and copy the gaps between them verbatim, so whitespace and layout survive
//! a round trip through the pipeline.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Regex for initials (J.K., U.S.A., etc.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]\.(?:[A-Z]\.)*").expect("valid regex"));

/// Abbreviations whose trailing period does not end a sentence.
static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "gen", "col", "capt", "lt", "sgt",
        "rev", "hon", "vs", "etc", "approx", "dept", "est", "inc", "ltd", "co", "corp", "jan",
        "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "fig", "no",
        "vol", "ch", "sec", "eq", "e.g", "i.e", "cf", "al", "ave", "blvd", "rd",
    ])
});

/// Byte ranges of each sentence in `text`, trimmed of surrounding whitespace.
///
/// A period does not end a sentence inside a known abbreviation or initial,
/// or when it is glued to the next character as in `3.5` or `example.com`.
/// Every non-whitespace byte of `text` belongs to exactly one span.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0;

    for (i, &(offset, ch)) in chars.iter().enumerate() {
        if !is_sentence_terminator(ch) {
            continue;
        }
        let end = offset + ch.len_utf8();
        let context = extract_context(&chars, i);
        if is_sentence_boundary(&context, &text[start..end]) {
            push_trimmed(&mut spans, text, start..end);
            start = end;
        }
    }
    push_trimmed(&mut spans, text, start..text.len());

    spans
}

/// Split text into owned sentence strings.
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_spans(text)
        .into_iter()
        .map(|span| text[span].to_string())
        .collect()
}

/// Rebuild `text`, replacing each sentence with the closure's output.
///
/// Gaps between sentences are copied unchanged; returning `None` keeps the
/// sentence verbatim.
pub fn rewrite_spans<F>(text: &str, spans: &[Range<usize>], mut rewrite: F) -> String
where
    F: FnMut(usize, &str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (index, span) in spans.iter().enumerate() {
        out.push_str(&text[cursor..span.start]);
        let sentence = &text[span.clone()];
        match rewrite(index, sentence) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(sentence),
        }
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Extract words from text, splitting on whitespace and stripping punctuation.
pub fn extract_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// A whitespace token split into surrounding punctuation and its word core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    /// Punctuation before the word (opening quotes, brackets).
    pub leading: &'a str,
    /// The word itself, inner apostrophes and hyphens included.
    pub core: &'a str,
    /// Punctuation after the word (commas, terminators, closing quotes).
    pub trailing: &'a str,
}

impl TokenParts<'_> {
    /// Reassemble the token around a different core.
    pub fn with_core(&self, core: &str) -> String {
        format!("{}{core}{}", self.leading, self.trailing)
    }
}

/// Peel leading and trailing punctuation off a whitespace token.
pub fn split_token(token: &str) -> TokenParts<'_> {
    let start = token
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map_or(token.len(), |(i, _)| i);
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map_or(start, |(i, c)| i + c.len_utf8());
    TokenParts {
        leading: &token[..start],
        core: &token[start..end],
        trailing: &token[end..],
    }
}

/// Whitespace tokens of `text` together with their byte offsets.
pub fn tokens_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((s, &text[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, &text[s..]));
    }
    tokens
}

/// Give `replacement` the capitalization pattern of `template`.
///
/// All-caps templates of two or more letters produce all-caps output; a
/// leading capital is carried over; anything else returns `replacement` as-is.
pub fn match_case(template: &str, replacement: &str) -> String {
    let letters: Vec<char> = template.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if template.chars().next().is_some_and(char::is_uppercase) {
        return capitalize_first(replacement);
    }
    replacement.to_string()
}

/// Uppercase the first character of `word`.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Lowercase the first character of `word`.
pub fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

fn push_trimmed(spans: &mut Vec<Range<usize>>, text: &str, range: Range<usize>) {
    let slice = &text[range.clone()];
    let trimmed_start = slice.len() - slice.trim_start().len();
    let trimmed_end = slice.trim_end().len();
    if trimmed_end > trimmed_start {
        spans.push(range.start + trimmed_start..range.start + trimmed_end);
    }
}

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Context around a potential sentence boundary.
struct SentenceContext {
    punctuation: char,
    word_before: String,
    char_after: Option<char>,
    text_after: String,
    glued_to_next: bool,
    is_end_of_text: bool,
}

fn extract_context(chars: &[(usize, char)], pos: usize) -> SentenceContext {
    let mut after_start = pos + 1;
    while after_start < chars.len() && chars[after_start].1.is_whitespace() {
        after_start += 1;
    }

    SentenceContext {
        punctuation: chars[pos].1,
        word_before: get_word_before(chars, pos),
        char_after: chars.get(after_start).map(|&(_, c)| c),
        text_after: chars
            .iter()
            .skip(after_start)
            .take(20)
            .map(|&(_, c)| c)
            .collect(),
        glued_to_next: chars
            .get(pos + 1)
            .is_some_and(|&(_, c)| c.is_alphanumeric() || is_sentence_terminator(c)),
        is_end_of_text: chars[pos + 1..].iter().all(|&(_, c)| c.is_whitespace()),
    }
}

fn get_word_before(chars: &[(usize, char)], pos: usize) -> String {
    let mut i = pos;
    while i > 0 {
        i -= 1;
        if !chars[i].1.is_whitespace() && chars[i].1 != '.' {
            break;
        }
    }

    let mut word_chars = Vec::new();
    loop {
        let ch = chars[i].1;
        if ch.is_alphanumeric() || ch == '.' {
            word_chars.push(ch);
        } else {
            break;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    word_chars.iter().rev().collect()
}

fn is_sentence_boundary(context: &SentenceContext, current_sentence: &str) -> bool {
    if context.is_end_of_text {
        return true;
    }

    if context.glued_to_next {
        return false;
    }

    if context.punctuation == '!' || context.punctuation == '?' {
        return check_next_char_capitalization(context);
    }

    if is_likely_abbreviation(&context.word_before)
        || is_likely_initial(&context.word_before)
        || current_sentence.ends_with("...")
    {
        return false;
    }

    // Lowercase continuation means the period was mid-sentence
    !context.char_after.is_some_and(char::is_lowercase)
}

fn check_next_char_capitalization(context: &SentenceContext) -> bool {
    match context.char_after {
        Some('"' | '\'') => context
            .text_after
            .chars()
            .nth(1)
            .is_none_or(|c| !c.is_lowercase()),
        Some(c) => !c.is_lowercase(),
        None => true,
    }
}

fn is_likely_abbreviation(word: &str) -> bool {
    let word_clean = word.trim_end_matches('.');
    if word_clean.is_empty() {
        return false;
    }
    if ABBREVIATIONS.contains(word_clean.to_lowercase().as_str()) {
        return true;
    }
    // Single uppercase letter = likely initial, except the pronoun
    word_clean != "I"
        && word_clean.chars().count() == 1
        && word_clean.chars().all(char::is_uppercase)
}

fn is_likely_initial(word: &str) -> bool {
    !word.is_empty() && INITIALS_PATTERN.is_match(word)
}
