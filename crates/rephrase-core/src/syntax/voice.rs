//! Active/passive voice rewrites for short, simple clauses.
//!
//! Only sentences with a plainly identifiable subject, simple-past verb, and
//! object are touched. Anything with prepositional phrases, commas, or more
//! than nine words is left alone.

use crate::dictionaries::verbs;
use crate::tagger::{LanguageAnalyzer, PosTag};
use crate::text;

/// Confidence multiplier applied per voice rewrite.
pub const VOICE_REWRITE_PENALTY: f64 = 0.85;

const MAX_WORDS: usize = 9;
const MIN_WORDS: usize = 3;

const AUXILIARIES: &[&str] = &[
    "was", "were", "is", "are", "am", "be", "been", "being", "had", "has", "have", "did", "does",
];
const BE_FORMS: &[&str] = &["was", "were", "is", "are", "am", "be", "been", "being"];
const SUBJECT_PRONOUNS: &[(&str, &str)] = &[
    ("i", "me"),
    ("we", "us"),
    ("they", "them"),
    ("he", "him"),
    ("she", "her"),
    ("you", "you"),
    ("it", "it"),
];
const PLURAL_DETERMINERS: &[&str] = &["these", "those", "many", "several", "both", "few", "all"];

fn to_object_case(word: &str) -> Option<&'static str> {
    let lower = word.to_lowercase();
    SUBJECT_PRONOUNS
        .iter()
        .find(|(subject, _)| *subject == lower)
        .map(|(_, object)| *object)
}

fn to_subject_case(word: &str) -> Option<&'static str> {
    let lower = word.to_lowercase();
    SUBJECT_PRONOUNS
        .iter()
        .find(|(_, object)| *object == lower)
        .map(|(subject, _)| *subject)
}

/// Whether `sentence` contains a passive construction (`be` + participle).
pub fn is_passive(sentence: &str) -> bool {
    let words = text::extract_words(sentence);
    words.windows(2).any(|pair| {
        BE_FORMS.contains(&pair[0].as_str()) && verbs::looks_participle(&pair[1])
    }) || words.windows(3).any(|triple| {
        BE_FORMS.contains(&triple[0].as_str())
            && triple[1].ends_with("ly")
            && verbs::looks_participle(&triple[2])
    })
}

/// A sentence split into bare words and its closing punctuation.
struct Clause<'a> {
    words: Vec<&'a str>,
    terminal: &'a str,
}

fn clause(sentence: &str) -> Option<Clause<'_>> {
    let tokens: Vec<&str> = sentence.split_whitespace().collect();
    if tokens.len() < MIN_WORDS || tokens.len() > MAX_WORDS {
        return None;
    }
    let (last, rest) = tokens.split_last()?;
    let parts = text::split_token(last);
    if !parts.leading.is_empty() {
        return None;
    }
    // Interior punctuation means a clause structure this rewrite can't see
    if rest
        .iter()
        .any(|t| t.chars().any(|c| !(c.is_alphanumeric() || c == '-' || c == '\'')))
    {
        return None;
    }
    let mut words: Vec<&str> = rest.to_vec();
    words.push(parts.core);
    if words.iter().any(|w| w.is_empty()) {
        return None;
    }
    Some(Clause {
        words,
        terminal: parts.trailing,
    })
}

/// Rewrite a simple-past `subject verb object` clause as
/// `Object was/were participle by subject`.
pub fn to_passive(sentence: &str, analyzer: &dyn LanguageAnalyzer) -> Option<String> {
    let clause = clause(sentence)?;
    let words = &clause.words;
    let tags = analyzer.tag_words(words);

    let verb_index = subject_end(words, &tags)?;
    let verb = words[verb_index];
    let lower_verb = verb.to_lowercase();
    if AUXILIARIES.contains(&lower_verb.as_str())
        || verbs::is_linking_verb(&lower_verb)
        || !verbs::looks_past(&lower_verb)
    {
        return None;
    }

    let object = &words[verb_index + 1..];
    let object_tags = tags.get(verb_index + 1..).unwrap_or_default();
    if object.is_empty() || object.len() > 4 {
        return None;
    }
    let first_object = object[0].to_lowercase();
    let starts_ok = object_tags.first() == Some(&PosTag::Determiner)
        || to_subject_case(&first_object).is_some();
    if !starts_ok
        || object_tags
            .iter()
            .any(|t| matches!(t, PosTag::Preposition | PosTag::Conjunction | PosTag::Verb))
    {
        return None;
    }

    let plural = object_is_plural(object);
    let object_phrase = if object.len() == 1 {
        match to_subject_case(&first_object) {
            Some(pronoun) => pronoun.to_string(),
            None => return None,
        }
    } else {
        object.join(" ")
    };

    let subject = &words[..verb_index];
    let agent = if subject.len() == 1 {
        to_object_case(subject[0])?.to_string()
    } else {
        lowercase_determiner(subject)
    };

    let participle = verbs::past_participle(&lower_verb);
    let be = if plural { "were" } else { "was" };
    Some(format!(
        "{} {be} {participle} by {agent}{}",
        text::capitalize_first(&lowercase_determiner_str(&object_phrase)),
        clause.terminal
    ))
}

/// Rewrite `X was/were participle by Y` as `Y past X`.
pub fn to_active(sentence: &str, analyzer: &dyn LanguageAnalyzer) -> Option<String> {
    let clause = clause(sentence)?;
    let words = &clause.words;
    let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

    let be_index = lower.iter().position(|w| w == "was" || w == "were")?;
    if be_index == 0 || be_index > 4 {
        return None;
    }
    let participle = lower.get(be_index + 1)?;
    if !verbs::looks_participle(participle) || lower.get(be_index + 2)? != "by" {
        return None;
    }
    let agent = &words[be_index + 3..];
    if agent.is_empty() || agent.len() > 4 {
        return None;
    }
    let agent_tags = analyzer.tag_words(agent);
    if agent_tags
        .iter()
        .any(|t| matches!(t, PosTag::Preposition | PosTag::Conjunction))
    {
        return None;
    }

    let patient = &words[..be_index];
    let subject = if agent.len() == 1 {
        match to_subject_case(agent[0]) {
            Some(pronoun) => pronoun.to_string(),
            None => agent[0].to_string(),
        }
    } else {
        agent.join(" ")
    };
    let object = if patient.len() == 1 {
        match to_object_case(patient[0]) {
            Some(pronoun) => pronoun.to_string(),
            None => lowercase_determiner(patient),
        }
    } else {
        lowercase_determiner(patient)
    };

    let subject = if subject == "i" {
        "I".to_string()
    } else {
        text::capitalize_first(&subject)
    };
    Some(format!(
        "{subject} {} {object}{}",
        verbs::simple_past(participle),
        clause.terminal
    ))
}

/// Index of the word right after a pronoun or `determiner noun…` subject.
fn subject_end(words: &[&str], tags: &[PosTag]) -> Option<usize> {
    if to_object_case(words[0]).is_some() {
        return Some(1);
    }
    if tags.first() != Some(&PosTag::Determiner) {
        return None;
    }
    // Determiner plus up to two modifiers/nouns, then the verb
    (2..=3).find(|&i| {
        i < words.len()
            && tags.get(1..i).is_some_and(|modifiers| {
                modifiers
                    .iter()
                    .all(|t| matches!(t, PosTag::Noun | PosTag::Adjective | PosTag::Unknown))
            })
            && verbs::looks_past(words[i])
    })
}

fn object_is_plural(object: &[&str]) -> bool {
    let first = object[0].to_lowercase();
    if matches!(first.as_str(), "us" | "them" | "you") {
        return true;
    }
    if PLURAL_DETERMINERS.contains(&first.as_str()) {
        return true;
    }
    let head = object[object.len() - 1].to_lowercase();
    object.len() > 1 && head.len() > 3 && head.ends_with('s') && !head.ends_with("ss")
}

fn lowercase_determiner(phrase: &[&str]) -> String {
    lowercase_determiner_str(&phrase.join(" "))
}

/// Lowercase a leading article/determiner; proper nouns keep their capital.
fn lowercase_determiner_str(phrase: &str) -> String {
    let first = phrase.split(' ').next().unwrap_or_default().to_lowercase();
    let is_determiner = matches!(
        first.as_str(),
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "my" | "your" | "his" | "her"
            | "its" | "our" | "their" | "each" | "every" | "some" | "any" | "no" | "many"
            | "several" | "both" | "few" | "all"
    );
    if is_determiner {
        text::lowercase_first(phrase)
    } else {
        phrase.to_string()
    }
}
