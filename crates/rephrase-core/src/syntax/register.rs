//! Register swaps between formal and informal vocabulary.

use std::collections::HashMap;

use crate::dictionaries::verbs;
use crate::lexicon::{Lexicon, RegisterSwap};
use crate::options::{Formality, TransformationOptions};
use crate::tagger::{LanguageAnalyzer, PosTag};
use crate::text;

/// A single swap target with the tag it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    word: String,
    tag: PosTag,
    intent_sensitive: bool,
}

/// Lookup tables for both directions, inflections included.
#[derive(Debug, Clone, Default)]
pub struct RegisterTable {
    to_formal: HashMap<String, Target>,
    to_informal: HashMap<String, Target>,
}

impl RegisterTable {
    /// Expand the swap pairs in `lexicon` into per-form lookups.
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut table = Self::default();
        for swap in lexicon.register_swaps() {
            table.add(swap);
        }
        table
    }

    fn add(&mut self, swap: &RegisterSwap) {
        let pairs: Vec<(String, String)> = if swap.tag == PosTag::Verb {
            verb_forms(&swap.informal)
                .into_iter()
                .zip(verb_forms(&swap.formal))
                .collect()
        } else {
            vec![(swap.informal.clone(), swap.formal.clone())]
        };
        for (informal, formal) in pairs {
            self.to_formal.entry(informal.clone()).or_insert(Target {
                word: formal.clone(),
                tag: swap.tag,
                intent_sensitive: swap.intent_sensitive,
            });
            self.to_informal.entry(formal).or_insert(Target {
                word: informal,
                tag: swap.tag,
                intent_sensitive: swap.intent_sensitive,
            });
        }
    }

    /// Swap register-marked words in `sentence` toward `options.formality`.
    ///
    /// Returns the rewritten sentence and the number of swaps made.
    pub fn apply(
        &self,
        sentence: &str,
        analyzer: &dyn LanguageAnalyzer,
        options: &TransformationOptions,
    ) -> (String, usize) {
        let table = match options.formality {
            Formality::Formal => &self.to_formal,
            Formality::Informal => &self.to_informal,
        };
        let tokens = text::tokens_with_offsets(sentence);
        let cores: Vec<&str> = tokens.iter().map(|(_, t)| text::split_token(t).core).collect();
        let tags = analyzer.tag_words(&cores);

        let mut out = String::with_capacity(sentence.len() + 8);
        let mut cursor = 0;
        let mut swaps = 0;
        for (i, (offset, token)) in tokens.iter().enumerate() {
            out.push_str(&sentence[cursor..*offset]);
            cursor = offset + token.len();

            let parts = text::split_token(token);
            let tag = tags.get(i).copied().unwrap_or_default();
            let target = table.get(&parts.core.to_lowercase()).filter(|target| {
                let tag_fits =
                    tag == target.tag || (target.tag == PosTag::Verb && tag == PosTag::Unknown);
                tag_fits && !(target.intent_sensitive && options.preserve_intent)
            });
            match target {
                Some(target) => {
                    out.push_str(&parts.with_core(&text::match_case(parts.core, &target.word)));
                    swaps += 1;
                }
                None => out.push_str(token),
            }
        }
        out.push_str(&sentence[cursor..]);
        (out, swaps)
    }
}

/// Base, third person, simple past, present participle.
fn verb_forms(base: &str) -> [String; 4] {
    [
        base.to_string(),
        third_person(base),
        verbs::simple_past(base),
        present_participle(base),
    ]
}

fn third_person(base: &str) -> String {
    let consonant_y = base.ends_with('y')
        && !base
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
    if consonant_y {
        format!("{}ies", &base[..base.len() - 1])
    } else if ["s", "sh", "ch", "x", "z"].iter().any(|s| base.ends_with(s)) {
        format!("{base}es")
    } else {
        format!("{base}s")
    }
}

fn present_participle(base: &str) -> String {
    let chars: Vec<char> = base.chars().collect();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');
    match chars.as_slice() {
        [.., 'e', 'e'] => format!("{base}ing"),
        [.., 'e'] => format!("{}ing", &base[..base.len() - 1]),
        [.., a, v, c]
            if chars.len() <= 4
                && !is_vowel(*a)
                && is_vowel(*v)
                && !is_vowel(*c)
                && !matches!(*c, 'w' | 'x' | 'y') =>
        {
            format!("{base}{c}ing")
        }
        _ => format!("{base}ing"),
    }
}
