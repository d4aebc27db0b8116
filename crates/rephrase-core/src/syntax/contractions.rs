//! Contraction expansion and contraction.

use regex::{Captures, Regex};

use crate::lexicon::Lexicon;
use crate::text;

/// A compiled rewrite in one direction.
#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    replacement: String,
    /// Whether the pattern captured the start of a following word.
    needs_following: bool,
}

/// Compiled contraction rules for both directions.
#[derive(Debug, Clone)]
pub struct ContractionRules {
    expand: Vec<Rule>,
    contract: Vec<Rule>,
}

impl ContractionRules {
    /// Compile the contraction table from `lexicon`.
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut expand = Vec::new();
        let mut contract = Vec::new();

        for (contracted, expanded) in lexicon.contractions() {
            let apostrophe_class = regex::escape(contracted).replace('\'', "['\u{2019}]");
            expand.push(Rule {
                pattern: Regex::new(&format!(r"(?i)\b{apostrophe_class}\b"))
                    .expect("valid regex"),
                replacement: expanded.clone(),
                needs_following: false,
            });

            if expanded == "let us" {
                continue;
            }
            let words: Vec<String> = expanded.split(' ').map(regex::escape).collect();
            let negation = expanded.ends_with(" not") || expanded == "cannot";
            let pattern = if negation {
                format!(r"(?i)\b{}\b", words.join(r"\s+"))
            } else {
                // Clause-final auxiliaries ("that's what it is") must stay expanded
                format!(r"(?i)\b{}\b(\s+[\w'\u{{2019}}])", words.join(r"\s+"))
            };
            contract.push(Rule {
                pattern: Regex::new(&pattern).expect("valid regex"),
                replacement: contracted.clone(),
                needs_following: !negation,
            });
        }

        Self { expand, contract }
    }

    /// Replace every known contraction with its expanded form.
    pub fn expand(&self, sentence: &str) -> String {
        apply(&self.expand, sentence)
    }

    /// Contract expanded forms that are followed by more of the clause.
    pub fn contract(&self, sentence: &str) -> String {
        apply(&self.contract, sentence)
    }
}

fn apply(rules: &[Rule], sentence: &str) -> String {
    let mut current = sentence.to_string();
    for rule in rules {
        if !rule.pattern.is_match(&current) {
            continue;
        }
        current = rule
            .pattern
            .replace_all(&current, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let (matched, following) = match caps.get(1) {
                    Some(tail) if rule.needs_following => {
                        (&whole[..whole.len() - tail.as_str().len()], tail.as_str())
                    }
                    _ => (whole, ""),
                };
                format!("{}{following}", fix_pronoun_i(&text::match_case(matched, &rule.replacement)))
            })
            .into_owned();
    }
    current
}

/// The pronoun "I" is capitalized wherever it lands.
fn fix_pronoun_i(phrase: &str) -> String {
    if phrase == "i" || phrase.starts_with("i ") || phrase.starts_with("i'") {
        text::capitalize_first(phrase)
    } else {
        phrase.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ContractionRules {
        ContractionRules::new(&Lexicon::english())
    }

    #[test]
    fn expands_common_contractions() {
        let rules = rules();
        assert_eq!(rules.expand("We don't know."), "We do not know.");
        assert_eq!(rules.expand("It's fine, I'm sure."), "It is fine, I am sure.");
        assert_eq!(rules.expand("They can't stop."), "They cannot stop.");
    }

    #[test]
    fn expands_curly_apostrophes() {
        assert_eq!(rules().expand("We won\u{2019}t go."), "We will not go.");
    }

    #[test]
    fn expansion_keeps_case() {
        let rules = rules();
        assert_eq!(rules.expand("Don't panic."), "Do not panic.");
        assert_eq!(rules.expand("DON'T PANIC."), "DO NOT PANIC.");
        assert_eq!(rules.expand("so i'm here"), "so I am here");
    }

    #[test]
    fn contracts_when_clause_continues() {
        let rules = rules();
        assert_eq!(rules.contract("We do not know."), "We don't know.");
        assert_eq!(rules.contract("It is fine."), "It's fine.");
        assert_eq!(rules.contract("I am sure it will not fail."), "I'm sure it won't fail.");
    }

    #[test]
    fn clause_final_auxiliary_stays_expanded() {
        assert_eq!(rules().contract("That is what it is."), "That's what it is.");
    }

    #[test]
    fn let_us_is_left_alone() {
        assert_eq!(rules().contract("Let us begin."), "Let us begin.");
    }

    #[test]
    fn text_without_matches_is_unchanged() {
        let rules = rules();
        assert_eq!(rules.expand("Plain words only."), "Plain words only.");
        assert_eq!(rules.contract("Plain words only."), "Plain words only.");
    }
}
