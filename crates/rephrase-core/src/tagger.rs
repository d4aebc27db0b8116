//! Part-of-speech tagging and sentence detection.
//!
//! Every stage reaches grammar through the [`LanguageAnalyzer`] capability so
//! the heuristic implementation here can be replaced by a real tagger without
//! touching the pipeline.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionaries::verbs;
use crate::text;

/// Coarse part-of-speech tag.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PosTag {
    /// Person, place, thing, or idea.
    Noun,
    /// Action or state, auxiliaries and modals included.
    Verb,
    /// Modifier of a noun.
    Adjective,
    /// Modifier of a verb, adjective, or clause.
    Adverb,
    /// Relation word (in, on, by, ...).
    Preposition,
    /// Article or other noun determiner.
    Determiner,
    /// Personal, relative, or indefinite pronoun.
    Pronoun,
    /// Coordinating or subordinating conjunction.
    Conjunction,
    /// No rule matched.
    #[default]
    Unknown,
}

impl PosTag {
    /// Returns the tag as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Preposition => "preposition",
            Self::Determiner => "determiner",
            Self::Pronoun => "pronoun",
            Self::Conjunction => "conjunction",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a grammatical tag label as lookup services spell them.
    ///
    /// Accepts full names and the usual short forms (`n`, `v`, `adj`, `adv`,
    /// `prep`, `det`, `article`), case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "noun" | "n" | "nn" | "nns" => Self::Noun,
            "verb" | "v" | "vb" | "vbp" | "vbz" | "vbd" | "vbn" => Self::Verb,
            "adjective" | "adj" | "jj" => Self::Adjective,
            "adverb" | "adv" | "rb" => Self::Adverb,
            "preposition" | "prep" | "in" => Self::Preposition,
            "determiner" | "det" | "article" | "dt" => Self::Determiner,
            "pronoun" | "pron" | "prp" => Self::Pronoun,
            "conjunction" | "conj" | "cc" => Self::Conjunction,
            _ => Self::Unknown,
        }
    }

    /// Whether a rule actually matched.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for PosTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grammar capability consumed by every stage.
pub trait LanguageAnalyzer: Send + Sync {
    /// Tag a single word out of context.
    fn tag(&self, word: &str) -> PosTag;

    /// Byte spans of each sentence in `text`.
    fn sentence_spans(&self, text: &str) -> Vec<Range<usize>>;

    /// Split `text` into sentence strings.
    fn split_sentences(&self, text: &str) -> Vec<String> {
        self.sentence_spans(text)
            .into_iter()
            .map(|span| text[span].to_string())
            .collect()
    }

    /// Tag a word sequence, letting neighbors settle ambiguous words.
    fn tag_words(&self, words: &[&str]) -> Vec<PosTag> {
        words.iter().map(|w| self.tag(w)).collect()
    }
}

static DETERMINERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "its", "our",
        "their", "each", "every", "some", "any", "no", "another", "either", "neither", "all",
        "both", "many", "much", "several", "few",
    ])
});

static PREPOSITIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "in", "on", "at", "to", "for", "with", "by", "from", "of", "about", "into", "onto",
        "over", "under", "between", "through", "during", "before", "after", "above", "below",
        "across", "against", "along", "among", "around", "behind", "beside", "beyond", "despite",
        "inside", "near", "off", "outside", "toward", "towards", "upon", "within", "without",
        "via", "per", "than",
    ])
});

static PRONOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "i", "me", "you", "he", "him", "she", "her", "it", "we", "us", "they", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who", "whom",
        "whose", "which", "what", "someone", "anyone", "everyone", "nobody", "something",
        "anything", "everything", "nothing",
    ])
});

static CONJUNCTIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "unless",
        "while", "whereas", "if", "when", "whenever", "whether", "since",
    ])
});

static VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do",
        "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
        "get", "go", "make", "take", "give", "say", "see", "know", "think", "use", "show", "help",
        "need", "want", "try", "seem", "become", "provide", "create", "build", "run", "allow",
        "require", "include", "improve", "implement", "utilize", "demonstrate", "obtain",
        "assist", "consider", "believe", "review", "fix", "deploy", "start", "begin", "keep",
        "let", "put", "find", "tell", "ask", "feel", "leave", "call", "write", "read", "learn",
        "change", "move", "play", "hold", "bring", "happen", "meet", "continue", "achieve",
        "enhance", "establish", "facilitate", "optimize", "maintain", "reduce", "increase",
        "explain", "check", "evaluate", "assess", "handle", "manage", "fail", "ship", "test",
        "like", "love", "hate",
    ])
});

static ADVERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "very", "really", "quite", "rather", "too", "also", "just", "only", "still", "already",
        "always", "never", "often", "sometimes", "usually", "not", "soon", "now", "then", "here",
        "there", "today", "yesterday", "tomorrow", "again", "almost", "even", "perhaps", "maybe",
        "well", "however", "therefore", "furthermore", "moreover", "consequently", "meanwhile",
        "nevertheless", "accordingly", "anyway", "basically", "actually", "literally",
    ])
});

static ADJECTIVES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "good", "bad", "great", "big", "small", "large", "new", "old", "important", "simple",
        "easy", "hard", "fast", "slow", "high", "low", "long", "short", "clear", "quick", "full",
        "whole", "main", "major", "minor", "best", "better", "worse", "worst", "excellent",
        "poor", "able", "likely", "possible", "nice", "cool", "okay", "awesome", "terrible",
        "awful", "happy", "sad", "sure", "ready", "real", "true", "right", "wrong", "own",
        "substantial", "minimal", "unfavorable", "robust", "reliable", "stable",
    ])
});

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ance", "ence", "ism", "ship", "hood", "ery", "ist",
];
const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "less", "ish", "ary", "ic",
];
const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify"];

const MODALS: &[&str] = &[
    "to", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];
const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "we", "they", "he", "she", "it"];

/// Rule-based analyzer built from closed-class word sets and suffix rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    /// Create a new heuristic analyzer.
    pub const fn new() -> Self {
        Self
    }

    fn tag_lower(lower: &str) -> PosTag {
        if DETERMINERS.contains(lower) {
            return PosTag::Determiner;
        }
        if PRONOUNS.contains(lower) {
            return PosTag::Pronoun;
        }
        if PREPOSITIONS.contains(lower) {
            return PosTag::Preposition;
        }
        if CONJUNCTIONS.contains(lower) {
            return PosTag::Conjunction;
        }
        if VERBS.contains(lower) || verbs::is_irregular_base(lower) {
            return PosTag::Verb;
        }
        if ADVERBS.contains(lower) {
            return PosTag::Adverb;
        }
        if ADJECTIVES.contains(lower) || verbs::is_adjective_exception(lower) {
            return PosTag::Adjective;
        }
        if lower.len() > 4 && lower.ends_with("ly") {
            return PosTag::Adverb;
        }
        if NOUN_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s)) {
            return PosTag::Noun;
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s)) {
            return PosTag::Adjective;
        }
        if VERB_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s))
            || verbs::looks_past(lower)
            || verbs::is_irregular_participle(lower)
            || (lower.len() > 5 && lower.ends_with("ing"))
        {
            return PosTag::Verb;
        }
        if let Some(stem) = lower.strip_suffix('s')
            && !stem.ends_with('s')
            && stem.len() > 2
        {
            if VERBS.contains(stem) || stem.strip_suffix('e').is_some_and(|s| VERBS.contains(s)) {
                return PosTag::Verb;
            }
            return PosTag::Noun;
        }
        PosTag::Unknown
    }
}

impl LanguageAnalyzer for HeuristicAnalyzer {
    fn tag(&self, word: &str) -> PosTag {
        let core = text::split_token(word).core;
        if core.is_empty() || core.chars().all(|c| c.is_ascii_digit()) {
            return PosTag::Unknown;
        }
        let lower = core.to_lowercase();
        let tag = Self::tag_lower(&lower);
        if tag == PosTag::Unknown && core.chars().next().is_some_and(char::is_uppercase) {
            // Capitalized and otherwise unknown reads as a proper noun
            return PosTag::Noun;
        }
        tag
    }

    fn sentence_spans(&self, text: &str) -> Vec<Range<usize>> {
        text::sentence_spans(text)
    }

    fn tag_words(&self, words: &[&str]) -> Vec<PosTag> {
        let lowered: Vec<String> = words
            .iter()
            .map(|w| text::split_token(w).core.to_lowercase())
            .collect();
        let mut tags: Vec<PosTag> = words.iter().map(|w| self.tag(w)).collect();

        for i in 1..tags.len() {
            let prev = lowered[i - 1].as_str();
            let current = lowered[i].as_str();
            let inflected = verbs::looks_past(current) || current.ends_with("ing");
            match tags[i] {
                PosTag::Verb | PosTag::Unknown
                    if tags[i - 1] == PosTag::Determiner && !inflected =>
                {
                    tags[i] = PosTag::Noun;
                }
                PosTag::Noun | PosTag::Unknown if MODALS.contains(&prev) => {
                    tags[i] = PosTag::Verb;
                }
                PosTag::Unknown if SUBJECT_PRONOUNS.contains(&prev) => {
                    tags[i] = PosTag::Verb;
                }
                _ => {}
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_classes() {
        let analyzer = HeuristicAnalyzer::new();
        assert_eq!(analyzer.tag("the"), PosTag::Determiner);
        assert_eq!(analyzer.tag("with"), PosTag::Preposition);
        assert_eq!(analyzer.tag("they"), PosTag::Pronoun);
        assert_eq!(analyzer.tag("because"), PosTag::Conjunction);
        assert_eq!(analyzer.tag("should"), PosTag::Verb);
    }

    #[test]
    fn suffix_rules() {
        let analyzer = HeuristicAnalyzer::new();
        assert_eq!(analyzer.tag("implementation"), PosTag::Noun);
        assert_eq!(analyzer.tag("quickly"), PosTag::Adverb);
        assert_eq!(analyzer.tag("dangerous"), PosTag::Adjective);
        assert_eq!(analyzer.tag("organize"), PosTag::Verb);
        assert_eq!(analyzer.tag("deployed"), PosTag::Verb);
        assert_eq!(analyzer.tag("reviews"), PosTag::Verb);
        assert_eq!(analyzer.tag("servers"), PosTag::Noun);
    }

    #[test]
    fn punctuation_and_numbers() {
        let analyzer = HeuristicAnalyzer::new();
        assert_eq!(analyzer.tag("good,"), PosTag::Adjective);
        assert_eq!(analyzer.tag("42"), PosTag::Unknown);
        assert_eq!(analyzer.tag("--"), PosTag::Unknown);
    }

    #[test]
    fn capitalized_unknown_is_proper_noun() {
        let analyzer = HeuristicAnalyzer::new();
        assert_eq!(analyzer.tag("Kubernetes"), PosTag::Noun);
        assert_eq!(analyzer.tag("zorblat"), PosTag::Unknown);
    }

    #[test]
    fn context_settles_ambiguity() {
        let analyzer = HeuristicAnalyzer::new();
        let tags = analyzer.tag_words(&["the", "use", "of", "it"]);
        assert_eq!(tags[1], PosTag::Noun);
        let tags = analyzer.tag_words(&["we", "should", "use", "it"]);
        assert_eq!(tags[2], PosTag::Verb);
        let tags = analyzer.tag_words(&["they", "zorblat", "daily"]);
        assert_eq!(tags[1], PosTag::Verb);
    }

    #[test]
    fn labels_parse() {
        assert_eq!(PosTag::from_label("adj"), PosTag::Adjective);
        assert_eq!(PosTag::from_label("Verb"), PosTag::Verb);
        assert_eq!(PosTag::from_label("article"), PosTag::Determiner);
        assert_eq!(PosTag::from_label("syn"), PosTag::Unknown);
    }

    #[test]
    fn sentences_via_capability() {
        let analyzer = HeuristicAnalyzer::new();
        assert_eq!(
            analyzer.split_sentences("One here. Two there."),
            vec!["One here.", "Two there."]
        );
    }
}
