//! Pattern tables consulted by every stage.
//!
//! A [`Lexicon`] is immutable once built and is shared by the analyzers via
//! `Arc`, so a caller can swap in a per-domain table set without touching
//! stage code. [`Lexicon::english`] is the built-in table set.
//!
//! The raw tables live in [`LexiconTables`], which is plain serde data. Edit
//! a copy of [`LexiconTables::english`] and compile it with
//! [`Lexicon::from_tables`], or layer a TOML, YAML, or JSON file over the
//! English tables with [`Lexicon::from_file`].

use std::collections::{BTreeMap, HashMap, HashSet};

use aho_corasick::{AhoCorasick, MatchKind};
use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::options::{EmotionalTone, Formality};
use crate::tagger::PosTag;
use crate::text;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "when", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "once", "here", "there", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "can", "will", "just", "should", "now", "is", "am", "are", "was", "were",
    "be", "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "i",
    "me", "my", "we", "our", "you", "your", "he", "him", "his", "she", "her", "it", "its",
    "they", "them", "their", "what", "which", "who", "whom", "this", "that", "these", "those",
    "of", "as", "would", "could", "might", "must", "shall", "may", "also", "because", "while",
    "where", "why", "how", "yes", "yet",
];

const IMPORTANT_TERMS: &[&str] = &[
    "api", "sdk", "http", "https", "json", "xml", "yaml", "sql", "database", "server",
    "client", "algorithm", "function", "variable", "parameter", "interface", "protocol",
    "kubernetes", "docker", "python", "rust", "javascript", "typescript", "react", "aws",
    "linux", "git", "mysql", "postgres", "cpu", "gpu", "url", "html", "css", "framework",
    "repository", "compiler", "runtime", "endpoint", "schema",
];

const INTENT_CRITICAL: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would", "not", "no",
    "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without", "always",
    "sometimes", "often", "rarely", "usually", "seldom", "if", "unless", "whether",
    "otherwise", "provided", "assuming", "except", "only",
];

const FIXED_PHRASES: &[&str] = &[
    "in order to",
    "as well as",
    "on the other hand",
    "in terms of",
    "take into account",
    "make sure",
    "at least",
    "as soon as",
    "in spite of",
    "by means of",
];

const COLLOCATIONS: &[(&str, &str)] = &[
    ("make", "decision"),
    ("make", "progress"),
    ("take", "action"),
    ("take", "place"),
    ("pay", "attention"),
    ("play", "role"),
    ("raise", "concern"),
    ("meet", "deadline"),
    ("meet", "requirement"),
    ("solve", "problem"),
    ("address", "issue"),
    ("reach", "conclusion"),
    ("draw", "conclusion"),
    ("highly", "recommend"),
    ("deeply", "concerned"),
    ("strongly", "believe"),
    ("significant", "improvement"),
    ("key", "factor"),
    ("major", "concern"),
    ("heavy", "rain"),
    ("strong", "coffee"),
    ("quick", "look"),
    ("brief", "overview"),
    ("common", "practice"),
];

const FORMAL_PATTERN: &str = r"(?i)^(implement|utiliz|facilitat|optimiz|establish|demonstrat|obtain|assist|requir|substantial|significant|consequent|furthermore|therefore|approximat|sufficient|additional|numerous|commenc|endeavo|ascertain|comprehend|enhanc|acquir)";

const INFORMAL_PATTERN: &str = r"(?i)^(use|do|help|start|get|got|show|need|big|small|good|bad|really|lots|stuff|thing|okay|cool|fix|check|try|kind|pretty|figure|grab)(?:s|es|d|ed|ing)?\b";

const TONE_PATTERNS: &[(EmotionalTone, &str)] = &[
    (
        EmotionalTone::Positive,
        r"good|great|excellent|happy|success|improv|benefit|achiev|accomplish|awesome|wonderful|effective|opportunit|enjoy|love|positive|best|valuable|glad",
    ),
    (
        EmotionalTone::Negative,
        r"bad|poor|terribl|awful|fail|problem|issue|concern|wrong|difficult|worse|worst|hate|negative|risk|unfortunat|loss|broken",
    ),
    (
        EmotionalTone::Professional,
        r"implement|utiliz|facilitat|optimi|establish|demonstrat|assess|evaluat|strateg|objective|deliver|ensur|comprehensive|efficien",
    ),
    (
        EmotionalTone::Casual,
        r"hey|cool|awesome|stuff|thing|gonna|wanna|kinda|pretty|okay|yeah|guys|fun|nice|check",
    ),
];

const INTENSIFIERS: &[&str] = &[
    "very", "extremely", "highly", "really", "incredibly", "absolutely", "completely",
    "totally", "deeply",
];

const DIMINISHERS: &[&str] = &[
    "slightly", "somewhat", "barely", "hardly", "mildly", "fairly", "partly",
];

const TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "moreover",
    "consequently",
    "meanwhile",
    "nevertheless",
    "alternatively",
    "additionally",
    "finally",
    "instead",
    "otherwise",
    "similarly",
    "thus",
    "hence",
    "also",
    "besides",
    "still",
];

const INFORMAL_MARKERS: &[&str] = &[
    "'ll", "'re", "'ve", "\u{2019}ll", "\u{2019}re", "\u{2019}ve", "gonna", "wanna", "dunno",
    "ain't", "ain\u{2019}t", "gotta", "kinda", "sorta", "yeah", "nope", "lol",
];

/// (contracted, expanded) pairs; the apostrophe is ASCII and callers also accept U+2019.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("can't", "cannot"),
    ("won't", "will not"),
    ("shan't", "shall not"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("haven't", "have not"),
    ("hasn't", "has not"),
    ("hadn't", "had not"),
    ("wouldn't", "would not"),
    ("shouldn't", "should not"),
    ("couldn't", "could not"),
    ("mustn't", "must not"),
    ("i'm", "i am"),
    ("you're", "you are"),
    ("we're", "we are"),
    ("they're", "they are"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("what's", "what is"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("i've", "i have"),
    ("you've", "you have"),
    ("we've", "we have"),
    ("they've", "they have"),
    ("i'll", "i will"),
    ("you'll", "you will"),
    ("we'll", "we will"),
    ("they'll", "they will"),
    ("it'll", "it will"),
    ("i'd", "i would"),
    ("you'd", "you would"),
    ("we'd", "we would"),
    ("they'd", "they would"),
    ("let's", "let us"),
];

/// (formal, informal, tag, intent-sensitive)
const REGISTER_SWAPS: &[(&str, &str, PosTag, bool)] = &[
    ("obtain", "get", PosTag::Verb, false),
    ("utilize", "use", PosTag::Verb, false),
    ("demonstrate", "show", PosTag::Verb, false),
    ("assist", "help", PosTag::Verb, false),
    ("significantly", "really", PosTag::Adverb, false),
    ("substantially", "very", PosTag::Adverb, false),
    ("excellent", "good", PosTag::Adjective, true),
    ("unfavorable", "bad", PosTag::Adjective, true),
    ("substantial", "big", PosTag::Adjective, true),
    ("minimal", "small", PosTag::Adjective, true),
];

const TONE_MODIFIERS: &[(EmotionalTone, &str, &str)] = &[
    (EmotionalTone::Positive, r"bad|poor|terrible", "challenging"),
    (EmotionalTone::Positive, r"problem|issue", "opportunity"),
    (EmotionalTone::Positive, r"failed|failing", "learned from"),
    (EmotionalTone::Negative, r"good|great|excellent", "acceptable"),
    (EmotionalTone::Negative, r"success|achievement", "result"),
    (EmotionalTone::Negative, r"improved|improving", "changed"),
    (EmotionalTone::Professional, r"think|believe", "assess"),
    (EmotionalTone::Professional, r"use|utilize", "implement"),
    (EmotionalTone::Professional, r"show|display", "demonstrate"),
    (EmotionalTone::Casual, r"implement|utilize", "use"),
    (EmotionalTone::Casual, r"demonstrate|exhibit", "show"),
    (EmotionalTone::Casual, r"assess|evaluate", "check"),
];

const EMOTIONAL_WORDS: &[(&str, EmotionalTone, f64, Formality)] = &[
    ("accomplish", EmotionalTone::Positive, 0.8, Formality::Formal),
    ("achieve", EmotionalTone::Positive, 0.8, Formality::Formal),
    ("success", EmotionalTone::Positive, 0.8, Formality::Formal),
    ("excellent", EmotionalTone::Positive, 0.8, Formality::Formal),
    ("awesome", EmotionalTone::Positive, 0.9, Formality::Informal),
    ("great", EmotionalTone::Positive, 0.7, Formality::Informal),
    ("good", EmotionalTone::Positive, 0.6, Formality::Informal),
    ("happy", EmotionalTone::Positive, 0.7, Formality::Informal),
    ("challenge", EmotionalTone::Negative, 0.5, Formality::Formal),
    ("concern", EmotionalTone::Negative, 0.6, Formality::Formal),
    ("failure", EmotionalTone::Negative, 0.8, Formality::Formal),
    ("problem", EmotionalTone::Negative, 0.6, Formality::Informal),
    ("bad", EmotionalTone::Negative, 0.7, Formality::Informal),
    ("awful", EmotionalTone::Negative, 0.9, Formality::Informal),
    ("terrible", EmotionalTone::Negative, 0.9, Formality::Informal),
    ("optimize", EmotionalTone::Professional, 0.6, Formality::Formal),
    ("implement", EmotionalTone::Professional, 0.5, Formality::Formal),
    ("utilize", EmotionalTone::Professional, 0.5, Formality::Formal),
    ("use", EmotionalTone::Casual, 0.3, Formality::Informal),
    ("get", EmotionalTone::Casual, 0.3, Formality::Informal),
];

/// Dictionary entry for a word that carries emotional weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalWord {
    /// Tone the word pulls toward.
    pub tone: EmotionalTone,
    /// Strength in `[0, 1]`.
    pub intensity: f64,
    /// Register the word belongs to.
    pub formality: Formality,
}

/// A register-marked word pair swapped by the syntax stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSwap {
    /// Formal member of the pair.
    pub formal: String,
    /// Informal member of the pair.
    pub informal: String,
    /// Tag a token must carry to be swapped.
    pub tag: PosTag,
    /// Only swapped when intent preservation is off.
    #[serde(default)]
    pub intent_sensitive: bool,
}

/// A sentence rewrite rule that nudges text toward a tone.
#[derive(Debug, Clone)]
pub struct ToneModifier {
    /// Case-insensitive whole-word pattern.
    pub pattern: Regex,
    /// Replacement, case-matched to each hit.
    pub replacement: String,
}

/// Uncompiled form of a [`ToneModifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneRule {
    /// Word alternation such as `problem|issue`, matched as whole words.
    pub pattern: String,
    /// Replacement text.
    pub replacement: String,
}

impl ToneRule {
    /// Rule replacing any word of `pattern` with `replacement`.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// One value per marked tone. Neutral has no slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneTable<T> {
    /// Value for [`EmotionalTone::Positive`].
    pub positive: T,
    /// Value for [`EmotionalTone::Negative`].
    pub negative: T,
    /// Value for [`EmotionalTone::Professional`].
    pub professional: T,
    /// Value for [`EmotionalTone::Casual`].
    pub casual: T,
}

impl<T> ToneTable<T> {
    /// Slot for `tone`; `None` for neutral.
    pub const fn get(&self, tone: EmotionalTone) -> Option<&T> {
        match tone {
            EmotionalTone::Neutral => None,
            EmotionalTone::Positive => Some(&self.positive),
            EmotionalTone::Negative => Some(&self.negative),
            EmotionalTone::Professional => Some(&self.professional),
            EmotionalTone::Casual => Some(&self.casual),
        }
    }

    /// Mutable slot for `tone`; `None` for neutral.
    pub const fn get_mut(&mut self, tone: EmotionalTone) -> Option<&mut T> {
        match tone {
            EmotionalTone::Neutral => None,
            EmotionalTone::Positive => Some(&mut self.positive),
            EmotionalTone::Negative => Some(&mut self.negative),
            EmotionalTone::Professional => Some(&mut self.professional),
            EmotionalTone::Casual => Some(&mut self.casual),
        }
    }

    fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<ToneTable<U>, E> {
        Ok(ToneTable {
            positive: f(self.positive)?,
            negative: f(self.negative)?,
            professional: f(self.professional)?,
            casual: f(self.casual)?,
        })
    }
}

/// Raw, serializable lexical tables.
///
/// Every word list is matched case-insensitively. Pattern fields hold regex
/// source: `formal_pattern` and `informal_pattern` are complete expressions
/// tested against single words, `tone_patterns` are stem alternations
/// matched at word starts, and each [`ToneRule`] pattern is a whole-word
/// alternation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconTables {
    /// Words never substituted.
    pub stopwords: Vec<String>,
    /// Technical vocabulary kept verbatim.
    pub important_terms: Vec<String>,
    /// Modals, negations, and conditionals.
    pub intent_critical: Vec<String>,
    /// Multi-word phrases whose members are never substituted.
    pub fixed_phrases: Vec<String>,
    /// Word pairs that favor each other.
    pub collocations: Vec<(String, String)>,
    /// Matches words of the formal register.
    pub formal_pattern: String,
    /// Matches words of the informal register.
    pub informal_pattern: String,
    /// Stems that mark a sentence as carrying a tone.
    pub tone_patterns: ToneTable<String>,
    /// Amplifying adverbs.
    pub intensifiers: Vec<String>,
    /// Softening adverbs.
    pub diminishers: Vec<String>,
    /// Sentence connectors.
    pub transition_words: Vec<String>,
    /// Substrings that mark casual writing.
    pub informal_markers: Vec<String>,
    /// `(contracted, expanded)` pairs with ASCII apostrophes.
    pub contractions: Vec<(String, String)>,
    /// Register-marked word pairs.
    pub register_swaps: Vec<RegisterSwap>,
    /// Sentence rewrite rules per tone.
    pub tone_modifiers: ToneTable<Vec<ToneRule>>,
    /// Emotionally weighted words.
    pub emotional_words: BTreeMap<String, EmotionalWord>,
}

impl Default for LexiconTables {
    fn default() -> Self {
        Self::english()
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
        .collect()
}

impl LexiconTables {
    /// The built-in English tables.
    pub fn english() -> Self {
        let mut tone_patterns = ToneTable::<String>::default();
        for (tone, stems) in TONE_PATTERNS {
            if let Some(slot) = tone_patterns.get_mut(*tone) {
                *slot = (*stems).to_string();
            }
        }

        let mut tone_modifiers = ToneTable::<Vec<ToneRule>>::default();
        for (tone, pattern, replacement) in TONE_MODIFIERS {
            if let Some(rules) = tone_modifiers.get_mut(*tone) {
                rules.push(ToneRule::new(*pattern, *replacement));
            }
        }

        Self {
            stopwords: owned(STOPWORDS),
            important_terms: owned(IMPORTANT_TERMS),
            intent_critical: owned(INTENT_CRITICAL),
            fixed_phrases: owned(FIXED_PHRASES),
            collocations: owned_pairs(COLLOCATIONS),
            formal_pattern: FORMAL_PATTERN.to_string(),
            informal_pattern: INFORMAL_PATTERN.to_string(),
            tone_patterns,
            intensifiers: owned(INTENSIFIERS),
            diminishers: owned(DIMINISHERS),
            transition_words: owned(TRANSITION_WORDS),
            informal_markers: owned(INFORMAL_MARKERS),
            contractions: owned_pairs(CONTRACTIONS),
            register_swaps: REGISTER_SWAPS
                .iter()
                .map(|&(formal, informal, tag, intent_sensitive)| RegisterSwap {
                    formal: formal.to_string(),
                    informal: informal.to_string(),
                    tag,
                    intent_sensitive,
                })
                .collect(),
            tone_modifiers,
            emotional_words: EMOTIONAL_WORDS
                .iter()
                .map(|&(word, tone, intensity, formality)| {
                    (
                        word.to_string(),
                        EmotionalWord {
                            tone,
                            intensity,
                            formality,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Immutable lexical tables.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    important_terms: HashSet<String>,
    intent_critical: HashSet<String>,
    fixed_bigrams: HashSet<(String, String)>,
    collocations: HashSet<(String, String)>,
    formal_pattern: Regex,
    informal_pattern: Regex,
    tone_patterns: ToneTable<Regex>,
    intensifiers: HashSet<String>,
    diminishers: HashSet<String>,
    transition_words: HashSet<String>,
    informal_markers: AhoCorasick,
    contractions: Vec<(String, String)>,
    register_swaps: Vec<RegisterSwap>,
    tone_modifiers: ToneTable<Vec<ToneModifier>>,
    emotional_words: HashMap<String, EmotionalWord>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

fn lowercase_set(words: Vec<String>) -> HashSet<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

fn lowercase_pairs(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(a, b)| (a.to_lowercase(), b.to_lowercase()))
        .collect()
}

fn compile(table: &'static str, pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|e| ConfigError::LexiconPattern {
        table,
        reason: e.to_string(),
    })
}

impl Lexicon {
    /// The built-in English tables.
    pub fn english() -> Self {
        Self::from_tables(LexiconTables::english()).expect("valid built-in tables")
    }

    /// Compile `tables` into a lexicon.
    ///
    /// Fails with [`ConfigError::LexiconPattern`] when a pattern does not compile.
    pub fn from_tables(tables: LexiconTables) -> ConfigResult<Self> {
        let fixed_bigrams = tables
            .fixed_phrases
            .iter()
            .flat_map(|phrase| {
                let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
                words
                    .windows(2)
                    .map(|pair| (pair[0].clone(), pair[1].clone()))
                    .collect::<Vec<_>>()
            })
            .collect();

        let tone_patterns = tables
            .tone_patterns
            .try_map(|stems| compile("tone_patterns", &format!(r"(?i)\b(?:{stems})\w*\b")))?;

        let tone_modifiers = tables.tone_modifiers.try_map(|rules| {
            rules
                .into_iter()
                .map(|rule| -> ConfigResult<ToneModifier> {
                    Ok(ToneModifier {
                        pattern: compile(
                            "tone_modifiers",
                            &format!(r"(?i)\b(?:{})\b", rule.pattern),
                        )?,
                        replacement: rule.replacement,
                    })
                })
                .collect::<ConfigResult<Vec<_>>>()
        })?;

        let informal_markers = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&tables.informal_markers)
            .map_err(|e| ConfigError::LexiconPattern {
                table: "informal_markers",
                reason: e.to_string(),
            })?;

        Ok(Self {
            stopwords: lowercase_set(tables.stopwords),
            important_terms: lowercase_set(tables.important_terms),
            intent_critical: lowercase_set(tables.intent_critical),
            fixed_bigrams,
            collocations: lowercase_pairs(tables.collocations).into_iter().collect(),
            formal_pattern: compile("formal_pattern", &tables.formal_pattern)?,
            informal_pattern: compile("informal_pattern", &tables.informal_pattern)?,
            tone_patterns,
            intensifiers: lowercase_set(tables.intensifiers),
            diminishers: lowercase_set(tables.diminishers),
            transition_words: lowercase_set(tables.transition_words),
            informal_markers,
            contractions: lowercase_pairs(tables.contractions),
            register_swaps: tables.register_swaps,
            tone_modifiers,
            emotional_words: tables
                .emotional_words
                .into_iter()
                .map(|(word, entry)| (word.to_lowercase(), entry))
                .collect(),
        })
    }

    /// The English tables with the tables in `path` layered on top.
    ///
    /// Keys present in the file replace the matching English table whole;
    /// nested per-tone tables are merged by tone. The format follows the
    /// extension (`json`, `yaml`/`yml`, anything else is TOML).
    #[tracing::instrument(fields(path = %path))]
    pub fn from_file(path: &Utf8Path) -> ConfigResult<Self> {
        if !path.is_file() {
            return Err(ConfigError::LexiconMissing {
                path: path.to_owned(),
            });
        }

        let figment = Figment::from(Serialized::defaults(LexiconTables::english()));
        let figment = match path.extension() {
            Some("json") => figment.merge(Json::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
        let tables: LexiconTables =
            figment
                .extract()
                .map_err(|e| ConfigError::LexiconFormat {
                    path: path.to_owned(),
                    source: Box::new(e),
                })?;
        let lexicon = Self::from_tables(tables)?;
        tracing::debug!("lexicon loaded");
        Ok(lexicon)
    }

    /// Closed-class or very common word that is never substituted.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Technical term, or an all-caps token of two or more letters.
    pub fn is_important_term(&self, word: &str) -> bool {
        let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
            return true;
        }
        self.important_terms.contains(&word.to_lowercase())
    }

    /// Modal, negation, frequency, or conditional word.
    pub fn is_intent_critical(&self, word: &str) -> bool {
        self.intent_critical.contains(&word.to_lowercase())
    }

    /// Whether `word` forms part of a fixed phrase with an adjacent word.
    pub fn in_fixed_phrase(&self, previous: Option<&str>, word: &str, next: Option<&str>) -> bool {
        let word = word.to_lowercase();
        let with_previous = previous.is_some_and(|p| {
            self.fixed_bigrams
                .contains(&(p.to_lowercase(), word.clone()))
        });
        let with_next = next.is_some_and(|n| {
            self.fixed_bigrams
                .contains(&(word.clone(), n.to_lowercase()))
        });
        with_previous || with_next
    }

    /// Whether `first second` is a known collocation.
    pub fn is_collocation(&self, first: &str, second: &str) -> bool {
        self.collocations
            .contains(&(first.to_lowercase(), second.to_lowercase()))
    }

    /// Whether `word` belongs to the lexical register of `formality`.
    pub fn matches_formality(&self, word: &str, formality: Formality) -> bool {
        match formality {
            Formality::Formal => self.formal_pattern.is_match(word),
            Formality::Informal => self.informal_pattern.is_match(word),
        }
    }

    /// Pattern for a marked tone; `None` for neutral.
    pub const fn tone_pattern(&self, tone: EmotionalTone) -> Option<&Regex> {
        self.tone_patterns.get(tone)
    }

    /// Number of words in `text` that match the pattern for `tone`.
    pub fn count_tone_matches(&self, text: &str, tone: EmotionalTone) -> usize {
        self.tone_pattern(tone)
            .map_or(0, |pattern| pattern.find_iter(text).count())
    }

    /// Whether anything in `text` matches the pattern for `tone`.
    pub fn matches_tone(&self, text: &str, tone: EmotionalTone) -> bool {
        self.tone_pattern(tone)
            .is_some_and(|pattern| pattern.is_match(text))
    }

    /// Amplifying adverb (very, extremely, ...).
    pub fn is_intensifier(&self, word: &str) -> bool {
        self.intensifiers.contains(&word.to_lowercase())
    }

    /// Softening adverb (slightly, somewhat, ...).
    pub fn is_diminisher(&self, word: &str) -> bool {
        self.diminishers.contains(&word.to_lowercase())
    }

    /// Intensity implied by a modifier word: 0.9 amplified, 0.4 softened, 0.7 plain.
    pub fn intensity(&self, word: &str) -> f64 {
        if self.is_intensifier(word) {
            0.9
        } else if self.is_diminisher(word) {
            0.4
        } else {
            0.7
        }
    }

    /// Sentence connector such as "however".
    pub fn is_transition_word(&self, word: &str) -> bool {
        self.transition_words.contains(&word.to_lowercase())
    }

    /// Occurrences of informal markers (`gonna`, `'ll`, ...) in `text`.
    pub fn count_informal_markers(&self, text: &str) -> usize {
        self.informal_markers.find_iter(text).count()
    }

    /// `(contracted, expanded)` pairs, lowercase.
    pub fn contractions(&self) -> &[(String, String)] {
        &self.contractions
    }

    /// Whether `token` is a known contraction (either apostrophe style).
    pub fn is_contraction(&self, token: &str) -> bool {
        let normalized = text::split_token(token)
            .core
            .replace('\u{2019}', "'")
            .to_lowercase();
        self.contractions.iter().any(|(c, _)| *c == normalized)
    }

    /// Register-marked word pairs.
    pub fn register_swaps(&self) -> &[RegisterSwap] {
        &self.register_swaps
    }

    /// Rewrite rules for `tone`; empty for neutral.
    pub fn tone_modifiers(&self, tone: EmotionalTone) -> &[ToneModifier] {
        self.tone_modifiers.get(tone).map_or(&[], Vec::as_slice)
    }

    /// Dictionary entry for `word`, trying a few inflection strips.
    pub fn emotional_word(&self, word: &str) -> Option<&EmotionalWord> {
        let lower = word.to_lowercase();
        if let Some(entry) = self.emotional_words.get(&lower) {
            return Some(entry);
        }
        ["s", "es", "d", "ed", "ing", "ment", "ments"]
            .iter()
            .filter_map(|suffix| lower.strip_suffix(suffix))
            .find_map(|stem| self.emotional_words.get(stem))
    }
}
