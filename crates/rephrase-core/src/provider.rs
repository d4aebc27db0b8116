//! Collaborator contracts and the built-in offline thesaurus.
//!
//! The pipeline never talks to a network service directly. Synonym lookup and
//! generative rewriting sit behind [`SynonymProvider`] and
//! [`GenerativeRewriter`]; a failing collaborator degrades the affected word
//! or stage to identity.

use std::collections::{BTreeMap, HashMap};

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult, ProviderError, RewriteError};
use crate::options::TransformationOptions;
use crate::types::SynonymCandidate;

/// Synonym lookup collaborator.
pub trait SynonymProvider: Send + Sync {
    /// Candidates for `word`, in no particular order.
    ///
    /// Scores are expected in `[0, 1]`. An unknown word is `Ok(vec![])`.
    fn synonyms(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError>;
}

/// Optional generative rewrite collaborator.
pub trait GenerativeRewriter: Send + Sync {
    /// Rewrite `text` toward the style in `options`.
    fn rewrite(&self, text: &str, options: &TransformationOptions) -> Result<String, RewriteError>;
}

/// One entry in a thesaurus file.
#[derive(Debug, Clone, Deserialize)]
struct ThesaurusEntry {
    word: String,
    score: f64,
    #[serde(default)]
    tags: Vec<String>,
}

/// (headword, [(synonym, score, tag)])
const BUILTIN: &[(&str, &[(&str, f64, &str)])] = &[
    ("think", &[("believe", 0.9, "verb"), ("consider", 0.8, "verb"), ("suppose", 0.7, "verb"), ("reckon", 0.6, "verb")]),
    ("believe", &[("think", 0.9, "verb"), ("trust", 0.7, "verb"), ("hold", 0.6, "verb")]),
    ("implementation", &[("execution", 0.85, "noun"), ("deployment", 0.75, "noun"), ("realization", 0.6, "noun")]),
    ("really", &[("truly", 0.9, "adverb"), ("genuinely", 0.8, "adverb"), ("actually", 0.7, "adverb")]),
    ("good", &[("solid", 0.85, "adjective"), ("fine", 0.8, "adjective"), ("sound", 0.75, "adjective"), ("decent", 0.7, "adjective")]),
    ("great", &[("excellent", 0.9, "adjective"), ("superb", 0.8, "adjective"), ("terrific", 0.7, "adjective")]),
    ("bad", &[("poor", 0.9, "adjective"), ("weak", 0.8, "adjective"), ("flawed", 0.75, "adjective")]),
    ("use", &[("employ", 0.85, "verb"), ("apply", 0.8, "verb"), ("adopt", 0.7, "verb")]),
    ("important", &[("significant", 0.9, "adjective"), ("crucial", 0.85, "adjective"), ("essential", 0.8, "adjective"), ("vital", 0.75, "adjective")]),
    ("help", &[("assist", 0.9, "verb"), ("support", 0.85, "verb"), ("aid", 0.75, "verb")]),
    ("show", &[("reveal", 0.85, "verb"), ("display", 0.8, "verb"), ("indicate", 0.75, "verb")]),
    ("make", &[("create", 0.85, "verb"), ("produce", 0.8, "verb"), ("build", 0.7, "verb")]),
    ("start", &[("begin", 0.9, "verb"), ("launch", 0.8, "verb"), ("initiate", 0.75, "verb")]),
    ("begin", &[("start", 0.9, "verb"), ("commence", 0.75, "verb")]),
    ("finish", &[("complete", 0.9, "verb"), ("conclude", 0.8, "verb"), ("wrap", 0.6, "verb")]),
    ("idea", &[("concept", 0.9, "noun"), ("notion", 0.8, "noun"), ("thought", 0.75, "noun")]),
    ("problem", &[("issue", 0.9, "noun"), ("difficulty", 0.8, "noun"), ("challenge", 0.75, "noun")]),
    ("issue", &[("problem", 0.9, "noun"), ("concern", 0.8, "noun"), ("matter", 0.75, "noun")]),
    ("improve", &[("enhance", 0.9, "verb"), ("refine", 0.8, "verb"), ("upgrade", 0.75, "verb")]),
    ("change", &[("alter", 0.85, "verb"), ("modify", 0.85, "verb"), ("adjust", 0.75, "verb")]),
    ("build", &[("construct", 0.85, "verb"), ("assemble", 0.75, "verb"), ("develop", 0.75, "verb")]),
    ("create", &[("produce", 0.85, "verb"), ("generate", 0.8, "verb"), ("design", 0.7, "verb")]),
    ("need", &[("require", 0.9, "verb"), ("want", 0.7, "verb")]),
    ("quick", &[("fast", 0.9, "adjective"), ("rapid", 0.85, "adjective"), ("swift", 0.8, "adjective")]),
    ("fast", &[("quick", 0.9, "adjective"), ("rapid", 0.85, "adjective"), ("speedy", 0.75, "adjective")]),
    ("big", &[("large", 0.9, "adjective"), ("major", 0.8, "adjective"), ("huge", 0.75, "adjective")]),
    ("large", &[("big", 0.85, "adjective"), ("sizable", 0.8, "adjective"), ("extensive", 0.75, "adjective")]),
    ("small", &[("minor", 0.85, "adjective"), ("little", 0.85, "adjective"), ("modest", 0.75, "adjective")]),
    ("easy", &[("simple", 0.9, "adjective"), ("straightforward", 0.85, "adjective"), ("effortless", 0.7, "adjective")]),
    ("simple", &[("easy", 0.85, "adjective"), ("plain", 0.8, "adjective"), ("basic", 0.75, "adjective")]),
    ("hard", &[("difficult", 0.9, "adjective"), ("tough", 0.85, "adjective"), ("demanding", 0.75, "adjective")]),
    ("difficult", &[("hard", 0.9, "adjective"), ("tough", 0.8, "adjective"), ("tricky", 0.75, "adjective")]),
    ("clear", &[("obvious", 0.8, "adjective"), ("evident", 0.8, "adjective"), ("plain", 0.7, "adjective")]),
    ("team", &[("group", 0.85, "noun"), ("crew", 0.75, "noun"), ("squad", 0.6, "noun")]),
    ("result", &[("outcome", 0.9, "noun"), ("consequence", 0.75, "noun"), ("effect", 0.75, "noun")]),
    ("method", &[("approach", 0.9, "noun"), ("technique", 0.85, "noun"), ("process", 0.75, "noun")]),
    ("approach", &[("method", 0.9, "noun"), ("strategy", 0.8, "noun"), ("tactic", 0.7, "noun")]),
    ("plan", &[("strategy", 0.85, "noun"), ("scheme", 0.75, "noun"), ("proposal", 0.7, "noun")]),
    ("goal", &[("aim", 0.9, "noun"), ("objective", 0.85, "noun"), ("target", 0.8, "noun")]),
    ("benefit", &[("advantage", 0.9, "noun"), ("gain", 0.75, "noun"), ("merit", 0.7, "noun")]),
    ("tool", &[("instrument", 0.8, "noun"), ("utility", 0.8, "noun"), ("device", 0.7, "noun")]),
    ("project", &[("initiative", 0.85, "noun"), ("undertaking", 0.75, "noun"), ("venture", 0.7, "noun")]),
    ("fix", &[("repair", 0.9, "verb"), ("correct", 0.85, "verb"), ("resolve", 0.8, "verb")]),
    ("check", &[("verify", 0.9, "verb"), ("inspect", 0.85, "verb"), ("examine", 0.8, "verb")]),
    ("get", &[("obtain", 0.85, "verb"), ("acquire", 0.8, "verb"), ("receive", 0.75, "verb")]),
    ("try", &[("attempt", 0.9, "verb"), ("test", 0.7, "verb")]),
    ("choose", &[("select", 0.9, "verb"), ("pick", 0.85, "verb"), ("opt", 0.6, "verb")]),
    ("keep", &[("retain", 0.85, "verb"), ("maintain", 0.85, "verb"), ("preserve", 0.75, "verb")]),
    ("explain", &[("describe", 0.85, "verb"), ("clarify", 0.85, "verb"), ("outline", 0.7, "verb")]),
    ("happy", &[("glad", 0.9, "adjective"), ("pleased", 0.85, "adjective"), ("content", 0.75, "adjective")]),
    ("work", &[("effort", 0.8, "noun"), ("labor", 0.7, "noun"), ("function", 0.6, "verb")]),
    ("feature", &[("capability", 0.85, "noun"), ("function", 0.75, "noun"), ("trait", 0.65, "noun")]),
    ("quickly", &[("rapidly", 0.9, "adverb"), ("swiftly", 0.85, "adverb"), ("promptly", 0.8, "adverb")]),
    ("many", &[("numerous", 0.9, "adjective"), ("several", 0.75, "adjective")]),
];

/// In-memory synonym table.
///
/// Ships with a small general-prose vocabulary and can be extended from a
/// TOML, YAML, or JSON file mapping each headword to a list of
/// `{ word, score, tags }` entries. Lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Thesaurus {
    entries: HashMap<String, Vec<SynonymCandidate>>,
}

impl Default for Thesaurus {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Thesaurus {
    /// An empty thesaurus.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The compiled-in vocabulary.
    pub fn builtin() -> Self {
        let mut thesaurus = Self::empty();
        for (headword, synonyms) in BUILTIN {
            for &(word, score, tag) in *synonyms {
                thesaurus.insert(headword, SynonymCandidate::new(word, score).with_tags([tag]));
            }
        }
        thesaurus
    }

    /// Built-in vocabulary extended with the entries in `path`.
    pub fn from_file(path: &Utf8Path) -> ConfigResult<Self> {
        let mut thesaurus = Self::builtin();
        thesaurus.extend_from_file(path)?;
        Ok(thesaurus)
    }

    /// Add every entry in `path`; later entries for the same pair replace earlier ones.
    #[tracing::instrument(skip(self), fields(path = %path))]
    pub fn extend_from_file(&mut self, path: &Utf8Path) -> ConfigResult<()> {
        if !path.is_file() {
            return Err(ConfigError::ThesaurusMissing {
                path: path.to_owned(),
            });
        }

        let figment = match path.extension() {
            Some("json") => Figment::from(Json::file(path)),
            Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
            _ => Figment::from(Toml::file(path)),
        };
        let table: BTreeMap<String, Vec<ThesaurusEntry>> =
            figment
                .extract()
                .map_err(|e| ConfigError::ThesaurusFormat {
                    path: path.to_owned(),
                    source: Box::new(e),
                })?;

        let mut added = 0usize;
        for (headword, entries) in table {
            for entry in entries {
                let candidate = SynonymCandidate::new(entry.word, entry.score.clamp(0.0, 1.0))
                    .with_tags(entry.tags);
                self.insert(&headword, candidate);
                added += 1;
            }
        }
        tracing::debug!(added, "thesaurus extended");
        Ok(())
    }

    /// Add one candidate for `headword`, replacing any candidate with the same word.
    pub fn insert(&mut self, headword: &str, candidate: SynonymCandidate) {
        let list = self.entries.entry(headword.to_lowercase()).or_default();
        list.retain(|existing| !existing.word.eq_ignore_ascii_case(&candidate.word));
        list.push(candidate);
    }

    /// Number of headwords.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no headwords.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymProvider for Thesaurus {
    fn synonyms(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
        let lower = word.to_lowercase();
        Ok(self
            .entries
            .get(&lower)
            .map(|list| {
                list.iter()
                    .filter(|c| !c.word.eq_ignore_ascii_case(&lower))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
