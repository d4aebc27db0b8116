//! Emotional tone analysis and sentence-level tone adjustment.

use std::sync::Arc;

use crate::lexicon::Lexicon;
use crate::options::{EmotionalTone, Formality, TransformationOptions};
use crate::tagger::{HeuristicAnalyzer, LanguageAnalyzer};
use crate::text;
use crate::thresholds::{MIN_EMOTIONAL_SCORE, TONE_ADJUST_THRESHOLD, clamp_score};
use crate::types::{ChangeKind, StageOutput, TransformationChange};

/// Scores words and sentences against a target tone.
#[derive(Clone)]
pub struct ToneAnalyzer {
    lexicon: Arc<Lexicon>,
    analyzer: Arc<dyn LanguageAnalyzer>,
}

impl std::fmt::Debug for ToneAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneAnalyzer").finish_non_exhaustive()
    }
}

impl ToneAnalyzer {
    /// Analyzer over the given tables, splitting sentences heuristically.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_analyzer(lexicon, Arc::new(HeuristicAnalyzer::new()))
    }

    /// Analyzer over the given tables, splitting sentences with `analyzer`.
    pub fn with_analyzer(lexicon: Arc<Lexicon>, analyzer: Arc<dyn LanguageAnalyzer>) -> Self {
        Self { lexicon, analyzer }
    }

    /// How well `candidate` carries `target` next to `context_word`.
    ///
    /// Blends the pattern score (weight 0.5), the candidate's own intensity
    /// (0.3), and the pair's compatibility (0.2). Neutral targets still blend,
    /// with a pattern score of 1.
    pub fn analyze_synonym(
        &self,
        candidate: &str,
        target: EmotionalTone,
        context_word: Option<&str>,
    ) -> f64 {
        let emotional = self.emotional_score(candidate, target, context_word);
        let intensity = self.lexicon.intensity(candidate);
        let compatibility = self.context_compatibility(candidate, context_word);
        clamp_score(
            0.5 * emotional + 0.3 * intensity + 0.2 * compatibility,
            MIN_EMOTIONAL_SCORE,
        )
    }

    fn emotional_score(&self, candidate: &str, target: EmotionalTone, context: Option<&str>) -> f64 {
        if target == EmotionalTone::Neutral {
            return 1.0;
        }
        let mut score: f64 = if self.lexicon.matches_tone(candidate, target) {
            0.9
        } else {
            0.6
        };

        if let Some(context) = context {
            let context_tone = self.get_emotional_tone(context);
            if context_tone != EmotionalTone::Neutral && context_tone != target {
                score *= 0.8;
            }
            let phrase = format!("{context} {candidate}");
            if self.lexicon.matches_tone(&phrase, EmotionalTone::Positive)
                && self.lexicon.matches_tone(&phrase, EmotionalTone::Negative)
            {
                score *= 0.7;
            }
            if self.lexicon.is_intensifier(context) {
                score = (score * 1.2).min(1.0);
            } else if self.lexicon.is_diminisher(context) {
                score *= 0.8;
            }
        }

        clamp_score(score, MIN_EMOTIONAL_SCORE)
    }

    /// Starts at 0.7 and halves for each clash between the two words.
    fn context_compatibility(&self, candidate: &str, context: Option<&str>) -> f64 {
        let Some(context) = context else {
            return 0.7;
        };
        let phrase = format!("{context} {candidate}");
        let lexicon = &self.lexicon;
        let mut score = 0.7;

        if lexicon.matches_tone(&phrase, EmotionalTone::Positive)
            && lexicon.matches_tone(&phrase, EmotionalTone::Negative)
        {
            score *= 0.5;
        }
        if lexicon.matches_tone(&phrase, EmotionalTone::Professional)
            && lexicon.matches_tone(&phrase, EmotionalTone::Casual)
        {
            score *= 0.5;
        }
        let formal = |w: &str| lexicon.matches_formality(w, Formality::Formal);
        let informal = |w: &str| lexicon.matches_formality(w, Formality::Informal);
        if (formal(candidate) && informal(context)) || (informal(candidate) && formal(context)) {
            score *= 0.5;
        }

        let tones: Vec<EmotionalTone> = [candidate, context]
            .iter()
            .filter_map(|w| lexicon.emotional_word(w).map(|e| e.tone))
            .collect();
        if tones.len() == 2 && tones[0] != tones[1] {
            score *= 0.8;
        }
        score
    }

    /// Tone with the most pattern matches in `text`; neutral on a tie or no match.
    pub fn get_emotional_tone(&self, text: &str) -> EmotionalTone {
        let mut best = EmotionalTone::Neutral;
        let mut best_count = 0;
        let mut tied = false;
        for tone in EmotionalTone::MARKED {
            let count = self.lexicon.count_tone_matches(text, tone);
            if count > best_count {
                best = tone;
                best_count = count;
                tied = false;
            } else if count == best_count && count > 0 {
                tied = true;
            }
        }
        if tied { EmotionalTone::Neutral } else { best }
    }

    /// How strongly a sentence already carries `target`.
    ///
    /// Neutral targets score 1. Otherwise the share of target-tone hits among
    /// target and opposing hits lifts a 0.6 base; a sentence with no tone
    /// words sits at the floor.
    pub fn sentence_tone_score(&self, sentence: &str, target: EmotionalTone) -> f64 {
        let Some(opposite) = opposing(target) else {
            return 1.0;
        };
        let hits = self.lexicon.count_tone_matches(sentence, target) as f64;
        let clashes = self.lexicon.count_tone_matches(sentence, opposite) as f64;
        if hits + clashes == 0.0 {
            return MIN_EMOTIONAL_SCORE;
        }
        clamp_score(0.6 + 0.4 * hits / (hits + clashes), MIN_EMOTIONAL_SCORE)
    }

    /// Rewrite sentences scoring under the adjustment threshold toward the target tone.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), tone = %options.emotional_tone))]
    pub fn adjust(&self, text: &str, options: &TransformationOptions) -> StageOutput {
        let target = options.emotional_tone;
        let modifiers = self.lexicon.tone_modifiers(target);
        if modifiers.is_empty() {
            return StageOutput::identity(text);
        }

        let spans = self.analyzer.sentence_spans(text);
        let mut changes = Vec::new();
        let adjusted = text::rewrite_spans(text, &spans, |_, sentence| {
            if self.sentence_tone_score(sentence, target) >= TONE_ADJUST_THRESHOLD {
                return None;
            }
            let mut rewritten = sentence.to_string();
            for modifier in modifiers {
                rewritten = modifier
                    .pattern
                    .replace_all(&rewritten, |caps: &regex::Captures<'_>| {
                        text::match_case(&caps[0], &modifier.replacement)
                    })
                    .into_owned();
            }
            if rewritten == sentence {
                return None;
            }
            let confidence = clamp_score(
                self.sentence_tone_score(&rewritten, target),
                MIN_EMOTIONAL_SCORE,
            );
            changes.push(TransformationChange::new(
                sentence,
                rewritten.clone(),
                ChangeKind::Emotional,
                confidence,
            ));
            Some(rewritten)
        });

        tracing::debug!(changes = changes.len(), "tone adjustment complete");
        StageOutput {
            text: adjusted,
            changes,
        }
    }
}

const fn opposing(tone: EmotionalTone) -> Option<EmotionalTone> {
    match tone {
        EmotionalTone::Positive => Some(EmotionalTone::Negative),
        EmotionalTone::Negative => Some(EmotionalTone::Positive),
        EmotionalTone::Professional => Some(EmotionalTone::Casual),
        EmotionalTone::Casual => Some(EmotionalTone::Professional),
        EmotionalTone::Neutral => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::MIN_CONFIDENCE;

    fn analyzer() -> ToneAnalyzer {
        ToneAnalyzer::new(Arc::new(Lexicon::english()))
    }

    fn with_tone(tone: EmotionalTone) -> TransformationOptions {
        TransformationOptions {
            emotional_tone: tone,
            ..Default::default()
        }
    }

    #[test]
    fn matching_candidate_outscores_plain_one() {
        let tone = analyzer();
        let matching = tone.analyze_synonym("excellent", EmotionalTone::Positive, None);
        let plain = tone.analyze_synonym("table", EmotionalTone::Positive, None);
        assert!(matching > plain, "{matching} <= {plain}");
    }

    #[test]
    fn scores_stay_in_bounds() {
        let tone = analyzer();
        for target in EmotionalTone::MARKED {
            for (word, context) in [("awful", Some("great")), ("fine", Some("slightly")), ("x", None)] {
                let score = tone.analyze_synonym(word, target, context);
                assert!((MIN_EMOTIONAL_SCORE..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn contradiction_is_penalized() {
        let tone = analyzer();
        let mixed = tone.analyze_synonym("great", EmotionalTone::Positive, Some("terrible"));
        let clean = tone.analyze_synonym("great", EmotionalTone::Positive, Some("table"));
        assert!(mixed < clean);
    }

    #[test]
    fn dominant_tone_or_neutral() {
        let tone = analyzer();
        assert_eq!(
            tone.get_emotional_tone("A great success with real benefits."),
            EmotionalTone::Positive
        );
        assert_eq!(tone.get_emotional_tone("Good, but bad."), EmotionalTone::Neutral);
        assert_eq!(tone.get_emotional_tone("The table."), EmotionalTone::Neutral);
    }

    #[test]
    fn sentence_score_reflects_balance() {
        let tone = analyzer();
        assert_eq!(tone.sentence_tone_score("Anything.", EmotionalTone::Neutral), 1.0);
        assert!(tone.sentence_tone_score("A great result.", EmotionalTone::Positive) >= 0.99);
        assert_eq!(
            tone.sentence_tone_score("A terrible result.", EmotionalTone::Positive),
            MIN_EMOTIONAL_SCORE
        );
    }

    #[test]
    fn adjust_rewrites_low_scoring_sentences() {
        let tone = analyzer();
        let text = "The launch had a problem. Everyone was great.";
        let out = tone.adjust(text, &with_tone(EmotionalTone::Positive));
        assert_eq!(out.text, "The launch had a opportunity. Everyone was great.");
        assert_eq!(out.changes.len(), 1);
        let change = &out.changes[0];
        assert_eq!(change.kind, ChangeKind::Emotional);
        assert!(text.contains(&change.original));
        assert!(change.confidence >= MIN_CONFIDENCE);
    }

    /// Treats the whole text as one sentence.
    struct WholeTextAnalyzer;

    impl LanguageAnalyzer for WholeTextAnalyzer {
        fn tag(&self, _word: &str) -> crate::tagger::PosTag {
            crate::tagger::PosTag::Unknown
        }

        fn sentence_spans(&self, text: &str) -> Vec<std::ops::Range<usize>> {
            vec![0..text.len()]
        }
    }

    #[test]
    fn adjust_splits_with_the_injected_analyzer() {
        let text = "The launch had a problem. It failed.";
        let options = with_tone(EmotionalTone::Positive);

        let split = analyzer().adjust(text, &options);
        assert_eq!(split.changes.len(), 2);

        let whole =
            ToneAnalyzer::with_analyzer(Arc::new(Lexicon::english()), Arc::new(WholeTextAnalyzer))
                .adjust(text, &options);
        assert_eq!(whole.changes.len(), 1);
        assert_eq!(whole.changes[0].original, text);
        assert_eq!(whole.text, split.text);
    }

    #[test]
    fn adjust_keeps_case() {
        let tone = analyzer();
        let out = tone.adjust("Use the tool.", &with_tone(EmotionalTone::Professional));
        assert_eq!(out.text, "Implement the tool.");
    }

    #[test]
    fn neutral_adjust_is_identity() {
        let tone = analyzer();
        let out = tone.adjust("Bad things happen.", &with_tone(EmotionalTone::Neutral));
        assert_eq!(out.text, "Bad things happen.");
        assert!(out.changes.is_empty());
    }

    #[test]
    fn unchanged_sentence_records_nothing() {
        let tone = analyzer();
        let out = tone.adjust("The table is wooden.", &with_tone(EmotionalTone::Casual));
        assert!(out.changes.is_empty());
    }
}
