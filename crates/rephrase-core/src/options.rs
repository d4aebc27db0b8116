//! Caller-selected style options.
//!
//! [`TransformationOptions`] picks a point in the style space and threads,
//! unchanged, through every stage of one transform call.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};

/// Target register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Formality {
    /// Expanded forms, no contractions, elevated vocabulary.
    #[default]
    Formal,
    /// Contracted forms and plain vocabulary.
    Informal,
}

impl Formality {
    /// Returns the formality as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Informal => "informal",
        }
    }
}

impl std::fmt::Display for Formality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target emotional tone.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EmotionalTone {
    /// Leave tone alone.
    #[default]
    Neutral,
    /// Upbeat, constructive wording.
    Positive,
    /// Subdued, critical wording.
    Negative,
    /// Businesslike wording.
    Professional,
    /// Relaxed, conversational wording.
    Casual,
}

impl EmotionalTone {
    /// Every tone that has a pattern table (all but neutral).
    pub const MARKED: [Self; 4] = [
        Self::Positive,
        Self::Negative,
        Self::Professional,
        Self::Casual,
    ];

    /// Returns the tone as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Professional => "professional",
            Self::Casual => "casual",
        }
    }
}

impl std::fmt::Display for EmotionalTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style options for one transform call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformationOptions {
    /// Target register.
    pub formality: Formality,
    /// Target emotional tone.
    pub emotional_tone: EmotionalTone,
    /// How deep into the ranked synonym list selection may reach (0 = always the top pick).
    pub creativity: f64,
    /// Leave technical terms and modal/negation/conditional words untouched.
    pub preserve_intent: bool,
    /// Pressure against reusing the same replacement for repeated words.
    pub variety_level: f64,
    /// How strongly substitutions must fit their local grammatical context.
    pub context_preservation: f64,
}

impl Default for TransformationOptions {
    fn default() -> Self {
        Self {
            formality: Formality::Formal,
            emotional_tone: EmotionalTone::Neutral,
            creativity: 0.3,
            preserve_intent: true,
            variety_level: 0.5,
            context_preservation: 0.7,
        }
    }
}

impl TransformationOptions {
    /// Check that every numeric option is finite and inside `[0, 1]`.
    pub fn validate(&self) -> TransformResult<()> {
        for (field, value) in [
            ("creativity", self.creativity),
            ("varietyLevel", self.variety_level),
            ("contextPreservation", self.context_preservation),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TransformError::InvalidOptions { field, value });
            }
        }
        Ok(())
    }

    /// Copy of these options with context preservation raised to at least `floor`.
    #[must_use]
    pub fn with_context_floor(mut self, floor: f64) -> Self {
        if self.context_preservation < floor {
            self.context_preservation = floor;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(TransformationOptions::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_creativity_rejected() {
        let options = TransformationOptions {
            creativity: 1.5,
            ..Default::default()
        };
        assert_eq!(
            options.validate(),
            Err(TransformError::InvalidOptions {
                field: "creativity",
                value: 1.5
            })
        );
    }

    #[test]
    fn nan_rejected() {
        let options = TransformationOptions {
            variety_level: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(TransformError::InvalidOptions {
                field: "varietyLevel",
                ..
            })
        ));
    }

    #[test]
    fn context_floor_only_raises() {
        let low = TransformationOptions {
            context_preservation: 0.2,
            ..Default::default()
        };
        assert!((low.with_context_floor(0.8).context_preservation - 0.8).abs() < f64::EPSILON);

        let high = TransformationOptions {
            context_preservation: 0.95,
            ..Default::default()
        };
        assert!((high.with_context_floor(0.8).context_preservation - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(TransformationOptions::default()).unwrap();
        assert_eq!(json["emotionalTone"], "neutral");
        assert_eq!(json["preserveIntent"], true);
        assert!(json.get("varietyLevel").is_some());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let options: TransformationOptions =
            serde_json::from_str(r#"{"formality":"informal","creativity":0.9}"#).unwrap();
        assert_eq!(options.formality, Formality::Informal);
        assert!((options.creativity - 0.9).abs() < f64::EPSILON);
        assert!(options.preserve_intent);
    }
}
