//! Maps a raw prediction response onto a [`ScanOutcome`].
//!
//! A response with a non-empty `denial_reason` is a denial and its reward
//! fields are never read. Anything else must be a complete acceptance; a
//! partial reward (credits without a category, say) is a contract violation
//! and fails with [`InterpretError`] instead of being defaulted.

use thiserror::Error;

use super::types::{
    Acceptance, Classification, ConfidenceLevel, Denial, RankedPredictions, RatingBand,
    Recyclability, Reward, ScanOutcome,
};
use crate::classifier::PredictionResponse;

/// Default confidence above which a classification counts as high.
pub const DEFAULT_CONFIDENCE_HIGH_THRESHOLD: f64 = 0.7;

/// Errors for payloads that violate the classifier contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// Confidence not a finite number in [0, 1].
    #[error("confidence out of range: {0}")]
    InvalidConfidence(f64),

    /// An acceptance without a required reward field.
    #[error("acceptance is missing required field '{0}'")]
    MissingField(&'static str),

    /// A reward field with an impossible value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Interpreter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpretConfig {
    /// Confidence strictly above this is `High`.
    pub confidence_high_threshold: f64,
}

impl Default for InterpretConfig {
    fn default() -> Self {
        Self {
            confidence_high_threshold: DEFAULT_CONFIDENCE_HIGH_THRESHOLD,
        }
    }
}

impl InterpretConfig {
    pub fn with_confidence_high_threshold(mut self, threshold: f64) -> Self {
        self.confidence_high_threshold = threshold;
        self
    }
}

/// Result interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter {
    config: InterpretConfig,
}

impl Interpreter {
    pub fn new(config: InterpretConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpretConfig {
        &self.config
    }

    /// Interpret one response.
    ///
    /// # Errors
    ///
    /// Returns `InterpretError` if the payload is not a well-formed
    /// acceptance or denial.
    pub fn interpret(&self, response: &PredictionResponse) -> Result<ScanOutcome, InterpretError> {
        let classification = self.classification(response)?;

        if let Some(reason) = non_empty(response.denial_reason.as_deref()) {
            let message = non_empty(response.message.as_deref())
                .unwrap_or(reason)
                .to_string();
            tracing::info!(reason, label = %classification.label, "Scan denied");
            return Ok(ScanOutcome::Denied(Denial {
                classification,
                reason: reason.to_string(),
                message,
            }));
        }

        let reward = reward(response)?;
        tracing::info!(
            category = %reward.waste_category,
            rating = reward.rating,
            credits = reward.credits_earned,
            "Scan accepted"
        );

        Ok(ScanOutcome::Accepted(Acceptance {
            classification,
            reward,
            message: response.message.clone().unwrap_or_default(),
        }))
    }

    fn classification(&self, response: &PredictionResponse) -> Result<Classification, InterpretError> {
        let confidence = response.confidence;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(InterpretError::InvalidConfidence(confidence));
        }

        Ok(Classification {
            label: response.label.clone(),
            confidence,
            confidence_level: ConfidenceLevel::classify(
                confidence,
                self.config.confidence_high_threshold,
            ),
            predictions: RankedPredictions::from_scores(
                response
                    .all_predictions
                    .iter()
                    .map(|(label, score)| (label.clone(), *score)),
            ),
            clarity_score: response.clarity_score,
            distance_meters: response.distance_meters,
        })
    }
}

/// Interpret with default settings.
pub fn interpret(response: &PredictionResponse) -> Result<ScanOutcome, InterpretError> {
    Interpreter::default().interpret(response)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, InterpretError> {
    value.ok_or(InterpretError::MissingField(field))
}

fn non_negative(value: i64, field: &'static str) -> Result<i64, InterpretError> {
    if value < 0 {
        return Err(InterpretError::InvalidField {
            field,
            reason: format!("negative value {}", value),
        });
    }
    Ok(value)
}

fn reward(response: &PredictionResponse) -> Result<Reward, InterpretError> {
    let waste_category = non_empty(response.waste_category.as_deref())
        .or_else(|| non_empty(response.waste_type.as_deref()))
        .ok_or(InterpretError::MissingField("waste_category"))?
        .to_string();

    let estimated_weight_kg = required(response.estimated_weight_kg, "estimated_weight_kg")?;
    if !estimated_weight_kg.is_finite() || estimated_weight_kg < 0.0 {
        return Err(InterpretError::InvalidField {
            field: "estimated_weight_kg",
            reason: format!("{} is not a weight", estimated_weight_kg),
        });
    }

    let rating = required(response.rating, "rating")?;
    let stars_awarded = non_negative(required(response.stars_awarded, "stars_awarded")?, "stars_awarded")?;
    let new_total_stars =
        non_negative(required(response.new_total_stars, "new_total_stars")?, "new_total_stars")?;
    let credits_earned =
        non_negative(required(response.credits_earned, "credits_earned")?, "credits_earned")?;

    let recyclability = response
        .recyclability
        .as_deref()
        .map(|r| r.parse::<Recyclability>().unwrap_or(Recyclability::Unknown))
        .unwrap_or(Recyclability::Unknown);

    Ok(Reward {
        waste_category,
        estimated_weight_kg,
        recyclability,
        rating,
        rating_band: RatingBand::classify(rating),
        stars_awarded,
        new_total_stars,
        credits_earned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn accepted_response() -> PredictionResponse {
        PredictionResponse {
            label: "Smartphone".to_string(),
            confidence: 0.92,
            all_predictions: HashMap::from([
                ("Smartphone".to_string(), 0.92),
                ("Laptop".to_string(), 0.05),
                ("Battery".to_string(), 0.02),
                ("Charger".to_string(), 0.008),
                ("Monitor".to_string(), 0.002),
            ]),
            stars_awarded: Some(4),
            new_total_stars: Some(17),
            rating: Some(4),
            message: Some("Excellent! High-value mobile detected.".to_string()),
            waste_type: Some("mobile".to_string()),
            waste_category: Some("mobile".to_string()),
            estimated_weight_kg: Some(0.242),
            recyclability: Some("recyclable".to_string()),
            clarity_score: Some(0.31),
            distance_meters: Some(12.4),
            denial_reason: None,
            credits_earned: Some(41),
        }
    }

    fn denied_response() -> PredictionResponse {
        PredictionResponse {
            label: "Banana".to_string(),
            confidence: 0.4,
            rating: Some(0),
            message: Some("Invalid image. No e-waste detected or confidence too low.".to_string()),
            denial_reason: Some("wrong_category".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_acceptance_passes_fields_through() {
        let outcome = interpret(&accepted_response()).unwrap();
        let ScanOutcome::Accepted(acceptance) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(acceptance.classification.label, "Smartphone");
        assert_eq!(acceptance.classification.confidence_level, ConfidenceLevel::High);
        assert_eq!(acceptance.reward.waste_category, "mobile");
        assert_eq!(acceptance.reward.recyclability, Recyclability::Recyclable);
        assert_eq!(acceptance.reward.rating_band, RatingBand::Good);
        assert_eq!(acceptance.reward.credits_earned, 41);
        assert_eq!(acceptance.reward.new_total_stars, 17);
        assert_eq!(acceptance.classification.distance_meters, Some(12.4));
    }

    #[test]
    fn test_acceptance_ranks_predictions() {
        let outcome = interpret(&accepted_response()).unwrap();
        let top = outcome.classification().predictions.top(4);
        assert_eq!(top.len(), 4);
        assert_eq!(top[0].0, "Smartphone");
        assert_eq!(top[3].0, "Charger");
    }

    #[test]
    fn test_denial_ignores_reward_fields() {
        // Reward fields present but the denial wins
        let response = PredictionResponse {
            stars_awarded: Some(5),
            credits_earned: Some(999),
            waste_category: Some("laptop".to_string()),
            ..denied_response()
        };
        let outcome = interpret(&response).unwrap();
        assert!(outcome.is_denied());
        assert!(outcome.reward().is_none());
        assert_eq!(outcome.denial_reason(), Some("wrong_category"));
        assert_eq!(
            outcome.message(),
            "Invalid image. No e-waste detected or confidence too low."
        );
    }

    #[test]
    fn test_denial_with_garbage_reward_fields_still_denies() {
        let response = PredictionResponse {
            credits_earned: Some(-10),
            estimated_weight_kg: Some(f64::NAN),
            ..denied_response()
        };
        assert!(interpret(&response).unwrap().is_denied());
    }

    #[test]
    fn test_denial_message_falls_back_to_reason() {
        let response = PredictionResponse {
            message: Some(String::new()),
            ..denied_response()
        };
        assert_eq!(interpret(&response).unwrap().message(), "wrong_category");
    }

    #[test]
    fn test_blank_denial_reason_is_not_denial() {
        let response = PredictionResponse {
            denial_reason: Some("  ".to_string()),
            ..accepted_response()
        };
        assert!(!interpret(&response).unwrap().is_denied());
    }

    #[test]
    fn test_credits_without_category_fails() {
        let response = PredictionResponse {
            waste_category: None,
            waste_type: None,
            ..accepted_response()
        };
        assert_eq!(
            interpret(&response),
            Err(InterpretError::MissingField("waste_category"))
        );
    }

    #[test]
    fn test_legacy_waste_type_fallback() {
        let response = PredictionResponse {
            waste_category: None,
            waste_type: Some("laptop".to_string()),
            ..accepted_response()
        };
        let outcome = interpret(&response).unwrap();
        assert_eq!(outcome.reward().unwrap().waste_category, "laptop");
    }

    #[test]
    fn test_missing_credits_fails() {
        let response = PredictionResponse {
            credits_earned: None,
            ..accepted_response()
        };
        assert_eq!(
            interpret(&response),
            Err(InterpretError::MissingField("credits_earned"))
        );
    }

    #[test]
    fn test_invalid_confidence_fails() {
        let response = PredictionResponse {
            confidence: 1.5,
            ..accepted_response()
        };
        assert_eq!(
            interpret(&response),
            Err(InterpretError::InvalidConfidence(1.5))
        );
    }

    #[test]
    fn test_negative_weight_fails() {
        let response = PredictionResponse {
            estimated_weight_kg: Some(-0.1),
            ..accepted_response()
        };
        assert!(matches!(
            interpret(&response),
            Err(InterpretError::InvalidField {
                field: "estimated_weight_kg",
                ..
            })
        ));
    }

    #[test]
    fn test_confidence_boundary() {
        let at = PredictionResponse {
            confidence: 0.7,
            ..accepted_response()
        };
        let above = PredictionResponse {
            confidence: 0.71,
            ..accepted_response()
        };
        assert_eq!(
            interpret(&at).unwrap().classification().confidence_level,
            ConfidenceLevel::Low
        );
        assert_eq!(
            interpret(&above).unwrap().classification().confidence_level,
            ConfidenceLevel::High
        );
    }

    #[test]
    fn test_custom_threshold() {
        let interpreter =
            Interpreter::new(InterpretConfig::default().with_confidence_high_threshold(0.95));
        let outcome = interpreter.interpret(&accepted_response()).unwrap();
        assert_eq!(outcome.classification().confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_unknown_recyclability() {
        let response = PredictionResponse {
            recyclability: None,
            ..accepted_response()
        };
        let outcome = interpret(&response).unwrap();
        assert_eq!(outcome.reward().unwrap().recyclability, Recyclability::Unknown);
    }
}
