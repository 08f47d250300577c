//! Interpreted scan outcome types.

use std::fmt;
use std::str::FromStr;

/// Display default for how many ranked predictions to show.
pub const DEFAULT_TOP_PREDICTIONS: usize = 4;

/// Recyclability verdict for an accepted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recyclability {
    Recyclable,
    PartiallyDamaged,
    NonRecyclable,
    /// Classifier sent no verdict or one this client does not know.
    Unknown,
}

impl Recyclability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recyclability::Recyclable => "recyclable",
            Recyclability::PartiallyDamaged => "partially_damaged",
            Recyclability::NonRecyclable => "non_recyclable",
            Recyclability::Unknown => "unknown",
        }
    }

    /// Human label, e.g. `"partially damaged"`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl FromStr for Recyclability {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "recyclable" => Recyclability::Recyclable,
            "partially_damaged" => Recyclability::PartiallyDamaged,
            "non_recyclable" => Recyclability::NonRecyclable,
            _ => Recyclability::Unknown,
        })
    }
}

impl fmt::Display for Recyclability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence bucket used for severity colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Low,
}

impl ConfidenceLevel {
    /// `High` strictly above the threshold; the threshold itself is `Low`.
    pub fn classify(confidence: f64, high_threshold: f64) -> Self {
        if confidence > high_threshold {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome framing derived from the integer rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    /// rating >= 4
    Good,
    /// 2 <= rating < 4
    Fair,
    /// rating < 2
    Poor,
}

impl RatingBand {
    pub fn classify(rating: i64) -> Self {
        if rating >= 4 {
            RatingBand::Good
        } else if rating >= 2 {
            RatingBand::Fair
        } else {
            RatingBand::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingBand::Good => "good",
            RatingBand::Fair => "fair",
            RatingBand::Poor => "poor",
        }
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label scores ranked by descending score.
///
/// Equal scores are ordered by label so the ranking is stable across runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedPredictions(Vec<(String, f64)>);

impl RankedPredictions {
    /// Rank a label→score mapping.
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
        ranked.sort_by(|(la, sa), (lb, sb)| sb.total_cmp(sa).then_with(|| la.cmp(lb)));
        Self(ranked)
    }

    /// The first `n` entries.
    pub fn top(&self, n: usize) -> &[(String, f64)] {
        &self.0[..n.min(self.0.len())]
    }

    /// Highest-scoring entry.
    pub fn best(&self) -> Option<&(String, f64)> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, f64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classification fields common to acceptances and denials.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub predictions: RankedPredictions,
    pub clarity_score: Option<f64>,
    pub distance_meters: Option<f64>,
}

/// Reward granted for an accepted item.
#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    pub waste_category: String,
    pub estimated_weight_kg: f64,
    pub recyclability: Recyclability,
    pub rating: i64,
    pub rating_band: RatingBand,
    pub stars_awarded: i64,
    pub new_total_stars: i64,
    pub credits_earned: i64,
}

/// An accepted scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Acceptance {
    pub classification: Classification,
    pub reward: Reward,
    pub message: String,
}

/// A well-formed rejection of the submitted item. Not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Denial {
    pub classification: Classification,
    /// Machine-facing reason, never empty.
    pub reason: String,
    /// Human-facing message.
    pub message: String,
}

/// Interpreted result of one scan: either a reward or a denial, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Accepted(Acceptance),
    Denied(Denial),
}

impl ScanOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, ScanOutcome::Denied(_))
    }

    pub fn classification(&self) -> &Classification {
        match self {
            ScanOutcome::Accepted(a) => &a.classification,
            ScanOutcome::Denied(d) => &d.classification,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ScanOutcome::Accepted(a) => &a.message,
            ScanOutcome::Denied(d) => &d.message,
        }
    }

    /// Reward, for acceptances only.
    pub fn reward(&self) -> Option<&Reward> {
        match self {
            ScanOutcome::Accepted(a) => Some(&a.reward),
            ScanOutcome::Denied(_) => None,
        }
    }

    /// Denial reason, for denials only.
    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            ScanOutcome::Accepted(_) => None,
            ScanOutcome::Denied(d) => Some(&d.reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_threshold_is_exclusive() {
        assert_eq!(ConfidenceLevel::classify(0.7, 0.7), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::classify(0.71, 0.7), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::classify(0.0, 0.7), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::classify(1.0, 0.7), ConfidenceLevel::High);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(RatingBand::classify(5), RatingBand::Good);
        assert_eq!(RatingBand::classify(4), RatingBand::Good);
        assert_eq!(RatingBand::classify(3), RatingBand::Fair);
        assert_eq!(RatingBand::classify(2), RatingBand::Fair);
        assert_eq!(RatingBand::classify(1), RatingBand::Poor);
        assert_eq!(RatingBand::classify(0), RatingBand::Poor);
        assert_eq!(RatingBand::classify(-1), RatingBand::Poor);
    }

    #[test]
    fn test_recyclability_parse() {
        assert_eq!(
            "partially_damaged".parse::<Recyclability>().unwrap(),
            Recyclability::PartiallyDamaged
        );
        assert_eq!(
            "Recyclable".parse::<Recyclability>().unwrap(),
            Recyclability::Recyclable
        );
        assert_eq!(
            "mystery".parse::<Recyclability>().unwrap(),
            Recyclability::Unknown
        );
        assert_eq!(Recyclability::NonRecyclable.label(), "non recyclable");
    }

    #[test]
    fn test_ranked_predictions_order_and_top() {
        let ranked = RankedPredictions::from_scores(vec![
            ("Battery".to_string(), 0.05),
            ("Smartphone".to_string(), 0.80),
            ("Laptop".to_string(), 0.10),
            ("Charger".to_string(), 0.03),
            ("Monitor".to_string(), 0.02),
        ]);
        let labels: Vec<&str> = ranked.top(4).iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Smartphone", "Laptop", "Battery", "Charger"]);
        assert_eq!(ranked.best().unwrap().0, "Smartphone");
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked.top(10).len(), 5);
    }

    #[test]
    fn test_ranked_predictions_ties_by_label() {
        let ranked = RankedPredictions::from_scores(vec![
            ("b".to_string(), 0.5),
            ("a".to_string(), 0.5),
        ]);
        assert_eq!(ranked.best().unwrap().0, "a");
    }
}
