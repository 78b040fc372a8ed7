//! Analysis result models.

use serde::{Deserialize, Serialize};

/// Lower bound of the safety score.
pub const MIN_SAFETY_SCORE: f64 = 0.1;
/// Upper bound of the safety score.
pub const MAX_SAFETY_SCORE: f64 = 1.0;

/// Outcome of a single prescription analysis.
///
/// Every list holds at least one line and `safety_score` lies in
/// [`MIN_SAFETY_SCORE`, `MAX_SAFETY_SCORE`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub interactions: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub alternatives: Vec<String>,
    pub safety_score: f64,
}

impl AnalysisResult {
    /// Tier for the current score.
    pub fn safety_tier(&self) -> SafetyTier {
        SafetyTier::from_score(self.safety_score)
    }

    /// Score as a whole percentage (e.g., 0.55 -> "55%").
    pub fn score_percent(&self) -> String {
        format!("{:.0}%", self.safety_score * 100.0)
    }
}

/// Display tier for a safety score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SafetyTier {
    /// Score >= 0.8
    High,
    /// Score >= 0.6
    Moderate,
    Low,
}

impl SafetyTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            SafetyTier::High
        } else if score >= 0.6 {
            SafetyTier::Moderate
        } else {
            SafetyTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SafetyTier::High => "HIGH SAFETY",
            SafetyTier::Moderate => "MODERATE SAFETY",
            SafetyTier::Low => "LOW SAFETY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(SafetyTier::from_score(1.0), SafetyTier::High);
        assert_eq!(SafetyTier::from_score(0.8), SafetyTier::High);
        assert_eq!(SafetyTier::from_score(0.79), SafetyTier::Moderate);
        assert_eq!(SafetyTier::from_score(0.6), SafetyTier::Moderate);
        assert_eq!(SafetyTier::from_score(0.55), SafetyTier::Low);
        assert_eq!(SafetyTier::from_score(0.1), SafetyTier::Low);
    }

    #[test]
    fn test_score_percent() {
        let result = AnalysisResult {
            interactions: vec![],
            recommendations: vec![],
            warnings: vec![],
            alternatives: vec![],
            safety_score: 0.9,
        };
        assert_eq!(result.score_percent(), "90%");
        assert_eq!(result.safety_tier().label(), "HIGH SAFETY");
    }
}
