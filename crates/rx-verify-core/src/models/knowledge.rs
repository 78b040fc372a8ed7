//! Knowledge-base entry models.

use serde::{Deserialize, Serialize};

/// Reference data for a single canonical drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugEntry {
    /// Maximum daily dose (e.g., "4000mg")
    pub max_daily_dose: String,
    /// Requires dose caution in patients over 65
    pub elderly_caution: bool,
    /// Safe for patients under 12
    pub pediatric_safe: bool,
    /// Free-text contraindications; age thresholds contain the word "age"
    #[serde(default)]
    pub contraindications: Vec<String>,
    /// Parameters to monitor while on the drug
    #[serde(default)]
    pub monitoring: Vec<String>,
}

impl DrugEntry {
    /// Create an entry with no contraindications or monitoring.
    pub fn new(max_daily_dose: &str, elderly_caution: bool, pediatric_safe: bool) -> Self {
        Self {
            max_daily_dose: max_daily_dose.to_string(),
            elderly_caution,
            pediatric_safe,
            contraindications: Vec::new(),
            monitoring: Vec::new(),
        }
    }

    /// Add contraindications in order.
    pub fn with_contraindications(mut self, items: &[&str]) -> Self {
        self.contraindications
            .extend(items.iter().map(|s| s.to_string()));
        self
    }

    /// Add monitoring parameters in order.
    pub fn with_monitoring(mut self, items: &[&str]) -> Self {
        self.monitoring.extend(items.iter().map(|s| s.to_string()));
        self
    }

    /// Contraindications that encode an age threshold.
    pub fn age_contraindications(&self) -> impl Iterator<Item = &str> {
        self.contraindications
            .iter()
            .map(String::as_str)
            .filter(|c| c.contains("age"))
    }
}

/// Severity of a drug-drug interaction.
///
/// Labels outside the known set are kept verbatim in [`Severity::Other`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    /// The combination improves safety (positive score impact)
    Beneficial,
    /// Site-specific label
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Beneficial => "beneficial",
            Severity::Other(label) => label.as_str(),
        }
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => Severity::Low,
            "moderate" => Severity::Moderate,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            "beneficial" => Severity::Beneficial,
            _ => Severity::Other(label),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Reference data for an unordered drug pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionEntry {
    pub severity: Severity,
    /// Clinical message shown to the prescriber
    pub message: String,
    /// Additive safety-score adjustment (negative for harmful pairs)
    pub score_impact: f64,
}

impl InteractionEntry {
    pub fn new(severity: Severity, message: &str, score_impact: f64) -> Self {
        Self {
            severity,
            message: message.to_string(),
            score_impact,
        }
    }
}
