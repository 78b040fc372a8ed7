//! Prescription analysis report export.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{AnalysisResult, DrugRecord, SafetyTier};

/// Timestamp layout of `analysis_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp layout used in report file names.
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Exported analysis report.
///
/// Field order and names form the external JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionReport {
    pub patient_age: u32,
    pub medications: Vec<DrugRecord>,
    pub safety_score: f64,
    pub analysis: ReportAnalysis,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub analysis_timestamp: String,
}

/// The four finding lists of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportAnalysis {
    pub interactions: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub alternatives: Vec<String>,
}

impl PrescriptionReport {
    /// Build a report stamped with the current local time.
    pub fn new(age: u32, drugs: &[DrugRecord], result: &AnalysisResult) -> Self {
        Self::at(age, drugs, result, Local::now().naive_local())
    }

    /// Build a report stamped with the given local time.
    pub fn at(
        age: u32,
        drugs: &[DrugRecord],
        result: &AnalysisResult,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            patient_age: age,
            medications: drugs.to_vec(),
            safety_score: result.safety_score,
            analysis: ReportAnalysis {
                interactions: result.interactions.clone(),
                recommendations: result.recommendations.clone(),
                warnings: result.warnings.clone(),
                alternatives: result.alternatives.clone(),
            },
            analysis_timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a previously exported report.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Tier for the report's score.
    pub fn safety_tier(&self) -> SafetyTier {
        SafetyTier::from_score(self.safety_score)
    }

    /// Parsed `analysis_timestamp`.
    pub fn timestamp(&self) -> ExportResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.analysis_timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| ExportError::Timestamp(format!("{}: {e}", self.analysis_timestamp)))
    }

    /// Download file name, e.g. `prescription_analysis_20240115_103000.json`.
    pub fn file_name(&self) -> ExportResult<String> {
        let stamp = self.timestamp()?.format(FILE_STAMP_FORMAT);
        Ok(format!("prescription_analysis_{stamp}.json"))
    }

    /// Write the JSON report into `dir` under [`Self::file_name`].
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> ExportResult<PathBuf> {
        let path = dir.as_ref().join(self.file_name()?);
        std::fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_result() -> AnalysisResult {
        AnalysisResult {
            interactions: vec!["⚠ Aspirin + Ibuprofen: Increased bleeding risk".into()],
            recommendations: vec!["Aspirin: Monitor GI symptoms".into()],
            warnings: vec!["👴 Elderly patient: Increased risk of adverse effects".into()],
            alternatives: vec!["🔄 Topical NSAIDs for localized pain".into()],
            safety_score: 0.55,
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 5)
            .unwrap()
    }

    fn make_report() -> PrescriptionReport {
        let drugs = vec![
            DrugRecord::new("Aspirin", "100mg", "Once daily").with_route("Oral"),
            DrugRecord::new("Ibuprofen", "400mg", "Three times daily").with_route("Oral"),
        ];
        PrescriptionReport::at(70, &drugs, &make_result(), stamp())
    }

    #[test]
    fn test_report_fields() {
        let report = make_report();

        assert_eq!(report.patient_age, 70);
        assert_eq!(report.medications.len(), 2);
        assert_eq!(report.analysis_timestamp, "2024-01-15 10:30:05");
        assert_eq!(report.safety_tier(), SafetyTier::Low);
    }

    #[test]
    fn test_report_json_shape() {
        let json = make_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["patient_age"], 70);
        assert_eq!(value["medications"][0]["name"], "Aspirin");
        assert_eq!(value["medications"][1]["route"], "Oral");
        assert_eq!(value["safety_score"], 0.55);
        assert!(value["analysis"]["interactions"].is_array());
        assert_eq!(value["analysis_timestamp"], "2024-01-15 10:30:05");

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 5);

        // Declared field order is kept in the text
        let age_at = json.find("\"patient_age\"").unwrap();
        let meds_at = json.find("\"medications\"").unwrap();
        let stamp_at = json.find("\"analysis_timestamp\"").unwrap();
        assert!(age_at < meds_at && meds_at < stamp_at);
    }

    #[test]
    fn test_report_round_trip() {
        let report = make_report();
        let parsed = PrescriptionReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_file_name() {
        let report = make_report();
        assert_eq!(
            report.file_name().unwrap(),
            "prescription_analysis_20240115_103005.json"
        );
    }

    #[test]
    fn test_bad_timestamp() {
        let mut report = make_report();
        report.analysis_timestamp = "yesterday".into();
        assert!(matches!(report.file_name(), Err(ExportError::Timestamp(_))));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = make_report();

        let path = report.write_to_dir(dir.path()).unwrap();
        assert!(path.ends_with("prescription_analysis_20240115_103005.json"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(PrescriptionReport::from_json(&contents).unwrap(), report);
    }

    #[test]
    fn test_new_uses_current_time() {
        let report = PrescriptionReport::new(30, &[], &make_result());
        assert!(report.timestamp().is_ok());
        assert_eq!(report.analysis_timestamp.len(), 19);
    }
}
