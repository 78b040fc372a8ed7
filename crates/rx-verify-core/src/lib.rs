//! Rx-Verify Core Library
//!
//! Rule-based prescription safety checker: drug-drug interactions, age-band
//! contraindications and dosing cautions, aggregated into a bounded safety score.
//!
//! # Architecture
//!
//! ```text
//!  Prescription text ──► Extractor ──┐
//!                                    ├──► [DrugRecord] + age
//!  Manual entry rows ──► Validation ─┘            │
//!                                                 ▼
//!                              ┌──────────────────────────────────┐
//!                              │            Analyzer              │
//!                              │  1. pairwise interactions        │
//!                              │  2. age band (first match wins)  │
//!                              │  3. per-drug rules               │
//!                              │  4. alternatives                 │
//!                              │  5. sentinels, 6. clamp          │
//!                              └───────────────┬──────────────────┘
//!                                              │  KnowledgeBase
//!                                              ▼  (drugs + interactions)
//!                                       AnalysisResult
//!                                              │
//!                                              ▼
//!                                     PrescriptionReport (JSON)
//! ```
//!
//! # Core Principle
//!
//! **Reference use only.** Output is educational guidance, not a certified
//! clinical decision.
//!
//! # Modules
//!
//! - [`models`]: Domain types (DrugRecord, DrugEntry, InteractionEntry, AnalysisResult)
//! - [`knowledge`]: Drug and interaction tables
//! - [`extractor`]: Keyword/regex prescription text extraction
//! - [`engine`]: The rule engine
//! - [`validation`]: Caller-side input checks
//! - [`export`]: JSON report export

pub mod engine;
pub mod export;
pub mod extractor;
pub mod knowledge;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use engine::{analyze, AgeBand, Analyzer};
pub use export::PrescriptionReport;
pub use extractor::Extractor;
pub use knowledge::KnowledgeBase;
pub use models::{
    AnalysisResult, DrugEntry, DrugRecord, InteractionEntry, SafetyTier, Severity,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum RxVerifyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<validation::ValidationError> for RxVerifyError {
    fn from(e: validation::ValidationError) -> Self {
        RxVerifyError::InvalidInput(e.to_string())
    }
}

impl From<knowledge::KnowledgeError> for RxVerifyError {
    fn from(e: knowledge::KnowledgeError) -> Self {
        RxVerifyError::Knowledge(e.to_string())
    }
}

impl From<serde_json::Error> for RxVerifyError {
    fn from(e: serde_json::Error) -> Self {
        RxVerifyError::Serialization(e.to_string())
    }
}

impl From<export::ExportError> for RxVerifyError {
    fn from(e: export::ExportError) -> Self {
        match e {
            export::ExportError::Json(e) => e.into(),
            export::ExportError::Io(e) => RxVerifyError::Io(e.to_string()),
            export::ExportError::Timestamp(msg) => RxVerifyError::Serialization(msg),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a verifier over the built-in knowledge base.
#[uniffi::export]
pub fn new_verifier() -> Arc<RxVerifyCore> {
    Arc::new(RxVerifyCore {
        analyzer: Analyzer::new(),
        extractor: Extractor::new(),
    })
}

/// Create a verifier with built-in tables extended by a JSON overlay.
#[uniffi::export]
pub fn verifier_with_knowledge_json(json: String) -> Result<Arc<RxVerifyCore>, RxVerifyError> {
    let mut knowledge = KnowledgeBase::builtin();
    knowledge.extend_from_json(&json)?;
    Ok(Arc::new(RxVerifyCore {
        analyzer: Analyzer::with_knowledge(knowledge),
        extractor: Extractor::new(),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Stateless prescription checker for FFI callers.
#[derive(uniffi::Object)]
pub struct RxVerifyCore {
    analyzer: Analyzer<'static>,
    extractor: Extractor,
}

#[uniffi::export]
impl RxVerifyCore {
    // =========================================================================
    // Extraction
    // =========================================================================

    /// Extract up to five drug records from prescription text.
    pub fn extract_from_text(&self, text: String) -> Vec<FfiDrugRecord> {
        self.extractor
            .extract(&text)
            .into_iter()
            .map(|d| d.into())
            .collect()
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Validate and analyze a prescription.
    pub fn analyze(
        &self,
        drugs: Vec<FfiDrugRecord>,
        age: u32,
    ) -> Result<FfiAnalysisResult, RxVerifyError> {
        let records: Vec<DrugRecord> = drugs.into_iter().map(|d| d.into()).collect();
        validation::validate_prescription(&records, age)?;
        Ok(self.analyzer.analyze(&records, age).into())
    }

    /// Extract drugs from text and analyze them.
    pub fn analyze_text(&self, text: String, age: u32) -> Result<FfiAnalysisResult, RxVerifyError> {
        validation::validate_age(age)?;
        let records = self.extractor.extract(&text);
        if records.is_empty() {
            return Err(RxVerifyError::InvalidInput(
                "No medications detected in text".into(),
            ));
        }
        Ok(self.analyzer.analyze(&records, age).into())
    }

    /// Analyze a prescription and return the exportable JSON report.
    pub fn build_report_json(
        &self,
        drugs: Vec<FfiDrugRecord>,
        age: u32,
    ) -> Result<String, RxVerifyError> {
        let records: Vec<DrugRecord> = drugs.into_iter().map(|d| d.into()).collect();
        validation::validate_prescription(&records, age)?;
        let result = self.analyzer.analyze(&records, age);
        let report = PrescriptionReport::new(age, &records, &result);
        Ok(report.to_json()?)
    }

    /// Download file name for a report produced by [`Self::build_report_json`].
    pub fn report_file_name(&self, report_json: String) -> Result<String, RxVerifyError> {
        let report = PrescriptionReport::from_json(&report_json)?;
        Ok(report.file_name()?)
    }

    // =========================================================================
    // Knowledge Lookups
    // =========================================================================

    /// Closest known drug name for a likely misspelling.
    pub fn suggest_drug_name(&self, name: String) -> Option<String> {
        self.analyzer
            .knowledge()
            .suggest(&name)
            .map(str::to_string)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe drug record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugRecord {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: Option<String>,
}

impl From<DrugRecord> for FfiDrugRecord {
    fn from(record: DrugRecord) -> Self {
        Self {
            name: record.name,
            dosage: record.dosage,
            frequency: record.frequency,
            route: Some(record.route),
        }
    }
}

impl From<FfiDrugRecord> for DrugRecord {
    fn from(record: FfiDrugRecord) -> Self {
        DrugRecord {
            name: record.name,
            dosage: record.dosage,
            frequency: record.frequency,
            route: record
                .route
                .unwrap_or_else(|| validation::MANUAL_DEFAULT_ROUTE.to_string()),
        }
    }
}

/// FFI-safe analysis result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysisResult {
    pub interactions: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub alternatives: Vec<String>,
    pub safety_score: f64,
    pub safety_tier: String,
    pub score_percent: String,
}

impl From<AnalysisResult> for FfiAnalysisResult {
    fn from(result: AnalysisResult) -> Self {
        let safety_tier = result.safety_tier().label().to_string();
        let score_percent = result.score_percent();
        Self {
            interactions: result.interactions,
            recommendations: result.recommendations,
            warnings: result.warnings,
            alternatives: result.alternatives,
            safety_score: result.safety_score,
            safety_tier,
            score_percent,
        }
    }
}
