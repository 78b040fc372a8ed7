//! Prescription text extractor.
//!
//! Turns free text into at most [`MAX_EXTRACTED_DRUGS`] drug records using:
//! - synonym matching over a fixed canonical table
//! - a dose pattern anchored on the matched synonym
//! - frequency categories tested against the whole text

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{capitalize, DrugRecord, DEFAULT_ROUTE};

/// Maximum number of records returned from one text.
pub const MAX_EXTRACTED_DRUGS: usize = 5;

/// Dosage used when neither the text nor the default table gives one.
pub const FALLBACK_DOSAGE: &str = "500mg";

/// Frequency used when no category matches.
pub const FALLBACK_FREQUENCY: &str = "As prescribed";

/// Canonical drugs and their synonyms, in scan order.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("paracetamol", &["paracetamol", "acetaminophen", "tylenol"]),
    ("ibuprofen", &["ibuprofen", "advil", "nurofen"]),
    ("aspirin", &["aspirin", "acetylsalicylic acid"]),
    ("codeine", &["codeine", "co-codamol"]),
    ("tramadol", &["tramadol"]),
    ("omeprazole", &["omeprazole", "prilosec"]),
    ("simvastatin", &["simvastatin", "zocor"]),
];

/// Default dosages keyed by the matched synonym.
const DEFAULT_DOSAGES: &[(&str, &str)] = &[
    ("paracetamol", "500mg"),
    ("ibuprofen", "400mg"),
    ("aspirin", "75mg"),
    ("codeine", "30mg"),
    ("tramadol", "50mg"),
    ("omeprazole", "20mg"),
];

/// Frequency categories in priority order.
static FREQUENCY_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"once.?daily|1.?daily|daily", "Once daily"),
        (r"twice.?daily|2.?daily|bd", "Twice daily"),
        (r"three.?times.?daily|3.*?daily|tds", "Three times daily"),
        (r"four.?times.?daily|4.*?daily|qds", "Four times daily"),
        (r"as.?needed|prn|when.?required", "As needed"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).unwrap(), label))
    .collect()
});

/// One compiled dose pattern per synonym, in [`SYNONYMS`] order.
static DOSAGE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SYNONYMS
        .iter()
        .flat_map(|(_, synonyms)| synonyms.iter())
        .map(|keyword| {
            let pattern = format!(r"{}.?(\d+\.?\d\s*mg)", regex::escape(keyword));
            (*keyword, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Keyword-and-pattern prescription text extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract drug records from prescription text.
    ///
    /// Records follow the canonical table order, not their position in the
    /// text. An empty list is a valid result.
    pub fn extract(&self, text: &str) -> Vec<DrugRecord> {
        let lower = text.to_lowercase();
        let mut drugs = Vec::new();

        for (canonical, synonyms) in SYNONYMS {
            let Some(keyword) = synonyms.iter().find(|kw| lower.contains(*kw)) else {
                continue;
            };

            let record = DrugRecord {
                name: capitalize(canonical),
                dosage: self.extract_dosage(&lower, keyword),
                frequency: self.extract_frequency(&lower).to_string(),
                route: DEFAULT_ROUTE.to_string(),
            };
            debug!(
                drug = %record.name,
                keyword = %keyword,
                dosage = %record.dosage,
                frequency = %record.frequency,
                "extracted drug"
            );
            drugs.push(record);
        }

        drugs.truncate(MAX_EXTRACTED_DRUGS);
        drugs
    }

    /// Dose following `keyword` in already-lowercased text, or the default.
    pub fn extract_dosage(&self, lower: &str, keyword: &str) -> String {
        let captured = match DOSAGE_PATTERNS.iter().find(|(kw, _)| *kw == keyword) {
            Some((_, re)) => re.captures(lower).map(|c| c[1].to_string()),
            None => Regex::new(&format!(r"{}.?(\d+\.?\d\s*mg)", regex::escape(keyword)))
                .ok()
                .and_then(|re| re.captures(lower).map(|c| c[1].to_string())),
        };

        captured.unwrap_or_else(|| default_dosage(keyword).to_string())
    }

    /// First frequency category matching anywhere in the lowercased text.
    pub fn extract_frequency(&self, lower: &str) -> &'static str {
        FREQUENCY_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(lower))
            .map(|(_, label)| *label)
            .unwrap_or(FALLBACK_FREQUENCY)
    }
}

/// Default dosage for a matched synonym.
pub fn default_dosage(keyword: &str) -> &'static str {
    DEFAULT_DOSAGES
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, dose)| *dose)
        .unwrap_or(FALLBACK_DOSAGE)
}
