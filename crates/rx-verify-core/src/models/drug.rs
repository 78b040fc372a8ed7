//! Prescription drug records.

use serde::{Deserialize, Serialize};

/// Route assigned to records produced by the text extractor.
pub const DEFAULT_ROUTE: &str = "oral";

/// A single medication line as supplied by the caller or the text extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrugRecord {
    /// Drug name as supplied (casing not canonical)
    pub name: String,
    /// Free-text dosage (e.g., "500mg")
    pub dosage: String,
    /// Free-text frequency (e.g., "Twice daily")
    pub frequency: String,
    /// Route of administration (e.g., "oral", "Topical")
    pub route: String,
}

impl DrugRecord {
    /// Create a record with the default oral route.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            route: DEFAULT_ROUTE.to_string(),
        }
    }

    /// Replace the route of administration.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Lowercase name used for every knowledge-base lookup.
    pub fn lookup_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Capitalize the first character and lowercase the rest.
///
/// Used for display names derived from lowercase canonical names.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
