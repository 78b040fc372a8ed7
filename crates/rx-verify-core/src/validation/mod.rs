//! Caller-side input checks.
//!
//! The rule engine accepts any input; these checks mirror the limits of the
//! prescription entry form and are applied before analysis.

use thiserror::Error;

use crate::models::DrugRecord;

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 120;
pub const MAX_MEDICATIONS: usize = 5;

/// Route used for manual entries without one.
pub const MANUAL_DEFAULT_ROUTE: &str = "Oral";

/// Frequencies offered for manual entry.
pub const MANUAL_FREQUENCIES: [&str; 7] = [
    "Once daily",
    "Twice daily",
    "Three times daily",
    "Four times daily",
    "As needed",
    "Every 4 hours",
    "Every 6 hours",
];

/// Routes offered for manual entry.
pub const ROUTES: [&str; 4] = ["Oral", "Topical", "Injectable", "Inhalation"];

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Patient age {0} is outside 1-120")]
    AgeOutOfRange(u32),

    #[error("No medications supplied")]
    NoMedications,

    #[error("Too many medications: {0} (max 5)")]
    TooManyMedications(usize),

    #[error("Medication {0} has an empty name")]
    EmptyDrugName(usize),

    #[error("Medication {index} has unknown route {route:?}")]
    UnknownRoute { index: usize, route: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// One row of the manual entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEntry {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: Option<String>,
}

pub fn validate_age(age: u32) -> ValidationResult<()> {
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::AgeOutOfRange(age))
    }
}

/// Whether a route is one of [`ROUTES`] (case-insensitive).
pub fn is_known_route(route: &str) -> bool {
    let route = route.trim();
    ROUTES.iter().any(|known| known.eq_ignore_ascii_case(route))
}

/// Check count, names and routes of a medication list.
pub fn validate_records(drugs: &[DrugRecord]) -> ValidationResult<()> {
    if drugs.is_empty() {
        return Err(ValidationError::NoMedications);
    }
    if drugs.len() > MAX_MEDICATIONS {
        return Err(ValidationError::TooManyMedications(drugs.len()));
    }
    if let Some(index) = drugs.iter().position(|d| d.name.trim().is_empty()) {
        return Err(ValidationError::EmptyDrugName(index));
    }
    if let Some(index) = drugs.iter().position(|d| !is_known_route(&d.route)) {
        return Err(ValidationError::UnknownRoute {
            index,
            route: drugs[index].route.clone(),
        });
    }
    Ok(())
}

/// Check a full prescription before analysis.
pub fn validate_prescription(drugs: &[DrugRecord], age: u32) -> ValidationResult<()> {
    validate_age(age)?;
    validate_records(drugs)
}

/// Build records from form rows.
///
/// Rows with an empty name are skipped, missing routes become
/// [`MANUAL_DEFAULT_ROUTE`], and at most [`MAX_MEDICATIONS`] rows are read.
pub fn manual_entries(rows: &[ManualEntry]) -> Vec<DrugRecord> {
    rows.iter()
        .take(MAX_MEDICATIONS)
        .filter(|row| !row.name.trim().is_empty())
        .map(|row| DrugRecord {
            name: row.name.clone(),
            dosage: row.dosage.clone(),
            frequency: row.frequency.clone(),
            route: row
                .route
                .clone()
                .unwrap_or_else(|| MANUAL_DEFAULT_ROUTE.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> ManualEntry {
        ManualEntry {
            name: name.into(),
            dosage: "500mg".into(),
            frequency: MANUAL_FREQUENCIES[0].into(),
            route: None,
        }
    }

    #[test]
    fn test_validate_age() {
        assert!(validate_age(1).is_ok());
        assert!(validate_age(120).is_ok());
        assert_eq!(validate_age(0), Err(ValidationError::AgeOutOfRange(0)));
        assert_eq!(validate_age(121), Err(ValidationError::AgeOutOfRange(121)));
    }

    #[test]
    fn test_validate_records() {
        let one = vec![DrugRecord::new("Aspirin", "75mg", "Once daily")];
        assert!(validate_records(&one).is_ok());

        assert_eq!(validate_records(&[]), Err(ValidationError::NoMedications));

        let six: Vec<DrugRecord> = (0..6)
            .map(|i| DrugRecord::new(format!("Drug{i}"), "1mg", "Once daily"))
            .collect();
        assert_eq!(
            validate_records(&six),
            Err(ValidationError::TooManyMedications(6))
        );

        let blank = vec![
            DrugRecord::new("Aspirin", "75mg", "Once daily"),
            DrugRecord::new("  ", "75mg", "Once daily"),
        ];
        assert_eq!(validate_records(&blank), Err(ValidationError::EmptyDrugName(1)));
    }

    #[test]
    fn test_validate_records_checks_routes() {
        // Extracted records carry lowercase "oral"
        let extracted = vec![DrugRecord::new("Aspirin", "75mg", "Once daily")];
        assert!(validate_records(&extracted).is_ok());

        let inhaled = vec![DrugRecord::new("Salbutamol", "100mcg", "As needed").with_route("Inhalation")];
        assert!(validate_records(&inhaled).is_ok());

        let rectal = vec![
            DrugRecord::new("Aspirin", "75mg", "Once daily"),
            DrugRecord::new("Paracetamol", "500mg", "Once daily").with_route("Rectal"),
        ];
        assert_eq!(
            validate_records(&rectal),
            Err(ValidationError::UnknownRoute {
                index: 1,
                route: "Rectal".into()
            })
        );
    }

    #[test]
    fn test_is_known_route() {
        for route in ROUTES {
            assert!(is_known_route(route));
        }
        assert!(is_known_route("topical"));
        assert!(!is_known_route(""));
        assert!(!is_known_route("Intravenous"));
    }

    #[test]
    fn test_validate_prescription_checks_age_first() {
        assert_eq!(
            validate_prescription(&[], 0),
            Err(ValidationError::AgeOutOfRange(0))
        );
    }

    #[test]
    fn test_manual_entries_skip_blank_names() {
        let mut topical = row("Ibuprofen");
        topical.route = Some("Topical".into());
        let rows = vec![row("Paracetamol"), row(""), topical];

        let drugs = manual_entries(&rows);
        assert_eq!(drugs.len(), 2);
        assert_eq!(drugs[0].route, "Oral");
        assert_eq!(drugs[1].name, "Ibuprofen");
        assert_eq!(drugs[1].route, "Topical");
    }

    #[test]
    fn test_manual_entries_capped() {
        let rows: Vec<ManualEntry> = (0..8).map(|i| row(&format!("Drug{i}"))).collect();
        assert_eq!(manual_entries(&rows).len(), MAX_MEDICATIONS);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::AgeOutOfRange(130).to_string(),
            "Patient age 130 is outside 1-120"
        );
    }
}
