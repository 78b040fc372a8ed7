//! Drug and interaction knowledge bases.
//!
//! Both tables are plain immutable maps:
//! - drugs keyed by lowercase canonical name
//! - interactions keyed by the sorted pair of lowercase names
//!
//! The built-in tables can be extended with [`KnowledgeBase::add_drug`],
//! [`KnowledgeBase::add_interaction`] or a JSON overlay.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{DrugEntry, InteractionEntry, Severity};

/// Minimum Jaro-Winkler similarity for a name suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

static BUILTIN: LazyLock<KnowledgeBase> = LazyLock::new(KnowledgeBase::builtin);

/// Knowledge-base errors.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid interaction pair: {0}")]
    InvalidPair(String),

    #[error("Invalid drug entry: {0}")]
    InvalidDrug(String),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Order-independent key for an interaction lookup.
pub type PairKey = (String, String);

/// Table key for a drug name: trimmed and lowercased.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Build the sorted, normalized key for a drug pair.
pub fn pair_key(a: &str, b: &str) -> PairKey {
    let a = name_key(a);
    let b = name_key(b);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// On-disk shape of a knowledge table document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(default)]
    pub drugs: HashMap<String, DrugEntry>,
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
}

/// One interaction row of a [`KnowledgeDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub pair: [String; 2],
    #[serde(flatten)]
    pub entry: InteractionEntry,
}

/// Drug and interaction reference tables.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    drugs: HashMap<String, DrugEntry>,
    interactions: HashMap<PairKey, InteractionEntry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// Create a knowledge base with no entries.
    pub fn empty() -> Self {
        Self {
            drugs: HashMap::new(),
            interactions: HashMap::new(),
        }
    }

    /// Create a knowledge base with the built-in tables.
    pub fn builtin() -> Self {
        Self {
            drugs: Self::default_drugs(),
            interactions: Self::default_interactions(),
        }
    }

    /// Process-wide built-in knowledge base.
    pub fn shared() -> &'static KnowledgeBase {
        &BUILTIN
    }

    /// Load standalone tables from a JSON document.
    pub fn from_json(json: &str) -> KnowledgeResult<Self> {
        let mut kb = Self::empty();
        kb.extend_from_json(json)?;
        Ok(kb)
    }

    /// Overlay entries from a JSON document onto this knowledge base.
    pub fn extend_from_json(&mut self, json: &str) -> KnowledgeResult<()> {
        let doc: KnowledgeDocument = serde_json::from_str(json)?;
        self.extend(doc)
    }

    /// Overlay entries from a parsed document.
    ///
    /// The whole document is checked before anything is inserted, so a
    /// failed overlay leaves the tables untouched.
    pub fn extend(&mut self, doc: KnowledgeDocument) -> KnowledgeResult<()> {
        if doc.drugs.keys().any(|name| name_key(name).is_empty()) {
            return Err(KnowledgeError::InvalidDrug("empty drug name".into()));
        }
        if let Some(record) = doc
            .interactions
            .iter()
            .find(|r| r.pair.iter().any(|name| name_key(name).is_empty()))
        {
            let [a, b] = &record.pair;
            return Err(KnowledgeError::InvalidPair(format!("({a:?}, {b:?})")));
        }

        let drug_count = doc.drugs.len();
        let interaction_count = doc.interactions.len();

        for (name, entry) in doc.drugs {
            if self.drugs.contains_key(&name_key(&name)) {
                warn!(drug = %name, "overriding drug entry");
            }
            self.add_drug(&name, entry);
        }

        for record in doc.interactions {
            let [a, b] = record.pair;
            if self.interactions.contains_key(&pair_key(&a, &b)) {
                warn!(pair = %format!("{a}+{b}"), "overriding interaction entry");
            }
            self.add_interaction(&a, &b, record.entry);
        }

        info!(
            drugs = drug_count,
            interactions = interaction_count,
            "knowledge tables loaded"
        );
        Ok(())
    }

    /// Add or replace a drug entry.
    pub fn add_drug(&mut self, name: &str, entry: DrugEntry) {
        self.drugs.insert(name_key(name), entry);
    }

    /// Add or replace an interaction entry. Pair order does not matter.
    pub fn add_interaction(&mut self, a: &str, b: &str, entry: InteractionEntry) {
        self.interactions.insert(pair_key(a, b), entry);
    }

    /// Look up a drug by name (case-insensitive).
    pub fn drug(&self, name: &str) -> Option<&DrugEntry> {
        self.drugs.get(&name_key(name))
    }

    /// Look up the interaction for an unordered pair (case-insensitive).
    pub fn interaction(&self, a: &str, b: &str) -> Option<&InteractionEntry> {
        self.interactions.get(&pair_key(a, b))
    }

    pub fn drug_count(&self) -> usize {
        self.drugs.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    /// Every name this base knows, from either table.
    pub fn known_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .drugs
            .keys()
            .map(String::as_str)
            .chain(
                self.interactions
                    .keys()
                    .flat_map(|(a, b)| [a.as_str(), b.as_str()]),
            )
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Suggest the closest known name for a misspelled drug.
    ///
    /// Returns `None` for names that are already known or have no close match.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let lower = name_key(name);
        if lower.is_empty() {
            return None;
        }

        let names = self.known_names();
        if names.contains(&lower.as_str()) {
            return None;
        }

        names
            .into_iter()
            .map(|known| (known, jaro_winkler(&lower, known)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(known, _)| known)
    }

    /// Built-in drug table.
    fn default_drugs() -> HashMap<String, DrugEntry> {
        let mut map = HashMap::new();

        // Analgesics
        map.insert(
            "paracetamol".into(),
            DrugEntry::new("4000mg", true, true)
                .with_contraindications(&["severe liver disease"])
                .with_monitoring(&["liver function if long-term use"]),
        );

        // NSAIDs
        map.insert(
            "ibuprofen".into(),
            DrugEntry::new("2400mg", true, true)
                .with_contraindications(&["severe heart failure", "severe kidney disease"])
                .with_monitoring(&["kidney function", "blood pressure"]),
        );
        map.insert(
            "aspirin".into(),
            DrugEntry::new("4000mg", true, false)
                .with_contraindications(&["age < 16 years", "bleeding disorders"])
                .with_monitoring(&["bleeding signs", "GI symptoms"]),
        );

        // Opioids
        map.insert(
            "codeine".into(),
            DrugEntry::new("240mg", true, false)
                .with_contraindications(&["age < 12 years", "respiratory depression"])
                .with_monitoring(&["respiratory rate", "sedation level"]),
        );
        map.insert(
            "tramadol".into(),
            DrugEntry::new("400mg", true, false)
                .with_contraindications(&["seizure history", "age < 12 years"])
                .with_monitoring(&["seizure risk", "serotonin syndrome"]),
        );

        map
    }

    /// Built-in interaction table.
    fn default_interactions() -> HashMap<PairKey, InteractionEntry> {
        let mut map = HashMap::new();

        map.insert(
            pair_key("aspirin", "ibuprofen"),
            InteractionEntry::new(
                Severity::High,
                "Increased bleeding risk and GI ulceration - monitor closely",
                -0.25,
            ),
        );
        map.insert(
            pair_key("aspirin", "warfarin"),
            InteractionEntry::new(
                Severity::Critical,
                "Major bleeding risk - requires immediate medical review",
                -0.4,
            ),
        );
        map.insert(
            pair_key("paracetamol", "ibuprofen"),
            InteractionEntry::new(
                Severity::Low,
                "Generally safe combination - monitor for GI irritation",
                -0.05,
            ),
        );
        map.insert(
            pair_key("tramadol", "codeine"),
            InteractionEntry::new(
                Severity::High,
                "Risk of respiratory depression and oversedation",
                -0.3,
            ),
        );
        map.insert(
            pair_key("omeprazole", "aspirin"),
            InteractionEntry::new(
                Severity::Beneficial,
                "PPI provides gastroprotection with aspirin",
                0.1,
            ),
        );

        map
    }
}
