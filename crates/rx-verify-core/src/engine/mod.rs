//! Prescription rule engine.
//!
//! Pipeline: Pairwise Interactions → Age Band → Per-Drug Rules → Alternatives → Defaults
//!
//! The safety score starts at [`BASE_SAFETY_SCORE`], every rule adjusts it
//! additively, and it is clamped to [`MIN_SAFETY_SCORE`, `MAX_SAFETY_SCORE`]
//! as the last step.

mod age_band;

pub use age_band::*;

use std::borrow::Cow;

use tracing::debug;

use crate::knowledge::KnowledgeBase;
use crate::models::{
    capitalize, AnalysisResult, DrugRecord, MAX_SAFETY_SCORE, MIN_SAFETY_SCORE,
};

/// Score before any rule fires.
pub const BASE_SAFETY_SCORE: f64 = 0.9;

/// Below this score generic alternatives are suggested.
pub const ALTERNATIVES_THRESHOLD: f64 = 0.7;

/// Patients younger than this trigger age-coded contraindications.
pub const CONTRAINDICATION_AGE: u32 = 16;

/// Patients older than this get elderly dose-reduction advice.
pub const ELDERLY_AGE: u32 = 65;

pub const NO_INTERACTIONS: &str =
    "✅ No significant drug interactions detected in current database";
pub const NO_WARNINGS: &str = "ℹ Standard monitoring and precautions apply";
pub const NO_RECOMMENDATIONS: &str = "💊 Current dosages and frequencies appear appropriate";
pub const NO_ALTERNATIVES: &str = "✅ Current medication choices are clinically sound";

/// Generic alternatives offered when the score drops below the threshold.
pub const GENERIC_ALTERNATIVES: [&str; 3] = [
    "🔄 Consider paracetamol as first-line analgesic",
    "🔄 Topical NSAIDs for localized pain",
    "🔄 Non-pharmacological interventions (physiotherapy, heat/cold)",
];

pub const ASPIRIN_ALTERNATIVE: &str = "🔄 Replace aspirin with paracetamol or ibuprofen";
pub const IBUPROFEN_ALTERNATIVE: &str =
    "🔄 Consider topical diclofenac instead of oral ibuprofen";

/// Accumulator for one analysis run.
#[derive(Debug)]
struct Findings {
    interactions: Vec<String>,
    recommendations: Vec<String>,
    warnings: Vec<String>,
    alternatives: Vec<String>,
    score: f64,
}

impl Findings {
    fn new() -> Self {
        Self {
            interactions: Vec::new(),
            recommendations: Vec::new(),
            warnings: Vec::new(),
            alternatives: Vec::new(),
            score: BASE_SAFETY_SCORE,
        }
    }

    fn finish(mut self) -> AnalysisResult {
        fill_if_empty(&mut self.interactions, NO_INTERACTIONS);
        fill_if_empty(&mut self.warnings, NO_WARNINGS);
        fill_if_empty(&mut self.recommendations, NO_RECOMMENDATIONS);
        fill_if_empty(&mut self.alternatives, NO_ALTERNATIVES);

        AnalysisResult {
            interactions: self.interactions,
            recommendations: self.recommendations,
            warnings: self.warnings,
            alternatives: self.alternatives,
            safety_score: self.score.clamp(MIN_SAFETY_SCORE, MAX_SAFETY_SCORE),
        }
    }
}

fn fill_if_empty(list: &mut Vec<String>, sentinel: &str) {
    if list.is_empty() {
        list.push(sentinel.to_string());
    }
}

/// Rule engine over a knowledge base.
///
/// Never fails: unknown drug names miss every lookup and contribute nothing.
#[derive(Debug, Clone)]
pub struct Analyzer<'a> {
    knowledge: Cow<'a, KnowledgeBase>,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer<'static> {
    /// Analyzer over the shared built-in knowledge base.
    pub fn new() -> Self {
        Self {
            knowledge: Cow::Borrowed(KnowledgeBase::shared()),
        }
    }

    /// Analyzer that owns a custom knowledge base.
    pub fn with_knowledge(knowledge: KnowledgeBase) -> Self {
        Self {
            knowledge: Cow::Owned(knowledge),
        }
    }
}

impl<'a> Analyzer<'a> {
    /// Analyzer borrowing an existing knowledge base.
    pub fn borrowing(knowledge: &'a KnowledgeBase) -> Self {
        Self {
            knowledge: Cow::Borrowed(knowledge),
        }
    }

    /// The knowledge base in use.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Analyze a prescription for a patient of the given age.
    pub fn analyze(&self, drugs: &[DrugRecord], age: u32) -> AnalysisResult {
        let names: Vec<String> = drugs.iter().map(DrugRecord::lookup_name).collect();
        let mut findings = Findings::new();

        // Step 1: Pairwise interactions
        self.check_interactions(&names, &mut findings);

        // Step 2: Age band (first match wins)
        self.apply_age_band(drugs, &names, age, &mut findings);

        // Step 3: Per-drug rules
        self.check_drugs(drugs, age, &mut findings);

        // Step 4: Alternatives
        self.suggest_alternatives(&names, age, &mut findings);

        // Steps 5-6: Defaults and clamp
        let result = findings.finish();
        debug!(
            drug_count = drugs.len(),
            age,
            safety_score = result.safety_score,
            "prescription analyzed"
        );
        result
    }

    /// Look up every pair of positions i < j.
    ///
    /// Pairs are positional: a name listed twice is paired again with every
    /// later occurrence, and each pairing adds its own line and score impact.
    fn check_interactions(&self, names: &[String], findings: &mut Findings) {
        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                let Some(entry) = self.knowledge.interaction(first, second) else {
                    continue;
                };

                debug!(
                    pair = %format!("{first}+{second}"),
                    severity = entry.severity.as_str(),
                    impact = entry.score_impact,
                    "interaction found"
                );
                findings.interactions.push(format!(
                    "⚠ {} + {}: {}",
                    capitalize(first),
                    capitalize(second),
                    entry.message
                ));
                findings.score += entry.score_impact;
            }
        }
    }

    fn apply_age_band(
        &self,
        drugs: &[DrugRecord],
        names: &[String],
        age: u32,
        findings: &mut Findings,
    ) {
        let band = AgeBand::for_age(age);
        debug!(age, band = ?band, "age band resolved");

        match band {
            AgeBand::Infant => {
                findings.warnings.push(
                    "👶 Infant: Very limited medication options - specialist consultation required"
                        .into(),
                );
                findings.score -= 0.2;
            }
            AgeBand::Child => {
                findings
                    .warnings
                    .push("👶 Child: Weight-based dosing required".into());
                for drug in drugs {
                    let unsafe_for_children = self
                        .knowledge
                        .drug(&drug.name)
                        .is_some_and(|entry| !entry.pediatric_safe);
                    if unsafe_for_children {
                        findings
                            .warnings
                            .push(format!("🚨 {}: Not recommended for children", drug.name));
                        findings.score -= 0.3;
                    }
                }
            }
            AgeBand::Adolescent => {
                findings
                    .warnings
                    .push("👦 Adolescent: Verify age-appropriate formulations".into());
                if contains_name(names, "aspirin") {
                    findings
                        .warnings
                        .push("🚨 Aspirin: Risk of Reye's syndrome in adolescents".into());
                    findings.score -= 0.4;
                }
            }
            AgeBand::VeryElderly => {
                findings.warnings.push(
                    "👴 Very elderly: High risk for drug sensitivity and interactions".into(),
                );
                findings
                    .recommendations
                    .push("Consider 25-50% dose reduction for most medications".into());
                findings
                    .recommendations
                    .push("Implement frequent monitoring protocols".into());
                findings.score -= 0.15;
            }
            AgeBand::Elderly => {
                findings
                    .warnings
                    .push("👴 Elderly patient: Increased risk of adverse effects".into());
                findings
                    .recommendations
                    .push("Start with lower doses and titrate carefully".into());
                findings
                    .recommendations
                    .push("Monitor for falls risk and cognitive effects".into());
                findings.score -= 0.1;
            }
            AgeBand::Adult => {}
        }
    }

    /// Elderly caution, age-coded contraindications and monitoring per drug.
    fn check_drugs(&self, drugs: &[DrugRecord], age: u32, findings: &mut Findings) {
        for drug in drugs {
            let Some(entry) = self.knowledge.drug(&drug.name) else {
                continue;
            };

            if age > ELDERLY_AGE && entry.elderly_caution {
                findings
                    .recommendations
                    .push(format!("{}: Consider dose reduction in elderly", drug.name));
            }

            if age < CONTRAINDICATION_AGE {
                for contraindication in entry.age_contraindications() {
                    findings
                        .warnings
                        .push(format!("🚨 {}: {}", drug.name, contraindication));
                }
            }

            for parameter in &entry.monitoring {
                findings
                    .recommendations
                    .push(format!("{}: Monitor {}", drug.name, parameter));
            }
        }
    }

    fn suggest_alternatives(&self, names: &[String], age: u32, findings: &mut Findings) {
        if findings.score < ALTERNATIVES_THRESHOLD {
            findings
                .alternatives
                .extend(GENERIC_ALTERNATIVES.iter().map(|s| s.to_string()));
        }

        if contains_name(names, "aspirin") && age < 18 {
            findings.alternatives.push(ASPIRIN_ALTERNATIVE.into());
        }

        if contains_name(names, "ibuprofen") && age > 70 {
            findings.alternatives.push(IBUPROFEN_ALTERNATIVE.into());
        }
    }
}

fn contains_name(names: &[String], target: &str) -> bool {
    names.iter().any(|n| n == target)
}

/// Analyze with the shared built-in knowledge base.
pub fn analyze(drugs: &[DrugRecord], age: u32) -> AnalysisResult {
    Analyzer::new().analyze(drugs, age)
}
