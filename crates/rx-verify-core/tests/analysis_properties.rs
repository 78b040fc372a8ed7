//! Property tests for the rule engine and extractor.

use proptest::prelude::*;

use rx_verify_core::extractor::MAX_EXTRACTED_DRUGS;
use rx_verify_core::models::{MAX_SAFETY_SCORE, MIN_SAFETY_SCORE};
use rx_verify_core::{analyze, AgeBand, DrugRecord, Extractor};

const NAMES: &[&str] = &[
    "Paracetamol",
    "ibuprofen",
    "ASPIRIN",
    "Codeine",
    "tramadol",
    "Omeprazole",
    "Warfarin",
    "Simvastatin",
    "Placebo",
];

fn drug_strategy() -> impl Strategy<Value = DrugRecord> {
    (0..NAMES.len()).prop_map(|i| DrugRecord::new(NAMES[i], "100mg", "Once daily"))
}

fn drugs_strategy() -> impl Strategy<Value = Vec<DrugRecord>> {
    prop::collection::vec(drug_strategy(), 0..8)
}

proptest! {
    #[test]
    fn score_is_always_bounded(drugs in drugs_strategy(), age in 0u32..130) {
        let result = analyze(&drugs, age);
        prop_assert!(result.safety_score >= MIN_SAFETY_SCORE);
        prop_assert!(result.safety_score <= MAX_SAFETY_SCORE);
    }

    #[test]
    fn every_list_is_non_empty(drugs in drugs_strategy(), age in 0u32..130) {
        let result = analyze(&drugs, age);
        prop_assert!(!result.interactions.is_empty());
        prop_assert!(!result.recommendations.is_empty());
        prop_assert!(!result.warnings.is_empty());
        prop_assert!(!result.alternatives.is_empty());
    }

    #[test]
    fn analysis_is_deterministic(drugs in drugs_strategy(), age in 0u32..130) {
        prop_assert_eq!(analyze(&drugs, age), analyze(&drugs, age));
    }

    #[test]
    fn pair_order_does_not_change_impact(a in drug_strategy(), b in drug_strategy(), age in 0u32..130) {
        let forward = analyze(&[a.clone(), b.clone()], age);
        let reverse = analyze(&[b, a], age);

        prop_assert!((forward.safety_score - reverse.safety_score).abs() < 1e-9);
        prop_assert_eq!(forward.interactions.len(), reverse.interactions.len());

        let message = |line: &String| line.split_once(": ").map(|(_, m)| m.to_string());
        let forward_messages: Vec<_> = forward.interactions.iter().map(message).collect();
        let reverse_messages: Vec<_> = reverse.interactions.iter().map(message).collect();
        prop_assert_eq!(forward_messages, reverse_messages);
    }

    #[test]
    fn exactly_one_age_band_applies(age in 0u32..130) {
        let result = analyze(&[], age);
        let band_lines = result
            .warnings
            .iter()
            .filter(|w| w.starts_with('👶') || w.starts_with('👦') || w.starts_with('👴'))
            .count();

        let expected = if AgeBand::for_age(age) == AgeBand::Adult { 0 } else { 1 };
        prop_assert_eq!(band_lines, expected);
    }

    #[test]
    fn extractor_never_exceeds_cap(text in ".{0,200}") {
        prop_assert!(Extractor::new().extract(&text).len() <= MAX_EXTRACTED_DRUGS);
    }

    #[test]
    fn extractor_emits_each_drug_once(words in prop::collection::vec(
        prop::sample::select(vec!["paracetamol", "tylenol", "advil", "ibuprofen", "zocor", "and", "500mg"]),
        0..12,
    )) {
        let drugs = Extractor::new().extract(&words.join(" "));
        let mut names: Vec<&str> = drugs.iter().map(|d| d.name.as_str()).collect();
        let before = names.len();
        names.dedup();
        prop_assert_eq!(names.len(), before);
    }
}
