
use std::collections::HashSet;

use blockvis::{evaluate_rule, normalize_rule_set, Logic, RuleKind, RuleSet, RuleSetBuilder};
use proptest::prelude::*;
use strategies::{arb_context, arb_json, arb_rule_set, arb_rule_set_json};

// ---------------------------------------------------------------------------
// Invariant 1: Totality
//
// Normalization and evaluation accept anything without panicking.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalize_accepts_any_json(raw in arb_json()) {
        let _ = normalize_rule_set(&raw);
        let _ = blockvis::normalize_rule(&raw);
    }

    #[test]
    fn evaluate_accepts_any_normalized_input(raw in arb_json(), ctx in arb_context()) {
        let rule_set = normalize_rule_set(&raw);
        let _ = rule_set.evaluate(&ctx);
        let _ = rule_set.evaluate_detailed(&ctx);
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Idempotence and round trip
//
// Normalizing the serialized form of a normalized rule set changes nothing,
// ids included.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalize_is_idempotent(raw in arb_rule_set_json()) {
        let once = normalize_rule_set(&raw);
        let stored = serde_json::to_value(&once).unwrap();
        let twice = normalize_rule_set(&stored);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(stored, serde_json::to_value(&twice).unwrap());
    }

    #[test]
    fn garbage_is_idempotent_too(raw in arb_json()) {
        let once = normalize_rule_set(&raw);
        let twice = normalize_rule_set(&serde_json::to_value(&once).unwrap());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn deserialize_matches_normalize(rule_set in arb_rule_set()) {
        let text = rule_set.to_json_string().unwrap();
        let parsed: RuleSet = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(rule_set, parsed);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Model invariants hold after normalization
//
// Stored ids are kept verbatim; only the builder enforces uniqueness.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn stored_ids_survive_and_none_are_empty(raw in arb_rule_set_json()) {
        let rule_set = normalize_rule_set(&raw);
        let kept: Vec<&serde_json::Value> = raw["rules"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| blockvis::normalize_rule(r).is_some())
            .collect();
        prop_assert_eq!(kept.len(), rule_set.len());
        for (stored, rule) in kept.iter().zip(rule_set.rules()) {
            prop_assert!(!rule.id().is_empty());
            if let Some(id) = stored["id"].as_str().filter(|id| !id.is_empty()) {
                prop_assert_eq!(rule.id(), id);
            }
        }
    }

    #[test]
    fn builder_ids_are_unique(rule_set in arb_rule_set()) {
        let built = rule_set
            .rules()
            .iter()
            .cloned()
            .fold(RuleSetBuilder::new(), RuleSetBuilder::push)
            .build();
        let mut seen = HashSet::new();
        for rule in built.rules() {
            prop_assert!(seen.insert(rule.id().to_owned()), "duplicate id {}", rule.id());
        }
    }

    #[test]
    fn set_fields_have_no_duplicates(rule_set in arb_rule_set()) {
        for rule in rule_set.rules() {
            match rule.kind() {
                RuleKind::Taxonomy { terms, .. } => {
                    let unique: HashSet<_> = terms.iter().collect();
                    prop_assert_eq!(unique.len(), terms.len());
                    prop_assert!(terms.iter().all(|t| !t.is_empty()));
                }
                RuleKind::RecurringSchedule { days, .. } => {
                    let unique: HashSet<_> = days.iter().collect();
                    prop_assert_eq!(unique.len(), days.len());
                }
                _ => {}
            }
        }
    }

    #[test]
    fn unknown_types_never_survive(raw in arb_rule_set_json()) {
        let rule_set = normalize_rule_set(&raw);
        let stored = serde_json::to_value(&rule_set).unwrap();
        for rule in stored["rules"].as_array().unwrap() {
            let tag = rule["type"].as_str().unwrap();
            prop_assert!(blockvis::RuleType::from_tag(tag).is_some());
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Logic
//
// AND is "every rule matches", OR is "some rule matches", and an empty rule
// set is visible either way.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn logic_matches_per_rule_outcomes(rule_set in arb_rule_set(), ctx in arb_context()) {
        let outcomes: Vec<bool> = rule_set.rules().iter().map(|r| evaluate_rule(r, &ctx)).collect();
        let expected = if outcomes.is_empty() {
            true
        } else {
            match rule_set.logic() {
                Logic::And => outcomes.iter().all(|&o| o),
                Logic::Or => outcomes.iter().any(|&o| o),
            }
        };
        prop_assert_eq!(rule_set.evaluate(&ctx), expected);
    }

    #[test]
    fn detailed_agrees_with_evaluate(rule_set in arb_rule_set(), ctx in arb_context()) {
        let report = rule_set.evaluate_detailed(&ctx);
        prop_assert_eq!(report.visible(), rule_set.evaluate(&ctx));
        prop_assert_eq!(
            report.outcomes().len() + report.skipped().len(),
            rule_set.len()
        );
    }

    #[test]
    fn evaluation_is_deterministic(rule_set in arb_rule_set(), ctx in arb_context()) {
        let first = rule_set.evaluate(&ctx);
        for _ in 0..3 {
            prop_assert_eq!(first, rule_set.evaluate(&ctx));
        }
    }

    #[test]
    fn rule_order_does_not_change_result(rule_set in arb_rule_set(), ctx in arb_context()) {
        let mut reversed = rule_set.clone();
        for i in 0..rule_set.len() {
            reversed = reversed.apply(
                blockvis::RuleSetPatch::MoveRule { from: rule_set.len() - 1, to: i },
                &blockvis::NoOptions,
            );
        }
        prop_assert_eq!(rule_set.evaluate(&ctx), reversed.evaluate(&ctx));
    }
}
