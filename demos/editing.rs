use blockvis::{EvaluationContext, Logic, RuleSet, RuleSetPatch, RuleType, StaticOptions};
use serde_json::json;

fn main() {
    let options = StaticOptions::from_json_str(
        r#"{
            "post_types": ["page", "post"],
            "taxonomies": [{"slug": "category", "terms": ["news", "sports"]}],
            "role_groups": ["editor", "subscriber"]
        }"#,
    )
    .expect("failed to load options");

    // Each edit produces a new rule set; the previous one is untouched.
    let rule_set = RuleSet::new()
        .apply(RuleSetPatch::AddRule(RuleType::Taxonomy), &options)
        .apply(
            RuleSetPatch::UpdateRule {
                index: 0,
                fields: json!({"terms": ["news", "news", ""]}),
            },
            &options,
        )
        .apply(RuleSetPatch::AddRule(RuleType::UserRoleGroup), &options)
        .apply(
            RuleSetPatch::UpdateRule {
                index: 1,
                fields: json!({"value": "editor"}),
            },
            &options,
        )
        .apply(RuleSetPatch::SetLogic(Logic::Or), &options);

    println!("{rule_set}");
    println!(
        "{}",
        rule_set
            .to_json_string()
            .expect("failed to serialize rule set")
    );

    let ctx = EvaluationContext::new()
        .with_terms("category", ["news"])
        .with_roles(["subscriber"]);

    let report = rule_set.evaluate_detailed(&ctx);
    println!("{report}");

    // Switching the type keeps the id but resets every other field.
    let switched = rule_set.apply(
        RuleSetPatch::ChangeRuleType {
            index: 0,
            rule_type: RuleType::PostType,
        },
        &options,
    );
    println!("{}", switched.rules()[0]);
    println!("{}", switched.evaluate_detailed(&ctx));
}
