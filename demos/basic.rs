use blockvis::{normalize_rule_set, EvaluationContext};
use chrono::{FixedOffset, TimeZone};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=blockvis=debug shows what the normalizer repaired.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Stored attribute data, as a block editor might have saved it.
    let rule_set = normalize_rule_set(&json!({
        "logic": "AND",
        "rules": [
            {"type": "logged_in_status", "operator": "is", "value": "logged_in"},
            {
                "type": "recurring_schedule",
                "frequency": "weekly",
                "days": ["monday", "friday", "monday"],
                "startTime": "08:00",
                "endTime": "9am",
            },
            {"type": "no_such_rule"},
        ],
    }));

    println!("{rule_set}");
    println!(
        "{}",
        rule_set
            .to_json_string()
            .expect("failed to serialize rule set")
    );

    let monday_morning = FixedOffset::east_opt(3600)
        .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).single())
        .expect("valid timestamp");

    let ctx = EvaluationContext::new()
        .with_logged_in(true)
        .with_now(monday_morning);

    println!("Visible: {}", rule_set.evaluate(&ctx));
}
