//! Conditional visibility rules for content blocks.
//!
//! A [`RuleSet`] combines typed [`Rule`]s (post type, taxonomy, template,
//! recurring schedule, logged-in status, role group, query parameter) under
//! `AND` or `OR`. Stored input of any shape is repaired by
//! [`normalize_rule_set`]; the result is evaluated against an
//! [`EvaluationContext`] to a single visibility decision.
//!
//! ```
//! use blockvis::{normalize_rule_set, EvaluationContext};
//! use serde_json::json;
//!
//! let rule_set = normalize_rule_set(&json!({
//!     "logic": "AND",
//!     "rules": [{"type": "query_param", "name": "promo", "value": "special"}],
//! }));
//!
//! let ctx = EvaluationContext::new().with_query_param("promo", "special");
//! assert!(rule_set.evaluate(&ctx));
//! assert!(!rule_set.evaluate(&EvaluationContext::new()));
//! ```

mod defaults;
mod error;
mod evaluate;
#[cfg(feature = "fingerprint")]
mod fingerprint;
mod normalize;
mod patch;
mod types;

pub use defaults::create_default_rule_for_type;
pub use error::BlockvisError;
pub use evaluate::{evaluate_rule, evaluate_rule_set, evaluate_rule_set_with, evaluate_rule_with};
#[cfg(feature = "fingerprint")]
pub use fingerprint::Fingerprint;
pub use normalize::{normalize_rule, normalize_rule_set, sanitize_time_value};
pub use patch::RuleSetPatch;
pub use types::{
    DayOfWeek, EvaluationContext, EvaluationReport, Frequency, GroupResolver, IsOperator, Logic,
    LoginState, MembershipOperator, NoOptions, OptionsProvider, QueryOperator, RoleGroups, Rule,
    RuleKind, RuleOutcome, RuleSet, RuleSetBuilder, RuleType, StaticOptions, TaxonomyOption,
    TimeOfDay, TimeParseError,
};
