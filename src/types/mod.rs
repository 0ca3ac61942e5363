mod context;
mod error;
mod evaluation_report;
mod operator;
mod options;
mod rule;
mod ruleset;
mod time;

pub use context::{EvaluationContext, GroupResolver, RoleGroups};
pub use error::TimeParseError;
pub use evaluation_report::{EvaluationReport, RuleOutcome};
pub use operator::{Frequency, IsOperator, Logic, LoginState, MembershipOperator, QueryOperator};
pub use options::{NoOptions, OptionsProvider, StaticOptions, TaxonomyOption};
pub(crate) use rule::dedup;
pub use rule::{Rule, RuleKind, RuleType};
pub use ruleset::{RuleSet, RuleSetBuilder};
pub use time::{DayOfWeek, TimeOfDay};
