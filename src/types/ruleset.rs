use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::context::{EvaluationContext, GroupResolver, RoleGroups};
use super::evaluation_report::EvaluationReport;
use super::operator::Logic;
use super::options::OptionsProvider;
use super::rule::{Rule, RuleKind};
use crate::patch::RuleSetPatch;
use crate::BlockvisError;

/// Builder for constructing a [`RuleSet`] in code.
///
/// # Example
///
/// ```
/// use blockvis::{EvaluationContext, IsOperator, Logic, LoginState, RuleKind, RuleSetBuilder};
///
/// let rule_set = RuleSetBuilder::new()
///     .logic(Logic::Or)
///     .rule(RuleKind::LoggedInStatus {
///         operator: IsOperator::Is,
///         value: LoginState::LoggedOut,
///     })
///     .rule(RuleKind::PostType {
///         operator: IsOperator::Is,
///         value: "page".into(),
///     })
///     .build();
///
/// let ctx = EvaluationContext::new().with_logged_in(false);
/// assert!(rule_set.evaluate(&ctx));
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    logic: Logic,
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }

    /// Append a rule with a generated id.
    #[must_use]
    pub fn rule(self, kind: RuleKind) -> Self {
        self.push(Rule::new(kind))
    }

    /// Append a rule with a fixed id.
    #[must_use]
    pub fn rule_with_id(self, id: &str, kind: RuleKind) -> Self {
        self.push(Rule::with_id(id, kind))
    }

    /// Append an already constructed rule.
    #[must_use]
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Finish the rule set. Duplicate ids are replaced with fresh ones.
    #[must_use]
    pub fn build(mut self) -> RuleSet {
        let mut seen = HashSet::new();
        for rule in &mut self.rules {
            if !seen.insert(rule.id().to_owned()) {
                tracing::debug!(rule_id = rule.id(), "replacing duplicate rule id");
                rule.regenerate_id();
                seen.insert(rule.id().to_owned());
            }
        }
        RuleSet::from_parts(self.logic, self.rules)
    }
}

/// A logic operator plus an ordered list of rules, owned by one block.
///
/// Immutable once built: edits go through [`apply()`](Self::apply), which
/// returns a new value. Serializes to
/// `{"logic": "AND"|"OR", "rules": [..]}`; deserializing from any JSON value
/// runs the normalizer, so the result always satisfies the model invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    logic: Logic,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// An empty `AND` rule set, which is always visible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are taken as given, so stored data with repeated ids round-trips.
    pub(crate) fn from_parts(logic: Logic, rules: Vec<Rule>) -> Self {
        Self { logic, rules }
    }

    #[must_use]
    pub fn logic(&self) -> Logic {
        self.logic
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate against a context, resolving role groups from the context's roles.
    ///
    /// An empty rule set is visible under both `AND` and `OR`.
    #[must_use]
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        crate::evaluate::evaluate_rule_set_with(self, ctx, &RoleGroups)
    }

    /// Evaluate with a host-supplied group membership resolver.
    #[must_use]
    pub fn evaluate_with(&self, ctx: &EvaluationContext, groups: &dyn GroupResolver) -> bool {
        crate::evaluate::evaluate_rule_set_with(self, ctx, groups)
    }

    /// Evaluate with per-rule diagnostics.
    ///
    /// The decision is identical to [`evaluate()`](Self::evaluate), including
    /// short-circuiting: rules after the deciding one are reported as skipped.
    pub fn evaluate_detailed(&self, ctx: &EvaluationContext) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, ctx, &RoleGroups)
    }

    /// Detailed evaluation with a host-supplied group membership resolver.
    pub fn evaluate_detailed_with(
        &self,
        ctx: &EvaluationContext,
        groups: &dyn GroupResolver,
    ) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, ctx, groups)
    }

    /// Return a copy of this rule set with `patch` applied.
    ///
    /// `options` pre-populates rules created by the patch.
    #[must_use]
    pub fn apply(&self, patch: RuleSetPatch, options: &dyn OptionsProvider) -> RuleSet {
        crate::patch::apply(self, patch, options)
    }

    /// Parse and normalize stored JSON.
    ///
    /// Malformed rule data is repaired or dropped; only invalid JSON syntax fails.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvisError::Json`] if `input` is not JSON.
    pub fn from_json_str(input: &str) -> Result<Self, BlockvisError> {
        let raw: serde_json::Value = serde_json::from_str(input)?;
        Ok(crate::normalize::normalize_rule_set(&raw))
    }

    /// Read and normalize a stored JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvisError`] on I/O failure or invalid JSON syntax.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, BlockvisError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }

    /// Serialize to the persisted JSON shape.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvisError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, BlockvisError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(crate::normalize::normalize_rule_set(&raw))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({}, {} rules)", self.logic, self.rules.len())
    }
}
