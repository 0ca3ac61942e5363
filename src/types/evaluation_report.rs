use std::fmt;
use std::time::Duration;

use super::rule::RuleType;

/// Outcome of one rule that was actually evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub rule_type: RuleType,
    pub matched: bool,
}

/// Detailed evaluation report returned by
/// [`RuleSet::evaluate_detailed()`](super::ruleset::RuleSet::evaluate_detailed).
///
/// Contains the visibility decision, the outcome of every rule that was
/// evaluated, the ids of rules skipped by short-circuiting, and the
/// wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    visible: bool,
    outcomes: Vec<RuleOutcome>,
    skipped: Vec<String>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        visible: bool,
        outcomes: Vec<RuleOutcome>,
        skipped: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            visible,
            outcomes,
            skipped,
            duration,
        }
    }

    /// The visibility decision, same as [`RuleSet::evaluate()`](super::ruleset::RuleSet::evaluate).
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Outcomes of evaluated rules, in rule order.
    #[must_use]
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Ids of rules never evaluated because the result was already decided.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Visible: {}", self.visible)?;
        for outcome in &self.outcomes {
            writeln!(
                f,
                "  {} ({}): {}",
                outcome.rule_id, outcome.rule_type, outcome.matched
            )?;
        }
        if !self.skipped.is_empty() {
            writeln!(f, "Skipped: {}", self.skipped.join(", "))?;
        }
        write!(f, "Duration: {:?}", self.duration)
    }
}
