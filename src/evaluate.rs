use std::time::Instant;

use chrono::{Datelike, Timelike};
use tracing::{debug, trace};

use crate::types::RuleOutcome;
use crate::{
    DayOfWeek, EvaluationContext, EvaluationReport, Frequency, GroupResolver, IsOperator,
    LoginState, Logic, MembershipOperator, QueryOperator, RoleGroups, Rule, RuleKind, RuleSet,
    TimeOfDay,
};

/// Evaluate a rule set, resolving role groups from the context's roles.
///
/// An empty rule set is visible under both `AND` and `OR`: having no rules
/// means no restriction, not an unsatisfiable disjunction.
#[must_use]
pub fn evaluate_rule_set(rule_set: &RuleSet, ctx: &EvaluationContext) -> bool {
    evaluate_rule_set_with(rule_set, ctx, &RoleGroups)
}

/// Evaluate a rule set with a host-supplied group resolver.
///
/// `AND` stops at the first failing rule, `OR` at the first passing one.
#[must_use]
pub fn evaluate_rule_set_with(
    rule_set: &RuleSet,
    ctx: &EvaluationContext,
    groups: &dyn GroupResolver,
) -> bool {
    if rule_set.is_empty() {
        return true;
    }
    let mut outcomes = rule_set
        .rules()
        .iter()
        .map(|rule| evaluate_rule_with(rule, ctx, groups));
    match rule_set.logic() {
        Logic::And => outcomes.all(|matched| matched),
        Logic::Or => outcomes.any(|matched| matched),
    }
}

/// Evaluate a single rule, resolving role groups from the context's roles.
#[must_use]
pub fn evaluate_rule(rule: &Rule, ctx: &EvaluationContext) -> bool {
    evaluate_rule_with(rule, ctx, &RoleGroups)
}

/// Evaluate a single rule.
///
/// A rule whose own data is incomplete (an empty taxonomy, parameter name or
/// group) or that needs a fact missing from the context evaluates to `false`,
/// whatever its operator.
#[must_use]
pub fn evaluate_rule_with(rule: &Rule, ctx: &EvaluationContext, groups: &dyn GroupResolver) -> bool {
    let matched = match rule.kind() {
        RuleKind::PostType { operator, value } => equals(*operator, value, ctx.post_type()),
        RuleKind::Taxonomy {
            operator,
            taxonomy,
            terms,
        } => taxonomy_matches(*operator, taxonomy, terms, ctx),
        RuleKind::Template { operator, value } => equals(*operator, value, ctx.template()),
        RuleKind::RecurringSchedule {
            operator,
            frequency,
            days,
            start_time,
            end_time,
        } => schedule_matches(*frequency, days, *start_time, *end_time, ctx)
            .map(|inside| operator.apply(inside)),
        RuleKind::LoggedInStatus { operator, value } => ctx
            .logged_in()
            .map(|logged_in| operator.apply(logged_in == (*value == LoginState::LoggedIn))),
        RuleKind::UserRoleGroup { operator, value } => {
            if value.is_empty() {
                None
            } else {
                groups
                    .is_member(value, ctx)
                    .map(|member| operator.apply(member))
            }
        }
        RuleKind::QueryParam {
            operator,
            name,
            value,
        } => query_matches(operator, name, value, ctx),
    }
    .unwrap_or(false);

    trace!(rule_id = rule.id(), rule_type = %rule.rule_type(), matched, "evaluated rule");
    matched
}

fn equals(operator: IsOperator, expected: &str, actual: Option<&str>) -> Option<bool> {
    if expected.is_empty() {
        return None;
    }
    actual.map(|actual| operator.apply(actual == expected))
}

/// Hosts that supply no terms for a taxonomy are treated as "no terms".
fn taxonomy_matches(
    operator: MembershipOperator,
    taxonomy: &str,
    terms: &[String],
    ctx: &EvaluationContext,
) -> Option<bool> {
    if taxonomy.is_empty() {
        return None;
    }
    let intersects = ctx
        .terms_for(taxonomy)
        .is_some_and(|present| terms.iter().any(|term| present.contains(term)));
    Some(operator.apply(intersects))
}

/// Whether `ctx.now` falls inside the window, bounds inclusive at minute
/// precision. Windows with `start > end` do not wrap past midnight and are
/// treated as unevaluable.
fn schedule_matches(
    frequency: Frequency,
    days: &[DayOfWeek],
    start: TimeOfDay,
    end: TimeOfDay,
    ctx: &EvaluationContext,
) -> Option<bool> {
    if start > end {
        return None;
    }
    let now = ctx.now()?;
    // hour < 24 and minute < 60, so this fits u16
    let minute_of_day = (now.hour() * 60 + now.minute()) as u16;
    let in_window = (start.minutes_since_midnight()..=end.minutes_since_midnight())
        .contains(&minute_of_day);
    let on_day = match frequency {
        Frequency::Daily => true,
        Frequency::Weekly => days.contains(&DayOfWeek::from(now.weekday())),
    };
    Some(in_window && on_day)
}

fn query_matches(
    operator: &QueryOperator,
    name: &str,
    value: &str,
    ctx: &EvaluationContext,
) -> Option<bool> {
    if name.is_empty() {
        return None;
    }
    match operator {
        QueryOperator::Equals => ctx.query_param(name).map(|actual| actual == value),
        QueryOperator::Other(tag) => {
            debug!(operator = tag.as_str(), "query operator has no semantics, rule does not match");
            None
        }
    }
}

pub(crate) fn evaluate_detailed(
    rule_set: &RuleSet,
    ctx: &EvaluationContext,
    groups: &dyn GroupResolver,
) -> EvaluationReport {
    let start = Instant::now();
    let rules = rule_set.rules();
    let mut outcomes = Vec::with_capacity(rules.len());

    // Short-circuit on the first AND failure / OR success.
    let decisive = match rule_set.logic() {
        Logic::And => false,
        Logic::Or => true,
    };
    let mut decided_at = None;
    for (i, rule) in rules.iter().enumerate() {
        let matched = evaluate_rule_with(rule, ctx, groups);
        outcomes.push(RuleOutcome {
            rule_id: rule.id().to_owned(),
            rule_type: rule.rule_type(),
            matched,
        });
        if matched == decisive {
            decided_at = Some(i);
            break;
        }
    }
    let visible = rules.is_empty() || decided_at.is_some() == decisive;

    let skipped = decided_at.map_or_else(Vec::new, |i| {
        rules[i + 1..]
            .iter()
            .map(|rule| rule.id().to_owned())
            .collect()
    });

    EvaluationReport::new(visible, outcomes, skipped, start.elapsed())
}
