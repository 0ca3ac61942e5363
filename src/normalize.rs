//! Repair arbitrary JSON-like input into a valid [`RuleSet`].
//!
//! Normalization never fails. Unsupported rules are dropped, malformed fields
//! are reset to their defaults independently of each other, and everything
//! else is kept. What was dropped or reset is reported through `tracing` at
//! `debug` level only.

use serde_json::{Map, Value};
use tracing::debug;

use crate::defaults::default_kind;
use crate::types::dedup;
use crate::{
    DayOfWeek, Frequency, IsOperator, Logic, LoginState, MembershipOperator, NoOptions,
    QueryOperator, Rule, RuleKind, RuleSet, RuleType, TimeOfDay,
};

/// Normalize a stored rule set.
///
/// Anything that is not an object yields the empty `AND` rule set. `logic`
/// other than `"AND"`/`"OR"` becomes `AND`; `rules` other than an array
/// becomes empty; each rule goes through [`normalize_rule`] and rejected
/// rules are dropped. Ids are kept as stored, even when repeated.
#[must_use]
pub fn normalize_rule_set(input: &Value) -> RuleSet {
    let Some(obj) = input.as_object() else {
        return RuleSet::default();
    };

    let logic = match obj.get("logic") {
        None => Logic::And,
        Some(raw) => raw.as_str().and_then(Logic::from_tag).unwrap_or_else(|| {
            debug!(logic = %raw, "unsupported logic operator, using AND");
            Logic::And
        }),
    };

    let rules = match obj.get("rules") {
        Some(Value::Array(items)) => items.iter().filter_map(normalize_rule).collect(),
        Some(other) => {
            debug!(rules = %other, "rules is not an array, dropping");
            Vec::new()
        }
        None => Vec::new(),
    };

    RuleSet::from_parts(logic, rules)
}

/// Normalize one stored rule.
///
/// Returns `None` when `type` is missing or not a supported rule type.
/// Otherwise every field of that type is taken from the input when valid and
/// defaulted when not; a non-empty string `id` is kept, anything else gets a
/// generated id. Fields belonging to other rule types are ignored.
#[must_use]
pub fn normalize_rule(input: &Value) -> Option<Rule> {
    let Some(obj) = input.as_object() else {
        debug!("dropping rule that is not an object");
        return None;
    };
    let Some(tag) = obj.get("type").and_then(Value::as_str) else {
        debug!("dropping rule without a type");
        return None;
    };
    let Some(rule_type) = RuleType::from_tag(tag) else {
        debug!(rule_type = tag, "dropping rule with unsupported type");
        return None;
    };

    let id = obj.get("id").and_then(Value::as_str).unwrap_or_default();
    let kind = overlay(default_kind(rule_type, &NoOptions), obj);
    Some(Rule::with_id(id, kind))
}

/// Validate a 24-hour `HH:MM` time, returning `fallback` for anything else,
/// including non-string values.
#[must_use]
pub fn sanitize_time_value(value: &Value, fallback: TimeOfDay) -> TimeOfDay {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}

fn overlay(kind: RuleKind, obj: &Map<String, Value>) -> RuleKind {
    match kind {
        RuleKind::PostType { operator, value } => RuleKind::PostType {
            operator: tagged(obj, "operator", IsOperator::from_tag).unwrap_or(operator),
            value: string(obj, "value").unwrap_or(value),
        },
        RuleKind::Taxonomy {
            operator,
            taxonomy,
            terms,
        } => RuleKind::Taxonomy {
            operator: tagged(obj, "operator", MembershipOperator::from_tag).unwrap_or(operator),
            taxonomy: string(obj, "taxonomy").unwrap_or(taxonomy),
            terms: field(obj, "terms", term_list).unwrap_or(terms),
        },
        RuleKind::Template { operator, value } => RuleKind::Template {
            operator: tagged(obj, "operator", IsOperator::from_tag).unwrap_or(operator),
            value: string(obj, "value").unwrap_or(value),
        },
        RuleKind::RecurringSchedule {
            operator,
            frequency,
            days,
            start_time,
            end_time,
        } => RuleKind::RecurringSchedule {
            operator: tagged(obj, "operator", IsOperator::from_tag).unwrap_or(operator),
            frequency: tagged(obj, "frequency", Frequency::from_tag).unwrap_or(frequency),
            days: field(obj, "days", day_list).unwrap_or(days),
            start_time: time(obj, "startTime", start_time),
            end_time: time(obj, "endTime", end_time),
        },
        RuleKind::LoggedInStatus { operator, value } => RuleKind::LoggedInStatus {
            operator: tagged(obj, "operator", IsOperator::from_tag).unwrap_or(operator),
            value: tagged(obj, "value", LoginState::from_tag).unwrap_or(value),
        },
        RuleKind::UserRoleGroup { operator, value } => RuleKind::UserRoleGroup {
            operator: tagged(obj, "operator", IsOperator::from_tag).unwrap_or(operator),
            value: string(obj, "value").unwrap_or(value),
        },
        RuleKind::QueryParam {
            operator,
            name,
            value,
        } => RuleKind::QueryParam {
            operator: tagged(obj, "operator", QueryOperator::from_tag).unwrap_or(operator),
            name: string(obj, "name").unwrap_or(name),
            value: string(obj, "value").unwrap_or(value),
        },
    }
}

/// Parse `obj[key]` if present. A present but unparseable value is logged
/// and treated as absent.
fn field<T>(
    obj: &Map<String, Value>,
    key: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let raw = obj.get(key)?;
    let parsed = parse(raw);
    if parsed.is_none() {
        debug!(field = key, value = %raw, "resetting malformed rule field");
    }
    parsed
}

fn tagged<T>(
    obj: &Map<String, Value>,
    key: &str,
    from_tag: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    field(obj, key, |v| v.as_str().and_then(from_tag))
}

fn string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    field(obj, key, |v| v.as_str().map(str::to_owned))
}

fn time(obj: &Map<String, Value>, key: &str, fallback: TimeOfDay) -> TimeOfDay {
    match obj.get(key) {
        Some(raw) => {
            let sanitized = sanitize_time_value(raw, fallback);
            if raw.as_str() != Some(sanitized.to_string().as_str()) {
                debug!(field = key, value = %raw, "resetting malformed time");
            }
            sanitized
        }
        None => fallback,
    }
}

/// Strings and integer ids are accepted; other entries are dropped.
fn term_list(raw: &Value) -> Option<Vec<String>> {
    let items = raw.as_array()?;
    Some(dedup(items.iter().filter_map(|item| match item {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    })))
}

fn day_list(raw: &Value) -> Option<Vec<DayOfWeek>> {
    let items = raw.as_array()?;
    Some(dedup(
        items
            .iter()
            .filter_map(|item| item.as_str().and_then(DayOfWeek::from_tag)),
    ))
}
