use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::operator::{Frequency, IsOperator, LoginState, MembershipOperator, QueryOperator};
use super::time::{DayOfWeek, TimeOfDay};

/// The closed set of rule variants, without their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    PostType,
    Taxonomy,
    Template,
    RecurringSchedule,
    LoggedInStatus,
    UserRoleGroup,
    QueryParam,
}

impl RuleType {
    pub const ALL: [RuleType; 7] = [
        RuleType::PostType,
        RuleType::Taxonomy,
        RuleType::Template,
        RuleType::RecurringSchedule,
        RuleType::LoggedInStatus,
        RuleType::UserRoleGroup,
        RuleType::QueryParam,
    ];

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::PostType => "post_type",
            RuleType::Taxonomy => "taxonomy",
            RuleType::Template => "template",
            RuleType::RecurringSchedule => "recurring_schedule",
            RuleType::LoggedInStatus => "logged_in_status",
            RuleType::UserRoleGroup => "user_role_group",
            RuleType::QueryParam => "query_param",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The predicate carried by a [`Rule`], one variant per rule type.
///
/// Serializes with an inline `"type"` tag, so a rule flattens to
/// `{"id": .., "type": "taxonomy", "operator": "in", "taxonomy": .., "terms": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    PostType {
        operator: IsOperator,
        value: String,
    },
    Taxonomy {
        operator: MembershipOperator,
        taxonomy: String,
        terms: Vec<String>,
    },
    Template {
        operator: IsOperator,
        value: String,
    },
    RecurringSchedule {
        operator: IsOperator,
        frequency: Frequency,
        days: Vec<DayOfWeek>,
        #[serde(rename = "startTime")]
        start_time: TimeOfDay,
        #[serde(rename = "endTime")]
        end_time: TimeOfDay,
    },
    LoggedInStatus {
        operator: IsOperator,
        value: LoginState,
    },
    UserRoleGroup {
        operator: IsOperator,
        value: String,
    },
    QueryParam {
        operator: QueryOperator,
        name: String,
        value: String,
    },
}

impl RuleKind {
    #[must_use]
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::PostType { .. } => RuleType::PostType,
            RuleKind::Taxonomy { .. } => RuleType::Taxonomy,
            RuleKind::Template { .. } => RuleType::Template,
            RuleKind::RecurringSchedule { .. } => RuleType::RecurringSchedule,
            RuleKind::LoggedInStatus { .. } => RuleType::LoggedInStatus,
            RuleKind::UserRoleGroup { .. } => RuleType::UserRoleGroup,
            RuleKind::QueryParam { .. } => RuleType::QueryParam,
        }
    }

    /// Drop duplicate and empty entries from set-valued fields, and fold
    /// `Other` query operators that would read back as `equals`.
    fn canonicalize(mut self) -> Self {
        match &mut self {
            RuleKind::QueryParam { operator, .. }
                if matches!(
                    &*operator,
                    QueryOperator::Other(tag) if tag.is_empty() || tag == "equals"
                ) =>
            {
                *operator = QueryOperator::Equals;
            }
            RuleKind::Taxonomy { terms, .. } => {
                *terms = dedup(std::mem::take(terms).into_iter().filter(|t| !t.is_empty()));
            }
            RuleKind::RecurringSchedule { days, .. } => {
                *days = dedup(std::mem::take(days));
            }
            _ => {}
        }
        self
    }
}

/// Keep the first occurrence of each item, preserving order.
pub(crate) fn dedup<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub(crate) fn generate_rule_id() -> String {
    Uuid::new_v4().to_string()
}

/// One typed visibility predicate with a stable identifier.
///
/// The `id` only reconciles list entries in an editor; it never affects
/// evaluation. Set-valued fields are kept free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    id: String,
    #[serde(flatten)]
    kind: RuleKind,
}

impl Rule {
    /// Create a rule with a freshly generated id.
    #[must_use]
    pub fn new(kind: RuleKind) -> Self {
        Self::with_id(generate_rule_id(), kind)
    }

    /// Create a rule with the given id. An empty id is replaced with a generated one.
    #[must_use]
    pub fn with_id(id: impl Into<String>, kind: RuleKind) -> Self {
        let id = id.into();
        Self {
            id: if id.is_empty() { generate_rule_id() } else { id },
            kind: kind.canonicalize(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    #[must_use]
    pub fn rule_type(&self) -> RuleType {
        self.kind.rule_type()
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = generate_rule_id();
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::normalize::normalize_rule(&raw)
            .ok_or_else(|| D::Error::custom("missing or unsupported rule type"))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.rule_type(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rule_type_tags_round_trip() {
        for t in RuleType::ALL {
            assert_eq!(RuleType::from_tag(t.as_str()), Some(t));
        }
        assert_eq!(RuleType::from_tag("unknown"), None);
        assert_eq!(RuleType::from_tag("PostType"), None);
    }

    #[test]
    fn new_generates_unique_ids() {
        let kind = RuleKind::PostType {
            operator: IsOperator::Is,
            value: "post".into(),
        };
        let a = Rule::new(kind.clone());
        let b = Rule::new(kind);
        assert!(!a.id().is_empty());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn with_empty_id_generates_one() {
        let rule = Rule::with_id(
            "",
            RuleKind::Template {
                operator: IsOperator::Is,
                value: "full-width".into(),
            },
        );
        assert!(!rule.id().is_empty());
    }

    #[test]
    fn constructor_dedups_sets() {
        let rule = Rule::with_id(
            "r1",
            RuleKind::Taxonomy {
                operator: MembershipOperator::In,
                taxonomy: "category".into(),
                terms: vec!["news".into(), "".into(), "sports".into(), "news".into()],
            },
        );
        assert_eq!(
            rule.kind(),
            &RuleKind::Taxonomy {
                operator: MembershipOperator::In,
                taxonomy: "category".into(),
                terms: vec!["news".into(), "sports".into()],
            }
        );
    }

    #[test]
    fn serializes_flat_with_type_tag() {
        let rule = Rule::with_id(
            "abc",
            RuleKind::RecurringSchedule {
                operator: IsOperator::Is,
                frequency: Frequency::Weekly,
                days: vec![DayOfWeek::Monday, DayOfWeek::Monday, DayOfWeek::Friday],
                start_time: TimeOfDay::DEFAULT_START,
                end_time: TimeOfDay::DEFAULT_END,
            },
        );
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "id": "abc",
                "type": "recurring_schedule",
                "operator": "is",
                "frequency": "weekly",
                "days": ["monday", "friday"],
                "startTime": "08:00",
                "endTime": "17:00",
            })
        );
    }

    #[test]
    fn deserialize_rejects_unknown_type() {
        let result: Result<Rule, _> = serde_json::from_value(json!({"type": "moon_phase"}));
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_normalizes() {
        let rule: Rule =
            serde_json::from_value(json!({"id": "q", "type": "query_param", "name": "promo"}))
                .unwrap();
        assert_eq!(rule.id(), "q");
        assert_eq!(
            rule.kind(),
            &RuleKind::QueryParam {
                operator: QueryOperator::Equals,
                name: "promo".into(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn other_query_operator_reading_as_equals_is_folded() {
        for tag in ["equals", ""] {
            let rule = Rule::with_id(
                "q",
                RuleKind::QueryParam {
                    operator: QueryOperator::Other(tag.into()),
                    name: "promo".into(),
                    value: "special".into(),
                },
            );
            assert!(matches!(
                rule.kind(),
                RuleKind::QueryParam {
                    operator: QueryOperator::Equals,
                    ..
                }
            ));
        }

        let rule = Rule::with_id(
            "q",
            RuleKind::QueryParam {
                operator: QueryOperator::Other("contains".into()),
                name: "promo".into(),
                value: "special".into(),
            },
        );
        assert!(matches!(
            rule.kind(),
            RuleKind::QueryParam {
                operator: QueryOperator::Other(tag),
                ..
            } if tag == "contains"
        ));
    }

    #[test]
    fn display() {
        let rule = Rule::with_id(
            "r9",
            RuleKind::LoggedInStatus {
                operator: IsOperator::Is,
                value: LoginState::LoggedOut,
            },
        );
        assert_eq!(rule.to_string(), "logged_in_status(r9)");
    }
}
