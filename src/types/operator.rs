use std::fmt;

use serde::Serialize;

/// Combinator applied across the rules of a [`RuleSet`](super::RuleSet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    /// Every rule must pass.
    #[default]
    And,
    /// At least one rule must pass.
    Or,
}

impl Logic {
    /// Parse the persisted tag. Only the exact strings `"AND"` and `"OR"` are accepted.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AND" => Some(Logic::And),
            "OR" => Some(Logic::Or),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality operator shared by the single-value rule types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsOperator {
    #[default]
    Is,
    IsNot,
}

impl IsOperator {
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "is" => Some(IsOperator::Is),
            "is_not" => Some(IsOperator::IsNot),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IsOperator::Is => "is",
            IsOperator::IsNot => "is_not",
        }
    }

    /// Apply the operator to a raw match result.
    #[must_use]
    pub fn apply(self, matched: bool) -> bool {
        match self {
            IsOperator::Is => matched,
            IsOperator::IsNot => !matched,
        }
    }
}

/// Set-membership operator used by taxonomy rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipOperator {
    /// Any listed term is present.
    #[default]
    In,
    /// No listed term is present.
    NotIn,
}

impl MembershipOperator {
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "in" => Some(MembershipOperator::In),
            "not_in" => Some(MembershipOperator::NotIn),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipOperator::In => "in",
            MembershipOperator::NotIn => "not_in",
        }
    }

    /// `intersects` is whether any listed term was found.
    #[must_use]
    pub fn apply(self, intersects: bool) -> bool {
        match self {
            MembershipOperator::In => intersects,
            MembershipOperator::NotIn => !intersects,
        }
    }
}

/// Comparison operator for query parameter rules.
///
/// Only [`QueryOperator::Equals`] has defined semantics. Any other non-empty
/// tag is kept verbatim in [`QueryOperator::Other`] so stored content written
/// by newer editors survives a round trip; such rules never match.
/// Rules built with `Other("equals")` or `Other("")` hold `Equals` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum QueryOperator {
    #[default]
    Equals,
    Other(String),
}

impl QueryOperator {
    /// Parse a stored tag. Empty tags are rejected.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "" => None,
            "equals" => Some(QueryOperator::Equals),
            other => Some(QueryOperator::Other(other.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            QueryOperator::Equals => "equals",
            QueryOperator::Other(tag) => tag,
        }
    }
}

impl From<QueryOperator> for String {
    fn from(op: QueryOperator) -> Self {
        match op {
            QueryOperator::Equals => "equals".to_owned(),
            QueryOperator::Other(tag) => tag,
        }
    }
}

/// Recurrence of a schedule window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            _ => None,
        }
    }
}

/// Visitor authentication state compared by logged-in status rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginState {
    #[default]
    LoggedIn,
    LoggedOut,
}

impl LoginState {
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "logged_in" => Some(LoginState::LoggedIn),
            "logged_out" => Some(LoginState::LoggedOut),
            _ => None,
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(IsOperator, MembershipOperator, QueryOperator);
