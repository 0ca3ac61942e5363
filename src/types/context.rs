use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, FixedOffset};

/// Read-only snapshot of the request, visitor and content facts that rules
/// are evaluated against.
///
/// Every fact is optional. A rule that needs a fact the host did not supply
/// simply does not match.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    now: Option<DateTime<FixedOffset>>,
    logged_in: Option<bool>,
    roles: Option<BTreeSet<String>>,
    query: HashMap<String, String>,
    post_type: Option<String>,
    terms: HashMap<String, HashSet<String>>,
    template: Option<String>,
}

impl EvaluationContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time. Day of week and time of day are taken in the offset of
    /// the given timestamp, so pass it already converted to the site's zone.
    #[must_use]
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    #[must_use]
    pub fn with_logged_in(mut self, logged_in: bool) -> Self {
        self.logged_in = Some(logged_in);
        self
    }

    /// Replace the visitor's role set.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = Some(post_type.into());
        self
    }

    /// Add terms the current content carries in `taxonomy`.
    #[must_use]
    pub fn with_terms<I, S>(mut self, taxonomy: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms
            .entry(taxonomy.into())
            .or_default()
            .extend(terms.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn now(&self) -> Option<&DateTime<FixedOffset>> {
        self.now.as_ref()
    }

    #[must_use]
    pub fn logged_in(&self) -> Option<bool> {
        self.logged_in
    }

    #[must_use]
    pub fn roles(&self) -> Option<&BTreeSet<String>> {
        self.roles.as_ref()
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn post_type(&self) -> Option<&str> {
        self.post_type.as_deref()
    }

    /// Terms of the current content in `taxonomy`, or `None` if the host
    /// supplied no data for it.
    #[must_use]
    pub fn terms_for(&self, taxonomy: &str) -> Option<&HashSet<String>> {
        self.terms.get(taxonomy)
    }

    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }
}

/// Resolves whether the current visitor belongs to a role or group.
///
/// Hosts with their own segment or membership model implement this and pass
/// it to [`RuleSet::evaluate_with()`](super::RuleSet::evaluate_with).
/// Returning `None` means membership is unknown, and the rule does not match.
pub trait GroupResolver: Send + Sync {
    fn is_member(&self, group: &str, ctx: &EvaluationContext) -> Option<bool>;
}

/// Default resolver: a group is a role name looked up in the context's role set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGroups;

impl GroupResolver for RoleGroups {
    fn is_member(&self, group: &str, ctx: &EvaluationContext) -> Option<bool> {
        ctx.roles().map(|roles| roles.contains(group))
    }
}
