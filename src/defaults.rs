use crate::{
    Frequency, IsOperator, LoginState, MembershipOperator, OptionsProvider, QueryOperator, Rule,
    RuleKind, RuleType, TimeOfDay,
};

pub(crate) const FALLBACK_POST_TYPE: &str = "post";
pub(crate) const FALLBACK_TAXONOMY: &str = "category";
pub(crate) const FALLBACK_TEMPLATE: &str = "default";
pub(crate) const FALLBACK_ROLE_GROUP: &str = "subscriber";

/// Create a minimally valid rule of `rule_type` with a fresh id.
///
/// Selectable fields are pre-populated with the first choice `options`
/// offers, so an editor never starts on an empty selection. Without choices
/// the fixed fallbacks are used: post type `post`, taxonomy `category`,
/// template `default`, role group `subscriber`.
#[must_use]
pub fn create_default_rule_for_type(rule_type: RuleType, options: &dyn OptionsProvider) -> Rule {
    Rule::new(default_kind(rule_type, options))
}

pub(crate) fn default_kind(rule_type: RuleType, options: &dyn OptionsProvider) -> RuleKind {
    match rule_type {
        RuleType::PostType => RuleKind::PostType {
            operator: IsOperator::Is,
            value: first_or(options.post_types(), FALLBACK_POST_TYPE),
        },
        RuleType::Taxonomy => {
            // Offered terms stay unselected; an empty `in` list matches nothing.
            let taxonomy = options
                .taxonomies()
                .into_iter()
                .find(|t| !t.slug.is_empty())
                .map_or_else(|| FALLBACK_TAXONOMY.to_owned(), |t| t.slug);
            RuleKind::Taxonomy {
                operator: MembershipOperator::In,
                taxonomy,
                terms: Vec::new(),
            }
        }
        RuleType::Template => RuleKind::Template {
            operator: IsOperator::Is,
            value: first_or(options.templates(), FALLBACK_TEMPLATE),
        },
        RuleType::RecurringSchedule => RuleKind::RecurringSchedule {
            operator: IsOperator::Is,
            frequency: Frequency::Daily,
            days: Vec::new(),
            start_time: TimeOfDay::DEFAULT_START,
            end_time: TimeOfDay::DEFAULT_END,
        },
        RuleType::LoggedInStatus => RuleKind::LoggedInStatus {
            operator: IsOperator::Is,
            value: LoginState::LoggedIn,
        },
        RuleType::UserRoleGroup => RuleKind::UserRoleGroup {
            operator: IsOperator::Is,
            value: first_or(options.role_groups(), FALLBACK_ROLE_GROUP),
        },
        RuleType::QueryParam => RuleKind::QueryParam {
            operator: QueryOperator::Equals,
            name: String::new(),
            value: String::new(),
        },
    }
}

fn first_or(choices: Vec<String>, fallback: &str) -> String {
    choices
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}
