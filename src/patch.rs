use serde_json::Value;
use tracing::debug;

use crate::defaults::{create_default_rule_for_type, default_kind};
use crate::normalize::normalize_rule;
use crate::{Logic, OptionsProvider, Rule, RuleSet, RuleType};

/// One edit to a [`RuleSet`], applied with [`RuleSet::apply()`].
///
/// Patches addressing an index past the end leave the rule set unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetPatch {
    /// Switch the combinator.
    SetLogic(Logic),
    /// Append a default rule of the given type.
    AddRule(RuleType),
    /// Remove the rule at `index`; the others keep their order and ids.
    RemoveRule(usize),
    /// Move the rule at `from` so it ends up at `to`.
    MoveRule { from: usize, to: usize },
    /// Replace the rule at `index` with a fresh default of `rule_type`.
    /// All type-specific fields are discarded; the id is kept.
    ChangeRuleType { index: usize, rule_type: RuleType },
    /// Merge the keys of a JSON object over the rule at `index` and
    /// re-normalize it. `type` and `id` keys are ignored.
    UpdateRule { index: usize, fields: Value },
}

pub(crate) fn apply(rule_set: &RuleSet, patch: RuleSetPatch, options: &dyn OptionsProvider) -> RuleSet {
    let logic = rule_set.logic();
    let mut rules = rule_set.rules().to_vec();

    match patch {
        RuleSetPatch::SetLogic(new_logic) => return RuleSet::from_parts(new_logic, rules),
        RuleSetPatch::AddRule(rule_type) => {
            rules.push(create_default_rule_for_type(rule_type, options));
        }
        RuleSetPatch::RemoveRule(index) => {
            if index < rules.len() {
                rules.remove(index);
            }
        }
        RuleSetPatch::MoveRule { from, to } => {
            if from < rules.len() && to < rules.len() {
                let rule = rules.remove(from);
                rules.insert(to, rule);
            }
        }
        RuleSetPatch::ChangeRuleType { index, rule_type } => {
            if let Some(rule) = rules.get_mut(index) {
                *rule = Rule::with_id(rule.id(), default_kind(rule_type, options));
            }
        }
        RuleSetPatch::UpdateRule { index, fields } => {
            if let Some(rule) = rules.get_mut(index) {
                if let Some(updated) = merge_fields(rule, &fields) {
                    *rule = updated;
                }
            }
        }
    }

    RuleSet::from_parts(logic, rules)
}

fn merge_fields(rule: &Rule, fields: &Value) -> Option<Rule> {
    let Some(patch) = fields.as_object() else {
        debug!(rule_id = rule.id(), "ignoring rule update that is not an object");
        return None;
    };
    let Ok(Value::Object(mut current)) = serde_json::to_value(rule) else {
        return None;
    };
    for (key, value) in patch {
        if key != "type" && key != "id" {
            current.insert(key.clone(), value.clone());
        }
    }
    normalize_rule(&Value::Object(current))
}
