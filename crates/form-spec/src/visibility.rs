use std::collections::BTreeMap;

use serde_json::Value;

use crate::spec::form::FormDocument;
use crate::spec::logic::{ConditionalLogic, Operator};

/// Step and question ids mapped to whether they are currently shown.
pub type VisibilityMap = BTreeMap<String, bool>;

/// Decides whether an entity guarded by `logic` is shown for `answers`.
///
/// Entities without logic, or with disabled logic, are always visible. An
/// enabled rule with no source, no operator, or no answer for the source is
/// unmet.
pub fn is_visible(logic: Option<&ConditionalLogic>, answers: &Value) -> bool {
    let Some(logic) = logic.filter(|logic| logic.enabled) else {
        return true;
    };
    let Some(source) = logic.source_question_id.as_deref() else {
        return false;
    };
    let Some(operator) = logic.operator else {
        return false;
    };
    match answers.get(source) {
        None | Some(Value::Null) => false,
        Some(answer) => compare(operator, answer, &logic.comparison_value),
    }
}

fn compare(operator: Operator, answer: &Value, expected: &str) -> bool {
    match operator {
        Operator::Equals => coerce_string(answer) == expected,
        Operator::NotEquals => coerce_string(answer) != expected,
        Operator::Contains => coerce_string(answer).contains(expected),
        Operator::GreaterThan => numeric_pair(answer, expected).is_some_and(|(a, b)| a > b),
        Operator::LessThan => numeric_pair(answer, expected).is_some_and(|(a, b)| a < b),
    }
}

fn numeric_pair(answer: &Value, expected: &str) -> Option<(f64, f64)> {
    Some((coerce_number(answer)?, parse_number(expected)?))
}

/// String form of an answer used by the text operators.
pub(crate) fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.is_finite() && float.fract() == 0.0 => {
                format!("{}", float)
            }
            _ => number.to_string(),
        },
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(coerce_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Numeric form of an answer; `None` when it does not read as a finite number.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => parse_number(text),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Resolves every step and question of `document`. Questions inside a hidden
/// step are hidden as well.
pub fn resolve_visibility(document: &FormDocument, answers: &Value) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    for step in &document.steps {
        let step_visible = is_visible(step.conditional_logic.as_ref(), answers);
        map.insert(step.id.clone(), step_visible);
        for question in &step.questions {
            let visible =
                step_visible && is_visible(question.conditional_logic.as_ref(), answers);
            map.insert(question.id.clone(), visible);
        }
    }
    map
}
