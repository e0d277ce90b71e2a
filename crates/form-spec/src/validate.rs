use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;
use crate::spec::form::FormDocument;
use crate::spec::question::Question;
use crate::spec::step::Step;
use crate::visibility::{coerce_number, coerce_string, is_visible};

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Name of a violated validation rule, spelled like its key in
/// [`ValidationRules`](crate::spec::question::ValidationRules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Email,
    Number,
    Min,
    Max,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MinLength => "min_length",
            Rule::MaxLength => "max_length",
            Rule::Pattern => "pattern",
            Rule::Email => "email",
            Rule::Number => "number",
            Rule::Min => "min",
            Rule::Max => "max",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lists the rules of `question` that `value` violates; empty means valid.
///
/// A missing or empty answer can only violate `required`.
pub fn validate(question: &Question, value: Option<&Value>) -> Vec<Rule> {
    let rules = &question.validation;
    let mut violations = Vec::new();

    let Some(value) = value.filter(|value| !is_empty(value)) else {
        if rules.required {
            violations.push(Rule::Required);
        }
        return violations;
    };

    let length = match value {
        Value::Array(items) => items.len(),
        other => coerce_string(other).chars().count(),
    };
    if let Some(min_length) = rules.min_length
        && length < min_length
    {
        violations.push(Rule::MinLength);
    }
    if let Some(max_length) = rules.max_length
        && length > max_length
    {
        violations.push(Rule::MaxLength);
    }

    if let Some(pattern) = &rules.pattern
        && let Ok(regex) = Regex::new(pattern)
        && !scalars(value).all(|text| regex.is_match(&text))
    {
        violations.push(Rule::Pattern);
    }

    if rules.email && !scalars(value).all(|text| EMAIL_SHAPE.is_match(&text)) {
        violations.push(Rule::Email);
    }

    let number = coerce_number(value);
    if rules.number && number.is_none() {
        violations.push(Rule::Number);
    }
    if let Some(min) = rules.min
        && number.is_some_and(|number| number < min)
    {
        violations.push(Rule::Min);
    }
    if let Some(max) = rules.max
        && number.is_some_and(|number| number > max)
    {
        violations.push(Rule::Max);
    }

    violations
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn scalars(value: &Value) -> Box<dyn Iterator<Item = String> + '_> {
    match value {
        Value::Array(items) => Box::new(items.iter().map(coerce_string)),
        other => Box::new(std::iter::once(coerce_string(other))),
    }
}

/// Rules violated by one question's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldViolation {
    pub step_id: String,
    pub question_id: String,
    pub name: String,
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a step-advance or submission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<FieldViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<String>,
}

fn collect_step(step: &Step, answers: &Value, violations: &mut Vec<FieldViolation>) {
    if !is_visible(step.conditional_logic.as_ref(), answers) {
        return;
    }
    for question in &step.questions {
        if !question.kind.collects_value()
            || question.read_only
            || !is_visible(question.conditional_logic.as_ref(), answers)
        {
            continue;
        }
        let rules = validate(question, answers.get(&question.id));
        if !rules.is_empty() {
            violations.push(FieldViolation {
                step_id: step.id.clone(),
                question_id: question.id.clone(),
                name: question.name.clone(),
                rules,
                message: question.error_message.clone(),
            });
        }
    }
}

/// Checks the visible questions of one step, e.g. before advancing past it.
pub fn validate_step(
    document: &FormDocument,
    step_index: usize,
    answers: &Value,
) -> Result<ValidationReport, FormError> {
    let step = document
        .steps
        .get(step_index)
        .ok_or(FormError::IndexOutOfRange {
            index: step_index,
            len: document.steps.len(),
        })?;
    let mut violations = Vec::new();
    collect_step(step, answers, &mut violations);
    Ok(ValidationReport {
        valid: violations.is_empty(),
        violations,
        unknown_fields: Vec::new(),
    })
}

/// Checks every visible question and flags answers for unknown question ids.
pub fn validate_submission(document: &FormDocument, answers: &Value) -> ValidationReport {
    let mut violations = Vec::new();
    for step in &document.steps {
        collect_step(step, answers, &mut violations);
    }

    let known: BTreeSet<&str> = document
        .questions()
        .map(|question| question.id.as_str())
        .collect();
    let unknown_fields: Vec<String> = answers
        .as_object()
        .map(|map| {
            map.keys()
                .filter(|key| !known.contains(key.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    ValidationReport {
        valid: violations.is_empty() && unknown_fields.is_empty(),
        violations,
        unknown_fields,
    }
}
