use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparison applied between the source answer and the configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
        }
    }
}

/// Single-condition visibility rule shared by steps and questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ConditionalLogic {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub comparison_value: String,
}

impl ConditionalLogic {
    /// An enabled rule showing the entity when `source` compares true against `value`.
    pub fn when(source: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            enabled: true,
            source_question_id: Some(source.into()),
            operator: Some(operator),
            comparison_value: value.into(),
        }
    }
}
