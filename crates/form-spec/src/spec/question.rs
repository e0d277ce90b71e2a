use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::spec::logic::ConditionalLogic;

/// Field types offered by the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Date,
    Select,
    Radio,
    Checkbox,
    Rating,
    File,
    Signature,
    Matrix,
    Section,
    ProductName,
    ProductCategory,
    Price,
    Specifications,
    Images,
}

impl QuestionType {
    /// Whether the type renders a list of `{value, label}` options.
    pub fn accepts_options(self) -> bool {
        matches!(
            self,
            QuestionType::Select
                | QuestionType::Radio
                | QuestionType::Checkbox
                | QuestionType::ProductCategory
        )
    }

    /// Whether answers are arrays rather than scalars.
    pub fn is_multi_value(self) -> bool {
        matches!(self, QuestionType::Checkbox | QuestionType::Images)
    }

    /// Section breaks are purely visual and never hold an answer.
    pub fn collects_value(self) -> bool {
        !matches!(self, QuestionType::Section)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::Number => "number",
            QuestionType::Email => "email",
            QuestionType::Phone => "phone",
            QuestionType::Date => "date",
            QuestionType::Select => "select",
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Rating => "rating",
            QuestionType::File => "file",
            QuestionType::Signature => "signature",
            QuestionType::Matrix => "matrix",
            QuestionType::Section => "section",
            QuestionType::ProductName => "product-name",
            QuestionType::ProductCategory => "product-category",
            QuestionType::Price => "price",
            QuestionType::Specifications => "specifications",
            QuestionType::Images => "images",
        }
    }
}

/// Horizontal space taken by a field in the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
    Quarter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    #[default]
    Top,
    Left,
    Hidden,
}

/// One selectable entry of a select/radio/checkbox question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Declarative per-question constraints, checked on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub number: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        *self == ValidationRules::default()
    }
}

/// Toggleable boolean rules exposed by the properties panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleToggle {
    Required,
    Email,
    Number,
}

/// Definition of a single field within a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
    pub validation: ValidationRules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
    #[serde(default)]
    pub width: FieldWidth,
    #[serde(default)]
    pub label_position: LabelPosition,
    #[serde(default)]
    pub show_in_summary: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl Question {
    /// Builds a bare question of the given type with default styling.
    pub fn new(
        id: impl Into<String>,
        kind: QuestionType,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            label: label.into(),
            placeholder: None,
            description: None,
            icon: None,
            options: Vec::new(),
            validation: ValidationRules::default(),
            error_message: None,
            conditional_logic: None,
            width: FieldWidth::Full,
            label_position: LabelPosition::Top,
            show_in_summary: false,
            read_only: false,
        }
    }

    /// Rejects shapes the type cannot carry and rule configs that can never pass.
    pub fn check(&self) -> Result<(), FormError> {
        if self.id.trim().is_empty() {
            return Err(FormError::Validation("question id cannot be empty".into()));
        }
        if !self.options.is_empty() && !self.kind.accepts_options() {
            return Err(FormError::Validation(format!(
                "question '{}' of type '{}' cannot define options",
                self.id,
                self.kind.as_str()
            )));
        }

        if let Some(logic) = &self.conditional_logic
            && logic.source_question_id.as_deref() == Some(self.id.as_str())
        {
            return Err(FormError::Validation(format!(
                "question '{}' cannot depend on its own answer",
                self.id
            )));
        }

        let rules = &self.validation;
        if let (Some(min_len), Some(max_len)) = (rules.min_length, rules.max_length)
            && min_len > max_len
        {
            return Err(FormError::Validation(format!(
                "question '{}' min_length '{}' cannot exceed max_length '{}'",
                self.id, min_len, max_len
            )));
        }
        if let (Some(min), Some(max)) = (rules.min, rules.max)
            && min > max
        {
            return Err(FormError::Validation(format!(
                "question '{}' min '{}' cannot exceed max '{}'",
                self.id, min, max
            )));
        }
        if let Some(pattern) = &rules.pattern
            && let Err(err) = Regex::new(pattern)
        {
            return Err(FormError::Validation(format!(
                "question '{}' has an invalid pattern: {}",
                self.id, err
            )));
        }

        Ok(())
    }

    /// Appends a placeholder option numbered after the existing ones.
    pub fn add_option(&mut self) {
        let next = self.options.len() + 1;
        self.options.push(ChoiceOption {
            value: format!("option_{}", next),
            label: format!("Option {}", next),
        });
    }

    pub fn update_option(
        &mut self,
        index: usize,
        value: Option<String>,
        label: Option<String>,
    ) -> Result<(), FormError> {
        let len = self.options.len();
        let option = self
            .options
            .get_mut(index)
            .ok_or(FormError::IndexOutOfRange { index, len })?;
        if let Some(value) = value {
            option.value = value;
        }
        if let Some(label) = label {
            option.label = label;
        }
        Ok(())
    }

    pub fn remove_option(&mut self, index: usize) -> Result<ChoiceOption, FormError> {
        if index >= self.options.len() {
            return Err(FormError::IndexOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        Ok(self.options.remove(index))
    }

    pub fn set_rule_enabled(&mut self, rule: RuleToggle, enabled: bool) {
        match rule {
            RuleToggle::Required => self.validation.required = enabled,
            RuleToggle::Email => self.validation.email = enabled,
            RuleToggle::Number => self.validation.number = enabled,
        }
    }

    pub fn is_required(&self) -> bool {
        self.validation.required
    }
}

/// Static description of a field type as listed in the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionTemplate {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl QuestionTemplate {
    pub fn new(kind: QuestionType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            icon: None,
            description: None,
        }
    }
}
