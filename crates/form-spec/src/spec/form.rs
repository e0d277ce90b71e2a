use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::spec::question::Question;
use crate::spec::step::Step;

/// Publication state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Published => "published",
        }
    }
}

/// Top-level multi-step form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormDocument {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: FormStatus,
    /// Derived from `steps`; recomputed by every mutation.
    #[serde(default)]
    pub total_questions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub steps: Vec<Step>,
}

impl FormDocument {
    /// A draft document with a single empty step.
    pub fn new(id: impl Into<String>, title: impl Into<String>, first_step: Step) -> Self {
        let mut document = Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: FormStatus::Draft,
            total_questions: 0,
            created_at: None,
            updated_at: None,
            steps: vec![first_step],
        };
        document.refresh_totals();
        document
    }

    /// Parses a JSON document and checks its structural invariants.
    pub fn from_json_str(json: &str) -> Result<Self, FormError> {
        let document: FormDocument = serde_json::from_str(json)?;
        document.validated()
    }

    /// Checks structural invariants and normalises derived fields.
    pub fn validated(mut self) -> Result<Self, FormError> {
        if self.steps.is_empty() {
            return Err(FormError::InvariantViolation(
                "a form must contain at least one step".into(),
            ));
        }

        let mut step_ids = HashSet::new();
        let mut question_ids = HashSet::new();
        for step in &self.steps {
            if step.id.trim().is_empty() {
                return Err(FormError::Validation("step id cannot be empty".into()));
            }
            if !step_ids.insert(step.id.as_str()) {
                return Err(FormError::Validation(format!(
                    "duplicate step id '{}'",
                    step.id
                )));
            }
            for question in &step.questions {
                question.check()?;
                if !question_ids.insert(question.id.as_str()) {
                    return Err(FormError::Validation(format!(
                        "duplicate question id '{}'",
                        question.id
                    )));
                }
            }
        }

        self.refresh_totals();
        Ok(self)
    }

    pub fn refresh_totals(&mut self) {
        self.total_questions = self.steps.iter().map(|step| step.questions.len()).sum();
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.steps.iter().flat_map(|step| step.questions.iter())
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions().find(|question| question.id == question_id)
    }

    /// `(step index, position within step)` of a question.
    pub fn locate(&self, question_id: &str) -> Option<(usize, usize)> {
        self.steps.iter().enumerate().find_map(|(step_index, step)| {
            step.position_of(question_id)
                .map(|position| (step_index, position))
        })
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.steps
            .iter()
            .any(|step| step.id == id || step.position_of(id).is_some())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.questions().any(|question| question.name == name)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
