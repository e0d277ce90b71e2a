use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    error::FormError,
    navigation::{Navigator, StepStatus},
    spec::{form::FormDocument, question::QuestionType},
    validate::validate,
    visibility::{VisibilityMap, resolve_visibility},
};

const MARKDOWN_TEMPLATE: &str = "# {{title}}
{{#if description}}

{{description}}
{{/if}}

Status: {{status}} · {{total_questions}} questions · step {{current_step_number}} of {{step_count}} ({{percent_complete}}%)
{{#each steps}}

## {{number}}. {{title}}{{#unless visible}} _(hidden)_{{/unless}}
{{#if description}}

{{description}}
{{/if}}

{{#each questions}}
- **{{label}}** `{{name}}` ({{kind}}){{#if required}} *required*{{/if}}{{#unless visible}} _(hidden)_{{/unless}}{{#if answer}} = {{answer}}{{/if}}
{{else}}
_No questions in this step._
{{/each}}
{{/each}}
";

/// Describes a single question for previews.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineQuestion {
    pub id: String,
    pub name: String,
    pub label: String,
    pub kind: QuestionType,
    pub required: bool,
    pub visible: bool,
    pub answer: Option<Value>,
    pub violations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineStep {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: StepStatus,
    pub visible: bool,
    pub questions: Vec<OutlineQuestion>,
}

/// Collected payload used by the text, JSON and Markdown renderers.
#[derive(Debug, Clone, Serialize)]
pub struct OutlinePayload {
    pub form_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub total_questions: usize,
    pub current_step: usize,
    pub step_count: usize,
    pub percent_complete: u8,
    pub steps: Vec<OutlineStep>,
}

/// Build the preview payload from the document, active step and answers.
pub fn build_outline(
    document: &FormDocument,
    navigator: &Navigator,
    answers: &Value,
) -> OutlinePayload {
    let visibility = resolve_visibility(document, answers);

    let steps = document
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| OutlineStep {
            id: step.id.clone(),
            title: step.title.clone(),
            description: step.description.clone(),
            status: navigator.step_status(index),
            visible: is_shown(&visibility, &step.id),
            questions: step
                .questions
                .iter()
                .map(|question| {
                    let answer = answers.get(&question.id).cloned();
                    let violations = if question.kind.collects_value() {
                        validate(question, answer.as_ref())
                            .iter()
                            .map(|rule| rule.as_str().to_string())
                            .collect()
                    } else {
                        Vec::new()
                    };
                    OutlineQuestion {
                        id: question.id.clone(),
                        name: question.name.clone(),
                        label: question.label.clone(),
                        kind: question.kind,
                        required: question.is_required(),
                        visible: is_shown(&visibility, &question.id),
                        answer,
                        violations,
                    }
                })
                .collect(),
        })
        .collect();

    OutlinePayload {
        form_id: document.id.clone(),
        title: document.title.clone(),
        description: document.description.clone(),
        status: document.status.as_str().to_string(),
        total_questions: document.total_questions,
        current_step: navigator.current(),
        step_count: document.steps.len(),
        percent_complete: navigator.percent_complete(),
        steps,
    }
}

fn is_shown(visibility: &VisibilityMap, id: &str) -> bool {
    visibility.get(id).copied().unwrap_or(true)
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json(payload: &OutlinePayload) -> Value {
    let steps = payload
        .steps
        .iter()
        .map(|step| {
            let questions = step
                .questions
                .iter()
                .map(|question| {
                    json!({
                        "id": question.id,
                        "name": question.name,
                        "label": question.label,
                        "type": question.kind.as_str(),
                        "required": question.required,
                        "visible": question.visible,
                        "answer": question.answer,
                        "violations": question.violations,
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "id": step.id,
                "title": step.title,
                "description": step.description,
                "status": step.status.as_str(),
                "visible": step.visible,
                "questions": questions,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "form_id": payload.form_id,
        "title": payload.title,
        "description": payload.description,
        "status": payload.status,
        "total_questions": payload.total_questions,
        "progress": {
            "current_step": payload.current_step,
            "step_count": payload.step_count,
            "percent": payload.percent_complete,
        },
        "steps": steps,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &OutlinePayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.title, payload.form_id));
    lines.push(format!(
        "Status: {} ({} questions)",
        payload.status, payload.total_questions
    ));
    lines.push(format!(
        "Step {}/{} ({}% complete)",
        payload.current_step + 1,
        payload.step_count,
        payload.percent_complete
    ));
    if let Some(description) = &payload.description {
        lines.push(format!("Description: {}", description));
    }

    for (index, step) in payload.steps.iter().enumerate() {
        let marker = match step.status {
            StepStatus::Completed => "[x]",
            StepStatus::Current => "[>]",
            StepStatus::Upcoming => "[ ]",
        };
        let mut header = format!("{} {}. {}", marker, index + 1, step.title);
        if !step.visible {
            header.push_str(" (hidden)");
        }
        lines.push(header);

        for question in &step.questions {
            let mut entry = format!(
                "    - {} ({}, {})",
                question.label,
                question.name,
                question.kind.as_str()
            );
            if question.required {
                entry.push_str(" [required]");
            }
            if !question.visible {
                entry.push_str(" (hidden)");
            }
            if let Some(answer) = &question.answer {
                entry.push_str(&format!(" = {}", value_to_display(answer)));
            }
            if !question.violations.is_empty() {
                entry.push_str(&format!(" !{}", question.violations.join(",")));
            }
            lines.push(entry);
        }
    }

    lines.join("\n")
}

/// Render the payload as a Markdown report.
pub fn render_markdown(payload: &OutlinePayload) -> Result<String, FormError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let steps = payload
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let questions = step
                .questions
                .iter()
                .map(|question| {
                    json!({
                        "label": question.label,
                        "name": question.name,
                        "kind": question.kind.as_str(),
                        "required": question.required,
                        "visible": question.visible,
                        "answer": question.answer.as_ref().map(value_to_display),
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "number": index + 1,
                "title": step.title,
                "description": step.description,
                "visible": step.visible,
                "questions": questions,
            })
        })
        .collect::<Vec<_>>();

    let data = json!({
        "title": payload.title,
        "description": payload.description,
        "status": payload.status,
        "total_questions": payload.total_questions,
        "current_step_number": payload.current_step + 1,
        "step_count": payload.step_count,
        "percent_complete": payload.percent_complete,
        "steps": steps,
    });

    handlebars
        .render_template(MARKDOWN_TEMPLATE, &data)
        .map_err(|err| FormError::Template(err.to_string()))
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
