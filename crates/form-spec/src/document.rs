//! Pure mutations over [`FormDocument`]: the old document goes in, a new one
//! comes out, and the input is never touched on failure.

use tracing::{debug, info};

use crate::error::FormError;
use crate::ids::{IdGenerator, fresh};
use crate::spec::form::{FormDocument, FormStatus};
use crate::spec::question::{Question, QuestionTemplate};
use crate::spec::step::{Step, StepDraft, StepPatch};

const QUESTION_PREFIX: &str = "q";
const STEP_PREFIX: &str = "step";
const NAME_PREFIX: &str = "field";

fn check_step_index(document: &FormDocument, index: usize) -> Result<(), FormError> {
    if index < document.steps.len() {
        Ok(())
    } else {
        Err(FormError::IndexOutOfRange {
            index,
            len: document.steps.len(),
        })
    }
}

fn finish(mut document: FormDocument) -> FormDocument {
    document.refresh_totals();
    document
}

/// Appends a question built from `template` to the step at `step_index`.
pub fn add_question(
    document: &FormDocument,
    step_index: usize,
    template: &QuestionTemplate,
    ids: &mut dyn IdGenerator,
) -> Result<FormDocument, FormError> {
    check_step_index(document, step_index)?;

    let id = fresh(ids, QUESTION_PREFIX, |candidate| document.contains_id(candidate))?;
    let name = fresh(ids, NAME_PREFIX, |candidate| document.contains_name(candidate))?;
    let mut question = Question::new(id, template.kind, name, template.name.clone());
    question.icon = template.icon.clone();
    question.description = template.description.clone();

    debug!(
        question_id = %question.id,
        kind = template.kind.as_str(),
        step_index,
        "adding question"
    );

    let mut next = document.clone();
    next.steps[step_index].questions.push(question);
    Ok(finish(next))
}

/// Copies a question under a new id and inserts it right after the source.
pub fn duplicate_question(
    document: &FormDocument,
    question_id: &str,
    ids: &mut dyn IdGenerator,
) -> Result<FormDocument, FormError> {
    let (step_index, position) = document
        .locate(question_id)
        .ok_or_else(|| FormError::NotFound(question_id.to_string()))?;
    let source = &document.steps[step_index].questions[position];

    let mut copy = source.clone();
    copy.id = fresh(ids, QUESTION_PREFIX, |candidate| document.contains_id(candidate))?;
    copy.name = format!("{}_copy", source.name);
    copy.label = format!("{} (Copy)", source.label);

    debug!(source = question_id, copy = %copy.id, "duplicating question");

    let mut next = document.clone();
    next.steps[step_index].questions.insert(position + 1, copy);
    Ok(finish(next))
}

/// Removes a question wherever it lives. Unknown ids leave the document as is.
pub fn delete_question(document: &FormDocument, question_id: &str) -> FormDocument {
    let mut next = document.clone();
    for step in &mut next.steps {
        step.questions.retain(|question| question.id != question_id);
    }
    finish(next)
}

/// Replaces the question with the same id. Unknown ids leave the document as is.
pub fn update_question(
    document: &FormDocument,
    updated: &Question,
) -> Result<FormDocument, FormError> {
    updated.check()?;
    let mut next = document.clone();
    for step in &mut next.steps {
        for question in &mut step.questions {
            if question.id == updated.id {
                *question = updated.clone();
            }
        }
    }
    Ok(finish(next))
}

/// Moves a question into `target_step` at `position` (clamped to the end).
pub fn move_question(
    document: &FormDocument,
    question_id: &str,
    target_step: usize,
    position: usize,
) -> Result<FormDocument, FormError> {
    check_step_index(document, target_step)?;
    let (step_index, current) = document
        .locate(question_id)
        .ok_or_else(|| FormError::NotFound(question_id.to_string()))?;

    let mut next = document.clone();
    let question = next.steps[step_index].questions.remove(current);
    let questions = &mut next.steps[target_step].questions;
    questions.insert(position.min(questions.len()), question);
    Ok(finish(next))
}

/// Appends an empty step. Blank titles are rejected.
pub fn add_step(
    document: &FormDocument,
    draft: &StepDraft,
    ids: &mut dyn IdGenerator,
) -> Result<FormDocument, FormError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(FormError::Validation("step title is required".into()));
    }

    let id = fresh(ids, STEP_PREFIX, |candidate| document.contains_id(candidate))?;
    let mut step = Step::new(id, title);
    step.description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .map(str::to_string);

    info!(step_id = %step.id, title = %step.title, "adding step");

    let mut next = document.clone();
    next.steps.push(step);
    Ok(finish(next))
}

/// Removes a step together with its questions. The last step cannot go.
pub fn delete_step(document: &FormDocument, step_index: usize) -> Result<FormDocument, FormError> {
    check_step_index(document, step_index)?;
    if document.steps.len() <= 1 {
        return Err(FormError::InvariantViolation(
            "cannot delete the last remaining step".into(),
        ));
    }

    let mut next = document.clone();
    let removed = next.steps.remove(step_index);
    info!(
        step_id = %removed.id,
        discarded_questions = removed.questions.len(),
        "deleted step"
    );
    Ok(finish(next))
}

/// Merges `patch` into the step at `step_index`.
pub fn update_step(
    document: &FormDocument,
    step_index: usize,
    patch: &StepPatch,
) -> Result<FormDocument, FormError> {
    check_step_index(document, step_index)?;
    if let Some(title) = &patch.title
        && title.trim().is_empty()
    {
        return Err(FormError::Validation("step title cannot be blank".into()));
    }

    let mut next = document.clone();
    let step = &mut next.steps[step_index];
    if let Some(title) = &patch.title {
        step.title = title.clone();
    }
    if let Some(description) = &patch.description {
        step.description = Some(description.clone()).filter(|text| !text.is_empty());
    }
    if patch.clear_conditional_logic {
        step.conditional_logic = None;
    } else if let Some(logic) = &patch.conditional_logic {
        step.conditional_logic = Some(logic.clone());
    }
    Ok(finish(next))
}

/// Moves the step at `from` so that it ends up at index `to`.
pub fn move_step(
    document: &FormDocument,
    from: usize,
    to: usize,
) -> Result<FormDocument, FormError> {
    check_step_index(document, from)?;
    check_step_index(document, to)?;

    let mut next = document.clone();
    let step = next.steps.remove(from);
    next.steps.insert(to, step);
    Ok(finish(next))
}

/// Marks the form as published. Forms without questions stay in draft.
pub fn publish(document: &FormDocument) -> Result<FormDocument, FormError> {
    let next = finish(document.clone());
    if next.total_questions == 0 {
        return Err(FormError::InvariantViolation(
            "add at least one question before publishing".into(),
        ));
    }

    info!(form_id = %next.id, questions = next.total_questions, "publishing form");
    Ok(FormDocument {
        status: FormStatus::Published,
        ..next
    })
}
