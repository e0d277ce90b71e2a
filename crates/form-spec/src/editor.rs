use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document;
use crate::error::FormError;
use crate::ids::{IdGenerator, SequentialIds};
use crate::navigation::Navigator;
use crate::spec::form::FormDocument;
use crate::spec::question::{Question, QuestionTemplate};
use crate::spec::step::{StepDraft, StepPatch};

const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One UI event against the form being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    /// Adds to `step_index`, or to the active step when absent.
    AddQuestion {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step_index: Option<usize>,
        template: QuestionTemplate,
    },
    DuplicateQuestion {
        question_id: String,
    },
    DeleteQuestion {
        question_id: String,
    },
    UpdateQuestion {
        question: Question,
    },
    MoveQuestion {
        question_id: String,
        step_index: usize,
        position: usize,
    },
    AddStep {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    DeleteStep {
        step_index: usize,
    },
    UpdateStep {
        step_index: usize,
        patch: StepPatch,
    },
    MoveStep {
        from: usize,
        to: usize,
    },
    SetStep {
        step_index: usize,
    },
    Select {
        #[serde(default)]
        question_id: Option<String>,
    },
    Publish,
}

impl EditAction {
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::AddQuestion { .. } => "add_question",
            EditAction::DuplicateQuestion { .. } => "duplicate_question",
            EditAction::DeleteQuestion { .. } => "delete_question",
            EditAction::UpdateQuestion { .. } => "update_question",
            EditAction::MoveQuestion { .. } => "move_question",
            EditAction::AddStep { .. } => "add_step",
            EditAction::DeleteStep { .. } => "delete_step",
            EditAction::UpdateStep { .. } => "update_step",
            EditAction::MoveStep { .. } => "move_step",
            EditAction::SetStep { .. } => "set_step",
            EditAction::Select { .. } => "select",
            EditAction::Publish => "publish",
        }
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    document: FormDocument,
    current_step: usize,
}

/// Owns the authoritative document of an editing session and commits each
/// action only when the underlying operation succeeds.
#[derive(Debug, Clone)]
pub struct FormEditor<G = SequentialIds> {
    document: FormDocument,
    navigation: Navigator,
    ids: G,
    selected: Option<String>,
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    history_limit: usize,
}

impl FormEditor<SequentialIds> {
    /// Opens `document` with a counter seeded past its existing ids.
    pub fn open(document: FormDocument) -> Self {
        let ids = SequentialIds::seeded_from(&document);
        Self::with_ids(document, ids)
    }
}

impl<G: IdGenerator> FormEditor<G> {
    pub fn with_ids(document: FormDocument, ids: G) -> Self {
        let navigation = Navigator::for_document(&document);
        Self {
            document,
            navigation,
            ids,
            selected: None,
            undo: Vec::new(),
            redo: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn into_document(self) -> FormDocument {
        self.document
    }

    pub fn navigation(&self) -> &Navigator {
        &self.navigation
    }

    pub fn current_step(&self) -> usize {
        self.navigation.current()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Applies `action`. On error the session is left exactly as it was.
    pub fn apply(&mut self, action: EditAction) -> Result<(), FormError> {
        let label = action.label();
        match self.reduce(action) {
            Ok(()) => {
                debug!(
                    action = label,
                    total_questions = self.document.total_questions,
                    current_step = self.navigation.current(),
                    "applied edit"
                );
                Ok(())
            }
            Err(err) => {
                warn!(action = label, error = %err, "rejected edit");
                Err(err)
            }
        }
    }

    fn reduce(&mut self, action: EditAction) -> Result<(), FormError> {
        match action {
            EditAction::AddQuestion {
                step_index,
                template,
            } => {
                let step_index = step_index.unwrap_or(self.navigation.current());
                let next =
                    document::add_question(&self.document, step_index, &template, &mut self.ids)?;
                self.commit(next);
            }
            EditAction::DuplicateQuestion { question_id } => {
                let next =
                    document::duplicate_question(&self.document, &question_id, &mut self.ids)?;
                self.commit(next);
            }
            EditAction::DeleteQuestion { question_id } => {
                let next = document::delete_question(&self.document, &question_id);
                if self.selected.as_deref() == Some(question_id.as_str()) {
                    self.selected = None;
                }
                if next != self.document {
                    self.commit(next);
                }
            }
            EditAction::UpdateQuestion { question } => {
                let next = document::update_question(&self.document, &question)?;
                if next != self.document {
                    self.commit(next);
                }
            }
            EditAction::MoveQuestion {
                question_id,
                step_index,
                position,
            } => {
                let next =
                    document::move_question(&self.document, &question_id, step_index, position)?;
                self.commit(next);
            }
            EditAction::AddStep { title, description } => {
                let draft = StepDraft { title, description };
                let next = document::add_step(&self.document, &draft, &mut self.ids)?;
                self.commit(next);
                self.navigation.after_step_added(self.document.steps.len());
            }
            EditAction::DeleteStep { step_index } => {
                let next = document::delete_step(&self.document, step_index)?;
                let removed: Vec<&str> = self.document.steps[step_index]
                    .questions
                    .iter()
                    .map(|question| question.id.as_str())
                    .collect();
                if self
                    .selected
                    .as_deref()
                    .is_some_and(|selected| removed.contains(&selected))
                {
                    self.selected = None;
                }
                self.commit(next);
                self.navigation.after_step_deleted(self.document.steps.len());
            }
            EditAction::UpdateStep { step_index, patch } => {
                let next = document::update_step(&self.document, step_index, &patch)?;
                self.commit(next);
            }
            EditAction::MoveStep { from, to } => {
                let next = document::move_step(&self.document, from, to)?;
                self.commit(next);
                self.navigation.after_step_moved(from, to);
            }
            EditAction::SetStep { step_index } => {
                self.navigation.set_step(step_index);
            }
            EditAction::Select { question_id } => {
                if let Some(id) = &question_id
                    && self.document.question(id).is_none()
                {
                    return Err(FormError::NotFound(id.clone()));
                }
                self.selected = question_id;
            }
            EditAction::Publish => {
                let next = document::publish(&self.document)?;
                self.commit(next);
            }
        }
        Ok(())
    }

    fn commit(&mut self, next: FormDocument) {
        let previous = std::mem::replace(&mut self.document, next);
        self.undo.push(Snapshot {
            document: previous,
            current_step: self.navigation.current(),
        });
        if self.undo.len() > self.history_limit {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Restores the state before the last committed edit. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        let current = self.swap_in(snapshot);
        self.redo.push(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        let current = self.swap_in(snapshot);
        self.undo.push(current);
        true
    }

    fn swap_in(&mut self, snapshot: Snapshot) -> Snapshot {
        let current = Snapshot {
            document: std::mem::replace(&mut self.document, snapshot.document),
            current_step: self.navigation.current(),
        };
        self.navigation = Navigator::for_document(&self.document);
        self.navigation.set_step(snapshot.current_step);
        if let Some(selected) = &self.selected
            && self.document.question(selected).is_none()
        {
            self.selected = None;
        }
        current
    }
}
