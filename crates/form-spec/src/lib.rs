#![allow(missing_docs)]

pub mod catalog;
pub mod document;
pub mod editor;
pub mod error;
pub mod ids;
pub mod navigation;
pub mod render;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use catalog::TemplateCategory;
pub use document::{
    add_question, add_step, delete_question, delete_step, duplicate_question, move_question,
    move_step, publish, update_question, update_step,
};
pub use editor::{EditAction, FormEditor};
pub use error::FormError;
pub use ids::{IdGenerator, SequentialIds};
pub use navigation::{Navigator, StepStatus};
pub use render::{
    OutlinePayload, OutlineQuestion, OutlineStep, build_outline, render_json, render_markdown,
    render_text,
};
pub use spec::{
    ChoiceOption, ConditionalLogic, FieldWidth, FormDocument, FormStatus, LabelPosition, Operator,
    Question, QuestionTemplate, QuestionType, RuleToggle, Step, StepDraft, StepPatch,
    ValidationRules,
};
pub use validate::{
    FieldViolation, Rule, ValidationReport, validate, validate_step, validate_submission,
};
pub use visibility::{VisibilityMap, is_visible, resolve_visibility};
