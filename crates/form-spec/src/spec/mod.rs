pub mod form;
pub mod logic;
pub mod question;
pub mod step;

pub use form::{FormDocument, FormStatus};
pub use logic::{ConditionalLogic, Operator};
pub use question::{
    ChoiceOption, FieldWidth, LabelPosition, Question, QuestionTemplate, QuestionType, RuleToggle,
    ValidationRules,
};
pub use step::{Step, StepDraft, StepPatch};
