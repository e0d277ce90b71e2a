use crate::error::FormError;
use crate::spec::form::FormDocument;

/// Source of fresh identifiers for steps, questions and field names.
pub trait IdGenerator {
    /// Returns the next value for `prefix`, e.g. `q_12`. Must never repeat, so
    /// a generator that runs out fails instead.
    fn next_id(&mut self, prefix: &str) -> Result<String, FormError>;
}

/// Monotonic counter shared by every prefix. `None` once `u64::MAX` is spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    next: Option<u64>,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self {
            next: Some(next.max(1)),
        }
    }

    /// Starts past every numeric suffix already used by ids or names in `document`.
    pub fn seeded_from(document: &FormDocument) -> Self {
        let step_ids = document.steps.iter().map(|step| step.id.as_str());
        let question_keys = document
            .questions()
            .flat_map(|question| [question.id.as_str(), question.name.as_str()]);
        let highest = step_ids
            .chain(question_keys)
            .filter_map(numeric_suffix)
            .max()
            .unwrap_or(0);
        Self {
            next: highest.checked_add(1),
        }
    }

    pub fn peek(&self) -> Option<u64> {
        self.next
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> Result<String, FormError> {
        let value = self.next.ok_or_else(|| {
            FormError::InvariantViolation(format!("no '{}' ids left to allocate", prefix))
        })?;
        self.next = value.checked_add(1);
        Ok(format!("{}_{}", prefix, value))
    }
}

fn numeric_suffix(value: &str) -> Option<u64> {
    let (_, digits) = value.rsplit_once('_')?;
    digits.parse().ok()
}

/// Draws from `ids` until a candidate is not `taken`.
pub(crate) fn fresh(
    ids: &mut dyn IdGenerator,
    prefix: &str,
    taken: impl Fn(&str) -> bool,
) -> Result<String, FormError> {
    loop {
        let candidate = ids.next_id(prefix)?;
        if !taken(&candidate) {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::question::{Question, QuestionType};
    use crate::spec::step::Step;

    #[test]
    fn sequential_ids_never_repeat() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id("q").unwrap(), "q_1");
        assert_eq!(ids.next_id("step").unwrap(), "step_2");
        assert_eq!(ids.next_id("q").unwrap(), "q_3");
    }

    #[test]
    fn seeding_skips_existing_suffixes() {
        let mut step = Step::new("step_4", "Basics");
        step.questions.push(Question::new(
            "q_9",
            QuestionType::Text,
            "field_17",
            "Name",
        ));
        let document = FormDocument::new("form_001", "Products", step);
        let ids = SequentialIds::seeded_from(&document);
        assert_eq!(ids.peek(), Some(18));
    }

    #[test]
    fn fresh_skips_taken_candidates() {
        let mut ids = SequentialIds::default();
        let id = fresh(&mut ids, "q", |candidate| candidate == "q_1" || candidate == "q_2");
        assert_eq!(id.unwrap(), "q_3");
    }

    #[test]
    fn counter_fails_once_exhausted() {
        let mut ids = SequentialIds::starting_at(u64::MAX);
        assert_eq!(ids.next_id("q").unwrap(), format!("q_{}", u64::MAX));
        assert_eq!(ids.peek(), None);
        assert!(matches!(
            ids.next_id("q"),
            Err(FormError::InvariantViolation(_))
        ));

        let mut ids = SequentialIds::starting_at(u64::MAX);
        let taken = format!("q_{}", u64::MAX);
        assert!(fresh(&mut ids, "q", |candidate| candidate == taken).is_err());
    }
}
