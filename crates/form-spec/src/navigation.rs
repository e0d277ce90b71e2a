use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::spec::form::FormDocument;
use crate::visibility::is_visible;

/// Where a step sits relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Current => "current",
            StepStatus::Upcoming => "upcoming",
        }
    }
}

/// Active step tracking. `current` always stays within `[0, step_count - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Navigator {
    current: usize,
    step_count: usize,
}

#[derive(Deserialize)]
struct NavigatorState {
    current: usize,
    step_count: usize,
}

impl<'de> Deserialize<'de> for Navigator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = NavigatorState::deserialize(deserializer)?;
        let mut navigator = Navigator::new(state.step_count);
        navigator.set_step(state.current);
        Ok(navigator)
    }
}

impl Navigator {
    pub fn new(step_count: usize) -> Self {
        Self {
            current: 0,
            step_count: step_count.max(1),
        }
    }

    pub fn for_document(document: &FormDocument) -> Self {
        Self::new(document.steps.len())
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Moves to `index`, clamped into range. Returns the resulting index.
    pub fn set_step(&mut self, index: usize) -> usize {
        self.current = index.min(self.last_index());
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.set_step(self.current.saturating_add(1))
    }

    pub fn previous(&mut self) -> usize {
        self.set_step(self.current.saturating_sub(1))
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current == self.last_index()
    }

    /// `round((current + 1) / step_count * 100)`.
    pub fn percent_complete(&self) -> u8 {
        let ratio = (self.current + 1) as f64 / self.step_count as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn step_status(&self, index: usize) -> StepStatus {
        match index.cmp(&self.current) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Greater => StepStatus::Upcoming,
        }
    }

    /// A freshly appended step becomes the active one.
    pub fn after_step_added(&mut self, step_count: usize) {
        self.step_count = step_count.max(1);
        self.current = self.last_index();
    }

    /// Re-clamps to `min(current, step_count - 1)`.
    pub fn after_step_deleted(&mut self, step_count: usize) {
        self.step_count = step_count.max(1);
        self.current = self.current.min(self.last_index());
    }

    /// Follows a step that moved from `from` to `to` so the same step stays active.
    pub fn after_step_moved(&mut self, from: usize, to: usize) {
        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        self.current = self.current.min(self.last_index());
    }

    /// Advances to the next step whose conditional logic is met. Stays put when
    /// no later step is visible.
    pub fn next_visible(&mut self, document: &FormDocument, answers: &Value) -> usize {
        let later = (self.current + 1..document.steps.len())
            .find(|&index| is_visible(document.steps[index].conditional_logic.as_ref(), answers));
        if let Some(index) = later {
            self.set_step(index);
        }
        self.current
    }

    /// Walks back to the closest earlier visible step.
    pub fn previous_visible(&mut self, document: &FormDocument, answers: &Value) -> usize {
        let earlier = (0..self.current.min(document.steps.len()))
            .rev()
            .find(|&index| is_visible(document.steps[index].conditional_logic.as_ref(), answers));
        if let Some(index) = earlier {
            self.set_step(index);
        }
        self.current
    }

    fn last_index(&self) -> usize {
        self.step_count.saturating_sub(1)
    }
}
