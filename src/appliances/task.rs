//! Named, invokable operations on an appliance.

/// The operation a task performs when run, bound at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Start the appliance duty cycle.
    TurnOn,
    /// Stop the appliance.
    TurnOff,
}

/// A named operation registered on an appliance, with eligibility rules.
///
/// Immutable after construction. Names are unique within the owning
/// appliance's task registry.
#[derive(Debug, Clone)]
pub struct ApplianceTask {
    name: String,
    action: TaskAction,
    adult_only: bool,
    /// When set, the appliance must be in this on/off state for the task to
    /// be a candidate.
    required_state: Option<bool>,
}

impl ApplianceTask {
    /// Task runnable regardless of the appliance's current state.
    pub fn new(name: impl Into<String>, action: TaskAction, adult_only: bool) -> Self {
        Self {
            name: name.into(),
            action,
            adult_only,
            required_state: None,
        }
    }

    /// Task requiring the appliance to be on (`true`) or off (`false`).
    pub fn with_required_state(
        name: impl Into<String>,
        action: TaskAction,
        adult_only: bool,
        required_state: bool,
    ) -> Self {
        Self {
            name: name.into(),
            action,
            adult_only,
            required_state: Some(required_state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> TaskAction {
        self.action
    }

    pub fn adult_only(&self) -> bool {
        self.adult_only
    }

    pub fn required_state(&self) -> Option<bool> {
        self.required_state
    }

    /// Whether an appliance in the given state satisfies this task's
    /// required-state rule.
    pub fn matches_state(&self, is_on: bool) -> bool {
        self.required_state.is_none_or(|required| required == is_on)
    }
}
