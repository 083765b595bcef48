//! Task state classification.

use crate::types::TaskState;

/// How an observed [`TaskState`] is treated by the invocation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateClass {
    /// The agent is still working; keep polling.
    NonTerminal,
    /// Terminal from the caller's point of view; hand the task back as-is.
    Terminal,
    /// Needs a continuation the caller cannot provide (input or auth).
    Unsupported,
}

/// What the caller should do with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Return the result.
    Final,
    /// Query the task again.
    ContinuePolling,
}

/// Classify a task state.
///
/// `submitted` and `working` keep polling. `input-required` and
/// `auth-required` are rejected. Everything else, `unknown` included, ends
/// the call: `failed`, `rejected` and `canceled` tasks are results, not
/// errors.
pub fn classify_state(state: TaskState) -> StateClass {
    match state {
        TaskState::Submitted | TaskState::Working => StateClass::NonTerminal,
        TaskState::InputRequired | TaskState::AuthRequired => StateClass::Unsupported,
        TaskState::Completed
        | TaskState::Canceled
        | TaskState::Failed
        | TaskState::Rejected
        | TaskState::Unknown => StateClass::Terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_exactly_one_class() {
        for state in TaskState::ALL {
            let class = classify_state(state);
            let expected = match state {
                TaskState::Submitted | TaskState::Working => StateClass::NonTerminal,
                TaskState::InputRequired | TaskState::AuthRequired => StateClass::Unsupported,
                _ => StateClass::Terminal,
            };
            assert_eq!(class, expected, "state {state}");
        }
    }

    #[test]
    fn failure_states_are_terminal() {
        assert_eq!(classify_state(TaskState::Failed), StateClass::Terminal);
        assert_eq!(classify_state(TaskState::Rejected), StateClass::Terminal);
        assert_eq!(classify_state(TaskState::Canceled), StateClass::Terminal);
    }

    #[test]
    fn unknown_ends_the_call() {
        assert_eq!(classify_state(TaskState::Unknown), StateClass::Terminal);
    }
}
