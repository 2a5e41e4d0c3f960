/// Task state definitions for the crawl state machine
///
/// Every crawl task starts `Pending` and ends in exactly one terminal state.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task is scheduled but has not been examined yet
    Pending,

    /// A renderer session is loading the page
    Rendering,

    // ===== Terminal Skip States =====
    /// Task depth is beyond the configured maximum
    SkippedDepth,

    /// URL was already scheduled earlier in the session
    SkippedVisited,

    // ===== Terminal Result States =====
    /// Page file already present in the output store; not rendered
    Existing,

    /// Page rendered and persisted
    Success,

    /// Rendering, extraction or persistence failed
    Error,
}

impl TaskState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Rendering)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::SkippedDepth | Self::SkippedVisited | Self::Existing | Self::Rendering
            ) | (Self::Rendering, Self::Success | Self::Error)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn advance(self, next: TaskState) -> Result<TaskState, HarvestError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(HarvestError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Rendering => "rendering",
            Self::SkippedDepth => "skipped_depth",
            Self::SkippedVisited => "skipped_visited",
            Self::Existing => "existing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TaskState; 7] = [
        TaskState::Pending,
        TaskState::Rendering,
        TaskState::SkippedDepth,
        TaskState::SkippedVisited,
        TaskState::Existing,
        TaskState::Success,
        TaskState::Error,
    ];

    #[test]
    fn test_is_terminal() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Rendering.is_terminal());

        assert!(TaskState::SkippedDepth.is_terminal());
        assert!(TaskState::SkippedVisited.is_terminal());
        assert!(TaskState::Existing.is_terminal());
        assert!(TaskState::Success.is_terminal());
        assert!(TaskState::Error.is_terminal());
    }

    #[test]
    fn test_pending_transitions() {
        let pending = TaskState::Pending;
        assert!(pending.can_transition_to(TaskState::SkippedDepth));
        assert!(pending.can_transition_to(TaskState::SkippedVisited));
        assert!(pending.can_transition_to(TaskState::Existing));
        assert!(pending.can_transition_to(TaskState::Rendering));

        assert!(!pending.can_transition_to(TaskState::Success));
        assert!(!pending.can_transition_to(TaskState::Error));
    }

    #[test]
    fn test_rendering_transitions() {
        assert_eq!(
            TaskState::Rendering.advance(TaskState::Success).unwrap(),
            TaskState::Success
        );
        assert_eq!(
            TaskState::Rendering.advance(TaskState::Error).unwrap(),
            TaskState::Error
        );
        assert!(TaskState::Rendering.advance(TaskState::Existing).is_err());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{:?} should not move to {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = TaskState::Success.advance(TaskState::Rendering).unwrap_err();
        assert!(matches!(
            err,
            HarvestError::InvalidTransition {
                from: TaskState::Success,
                to: TaskState::Rendering
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(TaskState::SkippedVisited.to_string(), "skipped_visited");
        assert_eq!(TaskState::Existing.to_string(), "existing");
    }
}
