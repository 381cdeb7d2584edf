use std::fmt;

/// Where the upload and review workflow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A file is selected; it may also carry a result from an earlier parse.
    FileSelected,
    /// One parse request is in flight.
    Submitting,
    /// A parse result is open for review.
    Reviewing,
    /// The reviewed receipt is being handed to the sink.
    Saved,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::FileSelected => "file selected",
            WorkflowState::Submitting => "submitting",
            WorkflowState::Reviewing => "reviewing",
            WorkflowState::Saved => "saved",
        }
    }

    /// States from which `submit` may start a request.
    pub fn can_submit(&self) -> bool {
        matches!(self, WorkflowState::FileSelected | WorkflowState::Reviewing)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(WorkflowState::default(), WorkflowState::Idle);
    }

    #[test]
    fn test_can_submit() {
        assert!(WorkflowState::FileSelected.can_submit());
        assert!(WorkflowState::Reviewing.can_submit());
        assert!(!WorkflowState::Idle.can_submit());
        assert!(!WorkflowState::Submitting.can_submit());
        assert!(!WorkflowState::Saved.can_submit());
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkflowState::FileSelected.to_string(), "file selected");
    }
}
