//! Pipeline run states and final status.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Stage the orchestrator is in.
///
/// Stages advance strictly in declaration order; `Failed` is reachable from
/// every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Reading,
    Normalizing,
    Validating,
    Coercing,
    Merging,
    Completed,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Reading => "reading",
            PipelineState::Normalizing => "normalizing",
            PipelineState::Validating => "validating",
            PipelineState::Coercing => "coercing",
            PipelineState::Merging => "merging",
            PipelineState::Completed => "completed",
            PipelineState::Failed => "failed",
        }
    }

    /// The stage that follows this one on the success path.
    pub fn next(self) -> Option<PipelineState> {
        match self {
            PipelineState::Idle => Some(PipelineState::Reading),
            PipelineState::Reading => Some(PipelineState::Normalizing),
            PipelineState::Normalizing => Some(PipelineState::Validating),
            PipelineState::Validating => Some(PipelineState::Coercing),
            PipelineState::Coercing => Some(PipelineState::Merging),
            PipelineState::Merging => Some(PipelineState::Completed),
            PipelineState::Completed | PipelineState::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Failed)
    }

    pub fn can_transition_to(self, to: PipelineState) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == PipelineState::Failed || self.next() == Some(to)
    }

    pub fn transition(self, to: PipelineState) -> Result<PipelineState> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(ModelError::IllegalTransition { from: self, to })
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Completed with no rejected rows.
    Success,
    /// Completed, but some rows were rejected.
    PartialSuccess,
    /// Aborted by a run-scoped error.
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::PartialSuccess => "partial_success",
            RunStatus::Failed => "failed",
        }
    }

    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failed => 1,
            RunStatus::PartialSuccess => 2,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path_is_linear() {
        let mut state = PipelineState::Idle;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            state = state.transition(next).unwrap();
            visited.push(state);
        }
        assert_eq!(state, PipelineState::Completed);
        assert_eq!(visited.len(), 7);
    }

    #[test]
    fn failed_reachable_from_any_stage() {
        for state in [
            PipelineState::Idle,
            PipelineState::Reading,
            PipelineState::Normalizing,
            PipelineState::Validating,
            PipelineState::Coercing,
            PipelineState::Merging,
        ] {
            assert!(state.can_transition_to(PipelineState::Failed));
        }
        assert!(!PipelineState::Completed.can_transition_to(PipelineState::Failed));
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        let err = PipelineState::Reading
            .transition(PipelineState::Coercing)
            .unwrap_err();
        assert_eq!(err.to_string(), "illegal state transition reading -> coercing");
    }
}
