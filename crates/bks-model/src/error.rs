use thiserror::Error;

use crate::state::PipelineState;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown source kind: {0}")]
    UnknownSource(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown reject reason: {0}")]
    UnknownReason(String),
    #[error("duplicate identity key in dataset: {0}")]
    DuplicateIdentity(String),
    #[error("illegal state transition {from} -> {to}")]
    IllegalTransition {
        from: PipelineState,
        to: PipelineState,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
