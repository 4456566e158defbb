//! Solve service errors.

use crate::store::StoreError;
use pwc_engine::EngineError;
use pwc_types::ErrorCode;
use thiserror::Error;

/// Error from one service operation.
///
/// Engine and store errors keep their own codes; callers map
/// [`is_policy`](Self::is_policy) errors to a conflict response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored value or an event payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("answer is {len} bytes, limit is {max}")]
    AnswerTooLong { len: usize, max: usize },
}

impl ServiceError {
    /// Returns `true` for requests rejected by the solve's current status.
    #[must_use]
    pub fn is_policy(&self) -> bool {
        matches!(self, Self::Engine(e) if e.is_policy())
    }
}

impl ErrorCode for ServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Engine(e) => e.code(),
            Self::Store(e) => e.code(),
            Self::Serialization(_) => "SERVICE_SERIALIZATION",
            Self::EmptyAnswer => "SERVICE_EMPTY_ANSWER",
            Self::AnswerTooLong { .. } => "SERVICE_ANSWER_TOO_LONG",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(e) => e.is_recoverable(),
            Self::Store(e) => e.is_recoverable(),
            Self::Serialization(_) | Self::EmptyAnswer | Self::AnswerTooLong { .. } => false,
        }
    }
}
