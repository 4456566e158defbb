//! Engine layer errors.
//!
//! Every failure in this crate is scoped to one command: none of them are
//! fatal and none leave a state half-written.
//!
//! # Error Codes
//!
//! | Error | Code | Kind | Recoverable |
//! |-------|------|------|-------------|
//! | [`EngineError::InvalidClue`] | `ENGINE_INVALID_CLUE` | Format | No |
//! | [`EngineError::InvalidAnswer`] | `ENGINE_INVALID_ANSWER` | Format | No |
//! | [`EngineError::ClueNotFound`] | `ENGINE_CLUE_NOT_FOUND` | Format | No |
//! | [`EngineError::CellOutOfRange`] | `ENGINE_CELL_OUT_OF_RANGE` | Format | No |
//! | [`EngineError::AnswerLength`] | `ENGINE_ANSWER_LENGTH` | Format | No |
//! | [`EngineError::IncorrectAnswer`] | `ENGINE_INCORRECT_ANSWER` | Format | No |
//! | [`EngineError::UnknownWord`] | `ENGINE_UNKNOWN_WORD` | Format | No |
//! | [`EngineError::UnofficialWord`] | `ENGINE_UNOFFICIAL_WORD` | Format | No |
//! | [`EngineError::UnknownSetting`] | `ENGINE_UNKNOWN_SETTING` | Format | No |
//! | [`EngineError::InvalidSettingValue`] | `ENGINE_INVALID_SETTING_VALUE` | Format | No |
//! | [`EngineError::InvalidPuzzle`] | `ENGINE_INVALID_PUZZLE` | Format | No |
//! | [`EngineError::Unsupported`] | `ENGINE_UNSUPPORTED` | Format | No |
//! | [`EngineError::NotSolving`] | `ENGINE_NOT_SOLVING` | Policy | Yes |
//! | [`EngineError::NoPuzzleSelected`] | `ENGINE_NO_PUZZLE_SELECTED` | Policy | Yes |
//! | [`EngineError::AlreadyComplete`] | `ENGINE_ALREADY_COMPLETE` | Policy | No |
//!
//! # Kinds
//!
//! [`ErrorKind::Format`] errors mean the request itself is malformed.
//! [`ErrorKind::Policy`] errors mean the request is well-formed but not
//! allowed in the solve's current status; callers report them as a
//! conflict rather than a bad request.

use pwc_types::{ErrorCode, Status};
use thiserror::Error;

/// Broad classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or invalid input.
    Format,
    /// Valid input rejected by the solve's current status.
    Policy,
}

/// Engine layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid clue: {0:?}")]
    InvalidClue(String),

    #[error("invalid answer {answer:?}: {reason}")]
    InvalidAnswer { answer: String, reason: &'static str },

    #[error("clue not found: {0}")]
    ClueNotFound(String),

    #[error("cell number out of range: {0}")]
    CellOutOfRange(u32),

    #[error("answer for {clue} has {actual} cells, expected {expected}")]
    AnswerLength {
        clue: String,
        expected: usize,
        actual: usize,
    },

    #[error("answer for {0} contradicts the solution")]
    IncorrectAnswer(String),

    #[error("not a valid answer: {0}")]
    UnknownWord(String),

    #[error("unofficial answers are not allowed: {0}")]
    UnofficialWord(String),

    #[error("unknown setting: {0:?}")]
    UnknownSetting(String),

    #[error("invalid value for setting {name:?}: {reason}")]
    InvalidSettingValue { name: String, reason: String },

    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),

    #[error("operation not supported for this puzzle: {0}")]
    Unsupported(&'static str),

    #[error("puzzle is not being solved (status: {0})")]
    NotSolving(Status),

    #[error("no puzzle selected")]
    NoPuzzleSelected,

    #[error("puzzle already solved")]
    AlreadyComplete,
}

impl EngineError {
    /// Creates an invalid answer error.
    pub fn invalid_answer(answer: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidAnswer {
            answer: answer.into(),
            reason,
        }
    }

    /// Creates an invalid setting value error.
    pub fn invalid_setting_value(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidSettingValue {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns whether this is a format or a policy error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotSolving(_) | Self::NoPuzzleSelected | Self::AlreadyComplete => {
                ErrorKind::Policy
            }
            _ => ErrorKind::Format,
        }
    }

    /// Returns `true` for policy errors.
    #[must_use]
    pub fn is_policy(&self) -> bool {
        self.kind() == ErrorKind::Policy
    }
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidClue(_) => "ENGINE_INVALID_CLUE",
            Self::InvalidAnswer { .. } => "ENGINE_INVALID_ANSWER",
            Self::ClueNotFound(_) => "ENGINE_CLUE_NOT_FOUND",
            Self::CellOutOfRange(_) => "ENGINE_CELL_OUT_OF_RANGE",
            Self::AnswerLength { .. } => "ENGINE_ANSWER_LENGTH",
            Self::IncorrectAnswer(_) => "ENGINE_INCORRECT_ANSWER",
            Self::UnknownWord(_) => "ENGINE_UNKNOWN_WORD",
            Self::UnofficialWord(_) => "ENGINE_UNOFFICIAL_WORD",
            Self::UnknownSetting(_) => "ENGINE_UNKNOWN_SETTING",
            Self::InvalidSettingValue { .. } => "ENGINE_INVALID_SETTING_VALUE",
            Self::InvalidPuzzle(_) => "ENGINE_INVALID_PUZZLE",
            Self::Unsupported(_) => "ENGINE_UNSUPPORTED",
            Self::NotSolving(_) => "ENGINE_NOT_SOLVING",
            Self::NoPuzzleSelected => "ENGINE_NO_PUZZLE_SELECTED",
            Self::AlreadyComplete => "ENGINE_ALREADY_COMPLETE",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Toggling the status or selecting a puzzle makes these succeed.
        matches!(self, Self::NotSolving(_) | Self::NoPuzzleSelected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwc_types::assert_error_codes;

    fn all_variants() -> Vec<EngineError> {
        vec![
            EngineError::InvalidClue("x".into()),
            EngineError::invalid_answer("x", "empty"),
            EngineError::ClueNotFound("1a".into()),
            EngineError::CellOutOfRange(0),
            EngineError::AnswerLength {
                clue: "1a".into(),
                expected: 5,
                actual: 4,
            },
            EngineError::IncorrectAnswer("1a".into()),
            EngineError::UnknownWord("x".into()),
            EngineError::UnofficialWord("x".into()),
            EngineError::UnknownSetting("x".into()),
            EngineError::invalid_setting_value("x", "expected bool"),
            EngineError::InvalidPuzzle("x".into()),
            EngineError::Unsupported("show_clue"),
            EngineError::NotSolving(Status::Paused),
            EngineError::NoPuzzleSelected,
            EngineError::AlreadyComplete,
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "ENGINE_");
    }

    #[test]
    fn policy_errors() {
        let policy: Vec<_> = all_variants()
            .into_iter()
            .filter(EngineError::is_policy)
            .map(|e| e.code())
            .collect();
        assert_eq!(
            policy,
            vec![
                "ENGINE_NOT_SOLVING",
                "ENGINE_NO_PUZZLE_SELECTED",
                "ENGINE_ALREADY_COMPLETE"
            ]
        );
    }

    #[test]
    fn not_solving_is_recoverable() {
        let err = EngineError::NotSolving(Status::Paused);
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("paused"));
        assert!(!EngineError::AlreadyComplete.is_recoverable());
    }

    #[test]
    fn answer_length_message() {
        let err = EngineError::AnswerLength {
            clue: "1a".into(),
            expected: 5,
            actual: 1,
        };
        assert_eq!(err.to_string(), "answer for 1a has 1 cells, expected 5");
    }
}
