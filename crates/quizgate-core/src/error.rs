//! Assessment engine error types.
//!
//! Every failure in the engine is one of these variants. None of them is
//! fatal to the process: the worst case is an aborted attempt with no
//! durable record.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T, E = AssessmentError> = std::result::Result<T, E>;

/// Errors raised by the proctor gate, the runner, and the stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// The capture device was denied, absent, busy, or timed out.
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// A user-correctable input problem. State is left unchanged.
    #[error("{0}")]
    ValidationRejected(ValidationIssue),

    /// The assessment or the signed-in user could not be resolved.
    #[error("{0} not found")]
    NotFound(Missing),

    /// A transition was requested on a runner that has already finished.
    #[error("assessment already finished")]
    AlreadyFinished,

    /// An assessment definition violates its invariants.
    #[error(transparent)]
    InvalidDefinition(#[from] DefinitionError),

    /// A collection could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AssessmentError {
    /// Returns `true` if the caller can correct the input and retry the
    /// same transition without restarting the flow.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AssessmentError::ValidationRejected(_))
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(e: serde_json::Error) -> Self {
        AssessmentError::Storage(e.to_string())
    }
}

/// Why a `select_option` or `next` was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// `next` was requested with no option selected.
    NoSelection,
    /// The selected index does not name an option of the current question.
    OptionOutOfRange { index: usize, option_count: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoSelection => write!(f, "Select an answer"),
            ValidationIssue::OptionOutOfRange {
                index,
                option_count,
            } => write!(
                f,
                "option {index} is out of range ({option_count} options)"
            ),
        }
    }
}

/// What could not be found when a flow started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Assessment(String),
    User,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Assessment(id) => write!(f, "assessment '{id}'"),
            Missing::User => write!(f, "signed-in user"),
        }
    }
}

/// Invariant violations in assessment definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("question '{text}' has no options")]
    NoOptions { text: String },

    #[error("question '{text}' marks option {correct} correct but has only {option_count} options")]
    CorrectOutOfRange {
        text: String,
        correct: usize,
        option_count: usize,
    },

    #[error("assessment title is required")]
    EmptyTitle,
}

/// Failures reported by a capture device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The user (or platform policy) refused camera access.
    #[error("access denied: {0}")]
    Denied(String),

    /// No video capture device is present.
    #[error("no capture device available")]
    NoDevice,

    /// The device is still held by an earlier session.
    #[error("capture device is busy")]
    Busy,

    /// The permission prompt was not answered in time.
    #[error("permission request timed out after {0}ms")]
    Timeout(u64),
}

impl From<CaptureError> for AssessmentError {
    fn from(e: CaptureError) -> Self {
        AssessmentError::PermissionDenied(e.to_string())
    }
}
