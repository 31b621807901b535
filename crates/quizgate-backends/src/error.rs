//! Backend error types.

use quizgate_core::AssessmentError;
use thiserror::Error;

/// Errors raised by the account directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// No account matches the email and password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account exists but an administrator disabled it.
    #[error("Account disabled")]
    AccountDisabled,

    /// No account has this id or email.
    #[error("user not found: {0}")]
    UnknownUser(String),

    /// An account with this email already exists.
    #[error("Email already used: {0}")]
    DuplicateEmail(String),

    /// Name, email and password are all required.
    #[error("Fill all fields ({0} is empty)")]
    MissingField(&'static str),

    /// The backing collection could not be read or written.
    #[error(transparent)]
    Store(#[from] AssessmentError),
}
