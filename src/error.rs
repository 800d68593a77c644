//! Error classification shared by every service.

use serde::Serialize;
use std::fmt;

/// Broad category of a service failure.
///
/// Callers branch on the kind to decide how to report or retry a failure
/// without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input was malformed; repeating the call cannot succeed.
    Validation,
    /// The addressed task or currency does not exist.
    NotFound,
    /// The operation is not allowed in the current state.
    Conflict,
    /// A store or upstream service failed; a later retry may succeed.
    Infrastructure,
}

impl ErrorKind {
    /// Returns `true` only for transient infrastructure failures.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Infrastructure)
    }

    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
