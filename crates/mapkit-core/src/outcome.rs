//! Uniform result of a tool invocation

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed vocabulary of error codes reported to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The requested tool is not in the catalog
    UnknownTool,
    /// A parameter was missing or malformed
    InvalidParams,
    /// The command failed while being applied
    ExecutionError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownTool => "UNKNOWN_TOOL",
            ErrorCode::InvalidParams => "INVALID_PARAMS",
            ErrorCode::ExecutionError => "EXECUTION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single tool call
///
/// Serializes as `{"status":"success","data":...}` or
/// `{"status":"error","message":...,"code":...}`.
///
/// # Example
///
/// ```
/// use mapkit_core::{ErrorCode, ToolOutcome};
///
/// let ok = ToolOutcome::success("Added 1 point(s)");
/// assert!(ok.is_success());
///
/// let err = ToolOutcome::error("Unknown tool: zoom", ErrorCode::UnknownTool);
/// assert_eq!(err.code(), Some(ErrorCode::UnknownTool));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    /// The call was accepted
    Success {
        /// Human-readable confirmation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },

    /// The call failed
    Error {
        /// What went wrong
        message: String,
        /// Machine-matchable code
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
    },
}

impl ToolOutcome {
    /// Create a success outcome carrying a confirmation message
    pub fn success(data: impl Into<String>) -> Self {
        ToolOutcome::Success {
            data: Some(data.into()),
        }
    }

    /// Create an error outcome
    pub fn error(message: impl Into<String>, code: ErrorCode) -> Self {
        ToolOutcome::Error {
            message: message.into(),
            code: Some(code),
        }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    /// Whether the call failed
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Error code, if this is an error with a code
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Error { code, .. } => *code,
        }
    }

    /// Text suitable for a tool-result message fed back to the model
    pub fn content(&self) -> String {
        match self {
            ToolOutcome::Success { data: Some(data) } => data.clone(),
            ToolOutcome::Success { data: None } => "OK".to_string(),
            ToolOutcome::Error {
                message,
                code: Some(code),
            } => format!("Error [{code}]: {message}"),
            ToolOutcome::Error {
                message,
                code: None,
            } => format!("Error: {message}"),
        }
    }
}

impl From<Error> for ToolOutcome {
    fn from(err: Error) -> Self {
        ToolOutcome::error(err.to_string(), err.code())
    }
}
