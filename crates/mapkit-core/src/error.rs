//! Error types for mapkit-core

use crate::outcome::ErrorCode;
use crate::surface::GroupId;
use thiserror::Error;

/// Result type alias for mapkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tool dispatch
///
/// Every variant maps onto one of the wire-level [`ErrorCode`]s through
/// [`Error::code`], which is how failures cross the dispatch boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// No tool with this name exists in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Parameters were missing or had the wrong shape
    #[error(transparent)]
    InvalidParams(#[from] ParamError),

    /// The drawing surface failed while applying a command
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// The surface worker thread could not be started
    #[error("Failed to start surface worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    /// The surface worker is gone and can no longer accept commands
    #[error("Surface worker is no longer running")]
    WorkerStopped,
}

impl Error {
    /// Machine-matchable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::UnknownTool(_) => ErrorCode::UnknownTool,
            Error::InvalidParams(_) => ErrorCode::InvalidParams,
            Error::Surface(_) | Error::WorkerSpawn(_) | Error::WorkerStopped => {
                ErrorCode::ExecutionError
            }
        }
    }
}

/// A tool parameter could not be coerced into its expected shape
///
/// `field` is the full path of the offending value, e.g. `points[0].lat`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A required parameter is absent (or explicitly null)
    #[error("Missing required parameter: {field}")]
    Missing { field: String },

    /// A parameter is present but has the wrong JSON type
    #[error("Invalid type for parameter {field}: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A parameter has the right type but an unusable value
    #[error("Invalid value for parameter {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ParamError {
    /// Path of the parameter that failed
    pub fn field(&self) -> &str {
        match self {
            ParamError::Missing { field }
            | ParamError::WrongType { field, .. }
            | ParamError::Invalid { field, .. } => field,
        }
    }

    /// Convenience constructor for [`ParamError::Invalid`]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ParamError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a [`DrawingSurface`](crate::DrawingSurface)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The backend refused an operation
    #[error("Surface rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    /// A group handle does not exist on the surface
    #[error("Unknown feature group: {0}")]
    UnknownGroup(GroupId),

    /// A style could not be loaded
    #[error("Failed to load style {url}: {reason}")]
    StyleLoad { url: String, reason: String },

    /// The backend panicked while handling a command
    #[error("Surface panicked: {0}")]
    Panicked(String),
}

impl SurfaceError {
    /// Convenience constructor for [`SurfaceError::Rejected`]
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        SurfaceError::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownTool("draw_unicorn".to_string());
        assert_eq!(err.to_string(), "Unknown tool: draw_unicorn");

        let err = ParamError::Missing {
            field: "points".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required parameter: points");

        let err = ParamError::WrongType {
            field: "latitude".to_string(),
            expected: "number",
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "Invalid type for parameter latitude: expected number, found string"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::UnknownTool("x".to_string()).code(),
            ErrorCode::UnknownTool
        );

        let param_err = ParamError::invalid("padding", "must not be negative");
        assert_eq!(Error::from(param_err).code(), ErrorCode::InvalidParams);

        let surface_err = SurfaceError::rejected("add_markers", "backend offline");
        assert_eq!(Error::from(surface_err).code(), ErrorCode::ExecutionError);
        assert_eq!(Error::WorkerStopped.code(), ErrorCode::ExecutionError);
    }

    #[test]
    fn test_param_error_field() {
        let err = ParamError::invalid("coordinates[2]", "expected at least 2 numbers");
        assert_eq!(err.field(), "coordinates[2]");
        assert!(err.to_string().contains("coordinates[2]"));
    }
}
