//! Error types for alunos.
//!
//! This module defines the error types shared by the storage layer, the
//! record collaborators and the creation form.

use std::path::PathBuf;
use thiserror::Error;

/// A local, recoverable problem with the draft being submitted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The name field is empty.
    #[error("name is required")]
    MissingName,

    /// The course field is empty.
    #[error("course is required")]
    MissingCourse,

    /// No grade has been entered.
    #[error("grade index is required")]
    MissingGrade,
}

/// The main error type for alunos operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Form Errors ===
    /// The record service could not create the record.
    #[error("failed to create record: {reason}")]
    Submission {
        /// Why the create call failed.
        reason: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for alunos operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new submission error.
    #[must_use]
    pub fn submission(reason: impl Into<String>) -> Self {
        Self::Submission {
            reason: reason.into(),
        }
    }

    /// The user-facing reason for a failed create call.
    ///
    /// Submission errors report their bare reason; anything else is shown
    /// through its display form.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Submission { reason } => reason.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");

        let err = Error::submission("quota exceeded");
        assert_eq!(err.to_string(), "failed to create record: quota exceeded");
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::MissingName.to_string(), "name is required");
        assert_eq!(
            ValidationError::MissingCourse.to_string(),
            "course is required"
        );
        assert_eq!(
            ValidationError::MissingGrade.to_string(),
            "grade index is required"
        );
    }

    #[test]
    fn test_reason() {
        assert_eq!(Error::submission("offline").reason(), "offline");

        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.reason().contains("version mismatch"));
    }

    #[test]
    fn test_reason_for_rejected_insert() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v REAL CHECK (v <= 10));")
            .unwrap();
        let err: Error = conn
            .execute("INSERT INTO t (v) VALUES (11)", [])
            .unwrap_err()
            .into();

        assert!(matches!(err, Error::DatabaseQuery(_)));
        assert!(err.reason().starts_with("database query failed"));
    }

    #[test]
    fn test_open_and_directory_errors_keep_their_source() {
        use std::error::Error as _;

        let err = Error::DirectoryCreate {
            path: PathBuf::from("/proc/alunos"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/proc/alunos"));
        assert!(err.source().is_some());

        let err: Error = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "I/O error: disk full");
    }

    #[test]
    fn test_config_errors() {
        let figment_err = figment::Figment::new()
            .merge(("form.success_clear_ms", "soon"))
            .extract_inner::<u64>("form.success_clear_ms")
            .unwrap_err();
        let err: Error = figment_err.into();
        assert!(matches!(err, Error::ConfigLoad(_)));

        let err = Error::ConfigValidation {
            message: "list_limit must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: list_limit must be greater than 0"
        );
    }
}
