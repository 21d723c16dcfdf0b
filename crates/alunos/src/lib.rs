//! `alunos` - A small student registry
//!
//! This library provides a validated student creation form that talks to an
//! injected data-access service, a `SQLite` store behind that service, and a
//! static navigation shell for the registry's views.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod nav;
pub mod record;
pub mod service;
pub mod storage;

pub use config::{Config, FormConfig, StorageConfig};
pub use error::{Error, Result, ValidationError};
pub use form::{Banner, PendingSubmission, RecordCreationForm, SubmitOutcome};
pub use logging::init_logging;
pub use nav::{NavLink, NavigationShell, Route};
pub use record::{DraftRecord, Field, Grade, NewStudent, Student};
pub use service::{DatabaseHandle, RecordService, SqliteDatabase, SqliteSession, StudentService};
pub use storage::{CourseSummary, Storage, StorageStats};
