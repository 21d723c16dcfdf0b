//! Data-access collaborators for the creation form.
//!
//! The form never reaches for a global database. It is handed a
//! [`DatabaseHandle`], which hands out sessions, and a [`RecordService`],
//! which creates records through a session.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::record::{NewStudent, Student};
use crate::storage::Storage;

/// Source of sessions on a document store.
pub trait DatabaseHandle: Send + Sync + 'static {
    /// A live session; cheap to clone and safe to move into tasks.
    type Session: Clone + Send + Sync + 'static;

    /// Get a session.
    ///
    /// # Errors
    ///
    /// Returns an error if no session can be established.
    fn session(&self) -> Result<Self::Session>;
}

/// Creates student records through a session of type `S`.
#[async_trait]
pub trait RecordService<S>: Send + Sync + 'static
where
    S: Send + 'static,
{
    /// Create a record from `payload`.
    ///
    /// Resolves to the created record, or to the reason it was not created.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or fails the create.
    async fn create(&self, session: S, payload: NewStudent) -> Result<Student>;
}

/// A shared session on the `SQLite` store.
#[derive(Debug, Clone)]
pub struct SqliteSession {
    storage: Arc<Mutex<Storage>>,
}

impl SqliteSession {
    /// Run `f` with exclusive access to the storage.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or an internal error if the lock is poisoned.
    pub fn with<T>(&self, f: impl FnOnce(&Storage) -> Result<T>) -> Result<T> {
        let storage = self
            .storage
            .lock()
            .map_err(|_| Error::internal("storage lock poisoned"))?;
        f(&storage)
    }
}

/// [`DatabaseHandle`] over a single `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    session: SqliteSession,
}

impl SqliteDatabase {
    /// Wrap an open storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            session: SqliteSession {
                storage: Arc::new(Mutex::new(storage)),
            },
        }
    }

    /// Open the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Storage::open(path).map(Self::new)
    }

    /// An in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        Storage::open_in_memory().map(Self::new)
    }
}

impl DatabaseHandle for SqliteDatabase {
    type Session = SqliteSession;

    fn session(&self) -> Result<SqliteSession> {
        Ok(self.session.clone())
    }
}

/// [`RecordService`] that inserts students into the `SQLite` store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentService;

#[async_trait]
impl RecordService<SqliteSession> for StudentService {
    #[instrument(skip_all, fields(course = %payload.course))]
    async fn create(&self, session: SqliteSession, payload: NewStudent) -> Result<Student> {
        let student = tokio::task::spawn_blocking(move || session.with(|s| s.insert(payload)))
            .await
            .map_err(|e| Error::internal(format!("create task failed: {e}")))??;

        debug!(id = student.id, "Student created");
        Ok(student)
    }
}
