//! Storage layer for alunos.
//!
//! `SQLite` persistence for student records. This is the concrete document
//! store behind [`crate::service::SqliteDatabase`].

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{Grade, NewStudent, Student};

const STUDENT_COLUMNS: &str = "id, name, course, grade_index, created_at";

/// Storage engine for student records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a student and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, student: NewStudent) -> Result<Student> {
        let created_at = Utc::now();

        self.conn.execute(
            r"
            INSERT INTO students (name, course, grade_index, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                student.name,
                student.course,
                student.grade_index.value(),
                created_at.to_rfc3339(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, course = %student.course, "Inserted student");
        Ok(Student::from_new(id, student, created_at))
    }

    /// Get a student by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
                [id],
                Self::row_to_student,
            )
            .optional()?;
        Ok(student)
    }

    /// List students, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self, limit: usize) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_at DESC, id DESC LIMIT ?1"
        ))?;

        let students = stmt
            .query_map([to_sql_limit(limit)], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(students)
    }

    /// List students enrolled in `course`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_course(&self, course: &str, limit: usize) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE course = ?1 \
             ORDER BY created_at DESC, id DESC LIMIT ?2"
        ))?;

        let students = stmt
            .query_map(params![course, to_sql_limit(limit)], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(students)
    }

    /// Count stored students.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a student by ID.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// One row per course with its head count and mean grade, by course name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn course_summaries(&self) -> Result<Vec<CourseSummary>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT course, COUNT(*), AVG(grade_index)
            FROM students GROUP BY course ORDER BY course
            ",
        )?;

        let courses = stmt
            .query_map([], |row| {
                Ok(CourseSummary {
                    course: row.get(0)?,
                    students: row.get(1)?,
                    mean_grade: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(courses)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_students = self.count()?;
        let courses: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT course) FROM students", [], |row| {
                    row.get(0)
                })?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT created_at FROM students ORDER BY created_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let newest_student = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_students,
            courses,
            newest_student,
            db_size_bytes,
        })
    }

    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
        let grade: f64 = row.get(3)?;
        let grade_index = Grade::try_from(grade)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Real, e.into()))?;

        let created_at: String = row.get(4)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Student {
            id: row.get(0)?,
            name: row.get(1)?,
            course: row.get(2)?,
            grade_index,
            created_at,
        })
    }
}

fn to_sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// A row of the course list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    /// Course name.
    pub course: String,
    /// Number of students enrolled.
    pub students: i64,
    /// Mean grade index of those students.
    pub mean_grade: f64,
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Total number of students stored.
    pub total_students: i64,
    /// Number of distinct courses.
    pub courses: i64,
    /// Creation time of the newest student.
    pub newest_student: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
