//! `SQLite` schema for the student store.

/// SQL statement to create the students table.
pub const CREATE_STUDENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    course TEXT NOT NULL,
    grade_index REAL NOT NULL CHECK (grade_index BETWEEN 0 AND 10),
    created_at TEXT NOT NULL
)
";

/// Index backing the newest-first listing.
pub const CREATE_CREATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_students_created_at ON students(created_at DESC)
";

/// Key-value table; holds the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Index used by course filtering and the course summary view.
pub const CREATE_COURSE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_students_course ON students(course)
";

/// Base schema, applied before migrations run.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_STUDENTS_TABLE,
    CREATE_CREATED_AT_INDEX,
    CREATE_METADATA_TABLE,
];
