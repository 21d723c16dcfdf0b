//! Text rendering for the CLI views.

use std::fmt::Write as _;

use crate::error::Result;
use crate::form::Banner;
use crate::record::{DraftRecord, Field, Student, GRADE_LABEL};
use crate::storage::CourseSummary;

use super::OutputFormat;

/// Render a banner the way it would appear above the form.
#[must_use]
pub fn banner(banner: &Banner) -> Option<String> {
    match banner {
        Banner::Idle => None,
        Banner::Success(message) => Some(format!("[OK] {message}")),
        Banner::Error(message) => Some(format!("[ERRO] {message}")),
    }
}

/// Render the draft with its field labels.
#[must_use]
pub fn draft(draft: &DraftRecord) -> String {
    let grade = draft
        .grade_index
        .map(|g| g.to_string())
        .unwrap_or_default();
    format!(
        "{}: {}\n{}: {}\n{}: {}\n",
        Field::Name.label(),
        draft.get(Field::Name),
        Field::Course.label(),
        draft.get(Field::Course),
        GRADE_LABEL,
        grade
    )
}

/// Render the student list.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn students(students: &[Student], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(students)?;
            out.push('\n');
        }
        OutputFormat::Plain => {
            for s in students {
                let _ = writeln!(out, "{}\t{}\t{}\t{}", s.id, s.name, s.course, s.grade_index);
            }
        }
        OutputFormat::Table => {
            if students.is_empty() {
                out.push_str("Nenhum aluno cadastrado.\n");
                return Ok(out);
            }
            let name_width = column_width(students.iter().map(|s| s.name.as_str()), "Nome");
            let course_width = column_width(students.iter().map(|s| s.course.as_str()), "Curso");
            let _ = writeln!(
                out,
                "{:>5}  {:<name_width$}  {:<course_width$}  {:>5}  Criado em",
                "ID", "Nome", "Curso", GRADE_LABEL
            );
            for s in students {
                let _ = writeln!(
                    out,
                    "{:>5}  {:<name_width$}  {:<course_width$}  {:>5}  {}",
                    s.id,
                    s.name,
                    s.course,
                    s.grade_index.to_string(),
                    s.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(out)
}

/// Render the course list.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn courses(courses: &[CourseSummary], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(courses)?;
            out.push('\n');
        }
        OutputFormat::Plain => {
            for c in courses {
                let _ = writeln!(out, "{}\t{}\t{:.2}", c.course, c.students, c.mean_grade);
            }
        }
        OutputFormat::Table => {
            if courses.is_empty() {
                out.push_str("Nenhum curso cadastrado.\n");
                return Ok(out);
            }
            let width = column_width(courses.iter().map(|c| c.course.as_str()), "Curso");
            let _ = writeln!(out, "{:<width$}  {:>6}  {:>10}", "Curso", "Alunos", "Ira média");
            for c in courses {
                let _ = writeln!(
                    out,
                    "{:<width$}  {:>6}  {:>10.2}",
                    c.course, c.students, c.mean_grade
                );
            }
        }
    }
    Ok(out)
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}
