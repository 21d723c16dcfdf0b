//! Student record types.
//!
//! A [`DraftRecord`] is what the creation form edits. Validation turns it
//! into a [`NewStudent`] payload, and the record service answers with the
//! stored [`Student`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lowest accepted grade index.
pub const GRADE_MIN: f64 = 0.0;

/// Highest accepted grade index.
pub const GRADE_MAX: f64 = 10.0;

/// Label shown next to the grade input.
pub const GRADE_LABEL: &str = "Ira";

/// A grade index, always within `[GRADE_MIN, GRADE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Grade(f64);

impl Grade {
    /// Clamp `value` into the grade range.
    ///
    /// Returns `None` for `NaN`, which has no place in the range. `-0.0`
    /// is stored as `0.0`.
    #[must_use]
    pub fn clamped(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else {
            Some(Self(value.clamp(GRADE_MIN, GRADE_MAX) + 0.0))
        }
    }

    /// Parse raw keystroke input and clamp it.
    ///
    /// Blank or non-numeric input yields `None`, the empty grade.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().and_then(Self::clamped)
    }

    /// The numeric value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Grade {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (GRADE_MIN..=GRADE_MAX).contains(&value) {
            Ok(Self(value + 0.0))
        } else {
            Err(format!(
                "grade index {value} outside [{GRADE_MIN}, {GRADE_MAX}]"
            ))
        }
    }
}

impl From<Grade> for f64 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A free-text field of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The student's name.
    Name,
    /// The student's course.
    Course,
}

impl Field {
    /// The label shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nome",
            Self::Course => "Curso",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nome" | "name" => Ok(Self::Name),
            "curso" | "course" => Ok(Self::Course),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// In-progress, unsaved form data for a new student.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRecord {
    /// Student name, kept verbatim.
    pub name: String,
    /// Course name, kept verbatim.
    pub course: String,
    /// Grade index, or `None` while empty.
    pub grade_index: Option<Grade>,
}

impl DraftRecord {
    /// Set a text field verbatim.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Course => self.course = value,
        }
    }

    /// Read a text field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Course => &self.course,
        }
    }

    /// Check the required fields in order and build the payload.
    ///
    /// # Errors
    ///
    /// Returns the first missing field: name, then course, then grade.
    pub fn validate(&self) -> Result<NewStudent, ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.course.is_empty() {
            return Err(ValidationError::MissingCourse);
        }
        let grade_index = self.grade_index.ok_or(ValidationError::MissingGrade)?;

        Ok(NewStudent {
            name: self.name.clone(),
            course: self.course.clone(),
            grade_index,
        })
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.course.is_empty() && self.grade_index.is_none()
    }
}

/// Payload for creating a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Student name.
    pub name: String,
    /// Course name.
    pub course: String,
    /// Grade index.
    pub grade_index: Grade,
}

/// A stored student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Student name.
    pub name: String,
    /// Course name.
    pub course: String,
    /// Grade index.
    pub grade_index: Grade,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// Build the stored representation of `payload`.
    #[must_use]
    pub fn from_new(id: i64, payload: NewStudent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name,
            course: payload.course,
            grade_index: payload.grade_index,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(v: f64) -> Grade {
        Grade::clamped(v).unwrap()
    }

    #[test]
    fn test_grade_parse_clamps() {
        assert_eq!(Grade::parse("15"), Some(grade(10.0)));
        assert_eq!(Grade::parse("-3"), Some(grade(0.0)));
        assert_eq!(Grade::parse("7.5"), Some(grade(7.5)));
        assert_eq!(Grade::parse(" 8 "), Some(grade(8.0)));
    }

    #[test]
    fn test_grade_parse_matches_min_max_rule() {
        for v in [-100.0, -0.5, 0.0, 0.1, 4.0, 9.99, 10.0, 10.01, 1e9] {
            let stored = Grade::parse(&v.to_string()).unwrap().value();
            assert!((stored - f64::max(0.0, f64::min(10.0, v))).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_grade_parse_empty_and_garbage() {
        assert_eq!(Grade::parse(""), None);
        assert_eq!(Grade::parse("   "), None);
        assert_eq!(Grade::parse("abc"), None);
        assert_eq!(Grade::parse("NaN"), None);
    }

    #[test]
    fn test_grade_parse_infinity_clamps() {
        assert_eq!(Grade::parse("inf"), Some(grade(10.0)));
        assert_eq!(Grade::parse("-inf"), Some(grade(0.0)));
    }

    #[test]
    fn test_grade_try_from_rejects_out_of_range() {
        assert!(Grade::try_from(11.0).is_err());
        assert!(Grade::try_from(-1.0).is_err());
        assert_eq!(Grade::try_from(3.0).unwrap(), grade(3.0));
    }

    #[test]
    fn test_grade_negative_zero_is_zero() {
        let grade = Grade::parse("-0").unwrap();
        assert!(grade.value().is_sign_positive());
        assert_eq!(grade.to_string(), "0");
        assert_eq!(Grade::clamped(-0.0).unwrap().to_string(), "0");
        assert_eq!(Grade::try_from(-0.0).unwrap().to_string(), "0");
    }

    #[test]
    fn test_grade_display() {
        assert_eq!(grade(8.0).to_string(), "8");
        assert_eq!(grade(7.5).to_string(), "7.5");
    }

    #[test]
    fn test_grade_deserialize_out_of_range_fails() {
        assert!(serde_json::from_str::<Grade>("12").is_err());
        assert_eq!(serde_json::from_str::<Grade>("9").unwrap(), grade(9.0));
    }

    #[test]
    fn test_field_labels_and_parse() {
        assert_eq!(Field::Name.label(), "Nome");
        assert_eq!(Field::Course.label(), "Curso");
        assert_eq!("nome".parse::<Field>().unwrap(), Field::Name);
        assert_eq!("Curso".parse::<Field>().unwrap(), Field::Course);
        assert!("ira".parse::<Field>().is_err());
    }

    #[test]
    fn test_draft_set_is_verbatim() {
        let mut draft = DraftRecord::default();
        draft.set(Field::Name, "  Ana ");
        assert_eq!(draft.get(Field::Name), "  Ana ");
    }

    #[test]
    fn test_validate_order() {
        let draft = DraftRecord::default();
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));

        let draft = DraftRecord {
            name: "Ana".to_string(),
            ..DraftRecord::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingCourse));

        let draft = DraftRecord {
            name: "Ana".to_string(),
            course: "CS".to_string(),
            grade_index: None,
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingGrade));
    }

    #[test]
    fn test_validate_whitespace_name_passes() {
        let draft = DraftRecord {
            name: " ".to_string(),
            course: "CS".to_string(),
            grade_index: Some(grade(5.0)),
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_builds_payload() {
        let draft = DraftRecord {
            name: "Ana".to_string(),
            course: "CS".to_string(),
            grade_index: Some(grade(8.0)),
        };
        let payload = draft.validate().unwrap();
        assert_eq!(payload.name, "Ana");
        assert_eq!(payload.course, "CS");
        assert_eq!(payload.grade_index, grade(8.0));
    }

    #[test]
    fn test_zero_grade_is_not_empty() {
        let draft = DraftRecord {
            name: "Ana".to_string(),
            course: "CS".to_string(),
            grade_index: Some(grade(0.0)),
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_clear() {
        let mut draft = DraftRecord {
            name: "Ana".to_string(),
            course: "CS".to_string(),
            grade_index: Some(grade(8.0)),
        };
        assert!(!draft.is_empty());
        draft.clear();
        assert!(draft.is_empty());
    }

    #[test]
    fn test_student_serialization() {
        let payload = NewStudent {
            name: "Ana".to_string(),
            course: "CS".to_string(),
            grade_index: grade(8.0),
        };
        let student = Student::from_new(1, payload, Utc::now());

        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["grade_index"], 8.0);

        let back: Student = serde_json::from_value(json).unwrap();
        assert_eq!(back, student);
    }
}
