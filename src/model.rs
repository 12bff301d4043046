use crate::error::{RecordError, RecordResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub roll_number: Option<i64>,
    pub name: String,
    pub c_marks: Option<f64>,
    pub python_marks: Option<f64>,
    pub java_marks: Option<f64>,
    pub total_marks: Option<f64>,
    pub percentage: Option<f64>,
    pub created_at: String,
}

/// Raw fields accepted on creation. Derived fields are never set here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStudent {
    pub roll_number: Option<i64>,
    pub name: String,
    pub c_marks: Option<f64>,
    pub python_marks: Option<f64>,
    pub java_marks: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Subject {
    C,
    Python,
    Java,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::C, Subject::Python, Subject::Java];

    /// Accepts the form value (`c-marks`), the field name (`cMarks`), the
    /// column name (`c_marks`) or the bare subject (`c`).
    pub fn parse(raw: &str) -> Option<Subject> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let key = key.strip_suffix("marks").unwrap_or(&key);
        match key {
            "c" => Some(Subject::C),
            "python" => Some(Subject::Python),
            "java" => Some(Subject::Java),
            _ => None,
        }
    }

    /// Like [`Subject::parse`], but a missing or unknown value is a
    /// validation error.
    pub fn require(raw: Option<&str>) -> RecordResult<Subject> {
        raw.and_then(Subject::parse)
            .ok_or_else(|| RecordError::validation("Invalid subject selected."))
    }

    pub fn column(self) -> &'static str {
        match self {
            Subject::C => "c_marks",
            Subject::Python => "python_marks",
            Subject::Java => "java_marks",
        }
    }

    /// Form value used by the original pages.
    pub fn form_value(self) -> &'static str {
        match self {
            Subject::C => "c-marks",
            Subject::Python => "python-marks",
            Subject::Java => "java-marks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Subject::C => "C",
            Subject::Python => "Python",
            Subject::Java => "Java",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
