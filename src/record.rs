//! Record codec - one text line to/from one entity
//!
//! Format (fields separated by a single space, one record per line):
//!
//! ```text
//! student <id> <name>
//! teacher <id> <name> <experience>
//! course <id> <name> <teacherId|-> [<studentId> ...]
//! ```
//!
//! Decoding splits on runs of whitespace and dispatches on the leading tag.
//! It never resolves references: a course record carries its teacher and
//! student ids as raw values for [`crate::graph::SchoolGraph`] to link.

use crate::entity::{Course, EntityKind, Id, Student, Teacher};
use std::fmt;
use std::str::FromStr;

/// Field delimiter used when encoding.
pub const DELIMITER: char = ' ';

/// Token written in place of a course's teacher id when it has none.
pub const NO_TEACHER: &str = "-";

/// Why a single line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty record")]
    Empty,

    #[error("unknown record type {0:?}")]
    UnknownTag(String),

    #[error("{kind} record is missing field `{field}`")]
    MissingField {
        kind: EntityKind,
        field: &'static str,
    },

    #[error("{kind} record has unexpected trailing field {token:?}")]
    UnexpectedField { kind: EntityKind, token: String },

    #[error("field `{field}` is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// One decoded line. Course relations are raw ids, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Student {
        id: Id,
        name: String,
    },
    Teacher {
        id: Id,
        name: String,
        experience: u32,
    },
    Course {
        id: Id,
        name: String,
        teacher_id: Option<Id>,
        student_ids: Vec<Id>,
    },
}

impl Record {
    /// Decode one line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(tag) = tokens.first() else {
            return Err(ParseError::Empty);
        };
        let kind = EntityKind::from_str(tag)?;
        let fields = Fields { kind, tokens: &tokens };

        match kind {
            EntityKind::Student => {
                fields.expect_arity(3)?;
                Ok(Record::Student {
                    id: fields.number(1, "id")?,
                    name: fields.text(2, "name")?,
                })
            }
            EntityKind::Teacher => {
                fields.expect_arity(4)?;
                Ok(Record::Teacher {
                    id: fields.number(1, "id")?,
                    name: fields.text(2, "name")?,
                    experience: fields.number(3, "experience")?,
                })
            }
            EntityKind::Course => {
                let id = fields.number(1, "id")?;
                let name = fields.text(2, "name")?;
                let teacher_id = match fields.text(3, "teacherId")?.as_str() {
                    NO_TEACHER => None,
                    _ => Some(fields.number(3, "teacherId")?),
                };
                let student_ids = (4..tokens.len())
                    .map(|i| fields.number(i, "studentId"))
                    .collect::<Result<Vec<Id>, _>>()?;

                Ok(Record::Course {
                    id,
                    name,
                    teacher_id,
                    student_ids,
                })
            }
        }
    }

    /// Get the kind of entity this record describes
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Student { .. } => EntityKind::Student,
            Record::Teacher { .. } => EntityKind::Teacher,
            Record::Course { .. } => EntityKind::Course,
        }
    }

    /// Get the record's entity id
    pub fn id(&self) -> Id {
        match self {
            Record::Student { id, .. } | Record::Teacher { id, .. } | Record::Course { id, .. } => *id,
        }
    }

    /// Get the record's name field
    pub fn name(&self) -> &str {
        match self {
            Record::Student { name, .. } | Record::Teacher { name, .. } | Record::Course { name, .. } => name,
        }
    }
}

impl From<&Student> for Record {
    fn from(student: &Student) -> Self {
        Record::Student {
            id: student.id,
            name: student.name.clone(),
        }
    }
}

impl From<&Teacher> for Record {
    fn from(teacher: &Teacher) -> Self {
        Record::Teacher {
            id: teacher.id,
            name: teacher.name.clone(),
            experience: teacher.experience,
        }
    }
}

impl From<&Course> for Record {
    fn from(course: &Course) -> Self {
        Record::Course {
            id: course.id,
            name: course.name.clone(),
            teacher_id: course.teacher_id,
            student_ids: course.student_ids.clone(),
        }
    }
}

/// Encodes the record as a single line, without the trailing newline.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = DELIMITER;
        match self {
            Record::Student { id, name } => write!(f, "student{d}{id}{d}{name}"),
            Record::Teacher { id, name, experience } => {
                write!(f, "teacher{d}{id}{d}{name}{d}{experience}")
            }
            Record::Course {
                id,
                name,
                teacher_id,
                student_ids,
            } => {
                write!(f, "course{d}{id}{d}{name}{d}")?;
                match teacher_id {
                    Some(teacher_id) => write!(f, "{teacher_id}")?,
                    None => f.write_str(NO_TEACHER)?,
                }
                for student_id in student_ids {
                    write!(f, "{d}{student_id}")?;
                }
                Ok(())
            }
        }
    }
}

/// Whether a name survives an encode/decode cycle unchanged.
pub fn is_encodable_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

/// Positional access to the tokens of one line.
struct Fields<'a> {
    kind: EntityKind,
    tokens: &'a [&'a str],
}

impl Fields<'_> {
    fn get(&self, index: usize, field: &'static str) -> Result<&str, ParseError> {
        self.tokens
            .get(index)
            .copied()
            .ok_or(ParseError::MissingField { kind: self.kind, field })
    }

    fn text(&self, index: usize, field: &'static str) -> Result<String, ParseError> {
        self.get(index, field).map(str::to_string)
    }

    fn number<T: FromStr>(&self, index: usize, field: &'static str) -> Result<T, ParseError> {
        let raw = self.get(index, field)?;
        raw.parse().map_err(|_| ParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
    }

    /// Reject tokens past the fixed fields. Missing fields are reported by
    /// the individual accessors.
    fn expect_arity(&self, arity: usize) -> Result<(), ParseError> {
        match self.tokens.get(arity) {
            Some(extra) => Err(ParseError::UnexpectedField {
                kind: self.kind,
                token: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_student_and_teacher() {
        assert_eq!(
            Record::parse("student 2 Bob").unwrap(),
            Record::Student { id: 2, name: "Bob".into() }
        );
        assert_eq!(
            Record::parse("teacher 1 Alice 10").unwrap(),
            Record::Teacher { id: 1, name: "Alice".into(), experience: 10 }
        );
    }

    #[test]
    fn test_parse_course_with_roster() {
        let record = Record::parse("course 1 Math 1 2 3").unwrap();
        assert_eq!(
            record,
            Record::Course {
                id: 1,
                name: "Math".into(),
                teacher_id: Some(1),
                student_ids: vec![2, 3],
            }
        );

        let bare = Record::parse("course 4 Art -").unwrap();
        assert!(matches!(bare, Record::Course { teacher_id: None, ref student_ids, .. } if student_ids.is_empty()));
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        let record = Record::parse("  course\t1   Math 1  2   3 ").unwrap();
        assert_eq!(record.to_string(), "course 1 Math 1 2 3");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Record::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            Record::parse("Student 1 Bob"),
            Err(ParseError::UnknownTag("Student".into()))
        );
        assert_eq!(
            Record::parse("teacher 1 Alice"),
            Err(ParseError::MissingField { kind: EntityKind::Teacher, field: "experience" })
        );
        assert_eq!(
            Record::parse("student x Bob"),
            Err(ParseError::InvalidNumber { field: "id", value: "x".into() })
        );
        assert_eq!(
            Record::parse("teacher 1 Alice -3"),
            Err(ParseError::InvalidNumber { field: "experience", value: "-3".into() })
        );
        assert_eq!(
            Record::parse("course 1 Math 1 2 two"),
            Err(ParseError::InvalidNumber { field: "studentId", value: "two".into() })
        );
        assert_eq!(
            Record::parse("student 1 Bob Smith"),
            Err(ParseError::UnexpectedField { kind: EntityKind::Student, token: "Smith".into() })
        );
    }

    #[test]
    fn test_encode_from_entities() {
        let mut course = Course::new(1, "Math");
        course.teacher_id = Some(1);
        course.student_ids = vec![2, 3];
        assert_eq!(Record::from(&course).to_string(), "course 1 Math 1 2 3");

        let course = Course::new(5, "Art");
        assert_eq!(Record::from(&course).to_string(), "course 5 Art -");

        let teacher = Teacher::new(1, "Alice", 10);
        assert_eq!(Record::from(&teacher).to_string(), "teacher 1 Alice 10");
    }

    #[test]
    fn test_encodable_names() {
        assert!(is_encodable_name("Bob"));
        assert!(!is_encodable_name(""));
        assert!(!is_encodable_name("Bob Smith"));
        assert!(!is_encodable_name("tab\there"));
    }
}
