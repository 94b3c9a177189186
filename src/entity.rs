//! Entity types - students, teachers and courses
//!
//! Entities are plain data holders. Relations between them are stored as
//! id lists and kept consistent by [`crate::graph::SchoolGraph`], which is
//! also the only place entities are created.

use crate::record::ParseError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Identifier of an entity, unique within its own kind.
pub type Id = i64;

/// The three closed entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Student,
    Teacher,
    Course,
}

impl EntityKind {
    /// Get the record tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Student => "student",
            EntityKind::Teacher => "teacher",
            EntityKind::Course => "course",
        }
    }

    /// Get all entity kinds, in file order
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Student, EntityKind::Teacher, EntityKind::Course]
    }
}

impl FromStr for EntityKind {
    type Err = ParseError;

    /// Tags are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(EntityKind::Student),
            "teacher" => Ok(EntityKind::Teacher),
            "course" => Ok(EntityKind::Course),
            _ => Err(ParseError::UnknownTag(s.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A student and the courses it is enrolled in, in enrollment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: Id,
    pub name: String,
    pub course_ids: Vec<Id>,
}

impl Student {
    pub(crate) fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            course_ids: Vec::new(),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Student(Id={}, Name='{}', Courses=[{}])", self.id, self.name, join_ids(&self.course_ids))
    }
}

/// A teacher. `course_ids` mirrors the courses whose teacher link points here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teacher {
    pub id: Id,
    pub name: String,
    /// Years of experience
    pub experience: u32,
    pub course_ids: Vec<Id>,
}

impl Teacher {
    pub(crate) fn new(id: Id, name: impl Into<String>, experience: u32) -> Self {
        Self {
            id,
            name: name.into(),
            experience,
            course_ids: Vec::new(),
        }
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Teacher(Id={}, Name='{}', Experience={}, Courses=[{}])",
            self.id,
            self.name,
            self.experience,
            join_ids(&self.course_ids)
        )
    }
}

/// A course with an optional teacher link and its roster in enrollment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: Id,
    pub name: String,
    /// `None` until resolved against an existing teacher
    pub teacher_id: Option<Id>,
    pub student_ids: Vec<Id>,
}

impl Course {
    pub(crate) fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            teacher_id: None,
            student_ids: Vec::new(),
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let teacher = self
            .teacher_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "Course(Id={}, Name='{}', TeacherId={}, Students=[{}])",
            self.id,
            self.name,
            teacher,
            join_ids(&self.student_ids)
        )
    }
}

fn join_ids(ids: &[Id]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_roundtrip() {
        for kind in EntityKind::all() {
            let parsed: EntityKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_entity_kind_is_case_sensitive() {
        assert!(EntityKind::from_str("Student").is_err());
        assert!(EntityKind::from_str("COURSE").is_err());
        assert!(matches!(
            EntityKind::from_str("lecturer"),
            Err(ParseError::UnknownTag(tag)) if tag == "lecturer"
        ));
    }

    #[test]
    fn test_display() {
        let mut course = Course::new(1, "Math");
        course.student_ids = vec![2, 3];
        assert_eq!(course.to_string(), "Course(Id=1, Name='Math', TeacherId=-, Students=[2, 3])");

        course.teacher_id = Some(7);
        assert!(course.to_string().contains("TeacherId=7"));

        let teacher = Teacher::new(7, "Alice", 10);
        assert_eq!(teacher.to_string(), "Teacher(Id=7, Name='Alice', Experience=10, Courses=[])");
    }
}
