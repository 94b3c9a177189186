//! School Graph - In-memory store of students, teachers and courses
//!
//! Entities live in flat keyed collections that remember insertion order.
//! Relations are id lists on both ends and are only ever changed through
//! [`SchoolGraph::enroll`] and [`SchoolGraph::assign_teacher`], which update
//! both sides in one step.

use std::collections::HashMap;
use std::fmt;
use std::io::{BufRead, Write};

use crate::entity::{Course, EntityKind, Id, Student, Teacher};
use crate::record::{self, Record};
use crate::{Error, Result};

/// Entities of one kind, keyed by id, iterated in insertion order.
#[derive(Debug, Clone)]
struct Table<T> {
    rows: Vec<T>,
    positions: HashMap<Id, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn get(&self, id: Id) -> Option<&T> {
        let pos = *self.positions.get(&id)?;
        Some(&self.rows[pos])
    }

    fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        let pos = *self.positions.get(&id)?;
        Some(&mut self.rows[pos])
    }

    fn contains(&self, id: Id) -> bool {
        self.positions.contains_key(&id)
    }

    /// Update the row for `id` in place, or append a new one.
    fn upsert(&mut self, id: Id, create: impl FnOnce() -> T, update: impl FnOnce(&mut T)) -> &mut T {
        let pos = match self.positions.get(&id) {
            Some(&pos) => {
                update(&mut self.rows[pos]);
                pos
            }
            None => {
                self.rows.push(create());
                let pos = self.rows.len() - 1;
                self.positions.insert(id, pos);
                pos
            }
        };
        &mut self.rows[pos]
    }

    fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.positions.clear();
    }
}

fn push_unique(ids: &mut Vec<Id>, id: Id) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Insert `course_id` into a teacher's course list, which is kept in course
/// insertion order so it is the same after a reload.
fn insert_in_course_order(ids: &mut Vec<Id>, course_id: Id, positions: &HashMap<Id, usize>) {
    if ids.contains(&course_id) {
        return;
    }
    let rank = |id: &Id| positions.get(id).copied().unwrap_or(usize::MAX);
    let at = ids.partition_point(|id| rank(id) < rank(&course_id));
    ids.insert(at, course_id);
}

/// The target of a course reference that had no matching entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Teacher(Id),
    Student(Id),
}

/// A course reference left unlinked because its target does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingReference {
    pub course_id: Id,
    pub target: Reference,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Reference::Teacher(id) => write!(f, "course {} references missing teacher {}", self.course_id, id),
            Reference::Student(id) => write!(f, "course {} references missing student {}", self.course_id, id),
        }
    }
}

/// Outcome of a successful load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of records decoded (blank lines excluded)
    pub records: usize,
    /// References that were skipped during linking
    pub dangling: Vec<DanglingReference>,
}

/// In-memory graph of students, teachers and courses.
#[derive(Debug, Clone, Default)]
pub struct SchoolGraph {
    students: Table<Student>,
    teachers: Table<Teacher>,
    courses: Table<Course>,
}

impl SchoolGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Creation ==========

    /// Insert a student, or rename the existing one with this id.
    ///
    /// An existing student keeps its position and its enrollments.
    pub fn create_student(&mut self, id: Id, name: impl Into<String>) -> &Student {
        let name = name.into();
        self.students.upsert(
            id,
            || Student::new(id, name.clone()),
            |student| student.name = name.clone(),
        )
    }

    /// Insert a teacher, or replace the name and experience of the existing one.
    pub fn create_teacher(&mut self, id: Id, name: impl Into<String>, experience: u32) -> &Teacher {
        let name = name.into();
        self.teachers.upsert(
            id,
            || Teacher::new(id, name.clone(), experience),
            |teacher| {
                teacher.name = name.clone();
                teacher.experience = experience;
            },
        )
    }

    /// Insert a course, or rename the existing one, then link it to
    /// `teacher_id` if that teacher exists. A missing teacher leaves the
    /// course without one.
    pub fn create_course(&mut self, id: Id, name: impl Into<String>, teacher_id: Option<Id>) -> &Course {
        self.upsert_course(id, name.into());
        if !self.assign_teacher(id, teacher_id) {
            if let Some(teacher_id) = teacher_id {
                tracing::warn!("Course {} references missing teacher {}, leaving it unassigned", id, teacher_id);
            }
        }
        &self.courses.rows[self.courses.positions[&id]]
    }

    fn upsert_course(&mut self, id: Id, name: String) {
        self.courses.upsert(
            id,
            || Course::new(id, name.clone()),
            |course| course.name = name.clone(),
        );
    }

    // ========== Linking ==========

    /// Enroll a student in a course, updating both sides.
    ///
    /// Returns `false` and changes nothing if either entity is missing.
    /// Enrolling twice is a no-op.
    pub fn enroll(&mut self, student_id: Id, course_id: Id) -> bool {
        if !self.courses.contains(course_id) {
            return false;
        }
        let Some(student) = self.students.get_mut(student_id) else {
            return false;
        };
        push_unique(&mut student.course_ids, course_id);

        if let Some(course) = self.courses.get_mut(course_id) {
            push_unique(&mut course.student_ids, student_id);
        }
        true
    }

    /// Set or clear a course's teacher, keeping the teacher's course list in sync.
    ///
    /// The teacher's list follows course insertion order, not assignment order.
    ///
    /// Returns `true` if the course now has exactly the requested link. A
    /// request for a missing teacher clears the course's teacher and returns
    /// `false`, as does a missing course.
    pub fn assign_teacher(&mut self, course_id: Id, teacher_id: Option<Id>) -> bool {
        let Some(course) = self.courses.get_mut(course_id) else {
            return false;
        };
        let target = teacher_id.filter(|id| self.teachers.contains(*id));
        let previous = std::mem::replace(&mut course.teacher_id, target);

        if previous != target {
            if let Some(old) = previous {
                if let Some(old) = self.teachers.get_mut(old) {
                    old.course_ids.retain(|&id| id != course_id);
                }
            }
        }
        if let Some(target) = target {
            if let Some(teacher) = self.teachers.get_mut(target) {
                insert_in_course_order(&mut teacher.course_ids, course_id, &self.courses.positions);
            }
        }

        target == teacher_id
    }

    // ========== Lookup ==========

    pub fn student(&self, id: Id) -> Option<&Student> {
        self.students.get(id)
    }

    pub fn teacher(&self, id: Id) -> Option<&Teacher> {
        self.teachers.get(id)
    }

    pub fn course(&self, id: Id) -> Option<&Course> {
        self.courses.get(id)
    }

    /// All students in insertion order
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    /// All teachers in insertion order
    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.iter()
    }

    /// All courses in insertion order
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    /// Get the teacher linked to a course
    pub fn teacher_of(&self, course_id: Id) -> Option<&Teacher> {
        self.course(course_id)
            .and_then(|course| course.teacher_id)
            .and_then(|id| self.teacher(id))
    }

    /// Get the students enrolled in a course, in enrollment order
    pub fn students_of(&self, course_id: Id) -> Vec<&Student> {
        self.course(course_id)
            .map(|course| course.student_ids.iter().filter_map(|&id| self.student(id)).collect())
            .unwrap_or_default()
    }

    /// Get the courses a student is enrolled in, in enrollment order
    pub fn courses_of(&self, student_id: Id) -> Vec<&Course> {
        self.student(student_id)
            .map(|student| student.course_ids.iter().filter_map(|&id| self.course(id)).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.students.len() == 0 && self.teachers.len() == 0 && self.courses.len() == 0
    }

    /// Drop every entity, returning to the empty state
    pub fn clear(&mut self) {
        self.students.clear();
        self.teachers.clear();
        self.courses.clear();
    }

    // ========== Load / Save ==========

    /// Load records from a line source into this graph.
    ///
    /// Every line is decoded before the graph is touched, so a malformed
    /// line leaves the graph exactly as it was. Entities are then created
    /// (phase 1) and course references linked (phase 2), which makes the
    /// result independent of line order. Existing ids are replaced in place.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<LoadReport> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let mut line = line?;
            if index == 0 {
                if let Some(rest) = line.strip_prefix('\u{feff}') {
                    line = rest.to_string();
                }
            }
            if line.trim().is_empty() {
                continue;
            }
            let record = Record::parse(&line).map_err(|source| Error::Parse { line: index + 1, source })?;
            records.push(record);
        }

        // Phase 1: entities only
        for record in &records {
            tracing::debug!("Creating {} {}", record.kind(), record.id());
            match record {
                Record::Student { id, name } => {
                    self.create_student(*id, name.as_str());
                }
                Record::Teacher { id, name, experience } => {
                    self.create_teacher(*id, name.as_str(), *experience);
                }
                Record::Course { id, name, .. } => self.upsert_course(*id, name.clone()),
            }
        }

        // Phase 2: resolve course references
        let mut dangling = Vec::new();
        for record in &records {
            let Record::Course { id, teacher_id, student_ids, .. } = record else {
                continue;
            };
            if !self.assign_teacher(*id, *teacher_id) {
                if let Some(teacher_id) = teacher_id {
                    dangling.push(DanglingReference {
                        course_id: *id,
                        target: Reference::Teacher(*teacher_id),
                    });
                }
            }
            for &student_id in student_ids {
                if !self.enroll(student_id, *id) {
                    dangling.push(DanglingReference {
                        course_id: *id,
                        target: Reference::Student(student_id),
                    });
                }
            }
        }

        for reference in &dangling {
            tracing::warn!("Skipping dangling reference: {}", reference);
        }
        tracing::info!("Loaded {} records ({} dangling references)", records.len(), dangling.len());

        Ok(LoadReport {
            records: records.len(),
            dangling,
        })
    }

    /// Encode the graph as records: students, then teachers, then courses,
    /// each in insertion order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.students
            .iter()
            .map(Record::from)
            .chain(self.teachers.iter().map(Record::from))
            .chain(self.courses.iter().map(Record::from))
    }

    /// Write every record to `writer`, one per line.
    ///
    /// Names are checked before the first byte is written; a name that would
    /// not decode back fails with [`Error::Unencodable`].
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        self.check_encodable()?;

        let mut count = 0;
        for record in self.records() {
            writeln!(writer, "{}", record)?;
            count += 1;
        }
        writer.flush()?;

        tracing::info!("Saved {} records", count);
        Ok(())
    }

    fn check_encodable(&self) -> Result<()> {
        match self.records().find(|record| !record::is_encodable_name(record.name())) {
            Some(record) => Err(Error::Unencodable {
                kind: record.kind(),
                id: record.id(),
                name: record.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            students: self.students.len(),
            teachers: self.teachers.len(),
            courses: self.courses.len(),
            enrollments: self.courses.iter().map(|c| c.student_ids.len()).sum(),
            unstaffed_courses: self.courses.iter().filter(|c| c.teacher_id.is_none()).count(),
        }
    }

    /// Get the number of entities of a kind
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Student => self.students.len(),
            EntityKind::Teacher => self.teachers.len(),
            EntityKind::Course => self.courses.len(),
        }
    }
}

/// Statistics about a school graph
#[derive(Debug, Clone, serde::Serialize)]
pub struct GraphStats {
    pub students: usize,
    pub teachers: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub unstaffed_courses: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "School Graph Statistics:")?;
        writeln!(f, "  Students: {}", self.students)?;
        writeln!(f, "  Teachers: {}", self.teachers)?;
        writeln!(f, "  Courses: {} (without teacher: {})", self.courses, self.unstaffed_courses)?;
        writeln!(f, "  Enrollments: {}", self.enrollments)
    }
}
