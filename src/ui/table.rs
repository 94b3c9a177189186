use crate::entity::{Course, Id, Student, Teacher};
use crate::graph::GraphStats;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "Id")]
    id: Id,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Courses")]
    courses: String,
}

#[derive(Tabled)]
struct TeacherRow {
    #[tabled(rename = "Id")]
    id: Id,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Experience")]
    experience: u32,
    #[tabled(rename = "Courses")]
    courses: String,
}

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "Id")]
    id: Id,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Teacher")]
    teacher: String,
    #[tabled(rename = "Students")]
    students: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: usize,
}

fn id_list(ids: &[Id]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn student_table<'a>(students: impl Iterator<Item = &'a Student>) -> String {
    render(
        students
            .map(|s| StudentRow {
                id: s.id,
                name: s.name.clone(),
                courses: id_list(&s.course_ids),
            })
            .collect(),
    )
}

pub fn teacher_table<'a>(teachers: impl Iterator<Item = &'a Teacher>) -> String {
    render(
        teachers
            .map(|t| TeacherRow {
                id: t.id,
                name: t.name.clone(),
                experience: t.experience,
                courses: id_list(&t.course_ids),
            })
            .collect(),
    )
}

pub fn course_table<'a>(courses: impl Iterator<Item = &'a Course>) -> String {
    render(
        courses
            .map(|c| CourseRow {
                id: c.id,
                name: c.name.clone(),
                teacher: c.teacher_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                students: id_list(&c.student_ids),
            })
            .collect(),
    )
}

pub fn stats_table(stats: &GraphStats) -> String {
    render(vec![
        MetricRow { metric: "Students", value: stats.students },
        MetricRow { metric: "Teachers", value: stats.teachers },
        MetricRow { metric: "Courses", value: stats.courses },
        MetricRow { metric: "Courses without teacher", value: stats.unstaffed_courses },
        MetricRow { metric: "Enrollments", value: stats.enrollments },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SchoolGraph;

    #[test]
    fn test_tables_render_rows() {
        let mut graph = SchoolGraph::new();
        graph.create_teacher(1, "Alice", 10);
        graph.create_student(2, "Bob");
        graph.create_course(1, "Math", Some(1));
        graph.enroll(2, 1);

        let students = student_table(graph.students());
        assert!(students.contains("Bob"));
        let courses = course_table(graph.courses());
        assert!(courses.contains("Math"));
        assert!(teacher_table(graph.teachers()).contains("Alice"));
        assert!(stats_table(&graph.stats()).contains("Enrollments"));
    }

    #[test]
    fn test_empty_table_is_blank() {
        let graph = SchoolGraph::new();
        assert!(student_table(graph.students()).is_empty());
    }
}
