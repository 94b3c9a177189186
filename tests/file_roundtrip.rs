use std::fs;

use schoolbook::graph::Reference;
use schoolbook::{DanglingReference, Error, ParseError, SchoolGraph, TextStore};

fn sample_graph() -> SchoolGraph {
    let mut graph = SchoolGraph::new();
    graph.create_teacher(1, "Alecsandro", 10);
    graph.create_student(2, "Dennis");
    graph.create_student(3, "Jeff");
    graph.create_student(4, "Anton");
    graph.create_course(1, "Math", Some(1));
    graph.enroll(1, 1);
    graph.enroll(2, 1);
    graph.enroll(3, 1);
    graph.enroll(4, 1);
    graph
}

#[test]
fn test_save_then_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = TextStore::open(dir.path().join("data.txt"));

    let graph = sample_graph();
    store.save(&graph).unwrap();

    let contents = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        contents,
        "student 2 Dennis\nstudent 3 Jeff\nstudent 4 Anton\nteacher 1 Alecsandro 10\ncourse 1 Math 1 2 3 4\n"
    );

    let (loaded, report) = store.load().unwrap();
    assert!(report.dangling.is_empty());
    assert_eq!(report.records, 5);
    assert_eq!(loaded.course(1), graph.course(1));
    assert_eq!(loaded.teacher(1), graph.teacher(1));
    assert_eq!(loaded.students().collect::<Vec<_>>(), graph.students().collect::<Vec<_>>());
    assert!(!dir.path().join("data.txt.tmp").exists());
}

#[test]
fn test_save_overwrites_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(&path, "student 9 Stale\nstudent 8 Older\nstudent 7 Oldest\n").unwrap();

    let mut graph = SchoolGraph::new();
    graph.create_student(1, "Fresh");
    TextStore::open(&path).save(&graph).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "student 1 Fresh\n");
}

#[test]
fn test_failed_save_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(&path, "student 1 Bob\n").unwrap();

    let mut graph = SchoolGraph::new();
    graph.create_student(1, "Bob Smith");
    let err = TextStore::open(&path).save(&graph).unwrap_err();

    assert!(matches!(err, Error::Unencodable { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "student 1 Bob\n");
    assert!(!dir.path().join("data.txt.tmp").exists());
}

#[test]
fn test_malformed_file_is_rejected_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(&path, "teacher 1 Alice 10\ncourse 1 Math 1\nstudent two Bob\n").unwrap();

    let mut graph = sample_graph();
    let before: Vec<_> = graph.records().collect();

    let err = TextStore::open(&path).load_into(&mut graph).unwrap_err();
    match err {
        Error::Parse { line, source } => {
            assert_eq!(line, 3);
            assert_eq!(source, ParseError::InvalidNumber { field: "id", value: "two".into() });
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(graph.records().collect::<Vec<_>>(), before);
}

#[test]
fn test_dangling_references_reported_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    fs::write(&path, "course 5 Art 3 1\nstudent 2 Bob\n").unwrap();

    let (graph, report) = TextStore::open(&path).load().unwrap();
    assert_eq!(
        report.dangling,
        vec![
            DanglingReference { course_id: 5, target: Reference::Teacher(3) },
            DanglingReference { course_id: 5, target: Reference::Student(1) },
        ]
    );
    assert!(graph.course(5).unwrap().student_ids.is_empty());
    assert!(graph.student(2).unwrap().course_ids.is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = TextStore::open(dir.path().join("absent.txt"));
    assert!(matches!(store.load(), Err(Error::Io(_))));
}
