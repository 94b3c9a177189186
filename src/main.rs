//! Schoolbook CLI - Command-line interface for the academic records store

use clap::{Parser, Subcommand, ValueEnum};
use schoolbook::config::{self, SchoolbookConfig};
use schoolbook::ui::{self, Icons};
use schoolbook::{Id, SchoolGraph, TextStore};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "schoolbook")]
#[command(version)]
#[command(about = "In-memory academic records store backed by a flat text file")]
#[command(long_about = r#"
Schoolbook keeps students, teachers and courses in a single text file:

  student <id> <name>
  teacher <id> <name> <experience>
  course <id> <name> <teacherId|-> [<studentId> ...]

Example usage:
  schoolbook add-teacher 1 Alice 10
  schoolbook add-student 2 Bob
  schoolbook add-course 1 Math --teacher 1
  schoolbook enroll 2 1
  schoolbook list courses
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the records file (overrides the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file pointing at the records file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Add or replace a student
    AddStudent { id: Id, name: String },

    /// Add or replace a teacher
    AddTeacher { id: Id, name: String, experience: u32 },

    /// Add or replace a course
    AddCourse {
        id: Id,
        name: String,

        /// Teacher id
        #[arg(short, long)]
        teacher: Option<Id>,
    },

    /// Enroll a student in a course
    Enroll { student: Id, course: Id },

    /// List entities
    List {
        /// Which entities to list (all when omitted)
        kind: Option<ListKind>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show statistics about the records file
    Stats,

    /// Load the records file and report dangling references
    Check,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    Students,
    Teachers,
    Courses,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded_config = config::load_config(Some(&config_path))?;
    let data_path = config::resolve_data_path(cli.data.clone(), loaded_config.as_ref());
    let store = TextStore::open(&data_path);

    match cli.command {
        Commands::Init { force } => {
            let config = SchoolbookConfig {
                data: Some(data_path.display().to_string()),
            };
            config::write_config(&config_path, &config, force)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }

        Commands::AddStudent { id, name } => {
            let (mut graph, _) = store.load_or_default()?;
            let student = graph.create_student(id, name);
            println!("{} {}", Icons::STUDENT, student);
            persist(&store, &graph)?;
        }

        Commands::AddTeacher { id, name, experience } => {
            let (mut graph, _) = store.load_or_default()?;
            let teacher = graph.create_teacher(id, name, experience);
            println!("{} {}", Icons::TEACHER, teacher);
            persist(&store, &graph)?;
        }

        Commands::AddCourse { id, name, teacher } => {
            let (mut graph, _) = store.load_or_default()?;
            let course = graph.create_course(id, name, teacher);
            println!("{} {}", Icons::COURSE, course);
            persist(&store, &graph)?;
        }

        Commands::Enroll { student, course } => {
            let (mut graph, _) = store.load_or_default()?;
            if graph.enroll(student, course) {
                println!("{} Student {} enrolled in course {}", Icons::LINK, student, course);
                persist(&store, &graph)?;
            } else {
                anyhow::bail!("student {} or course {} does not exist", student, course);
            }
        }

        Commands::List { kind, format } => {
            let (graph, _) = store.load()?;
            if format == "json" {
                let data = match kind {
                    Some(ListKind::Students) => serde_json::json!({ "students": graph.students().collect::<Vec<_>>() }),
                    Some(ListKind::Teachers) => serde_json::json!({ "teachers": graph.teachers().collect::<Vec<_>>() }),
                    Some(ListKind::Courses) => serde_json::json!({ "courses": graph.courses().collect::<Vec<_>>() }),
                    None => serde_json::json!({
                        "students": graph.students().collect::<Vec<_>>(),
                        "teachers": graph.teachers().collect::<Vec<_>>(),
                        "courses": graph.courses().collect::<Vec<_>>(),
                    }),
                };
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_lists(&graph, kind);
            }
        }

        Commands::Stats => {
            let (graph, _) = store.load()?;
            ui::header(&format!("Schoolbook Statistics ({})", data_path.display()));
            println!("{}", ui::stats_table(&graph.stats()));
        }

        Commands::Check => {
            let (graph, report) = store.load()?;
            ui::info("Records", &report.records.to_string());
            print!("{}", graph.stats());
            if report.dangling.is_empty() {
                ui::success("No dangling references");
            } else {
                ui::section("Dangling references");
                for reference in &report.dangling {
                    ui::warn(&reference.to_string());
                }
            }
        }
    }

    Ok(())
}

fn persist(store: &TextStore, graph: &SchoolGraph) -> anyhow::Result<()> {
    config::ensure_data_dir(store.path())?;
    store.save(graph)?;
    println!("{} {}", Icons::FILE, ui::dim(&format!("Saved to {}", store.path().display())));
    Ok(())
}

fn print_lists(graph: &SchoolGraph, kind: Option<ListKind>) {
    let show = |k: ListKind| kind.is_none_or(|selected| selected == k);

    if show(ListKind::Students) {
        ui::section("Students");
        println!("{}", ui::student_table(graph.students()));
    }
    if show(ListKind::Teachers) {
        ui::section("Teachers");
        println!("{}", ui::teacher_table(graph.teachers()));
    }
    if show(ListKind::Courses) {
        ui::section("Courses");
        println!("{}", ui::course_table(graph.courses()));
    }
}
