//! # Schoolbook - In-memory academic records store
//!
//! Holds students, teachers and courses, links them by identifier and
//! persists the whole graph to and from a flat text file.
//!
//! Schoolbook provides:
//! - Plain entity types keyed by integer ids (one namespace per kind)
//! - A line codec between `student|teacher|course` records and entities
//! - An in-memory graph that keeps enrollments bidirectional
//! - Two-pass loading (parse everything, then resolve references)
//! - File persistence with atomic replace on save

pub mod entity;
pub mod record;
pub mod graph;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use entity::{Course, EntityKind, Id, Student, Teacher};
pub use record::{ParseError, Record};
pub use graph::{DanglingReference, LoadReport, SchoolGraph};
pub use storage::TextStore;

/// Result type alias for Schoolbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Schoolbook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot encode {kind} {id}: name {name:?} is empty or contains whitespace")]
    Unencodable {
        kind: EntityKind,
        id: Id,
        name: String,
    },
}
