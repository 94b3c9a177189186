//! Storage Layer - flat text file persistence
//!
//! The system of record is a single UTF-8 file with one record per line
//! (see [`crate::record`]). Loads read the whole file before touching the
//! graph; saves rewrite the whole file through a temporary sibling that is
//! renamed into place.

pub mod text;

pub use text::TextStore;
