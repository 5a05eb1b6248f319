//! Core data model types for daybook_db

mod entry;

pub use entry::{Entry, Log};
