// Database module
// Dual storage system: SQLite for document content, LanceDB for vectors

pub mod lancedb;
pub mod sqlite;

pub use sqlite::*;
