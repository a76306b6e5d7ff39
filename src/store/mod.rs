//! Persistence layer: libSQL-backed storage for users, drafts and profile sections.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::Database;

#[cfg(test)]
pub(crate) mod testing;
