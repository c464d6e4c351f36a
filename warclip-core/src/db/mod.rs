//! Tag storage
//!
//! SQLite holds the latest tag per session, keyed by storage domain and
//! session id. Writes from the annotation path go through
//! [`BackgroundTagWriter`] so callers never wait on disk.

pub mod repo;
pub mod schema;
mod writer;

pub use repo::{Database, StoredTag};
pub use writer::BackgroundTagWriter;
