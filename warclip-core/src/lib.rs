//! # warclip-core
//!
//! Core library for warclip - a browser and annotator for recorded game sessions.
//!
//! This library provides:
//! - Domain types for recorded sessions, rosters and outcomes
//! - Classification: role composition, pull numbering and result labels
//! - Tag annotations with background persistence and companion notification
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warclip_core::{
//!     BackgroundTagWriter, BuiltinCatalog, Config, ContentCategory, Database, Library,
//!     NullCompanion, StandardResultResolver, TagManager,
//! };
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Arc::new(Database::open(&Config::database_path()).expect("failed to open database"));
//! db.migrate().expect("failed to run migrations");
//!
//! let dir = config.library.resolve_dir(None).expect("no video directory");
//! let mut library = Library::scan(&dir, &config.library.video_extension).expect("scan failed");
//! library.apply_tags(&db).expect("failed to load tags");
//!
//! let catalog = BuiltinCatalog::new();
//! for view in library.views(ContentCategory::Raids, &catalog, &StandardResultResolver) {
//!     println!("{} {}", view.key, view.caption());
//! }
//!
//! let writer = Arc::new(BackgroundTagWriter::spawn(db.clone()).expect("failed to start writer"));
//! let tags = TagManager::new(writer.clone(), Arc::new(NullCompanion));
//! if let Some(session) = library.sessions().first().map(|s| s.key().clone()) {
//!     let session = library.get_mut(&session).expect("session present");
//!     tags.set_tag(session, "prog night");
//! }
//! writer.flush().expect("tag writer stopped");
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{
    pull_number, role_count, ResultLabel, ResultResolver, RoleCount, SessionView,
    StandardResultResolver,
};
pub use annotation::{TagManager, TagPersistence, TagUpdate};
pub use catalog::{AffixCatalog, BuiltinCatalog, Specialization, SpecializationCatalog};
pub use companion::{ChannelMessage, CompanionChannel, HttpCompanion, NullCompanion};
pub use config::Config;
pub use db::{BackgroundTagWriter, Database};
pub use error::{Error, Result};
pub use library::Library;
pub use types::*;

// Public modules
pub mod analytics;
pub mod annotation;
pub mod catalog;
pub mod companion;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod library;
pub mod logging;
pub mod types;
