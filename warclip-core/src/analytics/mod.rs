//! Derived display values for recorded sessions
//!
//! Everything here is computed on demand from sessions already in memory and
//! is never persisted:
//!
//! - [`composition`]: role counts from a session's roster
//! - [`pulls`]: daily pull number among sibling recordings
//! - [`result`]: canonical result label from raw outcome flags
//! - [`dungeon`]: keystone level, result and affix names
//! - [`view`]: the bundle a list row renders
//!
//! None of these functions fail. Missing or unknown data degrades to
//! under-counting, a `0` pull number, or [`ResultLabel::Unknown`].

pub mod composition;
pub mod dungeon;
pub mod pulls;
pub mod result;
pub mod view;

pub use composition::{role_count, RoleCount};
pub use dungeon::DungeonSummary;
pub use pulls::{pull_number, pull_number_in};
pub use result::{ResultLabel, ResultResolver, StandardResultResolver};
pub use view::SessionView;
