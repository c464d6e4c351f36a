//! Per-session display values for list views.

use serde::Serialize;

use crate::catalog::{AffixCatalog, SpecializationCatalog};
use crate::format;
use crate::types::{SessionKey, VideoSession};

use super::composition::{role_count, RoleCount};
use super::dungeon::DungeonSummary;
use super::pulls::pull_number;
use super::result::{ResultLabel, ResultResolver};

/// Everything a list row needs to render one recording.
///
/// Built on demand; nothing here is cached on the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub key: SessionKey,
    pub result: ResultLabel,
    /// 0 when no pull number applies
    pub pull: u32,
    /// `None` when the roster is empty
    pub roles: Option<RoleCount>,
    pub dungeon: Option<DungeonSummary>,
    pub tag: Option<String>,
}

impl SessionView {
    /// Compute display values for `session` against its category list.
    pub fn describe<'a, C, R>(
        session: &VideoSession,
        siblings: impl IntoIterator<Item = &'a VideoSession>,
        catalog: &C,
        resolver: &R,
    ) -> Self
    where
        C: SpecializationCatalog + AffixCatalog + ?Sized,
        R: ResultResolver + ?Sized,
    {
        let roles = if session.combatants.is_empty() {
            None
        } else {
            Some(role_count(&session.combatants, catalog))
        };

        Self {
            key: session.key().clone(),
            result: resolver.resolve(session),
            pull: pull_number(session, siblings),
            roles,
            dungeon: DungeonSummary::describe(session, catalog, resolver),
            tag: session.tag().map(str::to_string),
        }
    }

    /// "Kill (Pull 3)", or just the result when no pull number applies
    pub fn caption(&self) -> String {
        format::pull_caption(self.result, self.pull)
    }
}
