//! Keystone dungeon display values.

use serde::Serialize;

use crate::catalog::AffixCatalog;
use crate::types::{ContentCategory, VideoSession};

use super::result::{ResultLabel, ResultResolver};

/// What the library shows for a keystone run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DungeonSummary {
    pub name: Option<String>,
    pub level: Option<u32>,
    pub result: ResultLabel,
    /// Names of the affixes the catalog knows, in recorded order
    pub affixes: Vec<String>,
}

impl DungeonSummary {
    /// Summarize a keystone run; `None` for any other category.
    ///
    /// Unknown affix ids are left out.
    pub fn describe<A, R>(session: &VideoSession, affixes: &A, resolver: &R) -> Option<Self>
    where
        A: AffixCatalog + ?Sized,
        R: ResultResolver + ?Sized,
    {
        if session.category != ContentCategory::MythicPlus {
            return None;
        }

        Some(Self {
            name: session.encounter_name.clone(),
            level: session.level,
            result: resolver.resolve(session),
            affixes: session
                .affixes
                .iter()
                .filter_map(|id| affixes.affix_name(*id))
                .map(str::to_string)
                .collect(),
        })
    }

    /// e.g. "+12"
    pub fn level_label(&self) -> Option<String> {
        self.level.map(|level| format!("+{}", level))
    }
}
