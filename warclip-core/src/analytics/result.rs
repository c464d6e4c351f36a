//! Canonical result labels for recorded sessions.

use serde::Serialize;

use crate::types::{ContentCategory, VideoSession};

/// Closed set of outcome categories shown next to a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultLabel {
    Kill,
    Wipe,
    TimedRun,
    DepletedRun,
    Abandoned,
    Unknown,
}

impl ResultLabel {
    /// Display identifier, stable across releases
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultLabel::Kill => "Kill",
            ResultLabel::Wipe => "Wipe",
            ResultLabel::TimedRun => "Timed",
            ResultLabel::DepletedRun => "Depleted",
            ResultLabel::Abandoned => "Abandoned",
            ResultLabel::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a session's raw outcome flags to a [`ResultLabel`]
pub trait ResultResolver {
    fn resolve(&self, session: &VideoSession) -> ResultLabel;
}

/// Resolver for raid and keystone dungeon content.
///
/// Raids resolve to kill or wipe. Keystone runs resolve to abandoned, timed
/// (result set and upgraded by at least one level) or depleted. Every other
/// category resolves to [`ResultLabel::Unknown`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResultResolver;

impl ResultResolver for StandardResultResolver {
    fn resolve(&self, session: &VideoSession) -> ResultLabel {
        let outcome = &session.outcome;

        match session.category {
            ContentCategory::Raids => {
                if outcome.result {
                    ResultLabel::Kill
                } else {
                    ResultLabel::Wipe
                }
            }
            ContentCategory::MythicPlus => {
                if outcome.abandoned {
                    ResultLabel::Abandoned
                } else if outcome.result && outcome.upgrade_level.map_or(true, |u| u > 0) {
                    ResultLabel::TimedRun
                } else {
                    ResultLabel::DepletedRun
                }
            }
            _ => ResultLabel::Unknown,
        }
    }
}
