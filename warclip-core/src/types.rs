//! Core domain types for warclip
//!
//! These types describe the recording library: one [`VideoSession`] per
//! recorded clip, keyed by [`SessionKey`].
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One recorded encounter or clip with its metadata |
//! | **Pull** | One attempt at an encounter, numbered within its day and difficulty |
//! | **Role** | Combat function of a combatant (tank, healer, damage) |
//! | **Storage domain** | Whether a session lives on local disk or in cloud storage |
//!
//! ### Identity
//!
//! Local and cloud storage have disjoint identifier spaces: a local session is
//! identified by its video path, a cloud session by its object name. The pair
//! `(domain, id)` is the only identity a session has. Two `VideoSession` values
//! with the same key describe the same recording.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Identity
// ============================================

/// Where a session's canonical copy lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageDomain {
    Local,
    Cloud,
}

impl StorageDomain {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageDomain::Local => "local",
            StorageDomain::Cloud => "cloud",
        }
    }

    pub fn is_cloud(&self) -> bool {
        matches!(self, StorageDomain::Cloud)
    }
}

impl std::fmt::Display for StorageDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StorageDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(StorageDomain::Local),
            "cloud" => Ok(StorageDomain::Cloud),
            _ => Err(format!("unknown storage domain: {}", s)),
        }
    }
}

/// Stable identity of a session: storage domain plus identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub domain: StorageDomain,
    /// Video path for local sessions, object name for cloud sessions
    pub id: String,
}

impl SessionKey {
    pub fn new(domain: StorageDomain, id: impl Into<String>) -> Self {
        Self {
            domain,
            id: id.into(),
        }
    }

    pub fn local(path: impl Into<String>) -> Self {
        Self::new(StorageDomain::Local, path)
    }

    pub fn cloud(name: impl Into<String>) -> Self {
        Self::new(StorageDomain::Cloud, name)
    }

    pub fn is_cloud(&self) -> bool {
        self.domain.is_cloud()
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.domain, self.id)
    }
}

// ============================================
// Content
// ============================================

/// Kind of content a recording holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentCategory {
    #[serde(rename = "2v2")]
    TwoVTwo,
    #[serde(rename = "3v3")]
    ThreeVThree,
    #[serde(rename = "5v5")]
    FiveVFive,
    #[serde(rename = "Skirmish")]
    Skirmish,
    #[serde(rename = "Solo Shuffle")]
    SoloShuffle,
    #[serde(rename = "Mythic+")]
    MythicPlus,
    #[serde(rename = "Raids")]
    Raids,
    #[serde(rename = "Battlegrounds")]
    Battlegrounds,
    #[serde(rename = "Clips")]
    Clips,
}

impl ContentCategory {
    /// All categories, in the order they are presented
    pub const ALL: [ContentCategory; 9] = [
        ContentCategory::TwoVTwo,
        ContentCategory::ThreeVThree,
        ContentCategory::FiveVFive,
        ContentCategory::Skirmish,
        ContentCategory::SoloShuffle,
        ContentCategory::MythicPlus,
        ContentCategory::Raids,
        ContentCategory::Battlegrounds,
        ContentCategory::Clips,
    ];

    /// Returns the label used in sidecar metadata and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::TwoVTwo => "2v2",
            ContentCategory::ThreeVThree => "3v3",
            ContentCategory::FiveVFive => "5v5",
            ContentCategory::Skirmish => "Skirmish",
            ContentCategory::SoloShuffle => "Solo Shuffle",
            ContentCategory::MythicPlus => "Mythic+",
            ContentCategory::Raids => "Raids",
            ContentCategory::Battlegrounds => "Battlegrounds",
            ContentCategory::Clips => "Clips",
        }
    }

    pub fn is_pvp(&self) -> bool {
        matches!(
            self,
            ContentCategory::TwoVTwo
                | ContentCategory::ThreeVThree
                | ContentCategory::FiveVFive
                | ContentCategory::Skirmish
                | ContentCategory::SoloShuffle
                | ContentCategory::Battlegrounds
        )
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ContentCategory::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", c).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

// ============================================
// Roster
// ============================================

/// Combat function of a specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    Damage,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tank => "tank",
            Role::Healer => "healer",
            Role::Damage => "damage",
        }
    }
}

/// One roster entry of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Specialization id, if the recorder saw one
    pub spec_id: Option<u32>,
    pub name: Option<String>,
    pub realm: Option<String>,
}

impl Combatant {
    pub fn with_spec(spec_id: u32) -> Self {
        Self {
            spec_id: Some(spec_id),
            ..Default::default()
        }
    }
}

/// Raw outcome flags as recorded
///
/// `result` means kill for raids and timed/completed for dungeons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub result: bool,
    /// Keystone upgrade level; `Some(0)` is a depleted key
    pub upgrade_level: Option<u8>,
    pub abandoned: bool,
}

// ============================================
// Session
// ============================================

/// One recorded clip.
///
/// The key and capture time are fixed at construction. The tag can be read
/// freely but is only written through
/// [`TagManager`](crate::annotation::TagManager). Sidecar JSON is parsed in
/// [`library`](crate::library), never directly into this type.
#[derive(Debug, Clone)]
pub struct VideoSession {
    key: SessionKey,
    captured_at: DateTime<Utc>,
    pub category: ContentCategory,
    pub encounter_id: Option<u32>,
    pub difficulty_id: Option<u32>,
    pub encounter_name: Option<String>,
    pub zone_id: Option<u32>,
    pub duration_secs: Option<u64>,
    pub combatants: Vec<Combatant>,
    pub outcome: Outcome,
    /// Keystone level (dungeons only)
    pub level: Option<u32>,
    /// Affix ids (dungeons only)
    pub affixes: Vec<u32>,
    tag: Option<String>,
}

impl VideoSession {
    pub fn new(key: SessionKey, captured_at: DateTime<Utc>, category: ContentCategory) -> Self {
        Self {
            key,
            captured_at,
            category,
            encounter_id: None,
            difficulty_id: None,
            encounter_name: None,
            zone_id: None,
            duration_secs: None,
            combatants: Vec::new(),
            outcome: Outcome::default(),
            level: None,
            affixes: Vec::new(),
            tag: None,
        }
    }

    /// Set encounter and difficulty ids
    pub fn with_encounter(mut self, encounter_id: u32, difficulty_id: u32) -> Self {
        self.encounter_id = Some(encounter_id);
        self.difficulty_id = Some(difficulty_id);
        self
    }

    pub fn with_combatants(mut self, combatants: Vec<Combatant>) -> Self {
        self.combatants = combatants;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Attach the tag a loader read from storage
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// True when a non-empty tag is present
    pub fn has_tag(&self) -> bool {
        self.tag.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub(crate) fn replace_tag(&mut self, tag: String) {
        self.tag = Some(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn category_round_trips_through_str() {
        for category in ContentCategory::ALL {
            let parsed: ContentCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!(
            "mythicplus".parse::<ContentCategory>().unwrap(),
            ContentCategory::MythicPlus
        );
        assert!("quests".parse::<ContentCategory>().is_err());
    }

    #[test]
    fn category_serializes_with_sidecar_labels() {
        let json = serde_json::to_string(&ContentCategory::SoloShuffle).unwrap();
        assert_eq!(json, "\"Solo Shuffle\"");
        let parsed: ContentCategory = serde_json::from_str("\"Mythic+\"").unwrap();
        assert_eq!(parsed, ContentCategory::MythicPlus);
    }

    #[test]
    fn session_key_display_includes_domain() {
        assert_eq!(SessionKey::local("/v/a.mp4").to_string(), "local:/v/a.mp4");
        assert_eq!(SessionKey::cloud("a.mp4").to_string(), "cloud:a.mp4");
        assert_ne!(SessionKey::local("a.mp4"), SessionKey::cloud("a.mp4"));
    }

    #[test]
    fn empty_tag_is_not_a_tag() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        let session = VideoSession::new(SessionKey::local("a"), at, ContentCategory::Clips);
        assert!(!session.has_tag());
        assert!(!session.clone().with_tag("").has_tag());
        assert!(session.with_tag("wipe on p3").has_tag());
    }
}
