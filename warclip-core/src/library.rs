//! Recording library
//!
//! The recorder writes a JSON sidecar next to every video. A library is the
//! set of sessions loaded from those sidecars, with stored tags overlaid.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::analytics::{ResultResolver, SessionView};
use crate::catalog::{AffixCatalog, SpecializationCatalog};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{
    Combatant, ContentCategory, Outcome, SessionKey, StorageDomain, VideoSession,
};

/// Sidecar file as written by the recorder
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SidecarMetadata {
    category: ContentCategory,
    /// Epoch milliseconds
    start: Option<i64>,
    #[serde(rename = "encounterID")]
    encounter_id: Option<u32>,
    #[serde(rename = "difficultyID")]
    difficulty_id: Option<u32>,
    #[serde(rename = "zoneID")]
    zone_id: Option<u32>,
    encounter_name: Option<String>,
    duration: Option<u64>,
    #[serde(default)]
    result: bool,
    upgrade_level: Option<u8>,
    #[serde(default)]
    abandoned: bool,
    keystone_level: Option<u32>,
    #[serde(default)]
    affixes: Vec<u32>,
    #[serde(default)]
    combatants: Vec<SidecarCombatant>,
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SidecarCombatant {
    #[serde(rename = "_specID")]
    spec_id: Option<u32>,
    #[serde(rename = "_name")]
    name: Option<String>,
    #[serde(rename = "_realm")]
    realm: Option<String>,
}

impl SidecarMetadata {
    fn into_session(self, key: SessionKey, fallback_time: DateTime<Utc>) -> VideoSession {
        let captured_at = self
            .start
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or(fallback_time);

        let mut session = VideoSession::new(key, captured_at, self.category);
        session.encounter_id = self.encounter_id;
        session.difficulty_id = self.difficulty_id;
        session.zone_id = self.zone_id;
        session.encounter_name = self.encounter_name;
        session.duration_secs = self.duration;
        session.outcome = Outcome {
            result: self.result,
            upgrade_level: self.upgrade_level,
            abandoned: self.abandoned,
        };
        session.level = self.keystone_level;
        session.affixes = self.affixes;
        session.combatants = self
            .combatants
            .into_iter()
            .map(|c| Combatant {
                spec_id: c.spec_id,
                name: c.name,
                realm: c.realm,
            })
            .collect();

        match self.tag {
            Some(tag) => session.with_tag(tag),
            None => session,
        }
    }
}

/// Load one sidecar. The session key is the video path next to it.
pub fn load_sidecar(path: &Path, video_extension: &str) -> Result<VideoSession> {
    let content = std::fs::read_to_string(path)?;
    let metadata: SidecarMetadata =
        serde_json::from_str(&content).map_err(|e| Error::Metadata {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let video = path.with_extension(video_extension);
    let fallback_time = modified_time(&video)
        .or_else(|| modified_time(path))
        .unwrap_or_else(Utc::now);

    let key = SessionKey::local(video.to_string_lossy().into_owned());
    Ok(metadata.into_session(key, fallback_time))
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// All loaded sessions
#[derive(Debug, Clone, Default)]
pub struct Library {
    sessions: Vec<VideoSession>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: Vec<VideoSession>) -> Self {
        Self { sessions }
    }

    /// Scan `dir` for sidecar files.
    ///
    /// Sidecars that cannot be read or parsed are logged and skipped.
    pub fn scan(dir: &Path, video_extension: &str) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "video directory does not exist: {}",
                dir.display()
            )));
        }

        let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));

        let entries = glob::glob(&pattern)
            .map_err(|e| Error::Config(format!("invalid video directory pattern: {}", e)))?;

        let mut sessions = Vec::new();
        let mut skipped = 0usize;
        for entry in entries {
            let path: PathBuf = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable library entry");
                    skipped += 1;
                    continue;
                }
            };

            match load_sidecar(&path, video_extension) {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping sidecar");
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            dir = %dir.display(),
            loaded = sessions.len(),
            skipped,
            "Library scanned"
        );

        Ok(Self { sessions })
    }

    /// Overlay tags from the store onto loaded sessions.
    ///
    /// Returns the number of sessions whose tag came from the store.
    pub fn apply_tags(&mut self, db: &Database) -> Result<usize> {
        let local = db.load_tags(StorageDomain::Local)?;
        let cloud = db.load_tags(StorageDomain::Cloud)?;

        let mut applied = 0;
        for session in &mut self.sessions {
            let stored = match session.key().domain {
                StorageDomain::Local => local.get(&session.key().id),
                StorageDomain::Cloud => cloud.get(&session.key().id),
            };
            if let Some(tag) = stored {
                session.replace_tag(tag.clone());
                applied += 1;
            }
        }
        Ok(applied)
    }

    pub fn sessions(&self) -> &[VideoSession] {
        &self.sessions
    }

    /// Sessions in one category, newest first
    pub fn category(&self, category: ContentCategory) -> Vec<&VideoSession> {
        let mut list: Vec<&VideoSession> = self
            .sessions
            .iter()
            .filter(|s| s.category == category)
            .collect();
        list.sort_by_key(|s| std::cmp::Reverse(s.captured_at()));
        list
    }

    /// Display rows for one category, newest first
    pub fn views<C, R>(
        &self,
        category: ContentCategory,
        catalog: &C,
        resolver: &R,
    ) -> Vec<SessionView>
    where
        C: SpecializationCatalog + AffixCatalog + ?Sized,
        R: ResultResolver + ?Sized,
    {
        let list = self.category(category);
        list.iter()
            .map(|s| SessionView::describe(s, list.iter().copied(), catalog, resolver))
            .collect()
    }

    pub fn get(&self, key: &SessionKey) -> Option<&VideoSession> {
        self.sessions.iter().find(|s| s.key() == key)
    }

    pub fn get_mut(&mut self, key: &SessionKey) -> Option<&mut VideoSession> {
        self.sessions.iter_mut().find(|s| s.key() == key)
    }

    /// Like [`Library::get_mut`] but fails with `SessionNotFound`
    pub fn require_mut(&mut self, key: &SessionKey) -> Result<&mut VideoSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.key() == key)
            .ok_or_else(|| Error::SessionNotFound(key.to_string()))
    }

    /// Add a session, replacing any session with the same key
    pub fn insert(&mut self, session: VideoSession) -> Option<VideoSession> {
        match self.sessions.iter().position(|s| s.key() == session.key()) {
            Some(i) => Some(std::mem::replace(&mut self.sessions[i], session)),
            None => {
                self.sessions.push(session);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &SessionKey) -> Option<VideoSession> {
        let i = self.sessions.iter().position(|s| s.key() == key)?;
        Some(self.sessions.remove(i))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{ResultLabel, StandardResultResolver};
    use crate::catalog::BuiltinCatalog;
    use std::fs;
    use tempfile::TempDir;

    const RAID_SIDECAR: &str = r#"{
        "category": "Raids",
        "start": 1725958800000,
        "encounterID": 2902,
        "difficultyID": 16,
        "zoneID": 2657,
        "encounterName": "Ulgrax the Devourer",
        "duration": 312,
        "result": true,
        "combatants": [
            { "_specID": 73, "_name": "Shieldwall", "_realm": "Draenor" },
            { "_specID": 65, "_name": "Lightmend", "_realm": "Draenor" },
            { "_specID": 62, "_name": "Blinky", "_realm": "Silvermoon" }
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn scan_reads_sidecar_fields() {
        let dir = TempDir::new().unwrap();
        write(&dir, "2024-09-10 09-00-00 - Ulgrax.json", RAID_SIDECAR);

        let library = Library::scan(dir.path(), "mp4").unwrap();
        assert_eq!(library.len(), 1);

        let session = &library.sessions()[0];
        assert!(session.key().id.ends_with("2024-09-10 09-00-00 - Ulgrax.mp4"));
        assert_eq!(session.key().domain, StorageDomain::Local);
        assert_eq!(session.category, ContentCategory::Raids);
        assert_eq!(session.captured_at().timestamp_millis(), 1_725_958_800_000);
        assert_eq!(session.encounter_id, Some(2902));
        assert_eq!(session.difficulty_id, Some(16));
        assert_eq!(session.zone_id, Some(2657));
        assert_eq!(session.duration_secs, Some(312));
        assert_eq!(session.combatants.len(), 3);
        assert_eq!(session.combatants[0].spec_id, Some(73));
        assert_eq!(session.combatants[2].realm.as_deref(), Some("Silvermoon"));
        assert!(session.outcome.result);
        assert_eq!(session.tag(), None);
    }

    #[test]
    fn scan_skips_malformed_sidecars() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.json", RAID_SIDECAR);
        write(&dir, "broken.json", "{ not json");
        write(&dir, "unknown-category.json", r#"{"category": "Pet Battles"}"#);
        write(&dir, "notes.txt", "ignored");

        let library = Library::scan(dir.path(), "mp4").unwrap();
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn scan_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(Library::scan(&dir.path().join("missing"), "mp4").is_err());
    }

    #[test]
    fn sidecar_tag_and_mythic_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "key.json",
            r#"{
                "category": "Mythic+",
                "start": 1725958800000,
                "zoneID": 2660,
                "result": true,
                "upgradeLevel": 2,
                "keystoneLevel": 12,
                "affixes": [9, 152],
                "tag": "clean run"
            }"#,
        );

        let session = load_sidecar(&path, "mkv").unwrap();
        assert!(session.key().id.ends_with("key.mkv"));
        assert_eq!(session.level, Some(12));
        assert_eq!(session.affixes, vec![9, 152]);
        assert_eq!(session.outcome.upgrade_level, Some(2));
        assert_eq!(session.tag(), Some("clean run"));
        assert_eq!(StandardResultResolver.resolve(&session), ResultLabel::TimedRun);
    }

    #[test]
    fn missing_start_falls_back_to_file_time() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "clip.json", r#"{"category": "Clips"}"#);

        let before = Utc::now() - chrono::Duration::minutes(5);
        let session = load_sidecar(&path, "mp4").unwrap();
        assert!(session.captured_at() > before);
    }

    #[test]
    fn stored_tags_override_sidecar_tags() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{"category": "Clips", "tag": "from sidecar"}"#);
        write(&dir, "b.json", r#"{"category": "Clips", "tag": "untouched"}"#);

        let mut library = Library::scan(dir.path(), "mp4").unwrap();
        let key_a = SessionKey::local(dir.path().join("a.mp4").to_string_lossy().into_owned());

        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.upsert_tag(&key_a, "from store", Utc::now()).unwrap();
        db.upsert_tag(&SessionKey::cloud("a.mp4"), "cloud only", Utc::now())
            .unwrap();

        assert_eq!(library.apply_tags(&db).unwrap(), 1);
        assert_eq!(library.get(&key_a).unwrap().tag(), Some("from store"));

        let key_b = SessionKey::local(dir.path().join("b.mp4").to_string_lossy().into_owned());
        assert_eq!(library.get(&key_b).unwrap().tag(), Some("untouched"));
    }

    #[test]
    fn category_is_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 9, 10, 9, 0, 0).unwrap();
        let library = Library::from_sessions(vec![
            VideoSession::new(SessionKey::local("old"), base, ContentCategory::Raids),
            VideoSession::new(
                SessionKey::local("new"),
                base + chrono::Duration::hours(1),
                ContentCategory::Raids,
            ),
            VideoSession::new(SessionKey::local("pvp"), base, ContentCategory::ThreeVThree),
        ]);

        let raids: Vec<&str> = library
            .category(ContentCategory::Raids)
            .iter()
            .map(|s| s.key().id.as_str())
            .collect();
        assert_eq!(raids, vec!["new", "old"]);
        assert!(library.category(ContentCategory::Clips).is_empty());
    }

    #[test]
    fn views_number_pulls_within_category() {
        let base = Utc.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap();
        let wipe = |id: &str, offset: i64| {
            VideoSession::new(
                SessionKey::local(id),
                base + chrono::Duration::minutes(offset),
                ContentCategory::Raids,
            )
            .with_encounter(2902, 16)
        };
        let library = Library::from_sessions(vec![wipe("p1", 0), wipe("p2", 10), wipe("p3", 20)]);

        let views = library.views(
            ContentCategory::Raids,
            &BuiltinCatalog::new(),
            &StandardResultResolver,
        );
        let pulls: Vec<u32> = views.iter().map(|v| v.pull).collect();
        assert_eq!(pulls, vec![3, 2, 1]);
        assert_eq!(views[0].caption(), "Wipe (Pull 3)");
    }

    #[test]
    fn insert_replace_and_remove() {
        let now = Utc::now();
        let key = SessionKey::local("x.mp4");
        let mut library = Library::new();
        assert!(library.is_empty());

        assert!(library
            .insert(VideoSession::new(key.clone(), now, ContentCategory::Clips))
            .is_none());
        let replaced =
            library.insert(VideoSession::new(key.clone(), now, ContentCategory::Raids));
        assert_eq!(replaced.unwrap().category, ContentCategory::Clips);
        assert_eq!(library.len(), 1);

        assert!(library.require_mut(&SessionKey::cloud("x.mp4")).is_err());
        assert!(library.get_mut(&key).is_some());
        assert!(library.remove(&key).is_some());
        assert!(library.remove(&key).is_none());
        assert!(library.is_empty());
    }
}
