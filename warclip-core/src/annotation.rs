//! Tag annotations on recorded sessions
//!
//! [`TagManager::set_tag`] is the only way a session's tag changes once it is
//! loaded. It updates the in-memory session immediately, then hands the new
//! value to a [`TagPersistence`] and a [`CompanionChannel`] without waiting
//! for either.
//!
//! ## Failure policy
//!
//! The in-memory value always reflects the latest call. If persistence or the
//! companion rejects the update, the failure is logged and the session keeps
//! the new tag. Nothing is rolled back and nothing is reported to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::companion::{ChannelMessage, CompanionChannel};
use crate::error::Result;
use crate::types::{SessionKey, VideoSession};

/// A tag write waiting to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUpdate {
    pub key: SessionKey,
    pub value: String,
    pub requested_at: DateTime<Utc>,
}

/// Durable storage for tags.
///
/// `persist_tag` only schedules the write and must not block on it. An `Err`
/// means the write could not be scheduled at all.
pub trait TagPersistence: Send + Sync {
    fn persist_tag(&self, update: TagUpdate) -> Result<()>;
}

/// Owns tag mutation for sessions
#[derive(Clone)]
pub struct TagManager {
    persistence: Arc<dyn TagPersistence>,
    companion: Arc<dyn CompanionChannel>,
}

impl TagManager {
    pub fn new(persistence: Arc<dyn TagPersistence>, companion: Arc<dyn CompanionChannel>) -> Self {
        Self {
            persistence,
            companion,
        }
    }

    /// Set a session's tag.
    ///
    /// In order: the session's tag is replaced, persistence of the new value is
    /// scheduled, and a `tag` message goes to the companion. An empty string
    /// clears the tag.
    pub fn set_tag(&self, session: &mut VideoSession, value: impl Into<String>) {
        let value = value.into();
        session.replace_tag(value.clone());

        let key = session.key().clone();

        tracing::debug!(session = %key, len = value.len(), "Tag updated");

        let update = TagUpdate {
            key: key.clone(),
            value: value.clone(),
            requested_at: Utc::now(),
        };
        if let Err(e) = self.persistence.persist_tag(update) {
            tracing::warn!(session = %key, error = %e, "Failed to schedule tag persistence");
        }

        if let Err(e) = self.companion.send(ChannelMessage::tag(&key, value)) {
            tracing::warn!(session = %key, error = %e, "Failed to notify companion of tag change");
        }
    }

    /// Clear a session's tag; same as setting it to the empty string
    pub fn clear_tag(&self, session: &mut VideoSession) {
        self.set_tag(session, "");
    }
}
