//! Companion message envelope

use serde::{Deserialize, Serialize};

use crate::types::SessionKey;

/// Channel used for per-video actions
pub const VIDEO_BUTTON_CHANNEL: &str = "videoButton";

/// A message for the companion process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub channel: String,
    pub payload: VideoButtonPayload,
}

impl ChannelMessage {
    /// A `tag` action for the given session
    pub fn tag(key: &SessionKey, value: impl Into<String>) -> Self {
        Self {
            channel: VIDEO_BUTTON_CHANNEL.to_string(),
            payload: VideoButtonPayload {
                operation: "tag".to_string(),
                key: key.id.clone(),
                is_cloud: key.is_cloud(),
                value: value.into(),
            },
        }
    }
}

type PayloadTuple = (String, String, bool, String);

/// Positional `videoButton` payload; serialized as a four-element array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PayloadTuple", into = "PayloadTuple")]
pub struct VideoButtonPayload {
    pub operation: String,
    /// Video path for local sessions, object name for cloud sessions
    pub key: String,
    pub is_cloud: bool,
    pub value: String,
}

impl From<PayloadTuple> for VideoButtonPayload {
    fn from((operation, key, is_cloud, value): PayloadTuple) -> Self {
        Self {
            operation,
            key,
            is_cloud,
            value,
        }
    }
}

impl From<VideoButtonPayload> for PayloadTuple {
    fn from(payload: VideoButtonPayload) -> Self {
        (payload.operation, payload.key, payload.is_cloud, payload.value)
    }
}
