//! Companion process notifications
//!
//! Tag edits are mirrored to a companion process (the recorder's main
//! process) as fire-and-forget messages. Delivery failures never affect the
//! editing side.
//!
//! ## Wire shape
//!
//! Every message names a channel and carries a positional payload. Tag edits
//! use the `videoButton` channel:
//!
//! ```text
//! ["tag", <video path or cloud name>, <is cloud>, <new tag>]
//! ```
//!
//! ## Usage
//!
//! Enable the HTTP transport in `~/.config/warclip/config.toml`:
//!
//! ```toml
//! [companion]
//! enabled = true
//! endpoint = "http://127.0.0.1:4567/ipc"
//! ```

mod client;
mod message;

pub use client::HttpCompanion;
pub use message::{ChannelMessage, VideoButtonPayload, VIDEO_BUTTON_CHANNEL};

use tokio::sync::mpsc;

use crate::error::{Error, Result};

/// One-way channel to the companion process.
///
/// `send` must return without waiting for delivery.
pub trait CompanionChannel: Send + Sync {
    fn send(&self, message: ChannelMessage) -> Result<()>;
}

/// Drops every message; used when no companion is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCompanion;

impl CompanionChannel for NullCompanion {
    fn send(&self, message: ChannelMessage) -> Result<()> {
        tracing::trace!(channel = %message.channel, "Companion disabled, dropping message");
        Ok(())
    }
}

/// In-process queue; the receiver side plays the companion
#[derive(Debug, Clone)]
pub struct QueueCompanion {
    sender: mpsc::UnboundedSender<ChannelMessage>,
}

impl QueueCompanion {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ChannelMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl CompanionChannel for QueueCompanion {
    fn send(&self, message: ChannelMessage) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| Error::Companion("companion queue closed".to_string()))
    }
}
