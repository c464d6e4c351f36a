//! Background tag writer
//!
//! A dedicated thread owns the write path to the tag store. Writes are
//! applied in the order they were scheduled, so the last `set_tag` for a
//! session is the value that ends up on disk.

use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::annotation::{TagPersistence, TagUpdate};
use crate::error::{Error, Result};

use super::Database;

enum WriterCommand {
    Write(TagUpdate),
    Flush(mpsc::Sender<()>),
    Shutdown,
}

/// Persists tag updates on a worker thread
pub struct BackgroundTagWriter {
    sender: Mutex<mpsc::Sender<WriterCommand>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundTagWriter {
    /// Start the worker thread. The database must already be migrated.
    pub fn spawn(db: Arc<Database>) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<WriterCommand>();

        let worker = thread::Builder::new()
            .name("warclip-tags".into())
            .spawn(move || {
                while let Ok(command) = receiver.recv() {
                    match command {
                        WriterCommand::Write(update) => {
                            if let Err(e) =
                                db.upsert_tag(&update.key, &update.value, update.requested_at)
                            {
                                tracing::warn!(
                                    session = %update.key,
                                    error = %e,
                                    "Failed to persist tag"
                                );
                            }
                        }
                        WriterCommand::Flush(reply) => {
                            let _ = reply.send(());
                        }
                        WriterCommand::Shutdown => break,
                    }
                }
                tracing::debug!("Tag writer shutting down");
            })?;

        Ok(Self {
            sender: Mutex::new(sender),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Block until every write scheduled before this call has been applied
    pub fn flush(&self) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(WriterCommand::Flush(reply_tx))?;
        reply_rx
            .recv()
            .map_err(|_| Error::Persistence("tag writer terminated unexpectedly".to_string()))
    }

    fn send(&self, command: WriterCommand) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .map_err(|_| Error::Persistence("tag writer lock poisoned".to_string()))?;
        sender
            .send(command)
            .map_err(|_| Error::Persistence("tag writer is not running".to_string()))
    }
}

impl TagPersistence for BackgroundTagWriter {
    fn persist_tag(&self, update: TagUpdate) -> Result<()> {
        self.send(WriterCommand::Write(update))
    }
}

impl Drop for BackgroundTagWriter {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(e) = self.send(WriterCommand::Shutdown) {
                tracing::error!(error = %e, "Failed to stop tag writer");
            }
            if handle.join().is_err() {
                tracing::error!("Tag writer thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionKey;
    use chrono::Utc;

    fn migrated() -> Arc<Database> {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        Arc::new(db)
    }

    fn update(key: &SessionKey, value: &str) -> TagUpdate {
        TagUpdate {
            key: key.clone(),
            value: value.to_string(),
            requested_at: Utc::now(),
        }
    }

    #[test]
    fn flush_waits_for_scheduled_writes() {
        let db = migrated();
        let writer = BackgroundTagWriter::spawn(db.clone()).unwrap();
        let key = SessionKey::local("/v/raid.mp4");

        writer.persist_tag(update(&key, "prog")).unwrap();
        writer.flush().unwrap();

        assert_eq!(db.get_tag(&key).unwrap().unwrap().tag, "prog");
    }

    #[test]
    fn last_scheduled_write_wins() {
        let db = migrated();
        let writer = BackgroundTagWriter::spawn(db.clone()).unwrap();
        let key = SessionKey::cloud("raid.mp4");

        for value in ["a", "b", "c", ""] {
            writer.persist_tag(update(&key, value)).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(db.get_tag(&key).unwrap().unwrap().tag, "");
    }

    #[test]
    fn drop_drains_pending_writes() {
        let db = migrated();
        let key = SessionKey::local("/v/m+.mp4");
        {
            let writer = BackgroundTagWriter::spawn(db.clone()).unwrap();
            writer.persist_tag(update(&key, "timed")).unwrap();
        }
        assert_eq!(db.get_tag(&key).unwrap().unwrap().tag, "timed");
    }

    #[test]
    fn write_failures_are_not_fatal() {
        // No migration: every write fails inside the worker.
        let db = Arc::new(Database::open_in_memory().unwrap());
        let writer = BackgroundTagWriter::spawn(db).unwrap();

        writer
            .persist_tag(update(&SessionKey::local("a.mp4"), "x"))
            .unwrap();
        assert!(writer.flush().is_ok());
    }
}
