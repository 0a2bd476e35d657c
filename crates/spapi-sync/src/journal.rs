use spapi_journal::{JournalWriter, WriteOptions};
use std::path::Path;

use crate::error::PublishError;
use crate::event::SyncEvent;
use crate::traits::EventPublisher;

/// Publishes events by appending them, with their `event_id`, to a journal.
pub struct JournalEventPublisher {
    writer: JournalWriter,
}

impl JournalEventPublisher {
    /// Opens or creates the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, PublishError> {
        Ok(Self {
            writer: JournalWriter::open(path, options)?,
        })
    }

    /// Events appended by this publisher.
    pub fn published(&self) -> u64 {
        self.writer.appended()
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), PublishError> {
        Ok(self.writer.finish()?)
    }
}

impl EventPublisher for JournalEventPublisher {
    fn publish(&mut self, event: &SyncEvent) -> Result<(), PublishError> {
        let json = event.to_journal_json()?;
        self.writer.append_event(&json)?;
        Ok(())
    }
}
