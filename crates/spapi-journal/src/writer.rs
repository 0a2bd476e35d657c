use crate::errors::JournalError;
use crate::event::EventJson;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use crate::reader::{JournalReader, ReadMode};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Journal open options.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// fsync after every append (default: false).
    pub sync: bool,
    /// Discard existing frames instead of appending (default: false).
    pub truncate: bool,
}

/// Appends framed events to a journal file.
///
/// A missing or empty file is initialized with a header; an existing file
/// must already start with a valid one. A frame cut short by an earlier
/// crash is dropped on open, so new frames follow the last complete one.
pub struct JournalWriter {
    file: File,
    sync: bool,
    appended: u64,
}

impl JournalWriter {
    /// Opens or creates the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path.as_ref())?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&JournalHeader::new().to_bytes())?;
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header = [0u8; HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::from_bytes(&header)?;
            if options.truncate {
                file.set_len(HEADER_SIZE as u64)?;
            } else {
                let end = complete_frames_end(path.as_ref())?;
                if end < len {
                    warn!(
                        path = %path.as_ref().display(),
                        offset = end,
                        dropped = len - end,
                        "dropping truncated trailing frame"
                    );
                    file.set_len(end)?;
                }
            }
        }
        file.seek(SeekFrom::End(0))?;
        if options.sync {
            file.sync_all()?;
        }

        debug!(path = %path.as_ref().display(), "journal opened");
        Ok(Self {
            file,
            sync: options.sync,
            appended: 0,
        })
    }

    /// Appends one event as a JSON frame.
    pub fn append_event(&mut self, event: &EventJson) -> Result<(), JournalError> {
        let payload = serde_json::to_vec(event)?;
        self.append_raw(FrameKind::EventJson, &payload)
    }

    /// Appends a frame of any kind.
    ///
    /// Header and payload go out in one write so a crash leaves at most one
    /// truncated trailing frame.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;
        let mut buf = Vec::with_capacity(frame.to_bytes().len() + payload.len());
        buf.extend_from_slice(&frame.to_bytes());
        buf.extend_from_slice(payload);

        self.file.write_all(&buf)?;
        if self.sync {
            self.file.sync_data()?;
        }
        self.appended += 1;
        Ok(())
    }

    /// Frames appended through this writer.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Flushes and closes the journal.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

/// Offset just past the last complete frame.
fn complete_frames_end(path: &Path) -> Result<u64, JournalError> {
    let mut reader = JournalReader::open(path, ReadMode::Permissive)?;
    while reader.read_frame()?.is_some() {}
    Ok(reader.position())
}
