use crate::errors::JournalError;
use crate::event::EventJson;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How a reader treats a frame cut short by a crash mid-append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// A truncated frame is [`JournalError::TruncatedFrame`].
    Strict,
    /// A truncated frame ends the journal.
    Permissive,
}

/// Sequential reader over a journal file.
pub struct JournalReader {
    input: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens `path` and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut input = BufReader::new(File::open(path)?);
        let mut header = [0u8; HEADER_SIZE];
        input.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                JournalError::InvalidHeader("file shorter than header".to_string())
            }
            _ => JournalError::Io(e),
        })?;
        JournalHeader::from_bytes(&header)?;

        Ok(Self {
            input,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Next frame of any kind, or `None` at end of journal.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let start = self.position;
        let mut head = [0u8; FRAME_HEADER_SIZE];
        match fill(&mut self.input, &mut head)? {
            0 => return Ok(None),
            n if n < FRAME_HEADER_SIZE => return self.truncated(start),
            _ => {}
        }
        let frame = RecordFrame::from_bytes(&head, start)?;

        let mut payload = vec![0u8; frame.len as usize];
        if fill(&mut self.input, &mut payload)? < payload.len() {
            return self.truncated(start);
        }

        self.position = start + FRAME_HEADER_SIZE as u64 + u64::from(frame.len);
        Ok(Some((frame.kind, payload)))
    }

    /// Next event, skipping frames of unknown kind.
    pub fn read_event(&mut self) -> Result<Option<EventJson>, JournalError> {
        while let Some((kind, payload)) = self.read_frame()? {
            if kind == FrameKind::EventJson {
                let text = std::str::from_utf8(&payload)?;
                return Ok(Some(serde_json::from_str(text)?));
            }
        }
        Ok(None)
    }

    /// Every remaining event.
    pub fn read_all(&mut self) -> Result<Vec<EventJson>, JournalError> {
        let mut events = Vec::new();
        while let Some(event) = self.read_event()? {
            events.push(event);
        }
        Ok(events)
    }

    fn truncated<T>(&self, offset: u64) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
        }
    }
}

/// Reads until `buf` is full or EOF; returns the number of bytes read.
fn fill<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match input.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}
