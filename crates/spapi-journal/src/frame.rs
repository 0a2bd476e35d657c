//! On-disk layout.
//!
//! ```text
//! file   := header frame*
//! header := "SPJ1" version:u16le flags:u16le reserved:[u8; 8]
//! frame  := kind:u8 reserved:[u8; 3] len:u32le payload:[u8; len]
//! ```

use crate::errors::JournalError;

/// File magic.
pub const MAGIC: &[u8; 4] = b"SPJ1";

/// Format version written and accepted.
pub const VERSION: u16 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest payload a frame may carry: 16 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Frame kind byte for JSON sync events.
pub const FRAME_KIND_EVENT_JSON: u8 = 0x01;

/// Journal file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalHeader {
    /// Header for the current format version.
    pub fn new() -> Self {
        Self { version: VERSION }
    }

    /// Encodes the header; flags and reserved bytes are always zero.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Decodes and validates a header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        let bytes: &[u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|head| head.try_into().ok())
            .ok_or_else(|| {
                JournalError::InvalidHeader(format!("header too short: {} bytes", bytes.len()))
            })?;

        if &bytes[..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}",
                &bytes[..4]
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: {}, expected {}",
                version, VERSION
            )));
        }
        if bytes[6..].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero flags or reserved bytes".to_string(),
            ));
        }
        Ok(Self { version })
    }
}

/// Frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 JSON object holding one sync event.
    EventJson,
    /// Kind written by a newer format; readers skip it.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            FRAME_KIND_EVENT_JSON => FrameKind::EventJson,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::EventJson => FRAME_KIND_EVENT_JSON,
            FrameKind::Unknown(byte) => byte,
        }
    }
}

/// Frame header preceding each payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFrame {
    /// Payload kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        let len = u32::try_from(len)
            .ok()
            .filter(|len| *len <= MAX_PAYLOAD_SIZE)
            .ok_or(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            })?;
        Ok(Self { kind, len })
    }

    /// Encodes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.into();
        bytes[4..].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Decodes a frame header found at `offset`.
    pub fn from_bytes(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }
        Ok(Self {
            kind: FrameKind::from(bytes[0]),
            len,
        })
    }
}
