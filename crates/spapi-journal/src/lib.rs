//! Append-only journal of published sync events.
//!
//! Each event is stored as one framed UTF-8 JSON object that carries its own
//! content-derived `event_id`, so a journal can be audited offline.
//!
//! ```rust
//! use spapi_canonical::compute_event_id;
//! use spapi_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("events.spj");
//!
//! let mut event = json!({
//!     "partition": "A2EUQ1WTGCTBG2",
//!     "kind": "created",
//!     "record": {"AmazonOrderId": "902-3159896-1390916"}
//! });
//! event["event_id"] = serde_json::to_value(compute_event_id(&event)?)?;
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_event(&event)?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! let read = reader.read_event()?.expect("one event");
//! assert!(spapi_journal::verify_event_id(&read)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Event payload type and structural checks.
pub mod event;
/// File header and frame layout.
pub mod frame;
/// Journal reader.
pub mod reader;
/// Event identity checks.
pub mod verification;
/// Journal writer.
pub mod writer;

pub use errors::JournalError;
pub use event::{is_valid_event_structure, EventJson};
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use verification::verify_event_id;
pub use writer::{JournalWriter, WriteOptions};
