use serde_json::json;
use spapi_journal::frame::MAX_PAYLOAD_SIZE;
use spapi_journal::{FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions};
use std::fs::{self, OpenOptions};
use std::io::Write;
use tempfile::TempDir;

fn write_two_events(path: &std::path::Path) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    writer
        .append_event(&json!({"partition": "p", "kind": "created", "record": {"n": 1}}))
        .unwrap();
    writer
        .append_event(&json!({"partition": "p", "kind": "created", "record": {"n": 2}}))
        .unwrap();
    writer.finish().unwrap();
}

#[test]
fn crash_mid_append_is_reported_or_tolerated_by_mode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    write_two_events(&path);

    let full_len = fs::metadata(&path).unwrap().len();
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(full_len - 5).unwrap();

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(strict.read_event().unwrap().is_some());
    match strict.read_event() {
        Err(JournalError::TruncatedFrame { offset }) => assert_eq!(offset, strict.position()),
        other => panic!("expected truncation, got {:?}", other),
    }

    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert_eq!(permissive.read_all().unwrap().len(), 1);
}

#[test]
fn reopening_after_crash_drops_partial_frame_and_appends() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    write_two_events(&path);

    let full_len = fs::metadata(&path).unwrap().len();
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(full_len - 5).unwrap();
    drop(file);

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer
        .append_event(&json!({"partition": "p", "kind": "created", "record": {"n": 3}}))
        .unwrap();
    writer.finish().unwrap();

    let events = JournalReader::open(&path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap();
    let numbers: Vec<_> = events.iter().map(|e| e["record"]["n"].clone()).collect();
    assert_eq!(numbers, vec![json!(1), json!(3)]);
}

#[test]
fn reopening_after_partial_frame_header_appends_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    write_two_events(&path);
    let intact_len = fs::metadata(&path).unwrap().len();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0, 0]).unwrap();
    drop(file);

    let writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.finish().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), intact_len);

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer
        .append_event(&json!({"partition": "p", "kind": "updated", "record": {"n": 4}}))
        .unwrap();
    writer.finish().unwrap();

    let events = JournalReader::open(&path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[2]["kind"], "updated");
}

#[test]
fn truncated_frame_header_is_detected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    write_two_events(&path);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0, 0]).unwrap();

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(strict.read_all().is_err());
    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert_eq!(permissive.read_all().unwrap().len(), 2);
}

#[test]
fn oversized_payload_is_refused_before_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();

    let payload = vec![b' '; MAX_PAYLOAD_SIZE as usize + 1];
    assert!(matches!(
        writer.append_raw(FrameKind::EventJson, &payload),
        Err(JournalError::PayloadTooLarge { .. })
    ));
    writer.finish().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 16);
}

#[test]
fn unknown_frame_kinds_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::Unknown(0x7f), b"opaque").unwrap();
    writer
        .append_event(&json!({"partition": "p", "kind": "updated", "record": {}}))
        .unwrap();
    writer.finish().unwrap();

    let events = JournalReader::open(&path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["kind"], "updated");
}

#[test]
fn non_zero_frame_reserved_bytes_are_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    write_two_events(&path);

    let mut bytes = fs::read(&path).unwrap();
    bytes[17] = 0xAA;
    fs::write(&path, &bytes).unwrap();

    for mode in [ReadMode::Strict, ReadMode::Permissive] {
        let mut reader = JournalReader::open(&path, mode).unwrap();
        match reader.read_event() {
            Err(JournalError::InvalidFrame { offset, .. }) => assert_eq!(offset, 16),
            other => panic!("expected invalid frame, got {:?}", other),
        }
    }
}

#[test]
fn foreign_files_are_not_journals() {
    let dir = TempDir::new().unwrap();
    let short = dir.path().join("short.spj");
    fs::write(&short, b"SPJ").unwrap();
    assert!(matches!(
        JournalWriter::open(&short, WriteOptions::default()),
        Err(JournalError::FileNotEmpty)
    ));
    assert!(matches!(
        JournalReader::open(&short, ReadMode::Permissive),
        Err(JournalError::InvalidHeader(_))
    ));

    let foreign = dir.path().join("foreign.spj");
    fs::write(&foreign, b"{\"not\":\"a journal\"}\n").unwrap();
    assert!(JournalWriter::open(&foreign, WriteOptions::default()).is_err());
    assert!(JournalReader::open(&foreign, ReadMode::Strict).is_err());
}

#[test]
fn non_json_payload_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.spj");
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::EventJson, b"{broken").unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert!(matches!(reader.read_event(), Err(JournalError::JsonParse(_))));
}
