//! Loading and saving buffers on disk

mod common;

use common::point;
use encoding_rs::{UTF_16LE, UTF_8, WINDOWS_1252};
use linewise::file_type::FileType;
use linewise::text::{BufferChange, ChangeRecorder, FileError, FileFormat, Notification, TextBuffer};
use linewise::Action;
use tempfile::tempdir;

#[test]
fn test_crlf_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.c");
    std::fs::write(&path, "int a;\r\nint b;\r\n").unwrap();

    let mut buffer = TextBuffer::load_file(&path, None).unwrap();
    assert_eq!(buffer.file_type(), FileType::C);
    assert_eq!(buffer.file_format(), FileFormat::Win);
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line_text(1), "int a;");

    buffer.add_action(Action::insert_string(point(6, 2), " // b"));
    buffer.save_file(None).unwrap();
    assert_eq!(
        std::fs::read(&path).unwrap(),
        b"int a;\r\nint b; // b\r\n".to_vec()
    );
}

#[test]
fn test_set_file_format_is_undoable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    std::fs::write(&path, "one\ntwo").unwrap();

    let mut buffer = TextBuffer::load_file(&path, None).unwrap();
    buffer.add_action(Action::set_file_format(FileFormat::Mac, point(0, 1)));
    assert!(buffer.is_modified());
    buffer.save_file(None).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"one\rtwo".to_vec());

    buffer.undo();
    assert_eq!(buffer.file_format(), FileFormat::Unix);
}

#[test]
fn test_utf16_with_bom_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide.txt");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "hé\nyo".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    std::fs::write(&path, &bytes).unwrap();

    let mut buffer = TextBuffer::load_file(&path, None).unwrap();
    assert_eq!(buffer.encoding(), UTF_16LE);
    assert!(buffer.has_bom());
    assert_eq!(buffer.text(), "hé\nyo");

    buffer.save_file(None).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_unrepresentable_text_falls_back_to_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin.txt");
    std::fs::write(&path, b"caf\xE9").unwrap();

    let mut buffer = TextBuffer::load_file(&path, Some(WINDOWS_1252)).unwrap();
    assert_eq!(buffer.text(), "café");
    let recorder = ChangeRecorder::new();
    buffer.attach_listener(Box::new(recorder.clone()));

    buffer.add_action(Action::insert_string(point(4, 1), " ☕"));
    buffer.save_file(None).unwrap();
    assert_eq!(buffer.encoding(), UTF_8);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "café ☕");
    assert!(recorder
        .take()
        .contains(&Notification::Buffer(BufferChange::Encoding)));
}

#[test]
fn test_load_failures_build_nothing() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.txt");
    std::fs::write(&empty, "").unwrap();
    assert!(matches!(
        TextBuffer::load_file(&empty, None),
        Err(FileError::EmptyFile(_))
    ));
    assert!(matches!(
        TextBuffer::load_file(&dir.path().join("missing.txt"), None),
        Err(FileError::Io { .. })
    ));
}

#[test]
fn test_save_as_moves_path() {
    let dir = tempdir().unwrap();
    let mut buffer = TextBuffer::from_text("draft", FileType::PlainText);
    assert!(buffer.save_file(None).is_err());

    let target = dir.path().join("draft.txt");
    buffer.save_file(Some(&target)).unwrap();
    assert_eq!(buffer.path(), Some(target.as_path()));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "draft");
}
