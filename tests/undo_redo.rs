//! Undo/redo through the action log

mod common;

use common::{buffer, lines_of, point, range};
use linewise::text::{BufferChange, ChangeRecorder, Notification, SeekType, TextUnit};
use linewise::Action;
use linewise::TextBuffer;
use tempfile::tempdir;

// ========================================================================
// Basic round trips
// ========================================================================

#[test]
fn test_line_break_insert_and_undo() {
    let mut buffer = buffer("abc");
    let caret = buffer.add_action(Action::insert_char(point(1, 1), '\n'));

    assert_eq!(caret, Some(point(0, 2)));
    assert_eq!(lines_of(&buffer), vec!["a", "bc"]);

    let caret = buffer.undo();
    assert_eq!(caret, Some(point(1, 1)));
    assert_eq!(lines_of(&buffer), vec!["abc"]);
    assert!(!buffer.can_undo());
}

#[test]
fn test_delete_range_across_lines_and_undo() {
    let mut buffer = buffer("abc\ndef\nghi\n");
    assert_eq!(buffer.line_count(), 4);

    buffer.add_action(Action::delete_range(range(1, 1, 1, 3), point(1, 3)));
    assert_eq!(lines_of(&buffer), vec!["ahi", ""]);

    buffer.undo();
    assert_eq!(lines_of(&buffer), vec!["abc", "def", "ghi", ""]);
    assert_eq!(buffer.text(), "abc\ndef\nghi\n");
}

#[test]
fn test_undo_keeps_ids_of_untouched_lines() {
    let mut buffer = buffer("one\ntwo\nthree\nfour");
    let first = buffer.line_id(1);
    let last = buffer.line_id(4);

    buffer.add_action(Action::delete_range(range(0, 2, 0, 3), point(0, 2)));
    assert_eq!(lines_of(&buffer), vec!["one", "three", "four"]);
    assert_eq!(buffer.line_id(3), last);

    buffer.undo();
    assert_eq!(lines_of(&buffer), vec!["one", "two", "three", "four"]);
    assert_eq!(buffer.line_id(1), first);
    assert_eq!(buffer.line_id(4), last);
    assert_eq!(buffer.line_nr_from_id(last, 1), Some(4));
}

#[test]
fn test_redo_replays_and_new_action_clears_redo() {
    let mut buffer = buffer("hello");
    buffer.add_action(Action::insert_text(point(5, 1), " world"));
    buffer.undo();
    assert_eq!(buffer.text(), "hello");

    let caret = buffer.redo();
    assert_eq!(caret, Some(point(11, 1)));
    assert_eq!(buffer.text(), "hello world");

    buffer.undo();
    assert!(buffer.can_redo());
    buffer.add_action(Action::insert_char(point(0, 1), '>'));
    assert!(!buffer.can_redo());
    assert_eq!(buffer.redo(), None);
}

// ========================================================================
// Merging
// ========================================================================

#[test]
fn test_typed_words_undo_one_at_a_time() {
    let mut buffer = buffer("");
    let mut caret = point(0, 1);
    for c in "let x".chars() {
        caret = buffer.add_action(Action::insert_char(caret, c)).unwrap();
    }
    assert_eq!(buffer.text(), "let x");

    buffer.undo();
    assert_eq!(buffer.text(), "let ");
    buffer.undo();
    assert_eq!(buffer.text(), "");
}

#[test]
fn test_backspaces_merge_and_undo_together() {
    let mut buffer = buffer("hello world");
    let mut caret = point(11, 1);
    for _ in 0..3 {
        caret = buffer
            .add_action(Action::delete(caret, TextUnit::Char, SeekType::Prev))
            .unwrap();
    }
    assert_eq!(buffer.text(), "hello wo");
    assert_eq!(buffer.action_log().undo_count(), 1);

    let caret = buffer.undo();
    assert_eq!(caret, Some(point(11, 1)));
    assert_eq!(buffer.text(), "hello world");
}

#[test]
fn test_delete_at_buffer_end_is_dropped() {
    let mut buffer = buffer("abc");
    let result = buffer.add_action(Action::delete(point(3, 1), TextUnit::Char, SeekType::Next));
    assert_eq!(result, None);
    assert!(!buffer.can_undo());
    assert!(!buffer.is_modified());
}

// ========================================================================
// Groups
// ========================================================================

#[test]
fn test_group_undoes_as_one_step() {
    let mut buffer = buffer("fn old() {}");
    buffer.begin_group();
    buffer.add_action(Action::delete_range(range(3, 1, 6, 1), point(3, 1)));
    buffer.add_action(Action::insert_string(point(3, 1), "renamed"));
    buffer.add_action(Action::insert_text(point(10, 1), "\n"));
    buffer.end_group();
    assert_eq!(lines_of(&buffer), vec!["fn renamed", "() {}"]);

    buffer.undo();
    assert_eq!(buffer.text(), "fn old() {}");
    assert!(!buffer.can_undo());

    buffer.redo();
    assert_eq!(lines_of(&buffer), vec!["fn renamed", "() {}"]);
}

#[test]
fn test_replace_is_one_step() {
    let mut buffer = buffer("a = 1;\nb = 2;");
    let caret = buffer.replace(range(4, 1, 5, 2), "3", point(4, 1));
    assert_eq!(caret, Some(point(5, 1)));
    assert_eq!(buffer.text(), "a = 3;");

    buffer.undo();
    assert_eq!(buffer.text(), "a = 1;\nb = 2;");
}

// ========================================================================
// Saved state
// ========================================================================

#[test]
fn test_modified_tracks_save_point_through_file_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("note.txt");
    std::fs::write(&path, "x\n").unwrap();

    let mut buffer = TextBuffer::load_file(&path, None).unwrap();
    let recorder = ChangeRecorder::new();
    buffer.attach_listener(Box::new(recorder.clone()));
    assert!(!buffer.is_modified());

    buffer.add_action(Action::insert_char(point(1, 1), 'a'));
    assert!(buffer.is_modified());

    buffer.save_file(None).unwrap();
    assert!(!buffer.is_modified());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "xa\n");

    // The saved history stays undoable
    assert!(buffer.can_undo());
    buffer.undo();
    assert!(buffer.is_modified());
    assert_eq!(buffer.text(), "x\n");

    buffer.redo();
    assert!(!buffer.is_modified());

    let modified_events = recorder
        .take()
        .into_iter()
        .filter(|n| *n == Notification::Buffer(BufferChange::Modified))
        .count();
    assert_eq!(modified_events, 4);
}
