//! Buffer primitives, navigation and queries working together

mod common;

use common::{buffer, c_buffer, lines_of, point, range};
use linewise::text::{ChangeRecorder, FindOptions, LineChange, LineRange, Notification, SeekType, TextUnit};
use linewise::Action;

// ========================================================================
// Primitives
// ========================================================================

#[test]
fn test_split_and_join_lines() {
    let mut buffer = buffer("hello world");
    let delta = buffer.insert_char(point(5, 1), '\n');
    assert_eq!((delta.dx, delta.dy), (-5, 1));
    assert_eq!(lines_of(&buffer), vec!["hello", " world"]);

    assert_eq!(buffer.delete_char(point(5, 1)), Some('\n'));
    assert_eq!(lines_of(&buffer), vec!["hello world"]);
    assert_eq!(buffer.delete_char(point(11, 1)), None);
}

#[test]
fn test_new_lines_get_fresh_ids() {
    let mut buffer = buffer("a\nb");
    let ids = [buffer.line_id(1), buffer.line_id(2)];
    buffer.insert_char(point(1, 1), '\n');
    let fresh = buffer.line_id(2);
    assert!(!ids.contains(&fresh));
    assert_eq!(buffer.line_id(3), ids[1]);

    buffer.delete_char(point(1, 1));
    buffer.insert_char(point(1, 1), '\n');
    assert_ne!(buffer.line_id(2), fresh);
}

#[test]
fn test_longest_line_follows_edits() {
    let mut buffer = buffer("ab\nabcd\nabc");
    assert_eq!(buffer.longest_line_length(), 4);
    buffer.delete_string(point(0, 2), 3, false);
    assert_eq!(buffer.longest_line_length(), 3);
    buffer.insert_string(point(0, 1), "xxxxx");
    assert_eq!(buffer.longest_line_length(), 7);
}

#[test]
fn test_frozen_edits_notify_once_thawed() {
    let mut buffer = buffer("one");
    let recorder = ChangeRecorder::new();
    let id = buffer.attach_listener(Box::new(recorder.clone()));

    buffer.freeze_notify();
    buffer.insert_string(point(3, 1), "!");
    assert!(buffer.is_frozen());
    buffer.thaw_notify();
    assert!(recorder.take().is_empty());

    buffer.insert_string(point(0, 1), ">");
    assert_eq!(
        recorder.take(),
        vec![Notification::Line(LineChange::Updated, LineRange::single(1))]
    );

    assert!(buffer.detach_listener(id).is_some());
    buffer.insert_string(point(0, 1), ">");
    assert!(recorder.take().is_empty());
}

// ========================================================================
// Word deletes
// ========================================================================

#[test]
fn test_delete_word_back_includes_spaces() {
    let mut buffer = buffer("let value = 42");
    let caret = buffer
        .add_action(Action::delete(point(12, 1), TextUnit::Word, SeekType::Prev))
        .unwrap();
    assert_eq!(buffer.text(), "let value 42");
    assert_eq!(caret, point(10, 1));

    let caret = buffer
        .add_action(Action::delete(caret, TextUnit::Word, SeekType::Prev))
        .unwrap();
    assert_eq!(buffer.text(), "let 42");
    assert_eq!(caret, point(4, 1));

    // Both word deletes merged into one step
    buffer.undo();
    assert_eq!(buffer.text(), "let value = 42");
}

#[test]
fn test_delete_whole_line() {
    let mut buffer = buffer("a\nb\nc");
    buffer.add_action(Action::delete(point(0, 2), TextUnit::Line, SeekType::Whole));
    assert_eq!(lines_of(&buffer), vec!["a", "c"]);
    buffer.add_action(Action::delete(point(0, 2), TextUnit::Line, SeekType::Whole));
    assert_eq!(lines_of(&buffer), vec!["a"]);

    // The second delete reached backwards, so it stays a separate step
    buffer.undo();
    assert_eq!(lines_of(&buffer), vec!["a", "c"]);
    buffer.undo();
    assert_eq!(lines_of(&buffer), vec!["a", "b", "c"]);
}

#[test]
fn test_repeated_whole_line_deletes_merge() {
    let mut buffer = buffer("a\nb\nc\nd");
    buffer.add_action(Action::delete(point(0, 2), TextUnit::Line, SeekType::Whole));
    buffer.add_action(Action::delete(point(0, 2), TextUnit::Line, SeekType::Whole));
    assert_eq!(lines_of(&buffer), vec!["a", "d"]);
    assert_eq!(buffer.action_log().undo_count(), 1);

    buffer.undo();
    assert_eq!(buffer.text(), "a\nb\nc\nd");
}

// ========================================================================
// Brackets and search
// ========================================================================

#[test]
fn test_bracket_ranges_skip_comments() {
    let buffer = c_buffer("f(a, /* ) */ g(b))");
    let outer = buffer.bracket_pair_outer_range(point(3, 1)).unwrap();
    let inner = buffer.bracket_pair_inner_range(point(3, 1)).unwrap();
    assert_eq!(outer, range(1, 1, 18, 1));
    assert_eq!(inner, range(2, 1, 17, 1));
    assert_eq!(buffer.match_bracket(point(17, 1)), Some(point(1, 1)));
    assert_eq!(buffer.match_bracket(point(8, 1)), None);
}

#[test]
fn test_find_after_edit() {
    let mut buffer = buffer("alpha beta\ngamma");
    buffer.add_action(Action::insert_text(point(5, 2), " beta"));
    let found = buffer
        .find_string_all("beta", buffer.whole_range(), FindOptions::default())
        .unwrap();
    assert_eq!(found, vec![range(6, 1, 10, 1), range(6, 2, 10, 2)]);

    let reverse = FindOptions {
        reverse: true,
        ..Default::default()
    };
    let last = buffer.find_string("beta", buffer.whole_range(), reverse).unwrap();
    assert_eq!(last, Some(range(6, 2, 10, 2)));
    assert_eq!(
        buffer
            .find_string("a\nb", buffer.whole_range(), FindOptions::default())
            .unwrap(),
        None
    );
}
