//! Auto-indent through actions

mod common;

use common::{buffer, c_buffer, lines_of, point};
use linewise::file_type::FileType;
use linewise::text::{Coord, LineRange, TextBuffer, TextOptions};
use linewise::Action;

fn reindent_all(buffer: &mut TextBuffer) {
    let lines = LineRange::new(1, buffer.line_count());
    buffer.add_action(Action::auto_indent_range(lines, point(0, 1)));
}

#[test]
fn test_auto_indent_c_function() {
    let mut buffer = c_buffer("int main() {\nif (a) {\nx();\n}\nreturn 0;\n}");
    reindent_all(&mut buffer);
    assert_eq!(
        lines_of(&buffer),
        vec![
            "int main() {",
            "    if (a) {",
            "        x();",
            "    }",
            "    return 0;",
            "}",
        ]
    );

    // One undo step restores every line
    buffer.undo();
    assert_eq!(buffer.text(), "int main() {\nif (a) {\nx();\n}\nreturn 0;\n}");
}

#[test]
fn test_auto_indent_python_block() {
    let mut buffer = TextBuffer::from_text("def f(x):\nif x:\nreturn 1\nreturn 0", FileType::Python);
    reindent_all(&mut buffer);
    assert_eq!(
        lines_of(&buffer),
        vec!["def f(x):", "    if x:", "        return 1", "    return 0"]
    );
}

#[test]
fn test_auto_indent_with_tabs() {
    let options = TextOptions {
        expand_tab: false,
        tab_stop: 4,
        shift_width: 4,
        ..Default::default()
    };
    let mut buffer = TextBuffer::with_options(FileType::C, options);
    buffer.add_action(Action::insert_text(point(0, 1), "void f() {\ng();\n}"));
    reindent_all(&mut buffer);
    assert_eq!(lines_of(&buffer), vec!["void f() {", "\tg();", "}"]);
}

#[test]
fn test_already_indented_range_is_ineffective() {
    let mut buffer = c_buffer("f() {\n    g();\n}");
    let before = buffer.action_log().undo_count();
    let result = buffer.add_action(Action::auto_indent_range(LineRange::new(1, 3), point(0, 1)));
    assert_eq!(result, None);
    assert_eq!(buffer.action_log().undo_count(), before);
}

#[test]
fn test_shift_lines_and_caret() {
    let mut buffer = buffer("a\n  b");
    let caret = buffer.add_action(Action::increase_indent(LineRange::new(1, 2), point(3, 2)));
    assert_eq!(lines_of(&buffer), vec!["    a", "      b"]);
    assert_eq!(caret, Some(point(7, 2)));

    let caret = buffer.add_action(Action::decrease_indent(LineRange::new(1, 2), point(7, 2)));
    assert_eq!(lines_of(&buffer), vec!["a", "  b"]);
    assert_eq!(caret, Some(point(3, 2)));
}

fn always_two(_buffer: &TextBuffer, _ln: Coord) -> Coord {
    2
}

#[test]
fn test_custom_indent_fn_replaces_heuristics() {
    let mut buffer = c_buffer("f() {\ng();\n}");
    assert_eq!(buffer.expected_indent(2), 4);

    buffer.set_indent_fn(always_two);
    assert_eq!(buffer.expected_indent(2), 2);
    buffer.add_action(Action::auto_indent_line(3, point(0, 3)));
    assert_eq!(buffer.line_text(3), "  }");
}
