//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use linewise::file_type::FileType;
use linewise::text::{Coord, TextBuffer, TextPoint, TextRange};

/// Plain text buffer with the given content
pub fn buffer(text: &str) -> TextBuffer {
    TextBuffer::from_text(text, FileType::PlainText)
}

/// C buffer with the built-in lexer and indent function
pub fn c_buffer(text: &str) -> TextBuffer {
    TextBuffer::from_text(text, FileType::C)
}

pub fn point(x: Coord, y: Coord) -> TextPoint {
    TextPoint::new(x, y)
}

pub fn range(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> TextRange {
    TextRange::new(point(x1, y1), point(x2, y2))
}

/// Every line's text, in order
pub fn lines_of(buffer: &TextBuffer) -> Vec<String> {
    buffer.lines().map(|line| line.text()).collect()
}

/// Assert the cached lexical analysis equals a scan from scratch
pub fn assert_lex_consistent(buffer: &TextBuffer) {
    let fresh = buffer.lexer().scan_lines(buffer.lines().map(|line| line.data()));
    assert_eq!(fresh.len(), buffer.line_count());
    for (i, (line, expected)) in buffer.lines().zip(&fresh).enumerate() {
        let ln = i + 1;
        assert_eq!(line.lex_elems(), expected.elems.as_slice(), "lex elems of line {}", ln);
        assert_eq!(
            line.quote_elems(),
            expected.quote_elems.as_slice(),
            "quote elems of line {}",
            ln
        );
        assert_eq!(line.state_out(), &expected.state_out, "state after line {}", ln);
    }
}
