//! Python indent: blocks open after `:` and close by keyword

use crate::text::{Coord, Line, TextBuffer};
use crate::util::text::indent_width;

use super::{bracket_continuation, in_quote_indent, statement_start};

/// Statements after which the block ends
const BLOCK_ENDERS: &[&str] = &["return", "pass", "break", "continue", "raise"];

/// Clause keywords and the keywords of the statements they continue
const CLAUSES: &[(&str, &[&str])] = &[
    ("elif", &["if", "elif"]),
    ("else", &["if", "elif", "for", "while", "try", "except"]),
    ("except", &["try", "except"]),
    ("finally", &["try", "except", "else"]),
];

pub fn indent(buffer: &TextBuffer, ln: Coord) -> Coord {
    if let Some(indent) = in_quote_indent(buffer, ln) {
        return indent;
    }
    if let Some(indent) = bracket_continuation(buffer, ln) {
        return indent;
    }
    let Some(prev) = buffer.prev_non_empty_line(ln, true) else {
        return 0;
    };
    let shift = buffer.options().shift_width;
    let start = statement_start(buffer, prev);
    let mut indent = buffer.get_indent(start);

    if buffer.line(prev).ends_with(":") {
        indent += shift;
    } else if starts_with_any(buffer.line(start), BLOCK_ENDERS) {
        indent = indent.saturating_sub(shift);
    }

    let line = buffer.line(ln);
    if let Some((_, openers)) = CLAUSES.iter().find(|(clause, _)| line.starts_with_word(clause)) {
        if let Some(anchor) = clause_anchor(buffer, ln, indent, openers) {
            return buffer.get_indent(anchor);
        }
    }
    indent
}

fn starts_with_any(line: &Line, words: &[&str]) -> bool {
    words.iter().any(|word| line.starts_with_word(word))
}

/// Nearest earlier line opening a statement the clause on `ln` continues,
/// indented less than the body the clause would otherwise get
fn clause_anchor(buffer: &TextBuffer, ln: Coord, indent: Coord, openers: &[&str]) -> Option<Coord> {
    let limit = buffer.get_indent(buffer.prev_non_empty_line(ln, true)?).min(indent);
    let tab_stop = buffer.options().tab_stop;
    buffer.prev_line_matching(ln, |line| {
        indent_width(line.data(), tab_stop) <= limit
            && line.ends_with(":")
            && starts_with_any(line, openers)
    })
}
