//! Expected-indent heuristics
//!
//! Each file type gets a plain function computing the indent (in columns) a
//! line should have, reading the buffer through its query methods only. A
//! buffer holds one such function in its indent slot; callers can swap in
//! their own with [`TextBuffer::set_indent_fn`].

mod cfamily;
mod lua;
mod python;

use crate::file_type::FileType;
use crate::text::{Coord, TextBuffer, TextPoint};
use crate::util::text::char_col_to_visual_col;

pub use cfamily::indent as cfamily;
pub use lua::indent as lua;
pub use python::indent as python;

/// Expected indent of a line, in columns
pub type IndentFn = fn(&TextBuffer, Coord) -> Coord;

/// Built-in heuristic for `file_type`
pub fn default_for(file_type: FileType) -> IndentFn {
    match file_type {
        ft if ft.is_c_family() => cfamily,
        FileType::Python => python,
        FileType::Lua => lua,
        _ => plain,
    }
}

/// Copy the indent of the previous non-blank line
pub fn plain(buffer: &TextBuffer, ln: Coord) -> Coord {
    buffer
        .prev_non_empty_line(ln, false)
        .map_or(0, |prev| buffer.get_indent(prev))
}

/// Indent for a line that starts inside a multi-line quote. Comment bodies
/// follow the line above; string content is left alone.
fn in_quote_indent(buffer: &TextBuffer, ln: Coord) -> Option<Coord> {
    let quote = buffer.line(ln).state_in().quote()?;
    if quote.lex().is_comment() {
        Some(plain(buffer, ln))
    } else {
        Some(buffer.get_indent(ln))
    }
}

/// First line of the statement `ln` belongs to: while the start of the line
/// sits inside an unclosed `(` or `[`, move to the line of that bracket.
pub(crate) fn statement_start(buffer: &TextBuffer, mut ln: Coord) -> Coord {
    loop {
        let x = buffer.line(ln).first_non_space().unwrap_or(0);
        match buffer.unpaired_left_bracket(TextPoint::new(x, ln)) {
            Some((open, '(' | '[')) if open.y < ln => ln = open.y,
            _ => return ln,
        }
    }
}

/// The line whose indent a block opened at `open` hangs from. An opener
/// right after a `)` resolves through the matching `(`, so a multi-line
/// condition anchors at its first line.
pub(crate) fn opener_anchor(buffer: &TextBuffer, open: TextPoint) -> Coord {
    let line = buffer.line(open.y);
    let before = (0..open.x)
        .rev()
        .find(|x| !line.data()[*x].is_whitespace() && !line.is_comment_or_string(*x));
    if let Some(x) = before {
        if line.data()[x] == ')' {
            if let Some(paren) = buffer.match_bracket(TextPoint::new(x, open.y)) {
                return statement_start(buffer, paren.y);
            }
        }
    }
    statement_start(buffer, open.y)
}

/// Indent for a line inside an unclosed `(` or `[`: align with the first
/// argument after the bracket, or hang one shift width from the anchor when
/// nothing follows the bracket on its line.
pub(crate) fn bracket_continuation(buffer: &TextBuffer, ln: Coord) -> Option<Coord> {
    let (open, c) = buffer.unpaired_left_bracket(TextPoint::new(0, ln))?;
    if c == '{' {
        return None;
    }
    let line = buffer.line(open.y);
    let tab_stop = buffer.options().tab_stop;
    let has_content_after = line.last_code_char().is_some_and(|(x, _)| x > open.x);
    if has_content_after {
        let first_arg = (open.x + 1..line.len())
            .find(|x| !line.data()[*x].is_whitespace())
            .unwrap_or(open.x + 1);
        Some(char_col_to_visual_col(line.data(), first_arg, tab_stop))
    } else {
        Some(buffer.get_indent(opener_anchor(buffer, open)) + buffer.options().shift_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_file_types() {
        assert!(default_for(FileType::Rust) == cfamily as IndentFn);
        assert!(default_for(FileType::Css) == cfamily as IndentFn);
        assert!(default_for(FileType::Python) == python as IndentFn);
        assert!(default_for(FileType::Yaml) == plain as IndentFn);
    }

    #[test]
    fn test_plain_copies_previous_line() {
        let buffer = TextBuffer::from_text("  a\n\n    \nb", FileType::PlainText);
        assert_eq!(plain(&buffer, 4), 2);
        assert_eq!(plain(&buffer, 1), 0);
    }

    #[test]
    fn test_statement_start_follows_open_parens() {
        let buffer = TextBuffer::from_text("x = f(a,\n      g(b,\n        c));", FileType::C);
        assert_eq!(statement_start(&buffer, 3), 1);
        assert_eq!(statement_start(&buffer, 1), 1);
    }

    #[test]
    fn test_bracket_continuation() {
        let buffer = TextBuffer::from_text("call(first,\nsecond)\n  items = [\n", FileType::C);
        assert_eq!(bracket_continuation(&buffer, 2), Some(5));
        assert_eq!(bracket_continuation(&buffer, 4), Some(6));
    }
}
