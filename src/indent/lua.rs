//! Lua indent: keyword-delimited blocks plus table constructors

use crate::text::{Coord, Line, TextBuffer};

use super::{bracket_continuation, in_quote_indent, statement_start};

/// Lines starting with one of these close the block above them
const CLOSERS: &[&str] = &["end", "else", "elseif", "until"];

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
    if opens_block(buffer.line(prev)) {
        indent += shift;
    }

    let line = buffer.line(ln);
    let closes = CLOSERS.iter().any(|word| line.starts_with_word(word)) || line.starts_with("}");
    if closes {
        indent = indent.saturating_sub(shift);
    }
    indent
}

/// Code words of a line, comments and strings dropped
fn code_words(line: &Line) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    for (x, c) in line.data().iter().enumerate() {
        if (c.is_alphanumeric() || *c == '_') && !line.is_comment_or_string(x) {
            word.push(*c);
        } else if !word.is_empty() {
            words.push(std::mem::take(&mut word));
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    words
}

/// Whether a line leaves a block open: more openers than `end`s, a
/// trailing `then`/`do`/`else`/`repeat`, or an unclosed `{`
fn opens_block(line: &Line) -> bool {
    if line.ends_with("{") {
        return true;
    }
    let words = code_words(line);
    let mut depth: isize = 0;
    for word in &words {
        match word.as_str() {
            "function" | "do" | "repeat" | "then" => depth += 1,
            "end" | "until" => depth -= 1,
            _ => {}
        }
    }
    // `while x do` and `for .. do` count once through `do`; `elseif .. then`
    // and `else` reopen the block their line closed
    let reopens = matches!(words.first().map(String::as_str), Some("else" | "elseif"));
    depth > 0 || (reopens && depth >= 0)
}

#[cfg(test)]
mod tests {
    use crate::file_type::FileType;
    use crate::text::TextBuffer;

    fn expected(text: &str, ln: usize) -> usize {
        let buffer = TextBuffer::from_text(text, FileType::Lua);
        super::indent(&buffer, ln)
    }

    #[test]
    fn test_blocks_open_and_close() {
        let text = "function f(x)\n    if x then\n        return 1\n        end\nend";
        assert_eq!(expected(text, 2), 4);
        assert_eq!(expected(text, 4), 4);
        assert_eq!(expected("for i = 1, 3 do\n", 2), 4);
    }

    #[test]
    fn test_else_reopens() {
        let text = "if a then\n    x()\n    else\n";
        assert_eq!(expected(text, 3), 0);
        assert_eq!(expected("if a then\n    x()\nelse\n", 4), 4);
    }

    #[test]
    fn test_one_line_blocks_and_comments() {
        assert_eq!(expected("local f = function() return 1 end\n", 2), 0);
        assert_eq!(expected("x = 1 -- then do\n", 2), 0);
        assert_eq!(expected("t = {\n", 2), 4);
    }
}
