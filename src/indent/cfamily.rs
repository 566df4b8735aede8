//! Brace-language indent: C, C++, Java, C#, JavaScript, Go, Rust and CSS

use crate::text::{Coord, Line, TextBuffer, TextPoint};

use super::{bracket_continuation, in_quote_indent, opener_anchor, statement_start};

const CONTROL_WORDS: &[&str] = &["if", "for", "while", "else"];
const ACCESS_LABELS: &[&str] = &["public:", "protected:", "private:"];

pub fn indent(buffer: &TextBuffer, ln: Coord) -> Coord {
    if let Some(indent) = in_quote_indent(buffer, ln) {
        return indent;
    }
    let line = buffer.line(ln);
    let first = line
        .first_non_space()
        .filter(|x| !line.is_comment_or_string(*x))
        .map(|x| (x, line.data()[x]));

    if let Some((x, c @ ('}' | ')' | ']'))) = first {
        if let Some(indent) = closing_indent(buffer, TextPoint::new(x, ln), c) {
            return indent;
        }
    }
    if let Some((_, '{')) = first {
        return open_brace_indent(buffer, ln);
    }
    if let Some(indent) = keyword_indent(buffer, ln, line) {
        return indent;
    }
    default_indent(buffer, ln)
}

/// A leading closer lines up with the line holding its opener
fn closing_indent(buffer: &TextBuffer, point: TextPoint, c: char) -> Option<Coord> {
    let l = match c {
        '}' => '{',
        ')' => '(',
        _ => '[',
    };
    let open = buffer.unpaired_left_key(point, l, c)?;
    Some(buffer.get_indent(opener_anchor(buffer, open)))
}

/// A `{` on its own line follows the statement it opens
fn open_brace_indent(buffer: &TextBuffer, ln: Coord) -> Coord {
    let Some(prev) = buffer.prev_non_empty_line(ln, true) else {
        return 0;
    };
    let prev_line = buffer.line(prev);
    if prev_line.ends_with("{") {
        return buffer.get_indent(statement_start(buffer, prev)) + buffer.options().shift_width;
    }
    if let Some((x, ')')) = prev_line.last_code_char() {
        if let Some(paren) = buffer.match_bracket(TextPoint::new(x, prev)) {
            return buffer.get_indent(statement_start(buffer, paren.y));
        }
    }
    buffer.get_indent(statement_start(buffer, prev))
}

fn keyword_indent(buffer: &TextBuffer, ln: Coord, line: &Line) -> Option<Coord> {
    if (line.starts_with_word("case") || line.starts_with_word("default")) && line.ends_with(":") {
        return enclosing_block_indent(buffer, ln);
    }
    if ACCESS_LABELS.iter().any(|label| line.starts_with(label)) {
        return enclosing_block_indent(buffer, ln);
    }
    if line.starts_with_word("else") {
        return matching_if(buffer, ln).map(|anchor| buffer.get_indent(anchor));
    }
    None
}

/// Indent of the statement owning the `{` that encloses line `ln`
fn enclosing_block_indent(buffer: &TextBuffer, ln: Coord) -> Option<Coord> {
    let open = buffer.unpaired_left_key(TextPoint::new(0, ln), '{', '}')?;
    Some(buffer.get_indent(opener_anchor(buffer, open)))
}

/// The `if` an `else` on line `ln` belongs to, stepping over whole blocks
/// and braceless bodies at the same level
fn matching_if(buffer: &TextBuffer, ln: Coord) -> Option<Coord> {
    let mut cur = ln;
    loop {
        let prev = buffer.prev_non_empty_line(cur, true)?;
        let anchor = block_owner(buffer, prev).unwrap_or_else(|| statement_start(buffer, prev));
        let line = buffer.line(anchor);
        if line.starts_with_word("if") || is_else_if(line) {
            return Some(anchor);
        }
        if anchor == prev && line.ends_with("{") {
            // Left the enclosing block
            return None;
        }
        cur = anchor;
    }
}

/// For a line starting with `}`, the line owning the block it closes
fn block_owner(buffer: &TextBuffer, ln: Coord) -> Option<Coord> {
    let line = buffer.line(ln);
    let x = line.first_non_space()?;
    if line.data()[x] != '}' || line.is_comment_or_string(x) {
        return None;
    }
    let open = buffer.unpaired_left_key(TextPoint::new(x, ln), '{', '}')?;
    Some(opener_anchor(buffer, open))
}

fn is_else_if(line: &Line) -> bool {
    let text = line.text();
    let trimmed = text.trim_start().trim_start_matches('}').trim_start();
    trimmed
        .strip_prefix("else")
        .is_some_and(|rest| rest.trim_start().starts_with("if"))
}

/// `if (x)`, `while (y)`, `else` and friends without a brace or a
/// statement on the same line
fn is_braceless_control(line: &Line) -> bool {
    let text = line.text();
    let trimmed = text.trim_start().trim_start_matches('}').trim_start();
    let starts_control = CONTROL_WORDS.iter().any(|word| {
        trimmed.strip_prefix(word).is_some_and(|rest| {
            rest.chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
        })
    });
    starts_control && !line.ends_with("{") && !line.ends_with(";") && !line.ends_with("}")
}

/// `label:`, `case x:`, `default:` or an access specifier
fn is_label(line: &Line) -> bool {
    if !line.ends_with(":") || line.ends_with("::") {
        return false;
    }
    if line.starts_with_word("case") || line.starts_with_word("default") {
        return true;
    }
    let text = line.text();
    let body = text.trim().trim_end_matches(':').trim_end();
    !body.is_empty() && body.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn default_indent(buffer: &TextBuffer, ln: Coord) -> Coord {
    if let Some(indent) = bracket_continuation(buffer, ln) {
        return indent;
    }
    let Some(prev) = buffer.prev_non_empty_line(ln, true) else {
        return 0;
    };
    let shift = buffer.options().shift_width;
    let start = block_owner(buffer, prev).unwrap_or_else(|| statement_start(buffer, prev));
    let prev_line = buffer.line(prev);

    if prev_line.ends_with("{") || prev_line.ends_with("(") || prev_line.ends_with("[") {
        let anchor = match prev_line.last_code_char() {
            Some((x, _)) => opener_anchor(buffer, TextPoint::new(x, prev)),
            None => start,
        };
        return buffer.get_indent(anchor) + shift;
    }
    if is_label(prev_line) {
        return buffer.get_indent(prev) + shift;
    }
    if is_braceless_control(buffer.line(start)) {
        return buffer.get_indent(start) + shift;
    }

    // After the body of one or more braceless controls, drop back to the
    // outermost of them
    let mut indent = buffer.get_indent(start);
    let mut cur = start;
    while let Some(above) = buffer.prev_non_empty_line(cur, true) {
        let above = statement_start(buffer, above);
        if !is_braceless_control(buffer.line(above)) || block_owner(buffer, cur).is_some() {
            break;
        }
        indent = buffer.get_indent(above);
        cur = above;
    }
    indent
}
