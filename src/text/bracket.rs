//! Bracket matching that ignores brackets inside comments and strings

use super::buffer::TextBuffer;
use super::point::{TextPoint, TextRange};

/// Bracket pairs understood by the any-kind queries
pub const BRACKET_PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}')];

fn pair_of(c: char) -> Option<(char, char)> {
    BRACKET_PAIRS.iter().copied().find(|(l, r)| *l == c || *r == c)
}

impl TextBuffer {
    /// Structural chars strictly before `point`, nearest first
    fn code_chars_before(&self, point: TextPoint) -> impl Iterator<Item = (TextPoint, char)> + '_ {
        let point = self.clamp_point(point);
        (1..=point.y).rev().flat_map(move |ln| {
            let line = self.line(ln);
            let end = if ln == point.y { point.x } else { line.len() };
            (0..end)
                .rev()
                .filter(move |x| !line.is_comment_or_string(*x))
                .map(move |x| (TextPoint::new(x, ln), line.data()[x]))
        })
    }

    /// Structural chars at or after `point`, nearest first
    fn code_chars_from(&self, point: TextPoint) -> impl Iterator<Item = (TextPoint, char)> + '_ {
        let point = self.clamp_point(point);
        (point.y..=self.line_count()).flat_map(move |ln| {
            let line = self.line(ln);
            let start = if ln == point.y { point.x } else { 0 };
            (start..line.len())
                .filter(move |x| !line.is_comment_or_string(*x))
                .map(move |x| (TextPoint::new(x, ln), line.data()[x]))
        })
    }

    /// Nearest `l` before `point` not closed by an `r` in between
    pub fn unpaired_left_key(&self, point: TextPoint, l: char, r: char) -> Option<TextPoint> {
        let mut depth = 0usize;
        for (p, c) in self.code_chars_before(point) {
            if c == r {
                depth += 1;
            } else if c == l {
                if depth == 0 {
                    return Some(p);
                }
                depth -= 1;
            }
        }
        None
    }

    /// Nearest `r` at or after `point` not opened by an `l` in between
    pub fn unpaired_right_key(&self, point: TextPoint, l: char, r: char) -> Option<TextPoint> {
        let mut depth = 0usize;
        for (p, c) in self.code_chars_from(point) {
            if c == l {
                depth += 1;
            } else if c == r {
                if depth == 0 {
                    return Some(p);
                }
                depth -= 1;
            }
        }
        None
    }

    /// Nearest unmatched opening bracket of any kind before `point`, with
    /// one nesting counter per kind
    pub fn unpaired_left_bracket(&self, point: TextPoint) -> Option<(TextPoint, char)> {
        let mut depth = [0usize; BRACKET_PAIRS.len()];
        for (p, c) in self.code_chars_before(point) {
            if let Some(kind) = BRACKET_PAIRS.iter().position(|(_, r)| *r == c) {
                depth[kind] += 1;
            } else if let Some(kind) = BRACKET_PAIRS.iter().position(|(l, _)| *l == c) {
                if depth[kind] == 0 {
                    return Some((p, c));
                }
                depth[kind] -= 1;
            }
        }
        None
    }

    /// The bracket matching the one at `point`
    pub fn match_bracket(&self, point: TextPoint) -> Option<TextPoint> {
        let c = self.char_at(point)?;
        let (l, r) = pair_of(c)?;
        if self.is_comment_or_string(point) {
            return None;
        }
        if c == l {
            let next = TextPoint::new(point.x + 1, point.y);
            self.unpaired_right_key(next, l, r)
        } else {
            self.unpaired_left_key(point, l, r)
        }
    }

    /// The innermost bracket pair enclosing `point`, brackets included.
    /// A bracket at `point` itself counts as enclosing.
    pub fn bracket_pair_outer_range(&self, point: TextPoint) -> Option<TextRange> {
        let open = match self.char_at(point) {
            Some(c) if BRACKET_PAIRS.iter().any(|(l, _)| *l == c) && !self.is_comment_or_string(point) => point,
            _ => {
                let after = TextPoint::new(point.x + usize::from(self.is_closer_at(point)), point.y);
                self.unpaired_left_bracket(after)?.0
            }
        };
        let close = self.match_bracket(open)?;
        Some(TextRange::new(open, TextPoint::new(close.x + 1, close.y)))
    }

    /// Like [`TextBuffer::bracket_pair_outer_range`] without the brackets
    pub fn bracket_pair_inner_range(&self, point: TextPoint) -> Option<TextRange> {
        let outer = self.bracket_pair_outer_range(point)?;
        let (begin, end) = (outer.begin(), outer.end());
        Some(TextRange::new(
            TextPoint::new(begin.x + 1, begin.y),
            TextPoint::new(end.x - 1, end.y),
        ))
    }

    fn is_closer_at(&self, point: TextPoint) -> bool {
        self.char_at(point)
            .is_some_and(|c| BRACKET_PAIRS.iter().any(|(_, r)| *r == c))
            && !self.is_comment_or_string(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_type::FileType;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer::from_text(text, FileType::C)
    }

    #[test]
    fn test_unpaired_keys_skip_nested_pairs() {
        let buffer = buffer("f(a, (b), \")\" /* ( */\n  c)");
        assert_eq!(
            buffer.unpaired_left_key(TextPoint::new(2, 2), '(', ')'),
            Some(TextPoint::new(1, 1))
        );
        assert_eq!(
            buffer.unpaired_right_key(TextPoint::new(2, 1), '(', ')'),
            Some(TextPoint::new(3, 2))
        );
    }

    #[test]
    fn test_unpaired_left_bracket_any_kind() {
        let buffer = buffer("if (x) {\n  a[i] = (1");
        assert_eq!(
            buffer.unpaired_left_bracket(TextPoint::new(9, 2)),
            Some((TextPoint::new(7, 1), '{'))
        );
        assert_eq!(
            buffer.unpaired_left_bracket(TextPoint::new(11, 2)),
            Some((TextPoint::new(9, 2), '('))
        );
    }

    #[test]
    fn test_match_bracket_both_ways() {
        let buffer = buffer("{ a(b[0]) }");
        assert_eq!(buffer.match_bracket(TextPoint::new(0, 1)), Some(TextPoint::new(10, 1)));
        assert_eq!(buffer.match_bracket(TextPoint::new(8, 1)), Some(TextPoint::new(3, 1)));
        assert_eq!(buffer.match_bracket(TextPoint::new(2, 1)), None);
    }

    #[test]
    fn test_outer_and_inner_ranges_differ_by_one() {
        let buffer = buffer("call(x, [1, 2], y)");
        let point = TextPoint::new(6, 1);
        let outer = buffer.bracket_pair_outer_range(point).unwrap();
        let inner = buffer.bracket_pair_inner_range(point).unwrap();
        assert_eq!(outer, TextRange::new(TextPoint::new(4, 1), TextPoint::new(18, 1)));
        assert_eq!(inner.begin().x, outer.begin().x + 1);
        assert_eq!(inner.end().x, outer.end().x - 1);
        assert_eq!(buffer.get_text(inner), "x, [1, 2], y");

        let inside_list = buffer.bracket_pair_inner_range(TextPoint::new(10, 1)).unwrap();
        assert_eq!(buffer.get_text(inside_list), "1, 2");
    }
}
