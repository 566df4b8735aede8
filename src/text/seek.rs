//! Caret navigation by char, word, line and buffer

use crate::util::text::{char_type, CharType};

use super::buffer::TextBuffer;
use super::point::{Coord, TextPoint, TextRange};

/// Granularity of a seek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextUnit {
    Char,
    Word,
    Line,
    Buffer,
}

/// Direction or anchor of a seek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekType {
    Prev,
    Next,
    Begin,
    End,
    /// The whole unit around the point; `seek` returns its begin
    Whole,
}

impl SeekType {
    /// Whether the affected span lies before the point
    pub fn is_backward(&self) -> bool {
        matches!(self, SeekType::Prev | SeekType::Begin)
    }
}

impl TextBuffer {
    fn char_class(&self, c: char) -> CharType {
        char_type(c, self.lexer().delimiters())
    }

    /// Move `point` by one `unit` as directed by `seek_type`
    pub fn seek(&self, point: TextPoint, unit: TextUnit, seek_type: SeekType) -> TextPoint {
        let point = self.clamp_point(point);
        match unit {
            TextUnit::Char => self.seek_char(point, seek_type),
            TextUnit::Word => match seek_type {
                SeekType::Next => self.seek_word(point, SeekType::Next, true),
                other => self.seek_word(point, other, false),
            },
            TextUnit::Line => self.seek_line(point, seek_type),
            TextUnit::Buffer => match seek_type {
                SeekType::Next | SeekType::End => self.end_point(),
                SeekType::Prev | SeekType::Begin | SeekType::Whole => TextPoint::new(0, 1),
            },
        }
    }

    fn seek_char(&self, point: TextPoint, seek_type: SeekType) -> TextPoint {
        match seek_type {
            SeekType::Prev => {
                if point.x > 0 {
                    TextPoint::new(point.x - 1, point.y)
                } else if point.y > 1 {
                    TextPoint::new(self.line_length(point.y - 1), point.y - 1)
                } else {
                    point
                }
            }
            SeekType::Next => {
                if point.x < self.line_length(point.y) {
                    TextPoint::new(point.x + 1, point.y)
                } else if point.y < self.line_count() {
                    TextPoint::new(0, point.y + 1)
                } else {
                    point
                }
            }
            SeekType::Begin | SeekType::End | SeekType::Whole => point,
        }
    }

    fn seek_line(&self, point: TextPoint, seek_type: SeekType) -> TextPoint {
        match seek_type {
            SeekType::Prev if point.y > 1 => {
                TextPoint::new(point.x.min(self.line_length(point.y - 1)), point.y - 1)
            }
            SeekType::Next if point.y < self.line_count() => {
                TextPoint::new(point.x.min(self.line_length(point.y + 1)), point.y + 1)
            }
            SeekType::Prev | SeekType::Next => point,
            SeekType::Begin | SeekType::Whole => TextPoint::new(0, point.y),
            SeekType::End => TextPoint::new(self.line_length(point.y), point.y),
        }
    }

    /// Word seek. With `include_space`, a backward seek first crosses the
    /// spaces before the point and a forward seek also crosses the spaces
    /// after the word. Line boundaries count as one step.
    pub fn seek_word(&self, point: TextPoint, seek_type: SeekType, include_space: bool) -> TextPoint {
        let point = self.clamp_point(point);
        let data = self.line_data(point.y);
        let len = data.len();
        match seek_type {
            SeekType::Prev => {
                if point.x == 0 {
                    return self.seek_char(point, SeekType::Prev);
                }
                let mut x = point.x;
                if include_space || self.char_class(data[x - 1]) == CharType::Whitespace {
                    x = self.skip_back(data, x, CharType::Whitespace);
                    if x == 0 || !include_space {
                        return TextPoint::new(x, point.y);
                    }
                }
                let class = self.char_class(data[x - 1]);
                TextPoint::new(self.skip_back(data, x, class), point.y)
            }
            SeekType::Next => {
                if point.x >= len {
                    return self.seek_char(point, SeekType::Next);
                }
                let class = self.char_class(data[point.x]);
                let mut x = self.skip_forward(data, point.x, class);
                if include_space && class != CharType::Whitespace {
                    x = self.skip_forward(data, x, CharType::Whitespace);
                }
                TextPoint::new(x, point.y)
            }
            SeekType::Begin | SeekType::Whole => TextPoint::new(self.word_span(data, point.x).0, point.y),
            SeekType::End => {
                let (_, end) = self.word_span(data, point.x);
                let end = if include_space {
                    self.skip_forward(data, end, CharType::Whitespace)
                } else {
                    end
                };
                TextPoint::new(end, point.y)
            }
        }
    }

    /// The word around `point`, plus its trailing spaces with
    /// `include_space`
    pub fn word_range(&self, point: TextPoint, include_space: bool) -> TextRange {
        let begin = self.seek_word(point, SeekType::Begin, false);
        let end = self.seek_word(point, SeekType::End, include_space);
        TextRange::new(begin, end)
    }

    /// The range a delete by `unit`/`seek_type` at `point` removes
    pub fn seek_range(&self, point: TextPoint, unit: TextUnit, seek_type: SeekType) -> TextRange {
        let point = self.clamp_point(point);
        match (unit, seek_type) {
            (TextUnit::Word, SeekType::Whole) => self.word_range(point, true),
            (TextUnit::Line, SeekType::Whole) => {
                if point.y < self.line_count() {
                    TextRange::new(TextPoint::new(0, point.y), TextPoint::new(0, point.y + 1))
                } else if point.y > 1 {
                    TextRange::new(
                        TextPoint::new(self.line_length(point.y - 1), point.y - 1),
                        TextPoint::new(self.line_length(point.y), point.y),
                    )
                } else {
                    TextRange::new(TextPoint::new(0, 1), TextPoint::new(self.line_length(1), 1))
                }
            }
            (TextUnit::Buffer, SeekType::Whole) => TextRange::new(TextPoint::new(0, 1), self.end_point()),
            (TextUnit::Char, SeekType::Whole) => TextRange::new(point, self.seek_char(point, SeekType::Next)),
            (TextUnit::Word, SeekType::Prev) => TextRange::new(self.seek_word(point, SeekType::Prev, true), point),
            (TextUnit::Word, SeekType::Next) => TextRange::new(point, self.seek_word(point, SeekType::Next, true)),
            _ => TextRange::new(point, self.seek(point, unit, seek_type)),
        }
    }

    fn skip_back(&self, data: &[char], mut x: Coord, class: CharType) -> Coord {
        while x > 0 && self.char_class(data[x - 1]) == class {
            x -= 1;
        }
        x
    }

    fn skip_forward(&self, data: &[char], mut x: Coord, class: CharType) -> Coord {
        while x < data.len() && self.char_class(data[x]) == class {
            x += 1;
        }
        x
    }

    /// Run of same-class chars containing column `x`. At the line end the
    /// run before `x` is used.
    fn word_span(&self, data: &[char], x: Coord) -> (Coord, Coord) {
        if data.is_empty() {
            return (0, 0);
        }
        let at = if x >= data.len() { data.len() - 1 } else { x };
        let class = self.char_class(data[at]);
        (self.skip_back(data, at, class), self.skip_forward(data, at, class))
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
    fn test_char_seek_wraps_lines() {
        let buffer = buffer("ab\ncd");
        assert_eq!(
            buffer.seek(TextPoint::new(2, 1), TextUnit::Char, SeekType::Next),
            TextPoint::new(0, 2)
        );
        assert_eq!(
            buffer.seek(TextPoint::new(0, 2), TextUnit::Char, SeekType::Prev),
            TextPoint::new(2, 1)
        );
        assert_eq!(
            buffer.seek(TextPoint::new(0, 1), TextUnit::Char, SeekType::Prev),
            TextPoint::new(0, 1)
        );
    }

    #[test]
    fn test_word_seek_uses_delimiters() {
        let buffer = buffer("foo_bar(x, y)  baz");
        let p = |x| TextPoint::new(x, 1);
        assert_eq!(buffer.seek(p(0), TextUnit::Word, SeekType::Next), p(7));
        assert_eq!(buffer.seek(p(7), TextUnit::Word, SeekType::Next), p(8));
        assert_eq!(buffer.seek(p(13), TextUnit::Word, SeekType::Next), p(15));
        assert_eq!(buffer.seek(p(18), TextUnit::Word, SeekType::Prev), p(15));
        assert_eq!(buffer.seek_word(p(15), SeekType::Prev, false), p(13));
        assert_eq!(buffer.seek_word(p(15), SeekType::Prev, true), p(12));
        assert_eq!(buffer.seek(p(3), TextUnit::Word, SeekType::Begin), p(0));
        assert_eq!(buffer.seek(p(3), TextUnit::Word, SeekType::End), p(7));
    }

    #[test]
    fn test_word_range_includes_trailing_space() {
        let buffer = buffer("one two  three");
        let range = buffer.word_range(TextPoint::new(5, 1), true);
        assert_eq!(range, TextRange::new(TextPoint::new(4, 1), TextPoint::new(9, 1)));
        let range = buffer.word_range(TextPoint::new(5, 1), false);
        assert_eq!(range.end(), TextPoint::new(7, 1));
    }

    #[test]
    fn test_line_and_buffer_seek() {
        let buffer = buffer("long line\nab\nlast");
        assert_eq!(
            buffer.seek(TextPoint::new(8, 1), TextUnit::Line, SeekType::Next),
            TextPoint::new(2, 2)
        );
        assert_eq!(
            buffer.seek(TextPoint::new(1, 2), TextUnit::Line, SeekType::End),
            TextPoint::new(2, 2)
        );
        assert_eq!(
            buffer.seek(TextPoint::new(1, 2), TextUnit::Buffer, SeekType::End),
            TextPoint::new(4, 3)
        );
    }

    #[test]
    fn test_seek_range_whole_line() {
        let buffer = buffer("a\nb\nc");
        assert_eq!(
            buffer.seek_range(TextPoint::new(0, 2), TextUnit::Line, SeekType::Whole),
            TextRange::new(TextPoint::new(0, 2), TextPoint::new(0, 3))
        );
        assert_eq!(
            buffer.seek_range(TextPoint::new(0, 3), TextUnit::Line, SeekType::Whole),
            TextRange::new(TextPoint::new(1, 2), TextPoint::new(1, 3))
        );
    }
}
