//! Positions and ranges inside a text buffer
//!
//! Columns are 0-based character indices, line numbers are 1-based.

use std::cmp::Ordering;
use std::fmt;

/// Column or line coordinate
pub type Coord = usize;

/// A position in the buffer: column `x` (0-based) on line `y` (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextPoint {
    pub x: Coord,
    pub y: Coord,
}

impl TextPoint {
    /// Column sentinel meaning "end of line"; greater than every real column
    pub const END: Coord = Coord::MAX;

    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Apply a signed displacement, saturating at zero
    pub fn offset(self, delta: PointDelta) -> Self {
        Self {
            x: self.x.saturating_add_signed(delta.dx),
            y: self.y.saturating_add_signed(delta.dy),
        }
    }
}

impl Ord for TextPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for TextPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TextPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x == Self::END {
            write!(f, "(end, {})", self.y)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// Signed caret displacement produced by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointDelta {
    pub dx: isize,
    pub dy: isize,
}

impl PointDelta {
    pub const fn new(dx: isize, dy: isize) -> Self {
        Self { dx, dy }
    }

    /// Displacement that moves `from` onto `to`
    pub fn between(from: TextPoint, to: TextPoint) -> Self {
        Self {
            dx: to.x as isize - from.x as isize,
            dy: to.y as isize - from.y as isize,
        }
    }
}

/// A normalized pair of points (`begin <= end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    begin: TextPoint,
    end: TextPoint,
}

impl TextRange {
    pub fn new(a: TextPoint, b: TextPoint) -> Self {
        if a <= b {
            Self { begin: a, end: b }
        } else {
            Self { begin: b, end: a }
        }
    }

    pub fn begin(&self) -> TextPoint {
        self.begin
    }

    pub fn end(&self) -> TextPoint {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn line_first(&self) -> Coord {
        self.begin.y
    }

    pub fn line_last(&self) -> Coord {
        self.end.y
    }

    pub fn line_range(&self) -> LineRange {
        LineRange::new(self.begin.y, self.end.y)
    }

    /// Half-open containment: `begin <= point < end`
    pub fn contains(&self, point: TextPoint) -> bool {
        point >= self.begin && point < self.end
    }

    /// Whether the range lies on a single line
    pub fn is_single_line(&self) -> bool {
        self.begin.y == self.end.y
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// Inclusive range of 1-based line numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    first: Coord,
    last: Coord,
}

impl LineRange {
    pub fn new(first: Coord, last: Coord) -> Self {
        assert!(first >= 1 && first <= last, "invalid line range {first}..={last}");
        Self { first, last }
    }

    pub fn single(line: Coord) -> Self {
        Self::new(line, line)
    }

    pub fn first(&self) -> Coord {
        self.first
    }

    pub fn last(&self) -> Coord {
        self.last
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, line: Coord) -> bool {
        line >= self.first && line <= self.last
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<Coord> {
        self.first..=self.last
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}
