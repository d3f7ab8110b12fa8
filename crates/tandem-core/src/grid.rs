//! Grid geometry: positions, facings, rotations and bounds.
//!
//! Screen convention: `x` grows eastwards, `y` grows southwards, so north is
//! the unit step `(0, -1)`.  Relative offsets (sensing footprints) are written
//! for a north-facing robot and rotated into the robot's actual facing.

use std::fmt;

// ── Position ──────────────────────────────────────────────────────────────────

/// An integer grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell displaced by `(dx, dy)`.  Not bounds-checked; resolve the
    /// result through [`GridBounds::resolve`].
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// The neighbouring cell one step towards `dir`.
    #[inline]
    pub fn step(self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// Manhattan distance, ignoring wrap-around.
    #[inline]
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Rotation ──────────────────────────────────────────────────────────────────

/// A quarter turn in place.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four compass facings.  The discriminant is the number of
/// clockwise quarter turns from north.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    North = 0,
    East  = 1,
    South = 2,
    West  = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    #[inline]
    fn from_quarter_turns(n: u8) -> Direction {
        Self::ALL[(n % 4) as usize]
    }

    #[inline]
    pub fn clockwise(self) -> Direction {
        Self::from_quarter_turns(self as u8 + 1)
    }

    #[inline]
    pub fn counter_clockwise(self) -> Direction {
        Self::from_quarter_turns(self as u8 + 3)
    }

    #[inline]
    pub fn rotated(self, rotation: Rotation) -> Direction {
        match rotation {
            Rotation::Clockwise        => self.clockwise(),
            Rotation::CounterClockwise => self.counter_clockwise(),
        }
    }

    /// Unit step vector in screen coordinates.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East  => (1, 0),
            Direction::South => (0, 1),
            Direction::West  => (-1, 0),
        }
    }

    /// Rotate an offset written for a north-facing robot into this facing.
    pub fn rotate_offset(self, (dx, dy): (i32, i32)) -> (i32, i32) {
        let mut v = (dx, dy);
        for _ in 0..self as u8 {
            // One clockwise quarter turn with y pointing south.
            v = (-v.1, v.0);
        }
        v
    }

    /// The single quarter turn that brings `self` closer to `target`, or
    /// `None` when already aligned.  A half turn goes clockwise.
    pub fn rotation_towards(self, target: Direction) -> Option<Rotation> {
        match (target as u8 + 4 - self as u8) % 4 {
            0 => None,
            3 => Some(Rotation::CounterClockwise),
            _ => Some(Rotation::Clockwise),
        }
    }

    /// Facing that moves `from` towards `to`: the larger-magnitude axis
    /// first, x before y on ties.  `None` when `from == to`.
    pub fn towards(from: Position, to: Position) -> Option<Direction> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0 { Direction::East } else { Direction::West })
        } else {
            Some(if dy > 0 { Direction::South } else { Direction::North })
        }
    }

    /// Single-letter label used by text renderers and CSV output.
    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East  => 'E',
            Direction::South => 'S',
            Direction::West  => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ── GridBounds ────────────────────────────────────────────────────────────────

/// Rectangular grid extent, optionally toroidal.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub width:  u32,
    pub height: u32,
    /// When set, coordinates wrap around the edges instead of being rejected.
    pub wrap:   bool,
}

impl GridBounds {
    pub fn new(width: u32, height: u32, wrap: bool) -> Self {
        Self { width, height, wrap }
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Map `pos` onto the grid: identity when inside, wrapped when the grid
    /// wraps, `None` otherwise.
    pub fn resolve(&self, pos: Position) -> Option<Position> {
        if self.contains(pos) {
            return Some(pos);
        }
        if self.wrap && self.width > 0 && self.height > 0 {
            return Some(Position::new(
                pos.x.rem_euclid(self.width as i32),
                pos.y.rem_euclid(self.height as i32),
            ));
        }
        None
    }

    /// Row-major cell index of `pos` after resolution.
    #[inline]
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.resolve(pos)
            .map(|p| p.y as usize * self.width as usize + p.x as usize)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Position of the row-major cell `index`.
    #[inline]
    pub fn position_of(&self, index: usize) -> Position {
        let w = self.width as usize;
        Position::new((index % w) as i32, (index / w) as i32)
    }
}
