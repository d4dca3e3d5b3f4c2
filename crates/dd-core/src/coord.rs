//! Integer grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell address on the grid.  `x` runs along the width, `y` along the
/// height.  Negative values are representable so that callers can ask about
/// out-of-bounds positions and get an error back instead of a wrapped value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Plain Manhattan distance, ignoring any wrap-around.
    #[inline]
    pub fn manhattan(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Coordinate {
        Coordinate::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Coordinate {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Coordinate::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
