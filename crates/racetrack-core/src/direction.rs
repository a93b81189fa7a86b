//! The nine accelerations a car can choose each turn.

use std::fmt;

use crate::geom::Point;

/// An acceleration applied to a car's velocity: one of the eight compass
/// directions, or [`Direction::None`] to keep the current velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    None,
    Right,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// All nine directions, row-major over the 3×3 grid of accelerations.
    pub const ALL: [Direction; 9] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::None,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// The unit-or-zero vector added to the velocity.
    pub const fn vector(self) -> Point {
        match self {
            Direction::UpLeft => Point::new(-1, -1),
            Direction::Up => Point::new(0, -1),
            Direction::UpRight => Point::new(1, -1),
            Direction::Left => Point::new(-1, 0),
            Direction::None => Point::new(0, 0),
            Direction::Right => Point::new(1, 0),
            Direction::DownLeft => Point::new(-1, 1),
            Direction::Down => Point::new(0, 1),
            Direction::DownRight => Point::new(1, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::UpLeft => "up-left",
            Direction::Up => "up",
            Direction::UpRight => "up-right",
            Direction::Left => "left",
            Direction::None => "none",
            Direction::Right => "right",
            Direction::DownLeft => "down-left",
            Direction::Down => "down",
            Direction::DownRight => "down-right",
        };
        f.write_str(name)
    }
}
