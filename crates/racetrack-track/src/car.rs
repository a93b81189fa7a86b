//! Cars and their move-by-direction interface.

use racetrack_core::{CarId, Direction, Point};

/// A car on the track.
///
/// Each turn a car picks a [`Direction`] that is added to its velocity,
/// then moves by the new velocity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Car {
    pub id: CarId,
    /// The character the car is drawn with.
    pub symbol: char,
    pub position: Point,
    pub velocity: Point,
    pub crashed: bool,
}

impl Car {
    /// A car at rest at `position`.
    pub fn new(id: CarId, symbol: char, position: Point) -> Self {
        Self {
            id,
            symbol,
            position,
            velocity: Point::ZERO,
            crashed: false,
        }
    }

    /// Apply an acceleration to the velocity.
    pub fn accelerate(&mut self, direction: Direction) {
        self.velocity += direction.vector();
    }

    /// Where the car ends up if it moves with its current velocity.
    pub fn next_position(&self) -> Point {
        self.position + self.velocity
    }

    /// Move by the current velocity.
    pub fn advance(&mut self) {
        self.position = self.next_position();
    }

    /// Accelerate and move in one turn, returning the new position.
    pub fn drive(&mut self, direction: Direction) -> Point {
        self.accelerate(direction);
        self.advance();
        self.position
    }

    /// Mark the car as crashed. A crashed car stops but keeps its cell.
    pub fn crash(&mut self) {
        self.crashed = true;
        self.velocity = Point::ZERO;
    }
}
