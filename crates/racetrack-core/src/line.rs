//! Line rasterization for straight moves across the track grid.
//!
//! A move from one cell to another passes over every cell on the integer
//! Bresenham line between them. Collision checks (walls, finish lines, other
//! cars) are answered over that cell sequence:
//!
//! ```text
//! From (0,0) to (5,2):
//!
//!     2 │         ● ●
//!     1 │     ● ●
//!     0 ● ●
//!       └──────────────
//!        0 1 2 3 4 5
//! ```

use crate::geom::Point;
use crate::space::SpaceType;
use crate::traits::{CarId, TrackQuery, VehicleQuery};

/// Iterator over the cells of a Bresenham line, both endpoints included.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    cur: Point,
    end: Point,
    dx: i32,
    dy: i32,
    step: Point,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(from: Point, to: Point) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        Self {
            cur: from,
            end: to,
            dx,
            dy,
            step: (to - from).signum(),
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let p = self.cur;
        if p == self.end {
            self.done = true;
            return Some(p);
        }
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.cur.x += self.step.x;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.cur.y += self.step.y;
        }
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let rest = (self.end.x - self.cur.x)
            .abs()
            .max((self.end.y - self.cur.y).abs()) as usize
            + 1;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for BresenhamLine {}

/// Rasterize the straight move from `from` to `to`.
pub fn rasterize(from: Point, to: Point) -> PositionPath {
    PositionPath::new(BresenhamLine::new(from, to).collect())
}

/// An ordered sequence of track cells, typically produced by [`rasterize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionPath {
    points: Vec<Point>,
}

impl PositionPath {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.points.contains(&p)
    }

    /// Whether any cell of the path has terrain `ty`.
    pub fn has_space_type(&self, ty: SpaceType, track: &impl TrackQuery) -> bool {
        self.iter().any(|p| track.space_type_at(p) == ty)
    }

    /// Whether any cell of the path is occupied by a car other than `except`.
    pub fn has_vehicle(&self, except: CarId, vehicles: &impl VehicleQuery) -> bool {
        self.iter()
            .any(|p| vehicles.vehicle_at(p).is_some_and(|id| id != except))
    }

    /// Whether driving this path with `velocity` crosses a finish cell
    /// against its direction.
    pub fn crosses_finish_wrongly(&self, velocity: Point, track: &impl TrackQuery) -> bool {
        self.iter().any(|p| {
            let ty = track.space_type_at(p);
            ty.is_finish() && !ty.allows_velocity(velocity)
        })
    }
}

impl IntoIterator for PositionPath {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl FromIterator<Point> for PositionPath {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
