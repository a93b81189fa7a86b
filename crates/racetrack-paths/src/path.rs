use indexmap::IndexSet;
use racetrack_core::{Direction, Point, PositionPath, rasterize};

/// One step of a [`GraphPath`]: the waypoint reached and the acceleration
/// used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphVectorDirection {
    pub position: Point,
    pub direction: Direction,
}

/// A path through a state-space graph, from a start position to a finish
/// node.
///
/// The start itself is not a step; a path is empty only when the start
/// already is a finish node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphPath {
    start: Point,
    steps: Vec<GraphVectorDirection>,
}

impl GraphPath {
    pub fn new(start: Point, steps: Vec<GraphVectorDirection>) -> Self {
        Self { start, steps }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn steps(&self) -> &[GraphVectorDirection] {
        &self.steps
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphVectorDirection> + '_ {
        self.steps.iter()
    }

    /// The position reached after the last move.
    pub fn finish(&self) -> Point {
        self.steps.last().map_or(self.start, |s| s.position)
    }

    /// The position after each move.
    pub fn waypoints(&self) -> Vec<Point> {
        self.steps.iter().map(|s| s.position).collect()
    }

    /// Every cell the car passes over, in driving order, each cell once.
    ///
    /// Consecutive waypoints (starting with the start position) are joined
    /// by their rasterized line.
    pub fn to_position_path(&self) -> PositionPath {
        let mut cells: IndexSet<Point> = IndexSet::new();
        cells.insert(self.start);
        let mut last = self.start;
        for step in &self.steps {
            cells.extend(rasterize(last, step.position));
            last = step.position;
        }
        cells.into_iter().collect()
    }

    /// The accelerations to apply, one per turn.
    pub fn to_direction_list(&self) -> Vec<Direction> {
        self.steps.iter().map(|s| s.direction).collect()
    }

    /// Drive the path from the start with `start_velocity`, returning the
    /// (position, velocity) after each move.
    ///
    /// For a path found with that start velocity, the positions equal
    /// [`waypoints`](Self::waypoints).
    pub fn replay(&self, start_velocity: Point) -> Vec<(Point, Point)> {
        let mut position = self.start;
        let mut velocity = start_velocity;
        self.steps
            .iter()
            .map(|s| {
                velocity += s.direction.vector();
                position += velocity;
                (position, velocity)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a GraphPath {
    type Item = &'a GraphVectorDirection;
    type IntoIter = std::slice::Iter<'a, GraphVectorDirection>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
