//! A terrain grid of [`SpaceType`] cells.
//!
//! A [`SpaceGrid`] owns its cells; terrain is fixed once a track is parsed.

use racetrack_core::{Point, Range, SpaceType};

/// A 2D grid of [`SpaceType`] cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpaceGrid {
    cells: Vec<SpaceType>,
    bounds: Range,
}

impl SpaceGrid {
    /// Create a new grid filled with [`SpaceType::Track`].
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![SpaceType::Track; bounds.len()],
            bounds,
        }
    }

    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Returns the size as a Point (width = x, height = y).
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some((p.y * self.width() + p.x) as usize)
    }

    /// Get the cell at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<SpaceType> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Set the cell at a point. Does nothing if out of bounds.
    pub fn set(&mut self, p: Point, ty: SpaceType) {
        if let Some(i) = self.index(p) {
            self.cells[i] = ty;
        }
    }

    pub fn fill(&mut self, ty: SpaceType) {
        self.cells.fill(ty);
    }

    /// Count how many cells have the given type.
    pub fn count(&self, ty: SpaceType) -> usize {
        self.cells.iter().filter(|&&c| c == ty).count()
    }

    /// Iterate over `(Point, SpaceType)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, SpaceType)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}
