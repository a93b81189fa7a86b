//! **racetrack-core** — core types for vector racing on a grid.
//!
//! This crate provides the foundational types shared by the racetrack
//! crates: geometry primitives, the nine acceleration directions, track
//! terrain kinds, Bresenham line rasterization, and the query traits through
//! which planners look at a track and the cars on it.

pub mod direction;
pub mod geom;
pub mod line;
pub mod space;
pub mod traits;

pub use direction::Direction;
pub use geom::{Point, Range};
pub use line::{BresenhamLine, PositionPath, rasterize};
pub use space::SpaceType;
pub use traits::{CarId, TrackQuery, VehicleQuery};
