//! Racetrack model for the planners: terrain grid, cars, and ASCII parsing.
//!
//! [`Track`] implements [`racetrack_core::TrackQuery`] and
//! [`racetrack_core::VehicleQuery`], so it can be handed directly to the
//! graph generator and path finder in `racetrack-paths`.

pub mod car;
pub mod grid;
pub mod track;

pub use car::Car;
pub use grid::SpaceGrid;
pub use track::{Track, TrackError};
