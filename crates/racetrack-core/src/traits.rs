use std::fmt;

use crate::geom::Point;
use crate::space::SpaceType;

/// Identity of a car on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarId(pub usize);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "car#{}", self.0)
    }
}

/// Read access to static track terrain.
pub trait TrackQuery {
    /// Terrain at `p`. Positions outside the track must be reported as
    /// [`SpaceType::Wall`] or rejected by the implementor.
    fn space_type_at(&self, p: Point) -> SpaceType;

    /// Every finish-line cell of the track.
    fn finish_positions(&self) -> Vec<Point>;
}

/// Read access to the current car positions on a track.
pub trait VehicleQuery {
    /// The car occupying `p`, if any.
    fn vehicle_at(&self, p: Point) -> Option<CarId>;
}
