//! Terrain kinds of a racetrack cell.

use crate::geom::Point;

/// The kind of a single track cell.
///
/// Finish cells carry the direction in which the line must be crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpaceType {
    /// Drivable road.
    #[default]
    Track,
    Wall,
    FinishUp,
    FinishDown,
    FinishLeft,
    FinishRight,
}

impl SpaceType {
    /// Whether this is one of the four finish-line kinds.
    pub const fn is_finish(self) -> bool {
        matches!(
            self,
            SpaceType::FinishUp
                | SpaceType::FinishDown
                | SpaceType::FinishLeft
                | SpaceType::FinishRight
        )
    }

    /// Whether a car moving with `velocity` may pass over this cell.
    ///
    /// A finish cell only admits velocities whose component perpendicular to
    /// the line does not point against the line's direction. Zero along that
    /// axis is allowed, so cars can slide along the line. Every other cell
    /// admits every velocity (walls are handled separately).
    pub const fn allows_velocity(self, velocity: Point) -> bool {
        match self {
            SpaceType::FinishRight => velocity.x >= 0,
            SpaceType::FinishLeft => velocity.x <= 0,
            SpaceType::FinishDown => velocity.y >= 0,
            SpaceType::FinishUp => velocity.y <= 0,
            SpaceType::Track | SpaceType::Wall => true,
        }
    }

    /// Parse a track character. Returns `None` for characters that are not
    /// terrain (cars, for instance).
    pub const fn from_char(ch: char) -> Option<SpaceType> {
        match ch {
            ' ' => Some(SpaceType::Track),
            '#' => Some(SpaceType::Wall),
            '^' => Some(SpaceType::FinishUp),
            'v' => Some(SpaceType::FinishDown),
            '<' => Some(SpaceType::FinishLeft),
            '>' => Some(SpaceType::FinishRight),
            _ => None,
        }
    }

    /// The character used for this space type in ASCII tracks.
    pub const fn to_char(self) -> char {
        match self {
            SpaceType::Track => ' ',
            SpaceType::Wall => '#',
            SpaceType::FinishUp => '^',
            SpaceType::FinishDown => 'v',
            SpaceType::FinishLeft => '<',
            SpaceType::FinishRight => '>',
        }
    }
}
