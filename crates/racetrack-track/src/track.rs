//! Racetracks parsed from ASCII art.
//!
//! A track is a rectangle of characters, one per cell:
//!
//! | Char | Meaning |
//! |---|---|
//! | `' '` | drivable track |
//! | `'#'` | wall |
//! | `'^'` `'v'` `'<'` `'>'` | finish line, crossed upwards / downwards / leftwards / rightwards |
//! | anything else printable | a car (drawn with that character) standing on track |
//!
//! Cells outside the rectangle behave as walls.

use std::fmt;

use racetrack_core::{CarId, Point, SpaceType, TrackQuery, VehicleQuery};

use crate::car::Car;
use crate::grid::SpaceGrid;

/// A racetrack: static terrain plus the cars currently on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    grid: SpaceGrid,
    cars: Vec<Car>,
    finish: Vec<Point>,
}

impl Track {
    /// Build a track from a terrain grid, with no cars.
    pub fn from_grid(grid: SpaceGrid) -> Self {
        let finish = grid
            .iter()
            .filter(|(_, ty)| ty.is_finish())
            .map(|(p, _)| p)
            .collect();
        Self {
            grid,
            cars: Vec::new(),
            finish,
        }
    }

    /// Parse a track from its ASCII representation.
    ///
    /// Empty lines before the first and after the last row are ignored;
    /// every other line must have the same width. A track without any
    /// finish cell is rejected.
    pub fn parse(s: &str) -> Result<Self, TrackError> {
        let mut lines: Vec<&str> = s.split('\n').map(|l| l.trim_end_matches('\r')).collect();
        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(TrackError::Empty);
        }

        let width = lines[0].chars().count();
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(TrackError::InconsistentWidth {
                    line: y,
                    expected: width,
                    found,
                });
            }
        }

        let mut grid = SpaceGrid::new(width as i32, lines.len() as i32);
        let mut cars = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                match SpaceType::from_char(ch) {
                    Some(ty) => grid.set(pos, ty),
                    None if ch.is_whitespace() || ch.is_control() => {
                        return Err(TrackError::InvalidChar { ch, pos });
                    }
                    None => cars.push((ch, pos)),
                }
            }
        }

        let mut track = Track::from_grid(grid);
        if track.finish.is_empty() {
            return Err(TrackError::NoFinishLine);
        }
        for (symbol, pos) in cars {
            track.add_car(symbol, pos)?;
        }
        log::debug!(
            "parsed {}x{} track with {} finish cells and {} cars",
            track.grid.width(),
            track.grid.height(),
            track.finish.len(),
            track.cars.len()
        );
        Ok(track)
    }

    pub fn grid(&self) -> &SpaceGrid {
        &self.grid
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.get(id.0)
    }

    pub fn car_by_symbol(&self, symbol: char) -> Option<&Car> {
        self.cars.iter().find(|c| c.symbol == symbol)
    }

    /// Place a new car at rest on a drivable cell.
    pub fn add_car(&mut self, symbol: char, pos: Point) -> Result<CarId, TrackError> {
        if self.cars.iter().any(|c| c.symbol == symbol) {
            return Err(TrackError::DuplicateCar { symbol, pos });
        }
        match self.grid.at(pos) {
            Some(ty) if ty != SpaceType::Wall && self.vehicle_at(pos).is_none() => {}
            _ => return Err(TrackError::InvalidCarPosition { symbol, pos }),
        }
        let id = CarId(self.cars.len());
        self.cars.push(Car::new(id, symbol, pos));
        Ok(id)
    }

    /// Teleport a car to `pos`, keeping its velocity. The same placement
    /// rules as for [`add_car`](Self::add_car) apply.
    pub fn move_car(&mut self, id: CarId, pos: Point) -> Result<(), TrackError> {
        let symbol = self.car(id).ok_or(TrackError::UnknownCar(id))?.symbol;
        match self.grid.at(pos) {
            Some(ty)
                if ty != SpaceType::Wall && self.vehicle_at(pos).is_none_or(|c| c == id) => {}
            _ => return Err(TrackError::InvalidCarPosition { symbol, pos }),
        }
        if let Some(car) = self.cars.get_mut(id.0) {
            car.position = pos;
        }
        Ok(())
    }
}

impl TrackQuery for Track {
    fn space_type_at(&self, p: Point) -> SpaceType {
        self.grid.at(p).unwrap_or(SpaceType::Wall)
    }

    fn finish_positions(&self) -> Vec<Point> {
        self.finish.clone()
    }
}

impl VehicleQuery for Track {
    fn vehicle_at(&self, p: Point) -> Option<CarId> {
        self.cars.iter().find(|c| c.position == p).map(|c| c.id)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.grid.width() {
                let p = Point::new(x, y);
                let ch = match self.cars.iter().find(|c| c.position == p) {
                    Some(car) => car.symbol,
                    None => self.space_type_at(p).to_char(),
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when building a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// The input contains no rows.
    Empty,
    /// A row's width differs from the first row's.
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A whitespace or control character other than `' '` was found.
    InvalidChar { ch: char, pos: Point },
    /// Two cars share a symbol.
    DuplicateCar { symbol: char, pos: Point },
    /// A car was placed on a wall, outside the track, or on another car.
    InvalidCarPosition { symbol: char, pos: Point },
    /// The track has no finish cell.
    NoFinishLine,
    UnknownCar(CarId),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "track: no rows"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "track: line {line} is {found} cells wide, expected {expected}"
            ),
            Self::InvalidChar { ch, pos } => {
                write!(f, "track: invalid character {ch:?} at {pos}")
            }
            Self::DuplicateCar { symbol, pos } => {
                write!(f, "track: duplicate car \u{201c}{symbol}\u{201d} at {pos}")
            }
            Self::InvalidCarPosition { symbol, pos } => {
                write!(f, "track: car \u{201c}{symbol}\u{201d} cannot stand at {pos}")
            }
            Self::NoFinishLine => write!(f, "track: no finish line"),
            Self::UnknownCar(id) => write!(f, "track: unknown {id}"),
        }
    }
}

impl std::error::Error for TrackError {}
