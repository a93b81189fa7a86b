//! Motion planning for vector racing.
//!
//! A car's state is its position and velocity; each turn it may change its
//! velocity by one unit on either axis. This crate explores that state space
//! and searches it:
//!
//! - **Generation** of the reachable state graph ([`BruteforceGenerator`])
//! - **Dijkstra** fewest-moves search to the finish line
//!   ([`DijkstraPathFinder`]), re-checking every edge against the cars on
//!   the track at query time
//! - **Paths** as waypoints, covered cells, or a list of accelerations
//!   ([`GraphPath`])
//!
//! # Example
//!
//! ```
//! use racetrack_core::{CarId, Point};
//! use racetrack_paths::{BruteforceGenerator, DijkstraPathFinder, GraphGenerator};
//! use racetrack_track::Track;
//!
//! let track = Track::parse("#a    >#").unwrap();
//! let car = CarId(0);
//! let start = track.car(car).unwrap().position;
//!
//! let graph = BruteforceGenerator::new().generate(&track, start, Point::ZERO);
//! let mut finder = DijkstraPathFinder::new(&graph, &track, car);
//! let path = finder.find_path(start, Point::ZERO).unwrap();
//! assert_eq!(path.finish(), Point::new(6, 0));
//! ```

mod dijkstra;
mod generator;
mod graph;
mod path;

pub use dijkstra::{DijkstraPathFinder, UNREACHABLE};
pub use generator::{BruteforceGenerator, GeneratorConfig, GraphGenerator, MOVE_COST};
pub use graph::{Graph, GraphConnection, GraphNode, NodeId};
pub use path::{GraphPath, GraphVectorDirection};
