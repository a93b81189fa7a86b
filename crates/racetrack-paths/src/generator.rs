//! State-space graph generation.

use std::collections::VecDeque;

use racetrack_core::{Direction, Point, SpaceType, TrackQuery, rasterize};

use crate::graph::{Graph, GraphBuilder};

/// Cost of every generated connection: one turn.
pub const MOVE_COST: i32 = 1;

/// Builds the state-space [`Graph`] of a track.
pub trait GraphGenerator {
    /// Generate the graph of every state reachable from
    /// (`start_position`, `start_velocity`).
    fn generate<T: TrackQuery>(
        &self,
        track: &T,
        start_position: Point,
        start_velocity: Point,
    ) -> Graph;
}

/// Settings for [`BruteforceGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    /// Maximum Euclidean speed. The higher the value, the more nodes a
    /// graph needs.
    pub max_velocity: i32,
    /// Stop creating nodes once the graph holds this many.
    pub node_limit: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_velocity: 10,
            node_limit: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_max_velocity(mut self, max_velocity: i32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    fn max_velocity_sq(&self) -> i64 {
        let m = self.max_velocity.max(0) as i64;
        m * m
    }
}

/// Explores every reachable (position, velocity) state breadth-first.
///
/// From each state all nine accelerations are tried. A transition is kept
/// when the new speed stays within [`GeneratorConfig::max_velocity`], the car
/// actually moves, no cell on the straight line of the move is a wall, and
/// every finish cell on it is crossed in its own direction.
#[derive(Debug, Clone, Default)]
pub struct BruteforceGenerator {
    config: GeneratorConfig,
}

impl BruteforceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Whether a car may move from `position` to `next_position`, ending
    /// with `next_velocity`, on static terrain.
    fn is_valid_move<T: TrackQuery>(
        track: &T,
        position: Point,
        next_position: Point,
        next_velocity: Point,
    ) -> bool {
        let path = rasterize(position, next_position);
        if path.has_space_type(SpaceType::Wall, track) {
            log::trace!("{position} -> {next_position}: wall");
            return false;
        }
        if path.crosses_finish_wrongly(next_velocity, track) {
            log::trace!("{position} -> {next_position}: wrong-way finish crossing");
            return false;
        }
        true
    }
}

impl GraphGenerator for BruteforceGenerator {
    fn generate<T: TrackQuery>(
        &self,
        track: &T,
        start_position: Point,
        start_velocity: Point,
    ) -> Graph {
        let max_sq = self.config.max_velocity_sq();
        if start_velocity.length_sq() > max_sq {
            log::warn!(
                "start velocity {start_velocity} exceeds max velocity {}",
                self.config.max_velocity
            );
            return Graph::empty();
        }
        if track.space_type_at(start_position) == SpaceType::Wall {
            log::warn!("start position {start_position} is a wall");
            return Graph::empty();
        }

        let mut builder = GraphBuilder::default();
        let start = builder.insert(start_position, start_velocity);
        // A state is queued exactly once: when its node is created.
        let mut queue = VecDeque::from([start]);
        let mut limit_hit = false;

        while let Some(current) = queue.pop_front() {
            let (position, velocity) = builder.key(current);
            for direction in Direction::ALL {
                let next_velocity = velocity + direction.vector();
                if next_velocity.length_sq() > max_sq {
                    continue;
                }
                let next_position = position + next_velocity;
                if next_position == position {
                    continue;
                }
                if !Self::is_valid_move(track, position, next_position, next_velocity) {
                    continue;
                }

                let next = match builder.find(next_position, next_velocity) {
                    Some(id) => id,
                    None => {
                        if self.config.node_limit.is_some_and(|n| builder.len() >= n) {
                            limit_hit = true;
                            continue;
                        }
                        let id = builder.insert(next_position, next_velocity);
                        queue.push_back(id);
                        id
                    }
                };
                builder.connect(current, next, MOVE_COST, direction);
            }
        }

        if limit_hit {
            log::warn!(
                "node limit of {} reached, graph is incomplete",
                builder.len()
            );
        }

        let graph = builder.build(&track.finish_positions());
        log::debug!(
            "generated graph from {start_position}/{start_velocity}: {} nodes, {} connections, {} end nodes",
            graph.len(),
            graph.connection_count(),
            graph.end_nodes().len()
        );
        graph
    }
}
