use std::collections::BinaryHeap;

use racetrack_core::{CarId, Point, TrackQuery, VehicleQuery, rasterize};

use crate::graph::{Graph, GraphConnection, NodeId};
use crate::path::{GraphPath, GraphVectorDirection};

/// Sentinel cost of a node the last search did not reach.
pub const UNREACHABLE: i32 = i32::MAX;

/// Per-search state of one graph node.
#[derive(Clone)]
struct SearchNode {
    cost: i32,
    previous: Option<GraphConnection>,
    generation: u32,
    visited: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            cost: UNREACHABLE,
            previous: None,
            generation: 0,
            visited: false,
        }
    }
}

/// Reference into the node overlay, ordered by cost for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
struct NodeRef {
    idx: usize,
    cost: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest cost first,
        // lowest index on ties.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Fewest-moves search over a generated [`Graph`].
///
/// The graph is only borrowed; costs and predecessors live in an overlay
/// owned by the finder, so one graph can serve many finders and many
/// queries. Every edge is re-checked against the track when it is relaxed:
/// cars move between graph generation and the query, so an edge whose line
/// now touches another car is skipped.
pub struct DijkstraPathFinder<'a, T> {
    graph: &'a Graph,
    track: &'a T,
    vehicle: CarId,
    nodes: Vec<SearchNode>,
    generation: u32,
    expansion_limit: Option<usize>,
}

impl<'a, T: TrackQuery + VehicleQuery> DijkstraPathFinder<'a, T> {
    /// A finder for `vehicle`, which is ignored when checking for other cars.
    pub fn new(graph: &'a Graph, track: &'a T, vehicle: CarId) -> Self {
        Self {
            graph,
            track,
            vehicle,
            nodes: vec![SearchNode::default(); graph.len()],
            generation: 0,
            expansion_limit: None,
        }
    }

    /// Give up, reporting no path, after expanding `limit` nodes.
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Find the fewest-moves path from (`position`, `velocity`) to any
    /// finish node.
    ///
    /// Returns `None` when the start state is not in the graph, no finish
    /// node is reachable, or the expansion limit was hit.
    pub fn find_path(&mut self, position: Point, velocity: Point) -> Option<GraphPath> {
        self.reset();
        let graph = self.graph;
        let Some(start) = graph.find(position, velocity) else {
            log::debug!("no graph node for start {position}/{velocity}");
            return None;
        };

        let cur_gen = self.generation;
        let si = start.index();
        self.nodes[si] = SearchNode {
            cost: 0,
            generation: cur_gen,
            ..SearchNode::default()
        };

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef { idx: si, cost: 0 });
        let mut expanded = 0usize;

        while let Some(current) = open.pop() {
            let ci = current.idx;
            let cn = &self.nodes[ci];
            // Skip stale entries.
            if cn.generation != cur_gen || cn.visited || current.cost > cn.cost {
                continue;
            }
            self.nodes[ci].visited = true;

            expanded += 1;
            if self.expansion_limit.is_some_and(|limit| expanded > limit) {
                log::warn!("expansion limit reached after {} nodes", expanded - 1);
                return None;
            }

            for connection in graph.nodes()[ci].connections() {
                let ni = connection.to.index();
                if self.visited(ni) || !self.is_usable(connection) {
                    continue;
                }
                let tentative = current.cost + connection.cost;
                let n = &mut self.nodes[ni];
                if n.generation != cur_gen {
                    *n = SearchNode {
                        generation: cur_gen,
                        ..SearchNode::default()
                    };
                }
                if tentative >= n.cost {
                    continue;
                }
                n.cost = tentative;
                n.previous = Some(*connection);
                open.push(NodeRef {
                    idx: ni,
                    cost: tentative,
                });
            }
        }

        let end = graph
            .end_nodes()
            .iter()
            .copied()
            .filter(|&id| self.cost(id) != UNREACHABLE)
            .min_by_key(|&id| (self.cost(id), id))?;
        log::debug!(
            "search from {position}/{velocity}: {expanded} nodes expanded, finish cost {}",
            self.cost(end)
        );
        self.construct_path(start, end)
    }

    /// Cost of the state in the last search, or `None` if it was not reached.
    pub fn cost_to(&self, position: Point, velocity: Point) -> Option<i32> {
        let id = self.graph.find(position, velocity)?;
        let cost = self.cost(id);
        (cost != UNREACHABLE).then_some(cost)
    }

    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stamps from 2^32 searches ago would look current.
            self.nodes.fill(SearchNode::default());
            self.generation = 1;
        }
    }

    fn cost(&self, id: NodeId) -> i32 {
        let n = &self.nodes[id.index()];
        if n.generation == self.generation {
            n.cost
        } else {
            UNREACHABLE
        }
    }

    fn visited(&self, idx: usize) -> bool {
        let n = &self.nodes[idx];
        n.generation == self.generation && n.visited
    }

    /// Query-time check of an edge against the current track state.
    fn is_usable(&self, connection: &GraphConnection) -> bool {
        let nodes = self.graph.nodes();
        let from = &nodes[connection.from.index()];
        let to = &nodes[connection.to.index()];
        let path = rasterize(from.position(), to.position());
        if path.has_vehicle(self.vehicle, self.track) {
            log::trace!("{from} -> {to}: blocked by a car");
            return false;
        }
        // Redundant for generated graphs on static terrain, but the track is
        // only seen through a trait and may have changed since generation.
        if path.crosses_finish_wrongly(to.velocity(), self.track) {
            log::trace!("{from} -> {to}: wrong-way finish crossing");
            return false;
        }
        true
    }

    /// Walk predecessor connections back from `end` to `start`.
    fn construct_path(&self, start: NodeId, end: NodeId) -> Option<GraphPath> {
        let nodes = self.graph.nodes();
        let mut steps = Vec::new();
        let mut current = end;
        while current != start {
            let n = &self.nodes[current.index()];
            let previous = match n.previous {
                Some(c) if n.generation == self.generation && steps.len() < nodes.len() => c,
                _ => {
                    log::warn!("broken predecessor chain at {}", nodes[current.index()]);
                    return None;
                }
            };
            steps.push(GraphVectorDirection {
                position: nodes[current.index()].position(),
                direction: previous.direction,
            });
            current = previous.from;
        }
        steps.reverse();
        Some(GraphPath::new(nodes[start.index()].position(), steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BruteforceGenerator, GeneratorConfig, GraphGenerator};
    use racetrack_core::{Direction, SpaceType};
    use racetrack_track::Track;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};
    use std::collections::VecDeque;

    // 5x5 open area, right-facing finish column at x = 4, bordered by the
    // implicit walls outside the track.
    const OPEN: &str = "
    >
    >
a   >
    >
    >
";

    fn generator(max_velocity: i32) -> BruteforceGenerator {
        BruteforceGenerator::with_config(GeneratorConfig::default().with_max_velocity(max_velocity))
    }

    fn car_graph(track: &Track, max_velocity: i32) -> (Graph, CarId, Point, Point) {
        let car = track.car_by_symbol('a').expect("track has car a");
        let g = generator(max_velocity).generate(track, car.position, car.velocity);
        (g, car.id, car.position, car.velocity)
    }

    /// Plain BFS over the graph, ignoring cars: fewest moves to any end node.
    fn bfs_min_moves(g: &Graph, start: NodeId) -> Option<usize> {
        let mut dist = vec![usize::MAX; g.len()];
        dist[start.index()] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            for c in g.node(id).unwrap().connections() {
                if dist[c.to.index()] == usize::MAX {
                    dist[c.to.index()] = dist[id.index()] + 1;
                    queue.push_back(c.to);
                }
            }
        }
        g.end_nodes()
            .iter()
            .map(|id| dist[id.index()])
            .filter(|&d| d != usize::MAX)
            .min()
    }

    #[test]
    fn test_open_rectangle_three_moves() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        assert_eq!(pos, Point::new(0, 2));

        let mut finder = DijkstraPathFinder::new(&g, &t, id);
        let path = finder.find_path(pos, vel).expect("path exists");
        // x: 0 -> 1 -> 3 -> 4 is the fastest way to reach column 4.
        assert_eq!(path.len(), 3);
        assert_eq!(path.finish().x, 4);
        assert_eq!(t.space_type_at(path.finish()), SpaceType::FinishRight);

        let states = path.replay(vel);
        let (_, final_velocity) = states[states.len() - 1];
        assert!(final_velocity.x >= 0);
    }

    #[test]
    fn test_path_starts_just_after_start() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let path = DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).unwrap();
        assert_eq!(path.start(), pos);
        assert_ne!(path.waypoints()[0], pos);
        assert_eq!(path.to_position_path().first(), Some(pos));
        assert_eq!(path.to_position_path().last(), Some(path.finish()));
    }

    #[test]
    fn test_direction_list_round_trip() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let path = DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).unwrap();

        let mut car = t.car(id).unwrap().clone();
        let driven: Vec<Point> = path
            .to_direction_list()
            .into_iter()
            .map(|d| car.drive(d))
            .collect();
        assert_eq!(driven, path.waypoints());
    }

    #[test]
    fn test_optimal_on_corridor() {
        // Start at rest at x = 1, finish at x = 7: 1 -> 2 -> 4 -> 7 is 3 moves.
        let t = Track::parse("#########\n#a     >#\n#########").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let path = DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(
            path.to_direction_list(),
            vec![Direction::Right, Direction::Right, Direction::Right]
        );
        assert_eq!(
            path.waypoints(),
            vec![Point::new(2, 1), Point::new(4, 1), Point::new(7, 1)]
        );
    }

    #[test]
    fn test_walled_in_start_has_no_path() {
        let t = Track::parse("###\n#a#\n###\n>##").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        assert!(DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).is_none());
    }

    #[test]
    fn test_unknown_start_has_no_path() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, _, _) = car_graph(&t, 10);
        let mut finder = DijkstraPathFinder::new(&g, &t, id);
        assert!(finder.find_path(Point::new(40, 40), Point::ZERO).is_none());
        assert!(finder.find_path(Point::new(0, 2), Point::new(-9, 0)).is_none());
    }

    #[test]
    fn test_unreachable_finish() {
        // The finish is behind a wall.
        let t = Track::parse("#####\n#a #>\n#####").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        assert!(g.end_nodes().is_empty());
        assert!(DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).is_none());
    }

    #[test]
    fn test_car_placed_after_generation_forces_detour() {
        let mut t = Track::parse("#########\n#a     >#\n#      >#\n#########").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let before = DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).unwrap();
        assert_eq!(before.len(), 3);

        // Block the straight line on row 1.
        let blocker = t.add_car('b', Point::new(4, 1)).unwrap();
        let after = DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).unwrap();
        for cell in after.to_position_path().iter() {
            assert_ne!(t.vehicle_at(cell), Some(blocker));
        }
        assert!(after.len() >= before.len());
    }

    #[test]
    fn test_blocking_car_can_cut_off_finish() {
        let mut t = Track::parse("#######\n#a   >#\n#######").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        assert!(DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).is_some());

        t.add_car('b', Point::new(3, 1)).unwrap();
        assert!(DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).is_none());
    }

    /// A track whose terrain at one cell was changed after graph generation.
    struct Repainted<'a> {
        track: &'a Track,
        cell: Point,
        ty: SpaceType,
    }

    impl TrackQuery for Repainted<'_> {
        fn space_type_at(&self, p: Point) -> SpaceType {
            if p == self.cell {
                self.ty
            } else {
                self.track.space_type_at(p)
            }
        }

        fn finish_positions(&self) -> Vec<Point> {
            self.track.finish_positions()
        }
    }

    impl VehicleQuery for Repainted<'_> {
        fn vehicle_at(&self, p: Point) -> Option<CarId> {
            self.track.vehicle_at(p)
        }
    }

    #[test]
    fn test_finish_repainted_after_generation_is_rechecked() {
        let t = Track::parse("#########\n#a     >#\n#########").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        assert!(DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).is_some());

        // Every route runs rightwards over (4, 1), now a left-facing line.
        let view = Repainted {
            track: &t,
            cell: Point::new(4, 1),
            ty: SpaceType::FinishLeft,
        };
        assert!(DijkstraPathFinder::new(&g, &view, id).find_path(pos, vel).is_none());
    }

    #[test]
    fn test_repainted_finish_forces_detour() {
        let t = Track::parse("#########\n#a     >#\n#      >#\n#########").unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let view = Repainted {
            track: &t,
            cell: Point::new(4, 1),
            ty: SpaceType::FinishLeft,
        };
        let path = DijkstraPathFinder::new(&g, &view, id)
            .find_path(pos, vel)
            .expect("row 2 stays open");

        let mut from = pos;
        for (to, v) in path.replay(vel) {
            assert!(!rasterize(from, to).crosses_finish_wrongly(v, &view));
            from = to;
        }
        assert_eq!(view.space_type_at(path.finish()), SpaceType::FinishRight);
    }

    #[test]
    fn test_own_car_is_not_an_obstacle() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        // The car stands on the start cell every edge out of it passes over.
        assert_eq!(t.vehicle_at(pos), Some(id));
        assert!(DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel).is_some());
    }

    #[test]
    fn test_repeated_queries_reuse_overlay() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let mut finder = DijkstraPathFinder::new(&g, &t, id);

        let first = finder.find_path(pos, vel).unwrap();
        // A different start in the same graph: one move in already.
        let mid = first.steps()[0].position;
        let mid_velocity = mid - pos;
        let second = finder.find_path(mid, mid_velocity).unwrap();
        assert_eq!(second.len(), first.len() - 1);
        assert_eq!(finder.cost_to(pos, vel), None);
        assert_eq!(finder.cost_to(mid, mid_velocity), Some(0));

        let third = finder.find_path(pos, vel).unwrap();
        assert_eq!(third, first);
    }

    #[test]
    fn test_costs_match_hop_counts() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let mut finder = DijkstraPathFinder::new(&g, &t, id);
        let path = finder.find_path(pos, vel).unwrap();

        assert_eq!(finder.cost_to(pos, vel), Some(0));
        for (i, (p, v)) in path.replay(vel).into_iter().enumerate() {
            assert_eq!(finder.cost_to(p, v), Some(i as i32 + 1));
        }
    }

    #[test]
    fn test_start_on_finish_gives_empty_path() {
        let t = Track::parse("#a>\n# >").unwrap();
        let g = generator(10).generate(&t, Point::new(2, 0), Point::ZERO);
        let path = DijkstraPathFinder::new(&g, &t, CarId(0))
            .find_path(Point::new(2, 0), Point::ZERO)
            .unwrap();
        assert!(path.is_empty());
        assert_eq!(path.finish(), Point::new(2, 0));
    }

    #[test]
    fn test_expansion_limit() {
        let t = Track::parse(OPEN).unwrap();
        let (g, id, pos, vel) = car_graph(&t, 10);
        let mut finder = DijkstraPathFinder::new(&g, &t, id).with_expansion_limit(1);
        assert!(finder.find_path(pos, vel).is_none());

        let mut finder = DijkstraPathFinder::new(&g, &t, id).with_expansion_limit(g.len());
        assert!(finder.find_path(pos, vel).is_some());
    }

    #[test]
    fn test_empty_graph() {
        let t = Track::parse(OPEN).unwrap();
        let g = Graph::empty();
        let mut finder = DijkstraPathFinder::new(&g, &t, CarId(0));
        assert!(finder.find_path(Point::new(0, 2), Point::ZERO).is_none());
    }

    #[test]
    fn test_shared_graph_across_finders() {
        let t = Track::parse("#######\n#a   >#\n#b   >#\n#######").unwrap();
        let g = generator(10).generate(&t, Point::new(1, 1), Point::ZERO);
        let a = t.car_by_symbol('a').unwrap().id;
        let b = t.car_by_symbol('b').unwrap().id;

        let mut fa = DijkstraPathFinder::new(&g, &t, a);
        let mut fb = DijkstraPathFinder::new(&g, &t, b);
        let pa = fa.find_path(Point::new(1, 1), Point::ZERO);
        let pb = fb.find_path(Point::new(1, 1), Point::ZERO);
        assert!(pa.is_some());
        // For car b, car a blocks every move out of (1, 1).
        assert!(pb.is_none());
        assert_eq!(fa.cost_to(Point::new(1, 1), Point::ZERO), Some(0));
    }

    #[test]
    fn test_random_tracks_match_bfs() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut rows = Vec::new();
            for y in 0..6 {
                let row: String = (0..8)
                    .map(|x| match (x, y) {
                        (1, 2) => 'a',
                        (7, _) => '>',
                        _ if rng.random_range(0..100) < 15 => '#',
                        _ => ' ',
                    })
                    .collect();
                rows.push(row);
            }
            let t = Track::parse(&rows.join("\n")).unwrap();
            let (g, id, pos, vel) = car_graph(&t, 3);
            let start = g.find(pos, vel).unwrap();

            let found = DijkstraPathFinder::new(&g, &t, id).find_path(pos, vel);
            assert_eq!(found.as_ref().map(|p| p.len()), bfs_min_moves(&g, start));
            if let Some(path) = found {
                let positions: Vec<Point> = path.replay(vel).into_iter().map(|(p, _)| p).collect();
                assert_eq!(positions, path.waypoints());
                assert!(g.end_nodes().iter().any(|&e| g.node(e).unwrap().position() == path.finish()));
            }
        }
    }
}
