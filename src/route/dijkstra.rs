use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    common::{AeronavError, AeronavResult, MinFHeap},
    event::{Event, SearchState},
    route::{Metric, Router},
};

impl Router {
    /// Classical priority-queue Dijkstra with lazy deletion, restricted
    /// to target-reachability: stops as soon as `dst` is finalized.
    ///
    /// Requires strictly positive edge weights (enforced at insertion
    /// time). Returns the predecessor map and the final cost of `dst`.
    pub(crate) fn route_dijkstra(
        &self,
        src: u32,
        dst: u32,
        metric: Metric,
    ) -> AeronavResult<(FxHashMap<u32, u32>, f32)> {
        let mut state = SearchState {
            metric,
            from: self.network().airport(src)?.name.clone(),
            to: self.network().airport(dst)?.name.clone(),
            current: src,
            cost: 0.0,
            n_seen: 0,
            queue_size: 0,
            msg: None,
        };
        let mut t_last = Instant::now();
        let mut prev: FxHashMap<u32, u32> = FxHashMap::default();
        let mut best: FxHashMap<u32, f32> = FxHashMap::default();
        let mut done: FxHashSet<u32> = FxHashSet::default();
        let mut queue: MinFHeap<u32> = MinFHeap::new();
        let mut total = None;
        best.insert(src, 0.0);
        queue.push(0.0, src);
        while let Some((cost, node)) = queue.pop() {
            if !done.insert(node) {
                // stale queue entry, node already finalized
                continue;
            }
            if node == dst {
                total = Some(cost);
                queue.clear();
                break;
            }
            if t_last.elapsed() > self.status_interval {
                t_last = Instant::now();
                state.current = node;
                state.cost = cost;
                state.n_seen = done.len();
                state.queue_size = queue.len();
                self.emit(&Event::SearchState(state.clone()))?;
            }
            for edge in self.network().neighbours(node) {
                if done.contains(&edge.to) {
                    continue;
                }
                let candidate = cost + metric.weight(edge);
                let tentative =
                    best.entry(edge.to).or_insert(f32::INFINITY);
                if candidate < *tentative {
                    *tentative = candidate;
                    prev.insert(edge.to, node);
                    queue.push(candidate, edge.to);
                }
            }
        }
        let Some(total) = total else {
            return Err(AeronavError::NoPath { from: src, to: dst, metric });
        };
        Ok((prev, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use crate::network::Network;

    fn grid_router() -> Router {
        let mut network = Network::default();
        for i in 1..=4 {
            network
                .add_airport(&format!("Airport {i}"), "somewhere")
                .unwrap();
        }
        // a diamond: 1-2-4 and 1-3-4
        network.add_route(1, 2, 1.0, 1.0).unwrap();
        network.add_route(2, 4, 1.0, 1.0).unwrap();
        network.add_route(1, 3, 1.0, 1.0).unwrap();
        network.add_route(3, 4, 1.0, 1.0).unwrap();
        Router::new(network)
    }

    #[test]
    fn test_equal_cost_paths_resolve_deterministically() -> AeronavResult<()> {
        let router = grid_router();
        let first = router.route_dijkstra(1, 4, Metric::Distance)?;
        for _ in 0..10 {
            let again = router.route_dijkstra(1, 4, Metric::Distance)?;
            assert_eq!(again.0, first.0);
            assert_eq!(again.1, first.1);
        }
        assert_eq!(first.1, 2.0);
        Ok(())
    }

    #[test]
    fn test_relaxation_keeps_the_cheaper_predecessor() -> AeronavResult<()> {
        let mut network = Network::default();
        for i in 1..=3 {
            network
                .add_airport(&format!("Airport {i}"), "somewhere")
                .unwrap();
        }
        network.add_route(1, 3, 10.0, 10.0).unwrap();
        network.add_route(1, 2, 1.0, 1.0).unwrap();
        network.add_route(2, 3, 1.0, 1.0).unwrap();
        let router = Router::new(network);
        let (prev, cost) = router.route_dijkstra(1, 3, Metric::Distance)?;
        assert_eq!(prev.get(&3), Some(&2));
        assert_eq!(cost, 2.0);
        Ok(())
    }

    #[test]
    fn test_self_loops_never_shorten_a_path() -> AeronavResult<()> {
        let mut network = Network::default();
        for i in 1..=2 {
            network
                .add_airport(&format!("Airport {i}"), "somewhere")
                .unwrap();
        }
        network.add_route(1, 1, 0.5, 0.5).unwrap();
        network.add_route(1, 2, 3.0, 3.0).unwrap();
        let router = Router::new(network);
        let (path, cost) = router.shortest_path(1, 2, Metric::Distance)?;
        assert_eq!(path, vec![1, 2]);
        assert_eq!(cost, 3.0);
        Ok(())
    }
}
