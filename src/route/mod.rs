//! Shortest-route computation over the airport network
use std::time::{Duration, Instant};

use human_repr::HumanDuration;
use rustc_hash::FxHashMap;
use tracing::*;

use crate::{
    common::{AeronavError, AeronavResult, FormatFloat},
    event::{Callback, Event},
    network::Network,
};

mod metric;
pub use metric::Metric;

mod dijkstra;

/// Shortest-path engine over a [`Network`].
///
/// Stateless across queries: each [`Self::shortest_path`] call is a pure
/// function of the current network plus its arguments.
pub struct Router {
    network: Network,
    pub callback: Option<Callback>,
    pub status_interval: Duration,
}

impl std::fmt::Display for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Router({network})", network = self.network)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callback = &self.callback.as_ref().map(|_| "<Callback>");
        f.debug_struct("Router")
            .field("network", &self.network)
            .field("callback", &callback)
            .field("status_interval", &self.status_interval)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        let default_callback = Box::new(move |_: &Router, event: &Event| {
            info!("{event}");
            Ok(())
        });
        Self {
            network: Network::default(),
            callback: Some(default_callback),
            status_interval: Duration::from_secs_f64(0.5),
        }
    }
}

impl Router {
    pub fn new(network: Network) -> Self {
        Self { network, ..Default::default() }
    }

    pub fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    pub const fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub(crate) fn emit(&self, event: &Event) -> AeronavResult<()> {
        if let Some(cb) = &self.callback {
            cb(self, event)?;
        }
        Ok(())
    }

    /// Compute the minimum-total-weight path between two airports under
    /// the given metric.
    ///
    /// Returns the path as a sequence of airport codes (endpoints
    /// included) and its total cost. Fails with
    /// [`AeronavError::UnknownAirport`] for unregistered endpoints and
    /// [`AeronavError::NoPath`] when the endpoints lie in disconnected
    /// components.
    pub fn shortest_path(
        &self,
        from: u32,
        to: u32,
        metric: Metric,
    ) -> AeronavResult<(Vec<u32>, f32)> {
        for code in [from, to] {
            if !self.network.contains_airport(code) {
                return Err(AeronavError::UnknownAirport(code));
            }
        }
        if from == to {
            return Ok((vec![from], 0.0));
        }
        let src = self.network.airport(from)?;
        let dst = self.network.airport(to)?;
        let t_start = Instant::now();
        let (prev, cost) = self.route_dijkstra(from, to, metric)?;
        let path = self.reconstruct(from, to, &prev)?;
        info!(
            "Cheapest route by {metric} from {src} to {dst} found in {dt}: {hops} stop(s), {cost} {unit}",
            dt = t_start.elapsed().human_duration(),
            hops = path.len(),
            cost = cost.format_float(),
            unit = metric.unit(),
        );
        Ok((path, cost))
    }

    fn reconstruct(
        &self,
        from: u32,
        to: u32,
        prev: &FxHashMap<u32, u32>,
    ) -> AeronavResult<Vec<u32>> {
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let &pred = prev.get(&current).ok_or_else(|| {
                AeronavError::RuntimeError(format!(
                    "Missing predecessor for #{current} during path reconstruction"
                ))
            })?;
            if path.contains(&pred) {
                path.push(pred);
                return Err(AeronavError::RuntimeError(format!(
                    "Found loop during path reconstruction: {path:?}"
                )));
            }
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Ok(path)
    }
}
