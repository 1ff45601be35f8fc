//! Undirected weighted route network over registered airports
use std::fmt::Display;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    common::{AeronavError, AeronavResult},
    registry::{Airport, Registry},
};

/// One directed half of an undirected route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: u32,
    /// Physical distance in kilometers
    pub distance: f32,
    /// Flight duration in hours
    pub flight_time: f32,
}

/// The route network aggregate: owns the airport registry and the
/// adjacency list.
///
/// Invariants: every edge endpoint is a registered code, and there is at
/// most one route per unordered pair of codes. Both directions of a route
/// are materialized in the adjacency list with the same weights. Rejected
/// operations leave the network untouched.
#[derive(Debug, Clone, Default)]
pub struct Network {
    registry: Registry,
    adjacency: FxHashMap<u32, Vec<Edge>>,
    n_routes: usize,
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Network(Airports: {airports}, Routes: {routes})",
            airports = self.registry.len(),
            routes = self.n_routes
        )
    }
}

fn check_weight(name: &'static str, value: f32) -> AeronavResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AeronavError::InvalidWeight { name, value });
    }
    Ok(())
}

impl Network {
    pub fn add_airport(
        &mut self,
        name: &str,
        location: &str,
    ) -> AeronavResult<u32> {
        self.registry.add(name, location)
    }

    pub fn airport(&self, code: u32) -> AeronavResult<&Airport> {
        self.registry.get(code)
    }

    pub fn airport_by_name(&self, name: &str) -> Option<&Airport> {
        self.registry.get_by_name(name)
    }

    pub fn contains_airport(&self, code: u32) -> bool {
        self.registry.contains(code)
    }

    /// All registered airports in insertion order
    pub fn list_airports(&self) -> &[Airport] {
        self.registry.airports()
    }

    pub fn airport_count(&self) -> usize {
        self.registry.len()
    }

    pub fn route_count(&self) -> usize {
        self.n_routes
    }

    /// Insert the route between `from` and `to`, overwriting the weights
    /// if the pair is already connected.
    pub fn add_route(
        &mut self,
        from: u32,
        to: u32,
        distance: f32,
        flight_time: f32,
    ) -> AeronavResult<()> {
        check_weight("distance", distance)?;
        check_weight("flight time", flight_time)?;
        for code in [from, to] {
            if !self.registry.contains(code) {
                return Err(AeronavError::UnknownAirport(code));
            }
        }
        if self.upsert(from, to, distance, flight_time) {
            self.n_routes += 1;
            debug!("Added route #{from} <-> #{to} ({distance} km, {flight_time} h)");
        } else {
            debug!("Overwrote route #{from} <-> #{to} ({distance} km, {flight_time} h)");
        }
        Ok(())
    }

    /// Replace the weights of an existing route; unlike [`Self::add_route`]
    /// this fails if the pair is not connected.
    pub fn update_route(
        &mut self,
        from: u32,
        to: u32,
        distance: f32,
        flight_time: f32,
    ) -> AeronavResult<()> {
        check_weight("distance", distance)?;
        check_weight("flight time", flight_time)?;
        if !self.has_route(from, to) {
            return Err(AeronavError::RouteNotFound { from, to });
        }
        self.upsert(from, to, distance, flight_time);
        debug!("Updated route #{from} <-> #{to} ({distance} km, {flight_time} h)");
        Ok(())
    }

    pub fn has_route(&self, from: u32, to: u32) -> bool {
        self.neighbours(from).iter().any(|e| e.to == to)
    }

    /// Outgoing edges of `code`; empty for unconnected or unknown codes
    pub fn neighbours(&self, code: u32) -> &[Edge] {
        self.adjacency.get(&code).map_or(&[], Vec::as_slice)
    }

    /// Every route exactly once as `(from, edge)` with `from <= edge.to`,
    /// ordered by code
    pub fn routes(&self) -> impl Iterator<Item = (u32, &Edge)> + '_ {
        self.adjacency
            .iter()
            .sorted_by_key(|&(&code, _)| code)
            .flat_map(|(&from, edges)| {
                edges
                    .iter()
                    .filter(move |edge| from <= edge.to)
                    .map(move |edge| (from, edge))
            })
    }

    /// Returns true if a new pair was connected, false on overwrite.
    /// Endpoints must already be validated.
    fn upsert(
        &mut self,
        from: u32,
        to: u32,
        distance: f32,
        flight_time: f32,
    ) -> bool {
        let created =
            Self::upsert_half(self.adjacency.entry(from).or_default(), to, distance, flight_time);
        if from != to {
            Self::upsert_half(self.adjacency.entry(to).or_default(), from, distance, flight_time);
        }
        created
    }

    fn upsert_half(
        edges: &mut Vec<Edge>,
        to: u32,
        distance: f32,
        flight_time: f32,
    ) -> bool {
        if let Some(edge) = edges.iter_mut().find(|e| e.to == to) {
            edge.distance = distance;
            edge.flight_time = flight_time;
            false
        } else {
            edges.push(Edge { to, distance, flight_time });
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;

    fn network_with_airports(n: u32) -> Network {
        let mut network = Network::default();
        for i in 1..=n {
            network
                .add_airport(&format!("Airport {i}"), &format!("City {i}"))
                .unwrap();
        }
        network
    }

    #[test]
    fn test_routes_are_undirected() -> AeronavResult<()> {
        let mut network = network_with_airports(2);
        network.add_route(1, 2, 100.0, 2.0)?;
        assert!(network.has_route(1, 2));
        assert!(network.has_route(2, 1));
        assert_eq!(network.route_count(), 1);
        Ok(())
    }

    #[test]
    fn test_re_adding_a_pair_overwrites_in_place() -> AeronavResult<()> {
        let mut network = network_with_airports(2);
        network.add_route(1, 2, 100.0, 2.0)?;
        network.add_route(2, 1, 250.0, 3.5)?;
        assert_eq!(network.route_count(), 1);
        assert_eq!(network.routes().count(), 1);
        let edge = network.neighbours(1).iter().find(|e| e.to == 2).copied().unwrap();
        assert_eq!(edge.distance, 250.0);
        assert_eq!(edge.flight_time, 3.5);
        // the reverse direction carries the new weights as well
        let back = network.neighbours(2).iter().find(|e| e.to == 1).copied().unwrap();
        assert_eq!(back.distance, 250.0);
        assert_eq!(back.flight_time, 3.5);
        Ok(())
    }

    #[test]
    fn test_unknown_endpoints_are_rejected_atomically() {
        let mut network = network_with_airports(1);
        let err = network.add_route(1, 7, 100.0, 2.0).unwrap_err();
        assert!(matches!(err, AeronavError::UnknownAirport(7)));
        let err = network.add_route(9, 1, 100.0, 2.0).unwrap_err();
        assert!(matches!(err, AeronavError::UnknownAirport(9)));
        assert_eq!(network.route_count(), 0);
        assert!(network.neighbours(1).is_empty());
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let mut network = network_with_airports(2);
        for (distance, flight_time) in [
            (0.0, 2.0),
            (-100.0, 2.0),
            (100.0, 0.0),
            (100.0, -2.0),
            (f32::NAN, 2.0),
            (100.0, f32::INFINITY),
        ] {
            let err =
                network.add_route(1, 2, distance, flight_time).unwrap_err();
            assert!(
                matches!(err, AeronavError::InvalidWeight { .. }),
                "expected InvalidWeight for ({distance}, {flight_time})"
            );
        }
        assert!(!network.has_route(1, 2));
    }

    #[test]
    fn test_update_requires_an_existing_route() -> AeronavResult<()> {
        let mut network = network_with_airports(3);
        network.add_route(1, 2, 100.0, 2.0)?;
        let err = network.update_route(2, 3, 50.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            AeronavError::RouteNotFound { from: 2, to: 3 }
        ));
        assert!(!network.has_route(2, 3));
        Ok(())
    }

    #[test]
    fn test_update_replaces_only_the_named_edge() -> AeronavResult<()> {
        let mut network = network_with_airports(3);
        network.add_route(1, 2, 100.0, 2.0)?;
        network.add_route(2, 3, 200.0, 4.0)?;
        network.update_route(1, 2, 150.0, 2.5)?;
        let updated = network.neighbours(1).iter().find(|e| e.to == 2).copied().unwrap();
        assert_eq!((updated.distance, updated.flight_time), (150.0, 2.5));
        let untouched = network.neighbours(3).iter().find(|e| e.to == 2).copied().unwrap();
        assert_eq!((untouched.distance, untouched.flight_time), (200.0, 4.0));
        Ok(())
    }

    #[test]
    fn test_update_validates_weights_before_existence() -> AeronavResult<()> {
        let mut network = network_with_airports(2);
        network.add_route(1, 2, 100.0, 2.0)?;
        let err = network.update_route(1, 2, -1.0, 2.0).unwrap_err();
        assert!(matches!(err, AeronavError::InvalidWeight { .. }));
        let edge = network.neighbours(1).iter().find(|e| e.to == 2).copied().unwrap();
        assert_eq!(edge.distance, 100.0);
        Ok(())
    }

    #[test]
    fn test_self_loop_is_stored_once() -> AeronavResult<()> {
        let mut network = network_with_airports(1);
        network.add_route(1, 1, 10.0, 0.5)?;
        assert!(network.has_route(1, 1));
        assert_eq!(network.neighbours(1).len(), 1);
        assert_eq!(network.route_count(), 1);
        Ok(())
    }

    #[test]
    fn test_route_enumeration_lists_each_pair_once() -> AeronavResult<()> {
        let mut network = network_with_airports(3);
        network.add_route(1, 2, 100.0, 2.0)?;
        network.add_route(3, 2, 200.0, 4.0)?;
        let pairs: Vec<(u32, u32)> =
            network.routes().map(|(from, edge)| (from, edge.to)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
        Ok(())
    }
}
