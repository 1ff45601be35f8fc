use serde::{Deserialize, Serialize};
use strum::Display;

use crate::network::Edge;

/// Weight attribute minimized by a shortest-path query
#[derive(
    Debug, Default, Eq, PartialEq, Copy, Clone, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    #[strum(serialize = "distance")]
    Distance,
    #[strum(serialize = "flight time")]
    FlightTime,
}

impl Metric {
    /// The edge attribute read during relaxation
    pub fn weight(&self, edge: &Edge) -> f32 {
        match self {
            Self::Distance => edge.distance,
            Self::FlightTime => edge.flight_time,
        }
    }

    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Distance => "km",
            Self::FlightTime => "h",
        }
    }
}
