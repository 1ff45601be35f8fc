//! # Common utility types: errors, float ordering, priority queue
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fmt::Display,
    ops::{Deref, DerefMut},
};

use color_eyre::eyre;
use num_format::ToFormattedString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::route::Metric;

pub trait FormatNum {
    fn format_num(&self) -> String;
}

pub trait FormatFloat {
    fn format_float(&self) -> String;
}

impl<N: ToFormattedString> FormatNum for N {
    fn format_num(&self) -> String {
        use num_format::{Locale, SystemLocale};
        let locale = SystemLocale::default()
            .and_then(|l| l.name().parse())
            .unwrap_or(Locale::en);
        self.to_formatted_string(&locale)
    }
}

impl<N: Copy + Into<f64>> FormatFloat for N {
    fn format_float(&self) -> String {
        use format_num::NumberFormat;
        let num = NumberFormat::new();
        let val: f64 = (*self).into();
        num.format(",.2", val)
    }
}

#[cfg(feature = "bin")]
pub use relative_time::RelativeTime;

#[cfg(feature = "bin")]
mod relative_time {
    use std::time::Instant;

    use human_repr::HumanDuration;
    use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct RelativeTime {
        epoch: Instant,
    }

    impl Default for RelativeTime {
        fn default() -> Self {
            Self { epoch: Instant::now() }
        }
    }

    impl FormatTime for RelativeTime {
        fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
            let duration =
                format!("{}", self.epoch.elapsed().human_duration());
            write!(w, "{}", duration)
        }
    }
}

/// Min-heap priority queue using f32 as priority
pub struct MinFHeap<T: Ord>(BinaryHeap<(Reverse<F32>, T)>);

impl<T: Ord> MinFHeap<T> {
    /// Create new, empty priority queue
    pub const fn new() -> Self {
        Self(BinaryHeap::new())
    }

    /// push value `item` with priority `w` into queue
    pub fn push(&mut self, w: f32, item: T) {
        self.0.push((Reverse(F32(w)), item));
    }

    /// Remove and return smallest item and priority
    pub fn pop(&mut self) -> Option<(f32, T)> {
        self.0.pop().map(|(Reverse(F32(w)), item)| (w, item))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<T: Ord> Default for MinFHeap<T> {
    fn default() -> Self {
        Self(BinaryHeap::new())
    }
}

impl<T: Ord> Deref for MinFHeap<T> {
    type Target = BinaryHeap<(Reverse<F32>, T)>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Ord> DerefMut for MinFHeap<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Aeronav error type
#[derive(Error, Debug)]
pub enum AeronavError {
    #[error("airport {0} must not be empty")]
    EmptyField(&'static str),

    #[error("an airport named {0:?} is already registered")]
    DuplicateName(String),

    #[error("no airport registered under code {0}")]
    UnknownAirport(u32),

    #[error("invalid {name} {value}: route weights must be finite and positive")]
    InvalidWeight { name: &'static str, value: f32 },

    #[error("no route exists between airports {from} and {to}")]
    RouteNotFound { from: u32, to: u32 },

    #[error("no path from airport {from} to airport {to} minimizing {metric}")]
    NoPath { from: u32, to: u32, metric: Metric },

    #[error("{0}")]
    RuntimeError(String),

    #[error("{0:#}")]
    Other(#[from] eyre::Report),
}

impl std::convert::From<String> for AeronavError {
    fn from(s: String) -> Self {
        Self::RuntimeError(s)
    }
}

pub type AeronavResult<T> = Result<T, AeronavError>;

/// f32 compare wrapper
pub fn fcmp(a: f32, b: f32) -> Ordering {
    match (a, b) {
        (x, y) if x.is_nan() && y.is_nan() => Ordering::Equal,
        (x, _) if x.is_nan() => Ordering::Greater,
        (_, y) if y.is_nan() => Ordering::Less,
        (..) => a.partial_cmp(&b).unwrap_or_else(|| unreachable!()),
    }
}

/// f32 wrapper type implementing `Eq` and `Ord`
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct F32(pub f32);

impl Display for F32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for F32 {
    fn eq(&self, other: &Self) -> bool {
        fcmp(self.0, other.0) == std::cmp::Ordering::Equal
    }
}

impl Eq for F32 {}

impl PartialOrd for F32 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fcmp(self.0, other.0)
    }
}

impl Deref for F32 {
    type Target = f32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for F32 {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
