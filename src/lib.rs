#![allow(clippy::cast_precision_loss)]
#![deny(clippy::unwrap_in_result, clippy::unwrap_used, clippy::expect_used)]
#![warn(
    rust_2018_idioms,
    rust_2021_compatibility,
    arithmetic_overflow,
    nonstandard_style,
    clippy::disallowed_types,
    clippy::nursery,
)]

pub mod common;
pub mod event;
pub mod network;
pub mod registry;
pub mod route;
