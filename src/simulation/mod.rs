//! Nagel-Schreckenberg traffic simulation module
//!
//! This module contains the whole cellular automaton: the ring-road grid,
//! the vehicle rules, the batch update protocol and the world that drives
//! them. It has no dependency on any front end.

mod config;
mod error;
mod grid;
pub mod metrics;
mod protocol;
mod types;
mod vehicle;
mod world;

pub use config::{Population, RoadVariant, SimConfig, DEFAULT_MAX_VELOCITY, DEFAULT_P_CHANGE};
pub use error::{SimError, SimResult};
pub use grid::Grid;
pub use metrics::{StepMetrics, VehicleSnapshot};
pub use types::{other_lane, Cell, Direction, VehicleId};
pub use vehicle::{LaneChange, LaneGaps, Vehicle};
pub use world::World;
