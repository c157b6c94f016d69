//! Error type for the traffic simulation.

use thiserror::Error;

use super::types::VehicleId;

#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid construction parameters. Never clamped.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cell (lane {lane}, x {x}) is already occupied")]
    OccupiedCell { lane: usize, x: usize },

    #[error("vehicle {0} is not on the grid")]
    UnknownVehicle(VehicleId),

    #[error("vehicle {0} is already on the grid")]
    AlreadyPlaced(VehicleId),

    /// A committed tick broke a model invariant. This is a logic defect and
    /// the run cannot continue meaningfully.
    #[error("invariant violated at step {step}: {detail}")]
    InvariantViolation { step: u64, detail: String },

    #[error("no vehicles on the road")]
    EmptyWorld,
}

pub type SimResult<T> = Result<T, SimError>;
