//! Pull-based metrics read by callers between steps

use super::types::VehicleId;
use super::vehicle::Vehicle;

/// Aggregate metrics of the state after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    /// Steps completed when these metrics were taken (0 = initial state)
    pub step: u64,
    /// Mean velocity over all vehicles; `None` on an empty road
    pub average_velocity: Option<f64>,
    /// Vehicles passing a point per step, per lane: density × mean velocity
    pub flow: f64,
    /// Vehicles that switched lanes during the step
    pub lane_changes: usize,
}

impl StepMetrics {
    pub fn collect(step: u64, vehicles: &[Vehicle], cell_count: usize, lane_changes: usize) -> Self {
        let total: usize = vehicles.iter().map(|v| v.velocity).sum();
        let average_velocity = if vehicles.is_empty() {
            None
        } else {
            Some(total as f64 / vehicles.len() as f64)
        };

        Self {
            step,
            average_velocity,
            flow: total as f64 / cell_count as f64,
            lane_changes,
        }
    }
}

/// Read-only view of one vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub lane: usize,
    pub x: usize,
    pub velocity: usize,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            lane: vehicle.lane,
            x: vehicle.x,
            velocity: vehicle.velocity,
        }
    }
}

/// Mean-velocity series of a run, skipping steps on an empty road
pub fn average_velocity_series(series: &[StepMetrics]) -> Vec<f64> {
    series.iter().filter_map(|m| m.average_velocity).collect()
}

/// Mean of the mean-velocity series after discarding the first `warmup`
/// samples. `None` if nothing is left.
pub fn mean_after_warmup(series: &[StepMetrics], warmup: usize) -> Option<f64> {
    let kept: Vec<f64> = series
        .iter()
        .skip(warmup)
        .filter_map(|m| m.average_velocity)
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.iter().sum::<f64>() / kept.len() as f64)
    }
}
