//! Batch update protocol
//!
//! A tick is a sequence of phases, each swept over all vehicles in
//! ascending id before the next one starts:
//!
//! 1. Lane change (two-lane roads only): every vehicle decides against the
//!    pre-step grid, then all accepted switches are applied as one batch.
//! 2. Car-following: every vehicle stages a new velocity against the grid
//!    as it stands after phase 1. Nothing moves.
//! 3. Commit: every vehicle moves by its staged velocity.
//!
//! Decisions never see another vehicle's decision from the same phase.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use super::error::{SimError, SimResult};
use super::grid::Grid;
use super::vehicle::Vehicle;

/// Decide and apply lane changes. Returns the number of vehicles that
/// switched lanes.
///
/// Targets are claimed in ascending id; a later vehicle aiming at a cell
/// already claimed, or at a cell the grid refuses, keeps its lane.
pub fn lane_change_phase<R: Rng + ?Sized>(
    grid: &mut Grid,
    vehicles: &mut [Vehicle],
    max_velocity: usize,
    rng: &mut R,
) -> usize {
    let snapshot: &Grid = grid;
    let intents: Vec<usize> = vehicles
        .iter()
        .enumerate()
        .filter(|(_, vehicle)| vehicle.wants_lane_change(snapshot, max_velocity, rng))
        .map(|(index, _)| index)
        .collect();

    let mut claimed = HashSet::new();
    let mut applied = 0;
    for index in intents {
        let vehicle = &mut vehicles[index];
        let target = vehicle.lane_change_target();

        if !claimed.insert(target) {
            debug!(
                "lane change of vehicle {} rejected: target {:?} already claimed",
                vehicle.id, target
            );
            continue;
        }

        match grid.move_vehicle(vehicle.id, target.lane, target.x) {
            Ok(()) => {
                vehicle.lane = target.lane;
                applied += 1;
            }
            Err(err) => debug!("lane change of vehicle {} rejected: {err}", vehicle.id),
        }
    }
    applied
}

/// Stage every vehicle's next velocity, one random draw per vehicle
pub fn car_following_phase<R: Rng + ?Sized>(
    grid: &Grid,
    vehicles: &[Vehicle],
    max_velocity: usize,
    rng: &mut R,
) -> Vec<usize> {
    vehicles
        .iter()
        .map(|vehicle| vehicle.decide_velocity(grid, max_velocity, rng))
        .collect()
}

/// Apply staged velocities and move every vehicle forward
pub fn commit_phase(
    grid: &mut Grid,
    vehicles: &mut [Vehicle],
    staged: &[usize],
    step: u64,
) -> SimResult<()> {
    if staged.len() != vehicles.len() {
        return Err(SimError::InvariantViolation {
            step,
            detail: format!(
                "{} staged velocities for {} vehicles",
                staged.len(),
                vehicles.len()
            ),
        });
    }

    for (vehicle, &velocity) in vehicles.iter_mut().zip(staged) {
        let new_x = grid.wrap((vehicle.x + velocity) as i64);
        grid.move_vehicle(vehicle.id, vehicle.lane, new_x)
            .map_err(|err| SimError::InvariantViolation {
                step,
                detail: format!("moving vehicle {}: {err}", vehicle.id),
            })?;
        vehicle.velocity = velocity;
        vehicle.x = new_x;
    }
    Ok(())
}

/// Check the state a tick produced before it replaces the live state
pub fn audit(grid: &Grid, vehicles: &[Vehicle], max_velocity: usize, step: u64) -> SimResult<()> {
    let violation = |detail: String| SimError::InvariantViolation { step, detail };

    for (index, vehicle) in vehicles.iter().enumerate() {
        if vehicle.id.0 != index {
            return Err(violation(format!(
                "vehicle {} stored at index {index}",
                vehicle.id
            )));
        }
        if vehicle.velocity > max_velocity {
            return Err(violation(format!(
                "vehicle {} has velocity {} above {max_velocity}",
                vehicle.id, vehicle.velocity
            )));
        }
        if vehicle.x >= grid.width() || vehicle.lane >= grid.lanes() {
            return Err(violation(format!(
                "vehicle {} is off the road at {:?}",
                vehicle.id,
                vehicle.cell()
            )));
        }
        if grid.location(vehicle.id) != Some(vehicle.cell()) {
            return Err(violation(format!(
                "vehicle {} is at {:?} but the grid has it at {:?}",
                vehicle.id,
                vehicle.cell(),
                grid.location(vehicle.id)
            )));
        }
    }

    if grid.occupied_count() != vehicles.len() {
        return Err(violation(format!(
            "grid holds {} vehicles, world has {}",
            grid.occupied_count(),
            vehicles.len()
        )));
    }
    Ok(())
}
