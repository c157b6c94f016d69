//! Vehicle state and per-vehicle decision rules
//!
//! Every rule here only reads the grid and returns a decision. Nothing in
//! this module moves a vehicle; the update protocol commits decisions.

use rand::Rng;

use super::grid::Grid;
use super::types::{other_lane, Cell, Direction, VehicleId};

/// Lane-changing capability of a vehicle on a two-lane road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneChange {
    /// Probability of switching when the safety rules allow it
    pub p_change: f64,
}

/// A vehicle on the road
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub lane: usize,
    pub x: usize,
    /// Cells per step
    pub velocity: usize,
    /// Probability of braking without reason
    pub p_brake: f64,
    /// Present only on two-lane roads
    pub lane_change: Option<LaneChange>,
}

/// Gaps a vehicle perceives before deciding on a lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneGaps {
    /// Own lane, ahead
    pub gap: usize,
    /// Other lane, ahead
    pub gap_other: usize,
    /// Other lane, behind
    pub gap_other_back: usize,
}

impl Vehicle {
    pub fn new(id: VehicleId, cell: Cell, p_brake: f64, lane_change: Option<LaneChange>) -> Self {
        Self {
            id,
            lane: cell.lane,
            x: cell.x,
            velocity: 0,
            p_brake,
            lane_change,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.lane, self.x)
    }

    /// Empty cells ahead on the vehicle's own lane
    pub fn perceive(&self, grid: &Grid) -> usize {
        grid.gap(self.lane, self.x, Direction::Ahead)
    }

    /// Nagel-Schreckenberg velocity decision for the coming move.
    ///
    /// Accelerate, cap at the gap ahead, then brake at random. Exactly one
    /// number is drawn from `rng` per call.
    pub fn decide_velocity<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        max_velocity: usize,
        rng: &mut R,
    ) -> usize {
        let mut velocity = (self.velocity + 1).min(max_velocity);
        velocity = velocity.min(self.perceive(grid));

        let u: f64 = rng.random();
        if u < self.p_brake {
            velocity = velocity.saturating_sub(1);
        }
        velocity
    }

    /// Gaps on the own lane and around the same position on the other lane.
    ///
    /// An occupied side cell leaves no room at all, so both side gaps are 0.
    pub fn lane_gaps(&self, grid: &Grid) -> LaneGaps {
        let gap = self.perceive(grid);
        let side = other_lane(self.lane);

        if !grid.is_empty(side, self.x) {
            return LaneGaps {
                gap,
                gap_other: 0,
                gap_other_back: 0,
            };
        }

        LaneGaps {
            gap,
            gap_other: grid.gap(side, self.x, Direction::Ahead),
            gap_other_back: grid.gap(side, self.x, Direction::Behind),
        }
    }

    /// Safety rules for a lane change: staying would force braking soon,
    /// while the other lane has room ahead and nobody close behind.
    pub fn lane_change_is_safe(&self, grid: &Grid, max_velocity: usize) -> bool {
        let gaps = self.lane_gaps(grid);
        let required_own = (self.velocity + 1).min(max_velocity);
        let required_other = required_own;
        let required_other_back = max_velocity;

        gaps.gap < required_own
            && gaps.gap_other > required_other
            && gaps.gap_other_back > required_other_back
    }

    /// Lane-change decision. Draws from `rng` only when the vehicle can
    /// change lanes and the safety rules hold.
    pub fn wants_lane_change<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        max_velocity: usize,
        rng: &mut R,
    ) -> bool {
        let Some(capability) = self.lane_change else {
            return false;
        };
        if !self.lane_change_is_safe(grid, max_velocity) {
            return false;
        }
        let u: f64 = rng.random();
        u < capability.p_change
    }

    /// Cell on the other lane at the same position
    pub fn lane_change_target(&self) -> Cell {
        Cell::new(other_lane(self.lane), self.x)
    }
}
