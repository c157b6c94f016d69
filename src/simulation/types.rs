//! Core value types for the traffic simulation

use std::fmt;

/// A unique identifier for a vehicle.
/// Ids are dense: the n vehicles of a world are `VehicleId(0)..VehicleId(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell on the road: lane index and position along the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub lane: usize,
    pub x: usize,
}

impl Cell {
    pub fn new(lane: usize, x: usize) -> Self {
        Self { lane, x }
    }
}

/// Scan direction along a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Direction of travel
    Ahead,
    /// Against the direction of travel
    Behind,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Ahead => 1,
            Direction::Behind => -1,
        }
    }
}

/// Lane on the other side of a two-lane road
pub fn other_lane(lane: usize) -> usize {
    if lane == 0 {
        1
    } else {
        0
    }
}
