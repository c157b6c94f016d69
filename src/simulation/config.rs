//! Simulation configuration
//!
//! Plain values consumed once at world construction. Validation fails fast
//! with [`SimError::Config`] and never clamps.

use super::error::{SimError, SimResult};

/// Default maximum velocity in cells per step
pub const DEFAULT_MAX_VELOCITY: usize = 5;

/// Default lane-change probability on a two-lane road
pub const DEFAULT_P_CHANGE: f64 = 1.0;

/// Road shape and the update phases that go with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoadVariant {
    /// Single lane, car-following only
    OneLane,
    /// Two lanes with lane changing before car-following
    TwoLane {
        /// Probability of switching lanes when the safety rules allow it
        p_change: f64,
    },
}

impl RoadVariant {
    /// Build a variant from an integer lane count
    pub fn from_lane_count(lanes: usize, p_change: f64) -> SimResult<Self> {
        match lanes {
            1 => Ok(RoadVariant::OneLane),
            2 => Ok(RoadVariant::TwoLane { p_change }),
            other => Err(SimError::Config(format!(
                "lane count must be 1 or 2, got {other}"
            ))),
        }
    }

    pub fn lanes(&self) -> usize {
        match self {
            RoadVariant::OneLane => 1,
            RoadVariant::TwoLane { .. } => 2,
        }
    }

    pub fn p_change(&self) -> Option<f64> {
        match self {
            RoadVariant::OneLane => None,
            RoadVariant::TwoLane { p_change } => Some(*p_change),
        }
    }
}

/// How many vehicles to put on each lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Population {
    /// Exact count per lane
    PerLane(usize),
    /// Fraction of each lane's cells, rounded to the nearest count
    Density(f64),
}

impl Population {
    pub fn vehicles_per_lane(&self, width: usize) -> usize {
        match self {
            Population::PerLane(n) => *n,
            Population::Density(density) => (density * width as f64).round() as usize,
        }
    }
}

/// Construction parameters for a [`World`](super::World)
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub width: usize,
    pub road: RoadVariant,
    pub population: Population,
    pub max_velocity: usize,
    pub p_brake: f64,
    /// Seed for the world's random stream; drawn once and logged when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 100,
            road: RoadVariant::OneLane,
            population: Population::Density(0.1),
            max_velocity: DEFAULT_MAX_VELOCITY,
            p_brake: 0.0,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn lanes(&self) -> usize {
        self.road.lanes()
    }

    pub fn vehicles_per_lane(&self) -> usize {
        self.population.vehicles_per_lane(self.width)
    }

    /// Check every construction parameter
    pub fn validate(&self) -> SimResult<()> {
        self.validate_road()?;
        if let Population::Density(density) = self.population {
            check_probability("density", density)?;
        }

        let per_lane = self.vehicles_per_lane();
        if per_lane > self.width {
            return Err(SimError::Config(format!(
                "{per_lane} vehicles per lane exceed the lane's {} cells",
                self.width
            )));
        }
        Ok(())
    }

    /// Check everything except the population
    pub fn validate_road(&self) -> SimResult<()> {
        if self.width == 0 {
            return Err(SimError::Config("width must be positive".to_string()));
        }
        check_probability("p_brake", self.p_brake)?;
        if let Some(p_change) = self.road.p_change() {
            check_probability("p_change", p_change)?;
        }
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> SimResult<()> {
    // NaN fails this range check as well
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
