//! Main simulation world that ties everything together
//!
//! The world owns the grid, the vehicles, the random stream and the step
//! counter. Callers construct it, call [`World::step`] and read metrics or
//! vehicle snapshots in between; they never mutate it directly.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{RoadVariant, SimConfig};
use super::error::{SimError, SimResult};
use super::grid::Grid;
use super::metrics::{StepMetrics, VehicleSnapshot};
use super::protocol;
use super::types::{Cell, VehicleId};
use super::vehicle::{LaneChange, Vehicle};

/// The main simulation world
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,

    /// Seed the random stream was started from
    seed: u64,

    /// Authoritative spatial index
    grid: Grid,

    /// All vehicles, indexed by id
    vehicles: Vec<Vehicle>,

    /// Random stream for braking and lane-change draws
    rng: StdRng,

    /// Completed steps
    step: u64,

    /// Metrics of the current state
    metrics: StepMetrics,
}

impl World {
    /// Create a world with vehicles evenly spaced on every lane
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let layout = initial_layout(&config);
        Self::build(config, &layout)
    }

    /// Create a world with vehicles at the given cells, ids in slice order.
    ///
    /// The configured population is ignored; everything else is validated
    /// as in [`World::new`].
    pub fn from_layout(config: SimConfig, cells: &[Cell]) -> SimResult<Self> {
        config.validate_road()?;
        if let Some(cell) = cells.iter().find(|c| c.x >= config.width) {
            return Err(SimError::Config(format!(
                "position {} is outside a road of width {}",
                cell.x, config.width
            )));
        }
        Self::build(config, cells)
    }

    fn build(config: SimConfig, cells: &[Cell]) -> SimResult<Self> {
        let mut grid = Grid::new(config.width, config.lanes())?;
        let lane_change = config
            .road
            .p_change()
            .map(|p_change| LaneChange { p_change });

        let mut vehicles = Vec::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            let id = VehicleId(index);
            grid.place(id, cell.lane, cell.x)?;
            vehicles.push(Vehicle::new(id, *cell, config.p_brake, lane_change));
        }

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let metrics = StepMetrics::collect(0, &vehicles, grid.cell_count(), 0);

        info!(
            "Created {:?} road: width={}, vehicles={}, max_velocity={}, p_brake={}, seed={}",
            config.road,
            config.width,
            vehicles.len(),
            config.max_velocity,
            config.p_brake,
            seed
        );

        Ok(Self {
            config,
            seed,
            grid,
            vehicles,
            rng: StdRng::seed_from_u64(seed),
            step: 0,
            metrics,
        })
    }

    /// Advance the simulation by one tick.
    ///
    /// The tick runs on staged copies of the grid, the vehicles and the
    /// random stream. They replace the live state only once the tick has
    /// committed and passed the invariant audit, so on error the world is
    /// left exactly as it was.
    pub fn step(&mut self) -> SimResult<StepMetrics> {
        let next_step = self.step + 1;
        let max_velocity = self.config.max_velocity;

        let mut grid = self.grid.clone();
        let mut vehicles = self.vehicles.clone();
        let mut rng = self.rng.clone();

        let lane_changes = match self.config.road {
            RoadVariant::TwoLane { .. } => {
                protocol::lane_change_phase(&mut grid, &mut vehicles, max_velocity, &mut rng)
            }
            RoadVariant::OneLane => 0,
        };

        let staged = protocol::car_following_phase(&grid, &vehicles, max_velocity, &mut rng);

        let committed = protocol::commit_phase(&mut grid, &mut vehicles, &staged, next_step)
            .and_then(|()| protocol::audit(&grid, &vehicles, max_velocity, next_step));
        if let Err(err) = committed {
            warn!("Aborting tick {next_step}: {err}");
            return Err(err);
        }

        self.grid = grid;
        self.vehicles = vehicles;
        self.rng = rng;
        self.step = next_step;
        self.metrics =
            StepMetrics::collect(next_step, &self.vehicles, self.grid.cell_count(), lane_changes);

        debug!(
            "Step {}: average_velocity={:?}, flow={:.3}, lane_changes={}",
            self.metrics.step, self.metrics.average_velocity, self.metrics.flow, lane_changes
        );
        Ok(self.metrics)
    }

    /// Run `n_steps` ticks and return the metrics after each one
    pub fn run(&mut self, n_steps: usize) -> SimResult<Vec<StepMetrics>> {
        let mut series = Vec::with_capacity(n_steps);
        for _ in 0..n_steps {
            series.push(self.step()?);
        }
        Ok(series)
    }

    /// Mean velocity of all vehicles in the current state
    pub fn average_velocity(&self) -> SimResult<f64> {
        self.metrics.average_velocity.ok_or(SimError::EmptyWorld)
    }

    /// Metrics of the current state
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// Position and velocity of every vehicle, in ascending id
    pub fn snapshot(&self) -> Vec<VehicleSnapshot> {
        self.vehicles.iter().map(VehicleSnapshot::from).collect()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Completed steps
    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn cell_count(&self) -> usize {
        self.grid.cell_count()
    }

    /// Fraction of occupied cells over the whole road
    pub fn density(&self) -> f64 {
        self.vehicles.len() as f64 / self.grid.cell_count() as f64
    }

    /// Text picture of the road, one row per lane: `.` for an empty cell,
    /// the velocity digit for a vehicle (`+` above 9)
    pub fn render_road(&self) -> String {
        let mut rows = vec![vec!['.'; self.grid.width()]; self.grid.lanes()];
        for vehicle in &self.vehicles {
            rows[vehicle.lane][vehicle.x] =
                char::from_digit(vehicle.velocity as u32, 10).unwrap_or('+');
        }
        rows.iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Traffic CA Summary ===");
        println!("Step: {}", self.step);
        println!(
            "Road: {} lane(s) x {} cells, seed {}",
            self.grid.lanes(),
            self.grid.width(),
            self.seed
        );
        println!("Vehicles: {}", self.vehicles.len());
        println!("Density: {:.3}", self.density());
        match self.metrics.average_velocity {
            Some(v) => println!("Average velocity: {v:.3}"),
            None => println!("Average velocity: n/a"),
        }
        println!("Flow: {:.3}", self.metrics.flow);
        if self.config.road.p_change().is_some() {
            println!("Lane changes this step: {}", self.metrics.lane_changes);
        }
    }
}

/// Even spacing on every lane: the i-th of n vehicles sits at
/// `floor(i * width / n)`. The second lane is shifted by half a spacing so
/// the two lanes start staggered.
fn initial_layout(config: &SimConfig) -> Vec<Cell> {
    let width = config.width;
    let per_lane = config.vehicles_per_lane();
    if per_lane == 0 {
        return Vec::new();
    }

    let half_spacing = width / (2 * per_lane);
    (0..config.lanes())
        .flat_map(|lane| {
            let shift = if lane == 0 { 0 } else { half_spacing };
            (0..per_lane).map(move |i| Cell::new(lane, (i * width / per_lane + shift) % width))
        })
        .collect()
}
