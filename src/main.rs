use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use traffic_ca::simulation::{
    metrics, Population, RoadVariant, SimConfig, World, DEFAULT_MAX_VELOCITY, DEFAULT_P_CHANGE,
};

#[derive(Parser)]
#[command(name = "traffic_ca")]
#[command(about = "Nagel-Schreckenberg traffic simulation on a ring road")]
struct Cli {
    /// Number of cells per lane
    #[arg(long, default_value = "100")]
    width: usize,

    /// Number of lanes (1 or 2)
    #[arg(long, default_value = "1")]
    lanes: usize,

    /// Fraction of each lane's cells holding a vehicle
    #[arg(long, default_value = "0.1", conflicts_with = "vehicles")]
    density: f64,

    /// Exact number of vehicles per lane
    #[arg(long)]
    vehicles: Option<usize>,

    /// Maximum velocity in cells per step
    #[arg(long, default_value_t = DEFAULT_MAX_VELOCITY)]
    max_velocity: usize,

    /// Probability of braking without reason
    #[arg(long, default_value = "0.0")]
    p_brake: f64,

    /// Probability of changing lanes when it is safe (two lanes only)
    #[arg(long, default_value_t = DEFAULT_P_CHANGE)]
    p_change: f64,

    /// Seed for the random stream
    #[arg(long)]
    seed: Option<u64>,

    /// Number of steps to run
    #[arg(long, default_value = "100")]
    steps: usize,

    /// Steps to discard before averaging the mean velocity
    #[arg(long, default_value_t = DEFAULT_MAX_VELOCITY)]
    warmup: usize,

    /// Draw the road after every step
    #[arg(long)]
    draw: bool,
}

impl Cli {
    fn config(&self) -> Result<SimConfig> {
        let population = match self.vehicles {
            Some(n) => Population::PerLane(n),
            None => Population::Density(self.density),
        };
        Ok(SimConfig {
            width: self.width,
            road: RoadVariant::from_lane_count(self.lanes, self.p_change)?,
            population,
            max_velocity: self.max_velocity,
            p_brake: self.p_brake,
            seed: self.seed,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_ca=info"),
    )
    .init();

    let cli = Cli::parse();
    let config = cli.config().context("Invalid simulation parameters")?;
    run_headless(config, cli.steps, cli.warmup, cli.draw)
}

/// Run the simulation in the terminal and print the resulting series
fn run_headless(config: SimConfig, steps: usize, warmup: usize, draw: bool) -> Result<()> {
    let mut world = World::new(config).context("Failed to build the road")?;

    println!("Initial state:");
    world.print_summary();
    if draw {
        println!("{}", world.render_road());
    }
    println!();

    let mut series = Vec::with_capacity(steps);
    for _ in 0..steps {
        let step_metrics = world
            .step()
            .with_context(|| format!("Simulation failed after step {}", world.step_count()))?;
        series.push(step_metrics);

        if draw {
            println!("--- After step {} ---", world.step_count());
            println!("{}", world.render_road());
        }
    }

    info!("Ran {} steps", series.len());

    println!();
    println!("=== Final State ===");
    world.print_summary();
    match metrics::mean_after_warmup(&series, warmup) {
        Some(mean) => println!("Mean velocity after {warmup} warm-up steps: {mean:.3}"),
        None => println!("Mean velocity after {warmup} warm-up steps: n/a"),
    }
    Ok(())
}
