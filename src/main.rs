//! Headless scenario runner for the quakesway simulation.
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use quakesway::{init_logging, SimulationConfig, SimulationEvent, SimulationState};

/// Side-view building sway and collapse simulator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Biome code for the terrain (e.g. Af, BWh, ET, Cfa, Dfc)
    #[arg(short, long)]
    biome: Option<String>,
    /// Seed for debris generation
    #[arg(long)]
    seed: Option<u64>,
    /// Number of stories
    #[arg(long)]
    stories: Option<u32>,
    /// Frame timestep in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Steady wind speed in m/s; negative blows toward -x
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    wind: f64,
    /// Earthquake peak ground acceleration in g
    #[arg(long)]
    pga: Option<f64>,
    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 8.0)]
    seconds: f64,
    /// Print the final snapshot as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(biome) = &self.biome {
            config.biome.clone_from(biome);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(stories) = self.stories {
            config.building.stories = stories;
        }
        if let Some(dt) = self.dt {
            config.timestep = dt;
        }
        config.validate().context("command line overrides")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.load_config()?;
    let mut state = SimulationState::new(config);
    info!(
        "natural period {:.2} s, damping ratio {:.3}",
        state.building().natural_period(),
        state.building().oscillator_damping_ratio()
    );

    if args.wind != 0.0 {
        state.push_event(SimulationEvent::ApplyWind { speed: args.wind });
    }
    if let Some(pga) = args.pga {
        state.push_event(SimulationEvent::TriggerEarthquake { pga });
    }

    let ticks = state.run_for(args.seconds);
    let building = state.building();
    info!(
        "ran {ticks} ticks: {}, sway {:.4} rad, {} fragments ({} settled)",
        if building.is_destroyed() { "destroyed" } else { "standing" },
        building.angle(),
        state.debris().len(),
        state.debris().settled_count()
    );

    if args.json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &state.snapshot())
            .context("writing snapshot")?;
        writeln!(stdout).context("writing snapshot")?;
    }
    Ok(())
}
