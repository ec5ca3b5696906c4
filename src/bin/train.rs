//! Headless trainer: evolves walkers without a window and logs progress.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use strider::simulation::evolution::Evolution;
use strider::simulation::params::Params;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of generations to run
    #[arg(short, long, default_value_t = 50)]
    generations: u32,

    /// Seed for a reproducible run (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON parameter file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default parameters to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(path) = args.write_default_config {
        Params::default()
            .save_to_file(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote default parameters to {}", path.display());
        return Ok(());
    }

    let params = match &args.config {
        Some(path) => {
            Params::load_from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => {
            let params = Params::default();
            params.validate()?;
            params
        }
    };

    let mut evolution = match args.seed {
        Some(seed) => Evolution::with_seed(params, seed),
        None => Evolution::new(params),
    };

    log::info!(
        "training {} generations with population {}",
        args.generations,
        evolution.params().population_size
    );

    for _ in 0..args.generations {
        evolution.evaluate_population();
        evolution.evolve();
    }

    if let Some(best) = evolution.best_creature() {
        println!(
            "best fitness {:.2} after {} generations ({} points, {} muscles)",
            evolution.best_fitness(),
            evolution.generation(),
            best.points.len(),
            best.muscles.len()
        );
    }

    Ok(())
}
