use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use water_station::{Config, Simulation};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::default();

    println!("Watering station rewatering");
    println!("===========================");
    println!(
        "  - {} bays, reservoir {:.0} L, tank truck below {}%",
        config.station_slots, config.reservoir_capacity, config.threshold_percent
    );
    println!(
        "  - horizon {:.0} s, seed {}\n",
        config.sim_time, config.seed
    );

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match sim.run() {
        Ok(trace) => {
            for entry in trace {
                println!("{entry}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error at t={:.1}: {e}", sim.now());
            ExitCode::FAILURE
        }
    }
}
