use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ship_of_fools::simulation::{
    ActivityLog, EventCatalog, SimError, Simulation, SimulationParams, Tee, TracingObserver,
};

#[derive(Parser, Debug)]
#[command(name = "ship_of_fools")]
#[command(about = "Simulate a crew drifting north towards the ice")]
struct Args {
    /// Maximum number of days to simulate (defaults to the voyage length)
    #[arg(short, long)]
    days: Option<u32>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of crew members, captain included
    #[arg(short, long, default_value = "12")]
    crew: usize,

    /// JSON file with parameter overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file replacing the built-in event catalog
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print one JSON outcome per simulated day
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> Result<(), SimError> {
    let params = match &args.config {
        Some(path) => SimulationParams::from_json_file(path)?,
        None => SimulationParams::default(),
    };
    let catalog = match &args.events {
        Some(path) => EventCatalog::from_json_file(path)?,
        None => EventCatalog::defaults()?,
    };
    let days = args.days.unwrap_or(params.voyage_length);
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut log = ActivityLog::new();
    let mut tracer = TracingObserver;
    let mut observer = Tee {
        first: &mut log,
        second: &mut tracer,
    };

    tracing::info!(seed, crew = args.crew, days, "setting sail");
    let mut sim = Simulation::with_generated_crew(args.crew, params, catalog, seed, &mut observer)?;

    for _ in 0..days {
        if sim.is_terminal() {
            break;
        }
        let outcome = sim.simulate_one_day(&mut observer)?;
        if args.json {
            match serde_json::to_string(&outcome) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(error = %e, "could not serialize day {}", outcome.day),
            }
        }
    }

    let stats = &sim.stats;
    let ending = match sim.terminal_state() {
        Some(state) => format!("{:?}", state),
        None => "Adrift".to_string(),
    };
    if !args.json {
        println!(
            "seed {} | {} days | {} | events {} | alliances {}/{} | protests {} | successions {} | mutinies {} | warnings {}",
            seed,
            stats.days_simulated,
            ending,
            stats.events_triggered,
            stats.alliances_formed,
            stats.alliances_broken,
            stats.protests,
            stats.successions,
            stats.mutinies_attempted,
            log.stats.warnings
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
