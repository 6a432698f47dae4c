//! CLI frontend for the Pocketwheel outcome engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pw",
    about = "Pocketwheel: inspect and simulate a roulette table with rewritable pockets",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the static spot table
    Table,

    /// Apply a scenario and print every spot
    Show {
        /// Scenario file (default: a fresh table)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Print the turn snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw many winners and compare observed to expected frequencies
    Simulate {
        /// Scenario file (default: a fresh table)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of spins
        #[arg(short = 'n', long, default_value = "10000")]
        spins: u32,

        /// RNG seed (default: the scenario's configured seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Bet placed on every spin, e.g. `straight:17:10` or `red:5:consolation`
        #[arg(short, long = "bet")]
        bets: Vec<String>,
    },

    /// Apply a scenario and fail if any action was rejected
    Check {
        /// Scenario file
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pw=debug,pw_engine=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Table => commands::table::run(),
        Commands::Show { scenario, json } => commands::show::run(scenario.as_deref(), json),
        Commands::Simulate {
            scenario,
            spins,
            seed,
            bets,
        } => commands::simulate::run(scenario.as_deref(), spins, seed, &bets),
        Commands::Check { scenario } => commands::check::run(&scenario),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
