//! CLI frontend for the dicepool engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dp",
    about = "Dicepool: d10 pools, contests, and extended actions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Roster file with the characters (JSON)
    #[arg(short, long, global = true, default_value = "roster.json")]
    roster: PathBuf,

    /// Character who acts (default: the only character on the roster)
    #[arg(short, long, global = true)]
    actor: Option<String>,

    /// RNG seed for reproducible rolls
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a pool: [/switch]* <pool> [vs <contest>] [=<target> [rolls:<n>]]
    ///
    /// Switches: /8 /9 /10 /rote /reflex /damage /specialty /secret /opposed /extended
    Roll {
        /// The roll command line
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        line: Vec<String>,
    },

    /// Show a character sheet, or list the roster
    Sheet {
        /// Character name (default: --actor, or list everyone)
        name: Option<String>,
    },

    /// List the conditions that can be accepted during extended actions
    Conditions,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roll { line } => commands::roll::run(
            &cli.roster,
            cli.actor.as_deref(),
            cli.seed,
            &line.join(" "),
        ),
        Commands::Sheet { name } => {
            commands::sheet::run(&cli.roster, name.as_deref().or(cli.actor.as_deref()))
        }
        Commands::Conditions => commands::conditions::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
