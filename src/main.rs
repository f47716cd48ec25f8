mod agents;
mod cli;
mod codemods;
mod environment;
mod error;
mod npm;
mod registry;
mod upgrade;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use environment::Environment;
use std::process;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let env = Environment::from_process();

    let result = match cli.command {
        Commands::Upgrade { revision } => {
            workflow::execute_upgrade(&cli.path, &revision, cli.verbose, &env)
        }
        Commands::Codemods { from, to } => {
            workflow::execute_codemods(from.as_deref(), to.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
