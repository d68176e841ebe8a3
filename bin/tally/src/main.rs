use std::process;

use clap::Parser;
use tally::{
    cli::{Cli, Commands},
    rewards::run_rewards,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rewards(config) => {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.verbosity.directive()));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();

            info!("Starting tally rewards with verbosity {:?}", config.verbosity);

            match run_rewards(&config) {
                Ok(summary) => {
                    if config.output.is_some() {
                        match serde_json::to_string_pretty(&summary) {
                            Ok(json) => println!("{json}"),
                            Err(err) => error!("Failed to serialize epoch summary: {err}"),
                        }
                    }
                }
                Err(err) => {
                    error!("{err:#}");
                    process::exit(1);
                }
            }
        }
    }
}
