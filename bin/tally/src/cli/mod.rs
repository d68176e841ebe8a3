pub mod constants;
pub mod rewards;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::rewards::RewardsConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one epoch transition over a state snapshot and report rewards and penalties
    #[command(name = "rewards")]
    Rewards(RewardsConfig),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tally_network_spec::networks::{MAINNET, MINIMAL};

    use super::*;
    use crate::cli::verbosity::Verbosity;

    #[test]
    fn test_cli_rewards_command_defaults() {
        let cli = Cli::parse_from(["program", "rewards", "--state", "pre.yaml"]);

        match cli.command {
            Commands::Rewards(config) => {
                assert_eq!(config.verbosity, Verbosity::Info);
                assert_eq!(config.network, *MAINNET);
                assert_eq!(config.state, PathBuf::from("pre.yaml"));
                assert_eq!(config.output, None);
            }
        }
    }

    #[test]
    fn test_cli_rewards_command_with_options() {
        let cli = Cli::parse_from([
            "program",
            "rewards",
            "--network",
            "minimal",
            "--state",
            "pre.yaml",
            "--output",
            "post.yaml",
            "--verbosity",
            "4",
        ]);

        match cli.command {
            Commands::Rewards(config) => {
                assert_eq!(config.verbosity, Verbosity::Debug);
                assert_eq!(config.network, *MINIMAL);
                assert_eq!(config.output, Some(PathBuf::from("post.yaml")));
            }
        }
    }

    #[test]
    fn test_cli_rejects_missing_state() {
        assert!(Cli::try_parse_from(["program", "rewards"]).is_err());
    }
}
