use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tally_network_spec::{cli::beacon_network_parser, networks::BeaconNetworkSpec};

use crate::cli::{
    constants::{DEFAULT_NETWORK, DEFAULT_VERBOSITY},
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
pub struct RewardsConfig {
    /// Verbosity level
    #[arg(short, long, default_value = DEFAULT_VERBOSITY, value_parser = verbosity_parser)]
    pub verbosity: Verbosity,

    #[arg(
        long,
        help = "Choose mainnet, minimal or provide a path to a YAML config file",
        default_value = DEFAULT_NETWORK,
        value_parser = beacon_network_parser
    )]
    pub network: Arc<BeaconNetworkSpec>,

    #[arg(long, help = "YAML snapshot of the state at the last slot of an epoch")]
    pub state: PathBuf,

    #[arg(
        long,
        short,
        help = "Where to write the post-epoch snapshot. Printed to stdout if omitted."
    )]
    pub output: Option<PathBuf>,
}
