pub const DEFAULT_NETWORK: &str = "mainnet";
pub const DEFAULT_VERBOSITY: &str = "3";
