use std::sync::{Arc, LazyLock};

use serde::Deserialize;
use tally_consensus_misc::constants::{
    BASE_REWARD_FACTOR, BASE_REWARDS_PER_EPOCH, EFFECTIVE_BALANCE_INCREMENT,
    EPOCHS_PER_SLASHINGS_VECTOR, INACTIVITY_PENALTY_QUOTIENT, MIN_EPOCHS_TO_INACTIVITY_PENALTY,
    PROPORTIONAL_SLASHING_MULTIPLIER, PROPOSER_REWARD_QUOTIENT,
};

use crate::errors::NetworkSpecError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Minimal,
    Custom(String),
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match String::deserialize(deserializer)?.as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "minimal" => Ok(Network::Minimal),
            custom => Ok(Network::Custom(custom.to_string())),
        }
    }
}

/// Parameters the epoch reward, justification and slashing passes read.
///
/// Deserializes from the same UPPERCASE keys as the consensus config and preset files; any other
/// keys in those files are ignored.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct BeaconNetworkSpec {
    #[serde(default = "default_preset_base")]
    pub preset_base: String,
    #[serde(rename = "CONFIG_NAME")]
    pub network: Network,

    // Rewards and penalties
    pub base_reward_factor: u64,
    pub base_rewards_per_epoch: u64,
    pub proposer_reward_quotient: u64,
    pub min_epochs_to_inactivity_penalty: u64,
    pub inactivity_penalty_quotient: u64,

    // Balances and slashings
    pub effective_balance_increment: u64,
    pub proportional_slashing_multiplier: u64,
    pub epochs_per_slashings_vector: u64,
}

fn default_preset_base() -> String {
    "mainnet".to_string()
}

impl BeaconNetworkSpec {
    /// Parse a YAML network spec and reject any zero divisor or multiplier.
    pub fn from_yaml_str(contents: &str) -> Result<Self, NetworkSpecError> {
        let network_spec: Self = serde_yaml::from_str(contents)?;
        network_spec.validate()?;
        Ok(network_spec)
    }

    /// Every parameter is used as a divisor or a multiplier, so none of them may be zero.
    pub fn validate(&self) -> Result<(), NetworkSpecError> {
        [
            ("BASE_REWARD_FACTOR", self.base_reward_factor),
            ("BASE_REWARDS_PER_EPOCH", self.base_rewards_per_epoch),
            ("PROPOSER_REWARD_QUOTIENT", self.proposer_reward_quotient),
            (
                "MIN_EPOCHS_TO_INACTIVITY_PENALTY",
                self.min_epochs_to_inactivity_penalty,
            ),
            ("INACTIVITY_PENALTY_QUOTIENT", self.inactivity_penalty_quotient),
            ("EFFECTIVE_BALANCE_INCREMENT", self.effective_balance_increment),
            (
                "PROPORTIONAL_SLASHING_MULTIPLIER",
                self.proportional_slashing_multiplier,
            ),
            ("EPOCHS_PER_SLASHINGS_VECTOR", self.epochs_per_slashings_vector),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0)
        .map_or(Ok(()), |(name, _)| Err(NetworkSpecError::ZeroParameter(name)))
    }
}

pub static MAINNET: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        preset_base: "mainnet".to_string(),
        network: Network::Mainnet,
        base_reward_factor: BASE_REWARD_FACTOR,
        base_rewards_per_epoch: BASE_REWARDS_PER_EPOCH,
        proposer_reward_quotient: PROPOSER_REWARD_QUOTIENT,
        min_epochs_to_inactivity_penalty: MIN_EPOCHS_TO_INACTIVITY_PENALTY,
        inactivity_penalty_quotient: INACTIVITY_PENALTY_QUOTIENT,
        effective_balance_increment: EFFECTIVE_BALANCE_INCREMENT,
        proportional_slashing_multiplier: PROPORTIONAL_SLASHING_MULTIPLIER,
        epochs_per_slashings_vector: EPOCHS_PER_SLASHINGS_VECTOR,
    }
    .into()
});

/// Reward parameters of the minimal preset. Slot and list lengths stay at their mainnet values.
pub static MINIMAL: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        preset_base: "minimal".to_string(),
        network: Network::Minimal,
        base_reward_factor: 64,
        base_rewards_per_epoch: 4,
        proposer_reward_quotient: 8,
        min_epochs_to_inactivity_penalty: 4,
        inactivity_penalty_quotient: 33_554_432,
        effective_balance_increment: 1_000_000_000,
        proportional_slashing_multiplier: 2,
        epochs_per_slashings_vector: 64,
    }
    .into()
});

#[cfg(test)]
mod tests {
    use super::*;

    const MAINNET_YAML: &str = r#"
PRESET_BASE: 'mainnet'
CONFIG_NAME: 'mainnet'
SECONDS_PER_SLOT: 12
BASE_REWARD_FACTOR: 64
BASE_REWARDS_PER_EPOCH: 4
PROPOSER_REWARD_QUOTIENT: 8
MIN_EPOCHS_TO_INACTIVITY_PENALTY: 4
INACTIVITY_PENALTY_QUOTIENT: 67108864
EFFECTIVE_BALANCE_INCREMENT: 1000000000
PROPORTIONAL_SLASHING_MULTIPLIER: 1
EPOCHS_PER_SLASHINGS_VECTOR: 8192
"#;

    #[test]
    fn test_parse_matches_builtin_mainnet() {
        let network_spec = BeaconNetworkSpec::from_yaml_str(MAINNET_YAML).expect("valid spec");
        assert_eq!(&network_spec, MAINNET.as_ref());
    }

    #[test]
    fn test_custom_network_name() {
        let yaml = MAINNET_YAML.replace("CONFIG_NAME: 'mainnet'", "CONFIG_NAME: 'devnet-7'");
        let network_spec = BeaconNetworkSpec::from_yaml_str(&yaml).expect("valid spec");
        assert_eq!(network_spec.network, Network::Custom("devnet-7".to_string()));
    }

    #[test]
    fn test_zero_parameter_is_rejected() {
        let yaml = MAINNET_YAML.replace(
            "PROPOSER_REWARD_QUOTIENT: 8",
            "PROPOSER_REWARD_QUOTIENT: 0",
        );
        assert!(matches!(
            BeaconNetworkSpec::from_yaml_str(&yaml),
            Err(NetworkSpecError::ZeroParameter("PROPOSER_REWARD_QUOTIENT"))
        ));
    }

    #[test]
    fn test_missing_parameter_is_a_parse_error() {
        let yaml = MAINNET_YAML.replace("BASE_REWARD_FACTOR: 64\n", "");
        assert!(matches!(
            BeaconNetworkSpec::from_yaml_str(&yaml),
            Err(NetworkSpecError::Parse(_))
        ));
    }

    #[test]
    fn test_builtin_presets_are_valid() {
        MAINNET.validate().expect("mainnet is valid");
        MINIMAL.validate().expect("minimal is valid");
        assert_ne!(
            MAINNET.inactivity_penalty_quotient,
            MINIMAL.inactivity_penalty_quotient
        );
    }
}
