use alloy_primitives::{aliases::B32, fixed_bytes};

// Time parameters
pub const MIN_ATTESTATION_INCLUSION_DELAY: u64 = 1;
pub const SLOTS_PER_EPOCH: u64 = 32;
pub const MIN_SEED_LOOKAHEAD: u64 = 1;
pub const SLOTS_PER_HISTORICAL_ROOT: u64 = 8192;

// State list lengths
pub const EPOCHS_PER_HISTORICAL_VECTOR: u64 = 65536;
pub const EPOCHS_PER_SLASHINGS_VECTOR: u64 = 8192;
pub const JUSTIFICATION_BITS_LENGTH: usize = 4;

// Misc
pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;
pub const GENESIS_EPOCH: u64 = 0;
pub const GENESIS_SLOT: u64 = 0;
pub const MAX_COMMITTEES_PER_SLOT: u64 = 64;
pub const MAX_VALIDATORS_PER_COMMITTEE: u64 = 2048;
pub const SHUFFLE_ROUND_COUNT: u8 = 90;
pub const TARGET_COMMITTEE_SIZE: u64 = 128;
pub const UINT64_MAX: u64 = u64::MAX;
pub const UINT64_MAX_SQRT: u64 = 4294967295;

// Domain types
pub const DOMAIN_BEACON_ATTESTER: B32 = fixed_bytes!("0x01000000");

// Gwei values
pub const EFFECTIVE_BALANCE_INCREMENT: u64 = 1_000_000_000;
pub const MAX_EFFECTIVE_BALANCE: u64 = 32_000_000_000;

// Rewards and penalties
pub const BASE_REWARD_FACTOR: u64 = 64;
pub const BASE_REWARDS_PER_EPOCH: u64 = 4;
pub const INACTIVITY_PENALTY_QUOTIENT: u64 = 67_108_864;
pub const MIN_EPOCHS_TO_INACTIVITY_PENALTY: u64 = 4;
pub const PROPORTIONAL_SLASHING_MULTIPLIER: u64 = 1;
pub const PROPOSER_REWARD_QUOTIENT: u64 = 8;
