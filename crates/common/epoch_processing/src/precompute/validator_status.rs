use serde::Serialize;
use tally_consensus_misc::constants::FAR_FUTURE_EPOCH;

/// Per-validator participation record for one epoch transition, index-aligned with the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorStatus {
    /// True if the validator was active in the state's current epoch.
    pub is_active_current_epoch: bool,
    /// True if the validator was active in the state's previous epoch.
    pub is_active_prev_epoch: bool,
    /// True if the validator has been slashed, ever.
    pub is_slashed: bool,
    /// True if the validator can withdraw in the current epoch.
    pub is_withdrawable_current_epoch: bool,

    /// True if the validator had an attestation targeting the current epoch included.
    pub is_current_epoch_attester: bool,
    /// True if that attestation's target root matches the state's block root for the epoch.
    pub is_current_epoch_target_attester: bool,
    /// True if the validator had an attestation targeting the previous epoch included.
    pub is_prev_epoch_attester: bool,
    pub is_prev_epoch_target_attester: bool,
    /// True if the target matched and the head vote matches the block root at the attested slot.
    pub is_prev_epoch_head_attester: bool,

    pub current_epoch_effective_balance: u64,

    /// Slot of the earliest inclusion of a previous-epoch attestation.
    pub inclusion_slot: u64,
    /// Inclusion delay of that attestation. At least one for attesters.
    pub inclusion_distance: u64,
    /// Proposer of the block that included that attestation.
    pub proposer_index: u64,
}

impl Default for ValidatorStatus {
    /// Inclusion slot and distance start at ``FAR_FUTURE_EPOCH`` so any real inclusion is earlier.
    fn default() -> Self {
        Self {
            is_active_current_epoch: false,
            is_active_prev_epoch: false,
            is_slashed: false,
            is_withdrawable_current_epoch: false,
            is_current_epoch_attester: false,
            is_current_epoch_target_attester: false,
            is_prev_epoch_attester: false,
            is_prev_epoch_target_attester: false,
            is_prev_epoch_head_attester: false,
            current_epoch_effective_balance: 0,
            inclusion_slot: FAR_FUTURE_EPOCH,
            inclusion_distance: FAR_FUTURE_EPOCH,
            proposer_index: 0,
        }
    }
}

/// Aggregate effective balances over the registry, in Gwei.
///
/// After [`crate::precompute::process_balances`] every field is at least one effective balance
/// increment, so they are safe to divide by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalBalances {
    /// Total of validators active in the current epoch.
    pub current_epoch: u64,
    /// Total of validators active in the previous epoch.
    pub prev_epoch: u64,
    pub current_epoch_attesters: u64,
    pub current_epoch_target_attesters: u64,
    pub prev_epoch_attesters: u64,
    pub prev_epoch_target_attesters: u64,
    pub prev_epoch_head_attesters: u64,
}
