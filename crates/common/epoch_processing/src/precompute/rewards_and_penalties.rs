use itertools::izip;
use rayon::prelude::*;
use safe_arith::{ArithError, SafeArith};
use tally_consensus_beacon::beacon_state::BeaconState;
use tally_consensus_misc::{constants::GENESIS_EPOCH, misc::integer_squareroot};
use tally_network_spec::networks::BeaconNetworkSpec;
use tracing::{debug, warn};

use super::validator_status::{TotalBalances, ValidatorStatus};
use crate::errors::EpochProcessingError;

/// Change to one validator's balance, rewards and penalties kept apart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub rewards: u64,
    pub penalties: u64,
}

impl Delta {
    pub fn reward(&mut self, reward: u64) -> Result<(), ArithError> {
        self.rewards.safe_add_assign(reward)
    }

    pub fn penalize(&mut self, penalty: u64) -> Result<(), ArithError> {
        self.penalties.safe_add_assign(penalty)
    }
}

/// ``effective_balance * BASE_REWARD_FACTOR // isqrt(total) // BASE_REWARDS_PER_EPOCH``.
///
/// The division order is consensus critical.
pub fn base_reward(
    effective_balance: u64,
    totals: &TotalBalances,
    network_spec: &BeaconNetworkSpec,
) -> Result<u64, ArithError> {
    effective_balance
        .safe_mul(network_spec.base_reward_factor)?
        .safe_div(integer_squareroot(totals.current_epoch))?
        .safe_div(network_spec.base_rewards_per_epoch)
}

/// Epochs between the previous epoch and the last finalized one. An absent finalized checkpoint
/// counts as the genesis epoch.
pub fn finality_delay(state: &BeaconState) -> Result<u64, ArithError> {
    let finalized_epoch = state
        .finalized_checkpoint()
        .map_or(GENESIS_EPOCH, |checkpoint| checkpoint.epoch);
    state.previous_epoch().safe_sub(finalized_epoch)
}

/// Source, target, head and inactivity delta for a single validator.
pub fn attestation_delta(
    status: &ValidatorStatus,
    totals: &TotalBalances,
    finality_delay: u64,
    network_spec: &BeaconNetworkSpec,
) -> Result<Delta, EpochProcessingError> {
    let mut delta = Delta::default();

    let eligible = status.is_active_prev_epoch
        || (status.is_slashed && !status.is_withdrawable_current_epoch);
    if !eligible {
        return Ok(delta);
    }

    let effective_balance = status.current_epoch_effective_balance;
    let base_reward = base_reward(effective_balance, totals, network_spec)?;

    // Source
    if status.is_prev_epoch_attester && !status.is_slashed {
        delta.reward(
            base_reward
                .safe_mul(totals.prev_epoch_attesters)?
                .safe_div(totals.current_epoch)?,
        )?;
        let proposer_reward = base_reward.safe_div(network_spec.proposer_reward_quotient)?;
        let max_attester_reward = base_reward.safe_sub(proposer_reward)?;
        delta.reward(max_attester_reward.safe_div(status.inclusion_distance)?)?;
    } else {
        delta.penalize(base_reward)?;
    }

    // Target
    if status.is_prev_epoch_target_attester && !status.is_slashed {
        delta.reward(
            base_reward
                .safe_mul(totals.prev_epoch_target_attesters)?
                .safe_div(totals.current_epoch)?,
        )?;
    } else {
        delta.penalize(base_reward)?;
    }

    // Head
    if status.is_prev_epoch_head_attester && !status.is_slashed {
        delta.reward(
            base_reward
                .safe_mul(totals.prev_epoch_head_attesters)?
                .safe_div(totals.current_epoch)?,
        )?;
    } else {
        delta.penalize(base_reward)?;
    }

    // Inactivity leak
    if finality_delay > network_spec.min_epochs_to_inactivity_penalty {
        delta.penalize(network_spec.base_rewards_per_epoch.safe_mul(base_reward)?)?;
        if !status.is_prev_epoch_target_attester {
            delta.penalize(
                effective_balance
                    .safe_mul(finality_delay)?
                    .safe_div(network_spec.inactivity_penalty_quotient)?,
            )?;
        }
    }

    Ok(delta)
}

fn check_lengths(
    state: &BeaconState,
    statuses: &[ValidatorStatus],
) -> Result<(), EpochProcessingError> {
    let validators = state.num_validators();
    let balances = state.num_balances();
    if statuses.len() != validators || statuses.len() != balances {
        return Err(EpochProcessingError::LengthMismatch {
            statuses: statuses.len(),
            validators,
            balances,
        });
    }
    Ok(())
}

/// Attestation rewards and penalties for every validator, index-aligned with the registry.
pub fn attestation_deltas(
    state: &BeaconState,
    totals: &TotalBalances,
    statuses: &[ValidatorStatus],
    network_spec: &BeaconNetworkSpec,
) -> Result<(Vec<u64>, Vec<u64>), EpochProcessingError> {
    check_lengths(state, statuses)?;
    let finality_delay = finality_delay(state)?;

    let deltas = statuses
        .par_iter()
        .map(|status| attestation_delta(status, totals, finality_delay, network_spec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(deltas
        .into_iter()
        .map(|delta| (delta.rewards, delta.penalties))
        .unzip())
}

/// Inclusion rewards credited to the proposer of each previous-epoch attester's earliest
/// inclusion. The base reward is recomputed here from the attester's own balance.
pub fn proposer_deltas(
    statuses: &[ValidatorStatus],
    totals: &TotalBalances,
    network_spec: &BeaconNetworkSpec,
) -> Result<Vec<u64>, EpochProcessingError> {
    let validators = statuses.len();
    let mut rewards = vec![0; validators];

    for status in statuses.iter().filter(|status| status.is_prev_epoch_attester) {
        let base_reward = base_reward(status.current_epoch_effective_balance, totals, network_spec)?;
        let proposer_reward = base_reward.safe_div(network_spec.proposer_reward_quotient)?;
        rewards
            .get_mut(status.proposer_index as usize)
            .ok_or(EpochProcessingError::ProposerIndexOutOfRange {
                proposer_index: status.proposer_index,
                validators,
            })?
            .safe_add_assign(proposer_reward)?;
    }

    Ok(rewards)
}

/// Apply attestation and proposer deltas to the state's balances.
///
/// Nothing is written until every validator's new balance has been computed without error, so a
/// failure leaves the balances exactly as they were. No-op in the genesis epoch.
pub fn process_rewards_and_penalties_precompute(
    state: &mut BeaconState,
    totals: &TotalBalances,
    statuses: &[ValidatorStatus],
    network_spec: &BeaconNetworkSpec,
) -> Result<(), EpochProcessingError> {
    apply_rewards_and_penalties(state, totals, statuses, network_spec).map(|_| ())
}

/// As [`process_rewards_and_penalties_precompute`], returning the summed delta.
pub(crate) fn apply_rewards_and_penalties(
    state: &mut BeaconState,
    totals: &TotalBalances,
    statuses: &[ValidatorStatus],
    network_spec: &BeaconNetworkSpec,
) -> Result<Delta, EpochProcessingError> {
    if state.current_epoch() == GENESIS_EPOCH {
        return Ok(Delta::default());
    }
    check_lengths(state, statuses)?;
    network_spec.validate()?;

    let (attestation_rewards, penalties) =
        attestation_deltas(state, totals, statuses, network_spec)?;
    let proposer_rewards = proposer_deltas(statuses, totals, network_spec)?;

    let rewards = attestation_rewards
        .iter()
        .zip(&proposer_rewards)
        .map(|(attestation_reward, proposer_reward)| attestation_reward.safe_add(*proposer_reward))
        .collect::<Result<Vec<_>, _>>()?;

    // Stage every new balance before touching the state.
    let balances = state.balances().unwrap_or_default();
    let mut total = Delta::default();
    for (balance, reward, penalty) in izip!(balances.iter(), &rewards, &penalties) {
        let increased = balance.safe_add(*reward)?;
        if *penalty > increased {
            warn!(balance, reward, penalty, "Penalty exceeds balance, flooring at zero");
        }
        total.reward(*reward)?;
        total.penalize(*penalty)?;
    }

    for (index, (reward, penalty)) in rewards.iter().zip(&penalties).enumerate() {
        state.increase_balance(index as u64, *reward)?;
        state.decrease_balance(index as u64, *penalty)?;
    }

    debug!(
        epoch = state.current_epoch(),
        validators = statuses.len(),
        total_rewards = total.rewards,
        total_penalties = total.penalties,
        "Applied rewards and penalties"
    );

    Ok(total)
}
