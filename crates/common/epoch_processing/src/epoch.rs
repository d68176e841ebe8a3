use serde::Serialize;
use tally_consensus_beacon::beacon_state::BeaconState;
use tally_network_spec::networks::BeaconNetworkSpec;
use tracing::{debug, info};

use crate::{
    errors::EpochProcessingError,
    precompute::{
        self, TotalBalances, justification_and_finalization,
        rewards_and_penalties::apply_rewards_and_penalties, slashings,
    },
};

/// What one epoch transition did, for reporting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpochSummary {
    /// Epoch the transition was run at.
    pub epoch: u64,
    pub validators: usize,
    pub total_balances: TotalBalances,
    /// Sum of attestation and proposer rewards.
    pub total_rewards: u64,
    /// Sum of attestation penalties before flooring balances at zero. Slashing penalties are not
    /// included.
    pub total_penalties: u64,
    pub justified_epoch: u64,
    pub finalized_epoch: u64,
}

/// Run the precompute epoch transition: summarize participation, then justification and
/// finalization, rewards and penalties, slashings, and finally rotate pending attestations.
///
/// The passes run on a copy of the state which replaces `state` only if all of them succeed.
pub fn process_epoch_precompute(
    state: &mut BeaconState,
    network_spec: &BeaconNetworkSpec,
) -> Result<EpochSummary, EpochProcessingError> {
    network_spec.validate()?;
    let mut post_state = state.clone();
    let epoch = post_state.current_epoch();

    let (mut statuses, mut totals) = precompute::new(&post_state)?;
    precompute::process_attestations(&post_state, &mut statuses, &mut totals, network_spec)?;
    debug!(
        epoch,
        validators = statuses.len(),
        active_balance = totals.current_epoch,
        prev_epoch_target_attesters = totals.prev_epoch_target_attesters,
        "Summarized participation"
    );

    justification_and_finalization::process_justification_and_finalization_precompute(
        &mut post_state,
        &totals,
    )?;
    let delta = apply_rewards_and_penalties(&mut post_state, &totals, &statuses, network_spec)?;
    slashings::process_slashings_precompute(&mut post_state, &totals, network_spec)?;
    post_state.rotate_pending_attestations();

    let summary = EpochSummary {
        epoch,
        validators: statuses.len(),
        total_balances: totals,
        total_rewards: delta.rewards,
        total_penalties: delta.penalties,
        justified_epoch: post_state
            .current_justified_checkpoint()
            .map_or(0, |checkpoint| checkpoint.epoch),
        finalized_epoch: post_state
            .finalized_checkpoint()
            .map_or(0, |checkpoint| checkpoint.epoch),
    };
    *state = post_state;

    info!(
        epoch = summary.epoch,
        validators = summary.validators,
        total_rewards = summary.total_rewards,
        total_penalties = summary.total_penalties,
        justified_epoch = summary.justified_epoch,
        finalized_epoch = summary.finalized_epoch,
        "Processed epoch"
    );

    Ok(summary)
}
