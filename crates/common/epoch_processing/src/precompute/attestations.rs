use safe_arith::SafeArith;
use tally_consensus_beacon::{beacon_state::BeaconState, errors::BeaconStateError};
use tally_consensus_misc::attestation_data::AttestationData;
use tally_network_spec::networks::BeaconNetworkSpec;
use tracing::debug;

use super::validator_status::{TotalBalances, ValidatorStatus};
use crate::errors::EpochProcessingError;

/// Build one [`ValidatorStatus`] per registry entry and sum the active balances of the current
/// and previous epochs. Attester flags are left unset for [`process_attestations`].
pub fn new(
    state: &BeaconState,
) -> Result<(Vec<ValidatorStatus>, TotalBalances), EpochProcessingError> {
    let current_epoch = state.current_epoch();
    let previous_epoch = state.previous_epoch();
    let validators = state.validators().unwrap_or_default();

    let mut statuses = Vec::with_capacity(validators.len());
    let mut totals = TotalBalances::default();
    for validator in validators.iter() {
        let effective_balance = validator.effective_balance;
        let mut status = ValidatorStatus {
            is_slashed: validator.slashed,
            is_withdrawable_current_epoch: validator.is_withdrawable_validator(current_epoch),
            current_epoch_effective_balance: effective_balance,
            ..Default::default()
        };

        if validator.is_active_validator(current_epoch) {
            status.is_active_current_epoch = true;
            totals.current_epoch.safe_add_assign(effective_balance)?;
        }
        if validator.is_active_validator(previous_epoch) {
            status.is_active_prev_epoch = true;
            totals.prev_epoch.safe_add_assign(effective_balance)?;
        }

        statuses.push(status);
    }

    Ok((statuses, totals))
}

/// What a single pending attestation says about everyone in its aggregation bits.
#[derive(Debug, Default, PartialEq, Eq)]
struct Participation {
    current_epoch_attester: bool,
    current_epoch_target_attester: bool,
    prev_epoch_attester: bool,
    prev_epoch_target_attester: bool,
    prev_epoch_head_attester: bool,
}

fn participation(
    state: &BeaconState,
    data: &AttestationData,
) -> Result<Participation, BeaconStateError> {
    let current_epoch = state.current_epoch();
    let previous_epoch = state.previous_epoch();
    let mut participation = Participation::default();

    if data.target.epoch == current_epoch {
        participation.current_epoch_attester = true;
        participation.current_epoch_target_attester =
            data.target.root == state.get_block_root(current_epoch)?;
    }

    if data.target.epoch == previous_epoch {
        participation.prev_epoch_attester = true;
        participation.prev_epoch_target_attester =
            data.target.root == state.get_block_root(previous_epoch)?;
        // A head vote only counts on top of a correct target.
        participation.prev_epoch_head_attester = participation.prev_epoch_target_attester
            && data.beacon_block_root == state.get_block_root_at_slot(data.slot)?;
    }

    Ok(participation)
}

/// Walk the previous then current epoch pending attestations and mark every attesting validator.
///
/// For previous-epoch attesters the earliest inclusion wins: its slot, delay and proposer are
/// recorded on the status. Finishes by re-aggregating `totals` with [`process_balances`].
pub fn process_attestations(
    state: &BeaconState,
    statuses: &mut [ValidatorStatus],
    totals: &mut TotalBalances,
    network_spec: &BeaconNetworkSpec,
) -> Result<(), EpochProcessingError> {
    let previous_epoch_attestations = state.previous_epoch_attestations().unwrap_or_default();
    let current_epoch_attestations = state.current_epoch_attestations().unwrap_or_default();

    for attestation in previous_epoch_attestations
        .iter()
        .chain(current_epoch_attestations.iter())
    {
        let data = &attestation.data;
        if attestation.inclusion_delay == 0 {
            return Err(EpochProcessingError::ZeroInclusionDelay { slot: data.slot });
        }

        let participation = participation(state, data)?;
        if participation == Participation::default() {
            continue;
        }

        let inclusion_slot = attestation.inclusion_slot()?;
        let len = statuses.len();
        for index in state.get_attesting_indices(attestation)? {
            let status = statuses
                .get_mut(index as usize)
                .ok_or(BeaconStateError::IndexOutOfRange { index, len })?;

            status.is_current_epoch_attester |= participation.current_epoch_attester;
            status.is_current_epoch_target_attester |=
                participation.current_epoch_target_attester;
            status.is_prev_epoch_target_attester |= participation.prev_epoch_target_attester;
            status.is_prev_epoch_head_attester |= participation.prev_epoch_head_attester;

            if participation.prev_epoch_attester {
                status.is_prev_epoch_attester = true;
                if inclusion_slot < status.inclusion_slot {
                    status.inclusion_slot = inclusion_slot;
                    status.inclusion_distance = attestation.inclusion_delay;
                    status.proposer_index = attestation.proposer_index;
                }
            }
        }
    }

    debug!(
        previous = previous_epoch_attestations.len(),
        current = current_epoch_attestations.len(),
        "Processed pending attestations"
    );

    process_balances(statuses, totals, network_spec)
}

/// Sum unslashed attester balances into `totals`, then floor every total at one effective
/// balance increment.
pub fn process_balances(
    statuses: &[ValidatorStatus],
    totals: &mut TotalBalances,
    network_spec: &BeaconNetworkSpec,
) -> Result<(), EpochProcessingError> {
    totals.current_epoch_attesters = 0;
    totals.current_epoch_target_attesters = 0;
    totals.prev_epoch_attesters = 0;
    totals.prev_epoch_target_attesters = 0;
    totals.prev_epoch_head_attesters = 0;

    for status in statuses.iter().filter(|status| !status.is_slashed) {
        let balance = status.current_epoch_effective_balance;
        if status.is_current_epoch_attester {
            totals.current_epoch_attesters.safe_add_assign(balance)?;
        }
        if status.is_current_epoch_target_attester {
            totals.current_epoch_target_attesters.safe_add_assign(balance)?;
        }
        if status.is_prev_epoch_attester {
            totals.prev_epoch_attesters.safe_add_assign(balance)?;
        }
        if status.is_prev_epoch_target_attester {
            totals.prev_epoch_target_attesters.safe_add_assign(balance)?;
        }
        if status.is_prev_epoch_head_attester {
            totals.prev_epoch_head_attesters.safe_add_assign(balance)?;
        }
    }

    let increment = network_spec.effective_balance_increment;
    for total in [
        &mut totals.current_epoch,
        &mut totals.prev_epoch,
        &mut totals.current_epoch_attesters,
        &mut totals.current_epoch_target_attesters,
        &mut totals.prev_epoch_attesters,
        &mut totals.prev_epoch_target_attesters,
        &mut totals.prev_epoch_head_attesters,
    ] {
        *total = (*total).max(increment);
    }

    Ok(())
}
