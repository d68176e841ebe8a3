#![allow(clippy::unwrap_used)]

use alloy_primitives::B256;
use ssz_types::BitList;
use tally_consensus_beacon::{
    beacon_state::{BeaconState, JustificationBits},
    snapshot::BeaconStateSnapshot,
};
use tally_consensus_misc::{
    attestation_data::AttestationData,
    checkpoint::Checkpoint,
    constants::{
        FAR_FUTURE_EPOCH, MAX_EFFECTIVE_BALANCE, SLOTS_PER_EPOCH, SLOTS_PER_HISTORICAL_ROOT,
    },
    misc::compute_start_slot_at_epoch,
    pending_attestation::PendingAttestation,
    validator::Validator,
};
use tally_epoch_processing::precompute::{self, TotalBalances, ValidatorStatus};
use tally_network_spec::networks::BeaconNetworkSpec;

/// How much of the registry attested in the previous and current epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    None,
    PreviousEpoch,
    Full,
}

pub fn active_validator(effective_balance: u64) -> Validator {
    Validator {
        effective_balance,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
        ..Default::default()
    }
}

/// Snapshot of a state at the last slot of `epoch` with `validators` active validators at the
/// maximum effective balance and nothing finalized yet.
pub fn pre_state_snapshot(epoch: u64, validators: usize) -> BeaconStateSnapshot {
    BeaconStateSnapshot {
        slot: compute_start_slot_at_epoch(epoch + 1) - 1,
        block_roots: Some(
            (0..SLOTS_PER_HISTORICAL_ROOT)
                .map(|slot| B256::left_padding_from(&(slot + 1).to_be_bytes()))
                .collect(),
        ),
        randao_mixes: Some(vec![]),
        validators: Some(vec![active_validator(MAX_EFFECTIVE_BALANCE); validators]),
        balances: Some(vec![MAX_EFFECTIVE_BALANCE; validators]),
        slashings: Some(vec![]),
        previous_epoch_attestations: Some(vec![]),
        current_epoch_attestations: Some(vec![]),
        justification_bits: Some(JustificationBits::new()),
        previous_justified_checkpoint: Some(Checkpoint::default()),
        current_justified_checkpoint: Some(Checkpoint::default()),
        finalized_checkpoint: Some(Checkpoint::default()),
        ..Default::default()
    }
}

/// Every committee-0 member of every slot of `epoch` before the state's slot, voting for the
/// canonical target and head and included one slot later by validator 0.
pub fn epoch_attestations(state: &BeaconState, epoch: u64) -> Vec<PendingAttestation> {
    let start_slot = compute_start_slot_at_epoch(epoch);
    let end_slot = (start_slot + SLOTS_PER_EPOCH).min(state.slot());
    (start_slot..end_slot)
        .map(|slot| {
            let committee = state.get_beacon_committee(slot, 0).unwrap();
            let mut aggregation_bits = BitList::with_capacity(committee.len()).unwrap();
            for i in 0..committee.len() {
                aggregation_bits.set(i, true).unwrap();
            }
            PendingAttestation {
                aggregation_bits,
                data: AttestationData {
                    slot,
                    index: 0,
                    beacon_block_root: state.get_block_root_at_slot(slot).unwrap(),
                    source: Checkpoint::default(),
                    target: Checkpoint {
                        epoch,
                        root: state.get_block_root(epoch).unwrap(),
                    },
                },
                inclusion_delay: 1,
                proposer_index: 0,
            }
        })
        .collect()
}

pub fn pre_state(epoch: u64, validators: usize, participation: Participation) -> BeaconState {
    let state = BeaconState::try_from(pre_state_snapshot(epoch, validators)).unwrap();
    let mut snapshot = state.snapshot();
    if participation != Participation::None {
        snapshot.previous_epoch_attestations =
            Some(epoch_attestations(&state, state.previous_epoch()));
    }
    if participation == Participation::Full {
        snapshot.current_epoch_attestations =
            Some(epoch_attestations(&state, state.current_epoch()));
    }
    BeaconState::try_from(snapshot).unwrap()
}

/// Run the participation summarizer the way the epoch pipeline does.
pub fn summarize(
    state: &BeaconState,
    network_spec: &BeaconNetworkSpec,
) -> (Vec<ValidatorStatus>, TotalBalances) {
    let (mut statuses, mut totals) = precompute::new(state).unwrap();
    precompute::process_attestations(state, &mut statuses, &mut totals, network_spec).unwrap();
    (statuses, totals)
}
