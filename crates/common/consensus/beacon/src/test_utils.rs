use alloy_primitives::B256;
use ssz_types::{BitList, FixedVector, VariableList};
use tally_consensus_misc::{
    attestation_data::AttestationData,
    checkpoint::Checkpoint,
    constants::{FAR_FUTURE_EPOCH, MAX_EFFECTIVE_BALANCE, SLOTS_PER_HISTORICAL_ROOT},
    pending_attestation::PendingAttestation,
    validator::{PubKey, Validator},
};

use crate::beacon_state::{BeaconState, JustificationBits, PendingAttestationList};

pub fn active_validator() -> Validator {
    Validator {
        pubkey: PubKey::repeat_byte(0xAB),
        withdrawal_credentials: B256::repeat_byte(0x01),
        effective_balance: MAX_EFFECTIVE_BALANCE,
        slashed: false,
        activation_eligibility_epoch: 0,
        activation_epoch: 0,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
    }
}

pub fn pending_attestation(
    slot: u64,
    bits: &[bool],
    inclusion_delay: u64,
    proposer_index: u64,
) -> PendingAttestation {
    let mut aggregation_bits = BitList::with_capacity(bits.len()).expect("bits within limit");
    for (i, bit) in bits.iter().enumerate() {
        aggregation_bits.set(i, *bit).expect("bit in range");
    }
    PendingAttestation {
        aggregation_bits,
        data: AttestationData {
            slot,
            index: 0,
            beacon_block_root: B256::ZERO,
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        },
        inclusion_delay,
        proposer_index,
    }
}

/// A state at ``slot`` whose every collection is populated. Block root ``i`` is
/// ``repeat_byte(i)`` so window lookups are easy to assert on.
pub fn state_with_validators(count: usize, slot: u64) -> BeaconState {
    let block_roots = (0..SLOTS_PER_HISTORICAL_ROOT)
        .map(|i| B256::repeat_byte(i as u8))
        .collect::<Vec<_>>();

    BeaconState {
        genesis_time: 1_606_824_023,
        slot,
        fork: Some(Default::default()),
        latest_block_header: Some(Default::default()),
        block_roots: Some(FixedVector::from(block_roots)),
        state_roots: Some(FixedVector::from(vec![B256::repeat_byte(0x5A)])),
        historical_roots: Some(VariableList::from(vec![B256::repeat_byte(0x11)])),
        eth1_data: Some(Default::default()),
        eth1_data_votes: Some(VariableList::default()),
        eth1_deposit_index: count as u64,
        validators: Some(VariableList::from(vec![active_validator(); count])),
        balances: Some(VariableList::from(vec![MAX_EFFECTIVE_BALANCE; count])),
        randao_mixes: Some(FixedVector::from(vec![B256::repeat_byte(0x22)])),
        slashings: Some(FixedVector::from(vec![])),
        previous_epoch_attestations: Some(PendingAttestationList::default()),
        current_epoch_attestations: Some(PendingAttestationList::default()),
        justification_bits: Some(JustificationBits::new()),
        previous_justified_checkpoint: Some(Checkpoint::default()),
        current_justified_checkpoint: Some(Checkpoint::default()),
        finalized_checkpoint: Some(Checkpoint::default()),
    }
}
