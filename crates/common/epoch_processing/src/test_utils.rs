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
    validator::{PubKey, Validator},
};

/// Distinct, non-zero block root for every slot of the history window.
pub fn root_for_slot(slot: u64) -> B256 {
    B256::left_padding_from(&(slot + 1).to_be_bytes())
}

pub fn validator_with_balance(effective_balance: u64) -> Validator {
    Validator {
        pubkey: PubKey::repeat_byte(0xAB),
        withdrawal_credentials: B256::repeat_byte(0x01),
        effective_balance,
        slashed: false,
        activation_eligibility_epoch: 0,
        activation_epoch: 0,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
    }
}

/// Builds states through the public snapshot type, the same way callers outside the state crate
/// do.
pub struct StateBuilder {
    snapshot: BeaconStateSnapshot,
}

impl StateBuilder {
    /// A state at the last slot of `epoch`, where epoch processing runs.
    pub fn at_end_of_epoch(epoch: u64) -> Self {
        Self {
            snapshot: BeaconStateSnapshot {
                genesis_time: 1_606_824_023,
                slot: compute_start_slot_at_epoch(epoch + 1) - 1,
                block_roots: Some((0..SLOTS_PER_HISTORICAL_ROOT).map(root_for_slot).collect()),
                randao_mixes: Some(vec![]),
                validators: Some(vec![]),
                balances: Some(vec![]),
                slashings: Some(vec![]),
                previous_epoch_attestations: Some(vec![]),
                current_epoch_attestations: Some(vec![]),
                justification_bits: Some(JustificationBits::new()),
                previous_justified_checkpoint: Some(Checkpoint::default()),
                current_justified_checkpoint: Some(Checkpoint::default()),
                finalized_checkpoint: Some(Checkpoint::default()),
                ..Default::default()
            },
        }
    }

    pub fn from_state(state: &BeaconState) -> Self {
        Self {
            snapshot: state.snapshot(),
        }
    }

    /// `count` active validators at max effective balance, with matching balances.
    pub fn validator_count(self, count: usize) -> Self {
        self.validators(vec![validator_with_balance(MAX_EFFECTIVE_BALANCE); count])
    }

    /// Sets the registry and a balance list equal to each validator's effective balance.
    pub fn validators(mut self, validators: Vec<Validator>) -> Self {
        self.snapshot.balances = Some(validators.iter().map(|v| v.effective_balance).collect());
        self.snapshot.validators = Some(validators);
        self
    }

    pub fn balances(mut self, balances: Vec<u64>) -> Self {
        self.snapshot.balances = Some(balances);
        self
    }

    pub fn without_validators(mut self) -> Self {
        self.snapshot.validators = None;
        self.snapshot.balances = None;
        self
    }

    pub fn previous_epoch_attestations(mut self, attestations: Vec<PendingAttestation>) -> Self {
        self.snapshot.previous_epoch_attestations = Some(attestations);
        self
    }

    pub fn current_epoch_attestations(mut self, attestations: Vec<PendingAttestation>) -> Self {
        self.snapshot.current_epoch_attestations = Some(attestations);
        self
    }

    pub fn finalized_checkpoint(mut self, checkpoint: Option<Checkpoint>) -> Self {
        self.snapshot.finalized_checkpoint = checkpoint;
        self
    }

    pub fn justified_checkpoints(mut self, previous: Checkpoint, current: Checkpoint) -> Self {
        self.snapshot.previous_justified_checkpoint = Some(previous);
        self.snapshot.current_justified_checkpoint = Some(current);
        self
    }

    pub fn justification_bits(mut self, bits: [bool; 4]) -> Self {
        let mut justification_bits = JustificationBits::new();
        for (i, bit) in bits.into_iter().enumerate() {
            justification_bits.set(i, bit).expect("bit in range");
        }
        self.snapshot.justification_bits = Some(justification_bits);
        self
    }

    pub fn slashings(mut self, slashings: Vec<u64>) -> Self {
        self.snapshot.slashings = Some(slashings);
        self
    }

    pub fn build(self) -> BeaconState {
        BeaconState::try_from(self.snapshot).expect("snapshot within limits")
    }
}

/// A pending attestation from the whole of committee 0 at `slot`, voting for the state's
/// canonical target and head.
pub fn pending_attestation_for(
    state: &BeaconState,
    slot: u64,
    target_epoch: u64,
    inclusion_delay: u64,
    proposer_index: u64,
) -> PendingAttestation {
    let committee = state.get_beacon_committee(slot, 0).expect("committee");
    let mut aggregation_bits = BitList::with_capacity(committee.len()).expect("bits within limit");
    for i in 0..committee.len() {
        aggregation_bits.set(i, true).expect("bit in range");
    }

    PendingAttestation {
        aggregation_bits,
        data: AttestationData {
            slot,
            index: 0,
            beacon_block_root: state.get_block_root_at_slot(slot).expect("head root"),
            source: Checkpoint::default(),
            target: Checkpoint {
                epoch: target_epoch,
                root: state.get_block_root(target_epoch).expect("target root"),
            },
        },
        inclusion_delay,
        proposer_index,
    }
}

/// Full participation for every slot of `epoch` that lies before the state's slot.
pub fn epoch_attestations(
    state: &BeaconState,
    epoch: u64,
    inclusion_delay: u64,
    proposer_index: u64,
) -> Vec<PendingAttestation> {
    let start_slot = compute_start_slot_at_epoch(epoch);
    let end_slot = (start_slot + SLOTS_PER_EPOCH).min(state.slot());
    (start_slot..end_slot)
        .map(|slot| pending_attestation_for(state, slot, epoch, inclusion_delay, proposer_index))
        .collect()
}
