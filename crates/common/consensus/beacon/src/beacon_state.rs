use std::collections::BTreeSet;

use alloy_primitives::{B256, aliases::B32};
use ethereum_hashing::hash_fixed;
use safe_arith::SafeArith;
use ssz_types::{
    BitVector, FixedVector, VariableList,
    typenum::{U4, U2048, U4096, U8192, U65536, U16777216, U1099511627776},
};
use tally_consensus_misc::{
    beacon_block_header::BeaconBlockHeader,
    checkpoint::Checkpoint,
    constants::{
        DOMAIN_BEACON_ATTESTER, EPOCHS_PER_HISTORICAL_VECTOR, GENESIS_EPOCH,
        MAX_COMMITTEES_PER_SLOT, MIN_SEED_LOOKAHEAD, SLOTS_PER_EPOCH, SLOTS_PER_HISTORICAL_ROOT,
        TARGET_COMMITTEE_SIZE,
    },
    eth_1_data::Eth1Data,
    fork::Fork,
    misc::{compute_committee, compute_epoch_at_slot, compute_start_slot_at_epoch},
    pending_attestation::PendingAttestation,
    validator::Validator,
};
use tracing::trace;

use crate::errors::BeaconStateError;

pub type HistoricalRootsVector = FixedVector<B256, U8192>;
pub type HistoricalRootsList = VariableList<B256, U16777216>;
pub type Eth1DataVotes = VariableList<Eth1Data, U2048>;
pub type ValidatorRegistry = VariableList<Validator, U1099511627776>;
pub type BalanceList = VariableList<u64, U1099511627776>;
pub type RandaoMixes = FixedVector<B256, U65536>;
pub type SlashingsVector = FixedVector<u64, U8192>;
pub type PendingAttestationList = VariableList<PendingAttestation, U4096>;
pub type JustificationBits = BitVector<U4>;

/// The canonical consensus state at a slot boundary.
///
/// Fields are private: reads go through the copying accessors in [`crate::accessors`] and writes
/// through the controlled mutators below. Every compound field is optional; `None` marks a
/// collection that was never populated, which is distinct from an empty one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeaconState {
    // Versioning
    pub(crate) genesis_time: u64,
    pub(crate) slot: u64,
    pub(crate) fork: Option<Fork>,

    // History
    pub(crate) latest_block_header: Option<BeaconBlockHeader>,
    pub(crate) block_roots: Option<HistoricalRootsVector>,
    pub(crate) state_roots: Option<HistoricalRootsVector>,
    pub(crate) historical_roots: Option<HistoricalRootsList>,

    // Eth1
    pub(crate) eth1_data: Option<Eth1Data>,
    pub(crate) eth1_data_votes: Option<Eth1DataVotes>,
    pub(crate) eth1_deposit_index: u64,

    // Registry
    pub(crate) validators: Option<ValidatorRegistry>,
    pub(crate) balances: Option<BalanceList>,

    // Randomness
    pub(crate) randao_mixes: Option<RandaoMixes>,

    // Slashings
    pub(crate) slashings: Option<SlashingsVector>,

    // Attestations
    pub(crate) previous_epoch_attestations: Option<PendingAttestationList>,
    pub(crate) current_epoch_attestations: Option<PendingAttestationList>,

    // Finality
    pub(crate) justification_bits: Option<JustificationBits>,
    pub(crate) previous_justified_checkpoint: Option<Checkpoint>,
    pub(crate) current_justified_checkpoint: Option<Checkpoint>,
    pub(crate) finalized_checkpoint: Option<Checkpoint>,
}

impl BeaconState {
    /// Return the current epoch.
    pub fn current_epoch(&self) -> u64 {
        compute_epoch_at_slot(self.slot)
    }

    /// Return the previous epoch (unless the current epoch is ``GENESIS_EPOCH``).
    pub fn previous_epoch(&self) -> u64 {
        let current_epoch = self.current_epoch();
        if current_epoch == GENESIS_EPOCH {
            GENESIS_EPOCH
        } else {
            current_epoch - 1
        }
    }

    /// Return the block root at the start of a recent ``epoch``.
    pub fn get_block_root(&self, epoch: u64) -> Result<B256, BeaconStateError> {
        self.get_block_root_at_slot(compute_start_slot_at_epoch(epoch))
    }

    /// Return the block root at a recent ``slot``.
    pub fn get_block_root_at_slot(&self, slot: u64) -> Result<B256, BeaconStateError> {
        if !(slot < self.slot && self.slot <= slot.saturating_add(SLOTS_PER_HISTORICAL_ROOT)) {
            return Err(BeaconStateError::SlotOutOfRange {
                slot,
                state_slot: self.slot,
            });
        }
        let block_roots = self
            .block_roots
            .as_ref()
            .ok_or(BeaconStateError::AbsentCollection("block_roots"))?;
        Ok(block_roots[(slot % SLOTS_PER_HISTORICAL_ROOT) as usize])
    }

    /// Return the randao mix at a recent ``epoch``.
    pub fn get_randao_mix(&self, epoch: u64) -> Result<B256, BeaconStateError> {
        let randao_mixes = self
            .randao_mixes
            .as_ref()
            .ok_or(BeaconStateError::AbsentCollection("randao_mixes"))?;
        Ok(randao_mixes[(epoch % EPOCHS_PER_HISTORICAL_VECTOR) as usize])
    }

    /// Return the sequence of active validator indices at ``epoch``.
    pub fn get_active_validator_indices(&self, epoch: u64) -> Vec<u64> {
        self.validators
            .iter()
            .flat_map(|validators| validators.iter())
            .enumerate()
            .filter_map(|(i, v)| v.is_active_validator(epoch).then_some(i as u64))
            .collect()
    }

    /// Return the seed at ``epoch``.
    pub fn get_seed(&self, epoch: u64, domain_type: B32) -> Result<B256, BeaconStateError> {
        let mix =
            self.get_randao_mix(epoch + EPOCHS_PER_HISTORICAL_VECTOR - MIN_SEED_LOOKAHEAD - 1)?;
        let epoch_with_index =
            [domain_type.as_slice(), &epoch.to_le_bytes(), mix.as_slice()].concat();
        Ok(B256::from(hash_fixed(&epoch_with_index)))
    }

    /// Return the number of committees in each slot for the given ``epoch``.
    pub fn get_committee_count_per_slot(&self, epoch: u64) -> u64 {
        (self.get_active_validator_indices(epoch).len() as u64
            / SLOTS_PER_EPOCH
            / TARGET_COMMITTEE_SIZE)
            .clamp(1, MAX_COMMITTEES_PER_SLOT)
    }

    /// Return the beacon committee at ``slot`` for ``index``.
    pub fn get_beacon_committee(&self, slot: u64, index: u64) -> Result<Vec<u64>, BeaconStateError> {
        let epoch = compute_epoch_at_slot(slot);
        let committees_per_slot = self.get_committee_count_per_slot(epoch);
        Ok(compute_committee(
            &self.get_active_validator_indices(epoch),
            self.get_seed(epoch, DOMAIN_BEACON_ATTESTER)?,
            (slot % SLOTS_PER_EPOCH) * committees_per_slot + index,
            committees_per_slot * SLOTS_PER_EPOCH,
        )?)
    }

    /// Return the set of attesting indices corresponding to ``attestation``'s committee and
    /// aggregation bits.
    pub fn get_attesting_indices(
        &self,
        attestation: &PendingAttestation,
    ) -> Result<BTreeSet<u64>, BeaconStateError> {
        let committee =
            self.get_beacon_committee(attestation.data.slot, attestation.data.index)?;
        let mut output = BTreeSet::new();
        for (i, attester_index) in committee.iter().enumerate() {
            // Bits beyond the end of the list count as unset.
            if attestation.aggregation_bits.get(i).unwrap_or(false) {
                output.insert(*attester_index);
            }
        }
        Ok(output)
    }

    /// Increase the validator balance at index ``index`` by ``delta``.
    pub fn increase_balance(&mut self, index: u64, delta: u64) -> Result<(), BeaconStateError> {
        let balance = self.balance_mut(index)?;
        *balance = balance.safe_add(delta)?;
        Ok(())
    }

    /// Decrease the validator balance at index ``index`` by ``delta``, flooring at zero.
    pub fn decrease_balance(&mut self, index: u64, delta: u64) -> Result<(), BeaconStateError> {
        let balance = self.balance_mut(index)?;
        *balance = balance.saturating_sub(delta);
        Ok(())
    }

    fn balance_mut(&mut self, index: u64) -> Result<&mut u64, BeaconStateError> {
        let balances = self
            .balances
            .as_mut()
            .ok_or(BeaconStateError::AbsentCollection("balances"))?;
        let len = balances.len();
        balances
            .get_mut(index as usize)
            .ok_or(BeaconStateError::IndexOutOfRange { index, len })
    }

    pub fn set_justification_bits(&mut self, bits: JustificationBits) {
        self.justification_bits = Some(bits);
    }

    pub fn set_previous_justified_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.previous_justified_checkpoint = Some(checkpoint);
    }

    pub fn set_current_justified_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.current_justified_checkpoint = Some(checkpoint);
    }

    pub fn set_finalized_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.finalized_checkpoint = Some(checkpoint);
    }

    /// Move the current epoch's pending attestations into the previous epoch slot and start an
    /// empty current list.
    pub fn rotate_pending_attestations(&mut self) {
        trace!(
            slot = self.slot,
            current = self.current_epoch_attestations.as_ref().map_or(0, |list| list.len()),
            "Rotating pending attestations"
        );
        self.previous_epoch_attestations = self.current_epoch_attestations.take();
        self.current_epoch_attestations = Some(PendingAttestationList::default());
    }
}
