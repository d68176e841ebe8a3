//! Read surface of [`BeaconState`].
//!
//! Every getter hands out an owned copy with its own backing storage, so holding or mutating a
//! returned value can never be observed through the live state. Compound fields come back as
//! `Option`s because the state may have been hydrated from a snapshot that left them out.
//!
//! Index accessors distinguish three outcomes:
//! - `Ok(Lookup::Found(value))` for a populated collection and an index in range,
//! - `Ok(Lookup::AbsentCollection)` when the backing collection was never populated,
//! - `Err(BeaconStateError::IndexOutOfRange)` when the collection exists but is too short.
//!
//! The absent case deliberately does not error. Callers that want the zero value for it use
//! [`Lookup::unwrap_or_default`].

use alloy_primitives::B256;
use tally_consensus_misc::{
    beacon_block_header::BeaconBlockHeader,
    checkpoint::Checkpoint,
    eth_1_data::Eth1Data,
    fork::Fork,
    validator::{PubKey, Validator},
};

use crate::{
    beacon_state::{
        BalanceList, BeaconState, Eth1DataVotes, HistoricalRootsList, HistoricalRootsVector,
        JustificationBits, PendingAttestationList, RandaoMixes, SlashingsVector,
        ValidatorRegistry,
    },
    errors::BeaconStateError,
};

/// Outcome of an index lookup against a collection that may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// The backing collection is not populated at all.
    AbsentCollection,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::AbsentCollection => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::AbsentCollection)
    }
}

impl<T: Default> Lookup<T> {
    /// The value if found, otherwise the zero value of `T`.
    pub fn unwrap_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}

fn lookup<T: Clone>(collection: Option<&[T]>, index: u64) -> Result<Lookup<T>, BeaconStateError> {
    let Some(items) = collection else {
        return Ok(Lookup::AbsentCollection);
    };
    items
        .get(index as usize)
        .cloned()
        .map(Lookup::Found)
        .ok_or(BeaconStateError::IndexOutOfRange {
            index,
            len: items.len(),
        })
}

impl BeaconState {
    pub fn genesis_time(&self) -> u64 {
        self.genesis_time
    }

    pub fn slot(&self) -> u64 {
        self.slot
    }

    pub fn fork(&self) -> Option<Fork> {
        self.fork
    }

    pub fn latest_block_header(&self) -> Option<BeaconBlockHeader> {
        self.latest_block_header.clone()
    }

    pub fn block_roots(&self) -> Option<HistoricalRootsVector> {
        self.block_roots.clone()
    }

    pub fn block_root_at_index(&self, index: u64) -> Result<Lookup<B256>, BeaconStateError> {
        lookup(self.block_roots.as_deref(), index)
    }

    pub fn state_roots(&self) -> Option<HistoricalRootsVector> {
        self.state_roots.clone()
    }

    pub fn state_root_at_index(&self, index: u64) -> Result<Lookup<B256>, BeaconStateError> {
        lookup(self.state_roots.as_deref(), index)
    }

    pub fn historical_roots(&self) -> Option<HistoricalRootsList> {
        self.historical_roots.clone()
    }

    pub fn eth1_data(&self) -> Option<Eth1Data> {
        self.eth1_data.clone()
    }

    /// Votes on the eth1 chain, each carrying its own deposit count.
    pub fn eth1_data_votes(&self) -> Option<Eth1DataVotes> {
        self.eth1_data_votes.clone()
    }

    pub fn eth1_deposit_index(&self) -> u64 {
        self.eth1_deposit_index
    }

    pub fn validators(&self) -> Option<ValidatorRegistry> {
        self.validators.clone()
    }

    pub fn validator_at_index(&self, index: u64) -> Result<Lookup<Validator>, BeaconStateError> {
        lookup(self.validators.as_deref(), index)
    }

    pub fn pubkey_at_index(&self, index: u64) -> Result<Lookup<PubKey>, BeaconStateError> {
        Ok(match self.validator_at_index(index)? {
            Lookup::Found(validator) => Lookup::Found(validator.pubkey),
            Lookup::AbsentCollection => Lookup::AbsentCollection,
        })
    }

    /// Size of the validator registry, zero when absent.
    pub fn num_validators(&self) -> usize {
        self.validators.as_ref().map_or(0, |validators| validators.len())
    }

    /// Size of the balance list, zero when absent.
    pub fn num_balances(&self) -> usize {
        self.balances.as_ref().map_or(0, |balances| balances.len())
    }

    pub fn balances(&self) -> Option<BalanceList> {
        self.balances.clone()
    }

    pub fn balance_at_index(&self, index: u64) -> Result<Lookup<u64>, BeaconStateError> {
        lookup(self.balances.as_deref(), index)
    }

    pub fn randao_mixes(&self) -> Option<RandaoMixes> {
        self.randao_mixes.clone()
    }

    pub fn randao_mix_at_index(&self, index: u64) -> Result<Lookup<B256>, BeaconStateError> {
        lookup(self.randao_mixes.as_deref(), index)
    }

    pub fn slashings(&self) -> Option<SlashingsVector> {
        self.slashings.clone()
    }

    pub fn previous_epoch_attestations(&self) -> Option<PendingAttestationList> {
        self.previous_epoch_attestations.clone()
    }

    pub fn current_epoch_attestations(&self) -> Option<PendingAttestationList> {
        self.current_epoch_attestations.clone()
    }

    pub fn justification_bits(&self) -> Option<JustificationBits> {
        self.justification_bits.clone()
    }

    pub fn previous_justified_checkpoint(&self) -> Option<Checkpoint> {
        self.previous_justified_checkpoint
    }

    pub fn current_justified_checkpoint(&self) -> Option<Checkpoint> {
        self.current_justified_checkpoint
    }

    pub fn finalized_checkpoint(&self) -> Option<Checkpoint> {
        self.finalized_checkpoint
    }
}
