use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_types::{FixedVector, VariableList, typenum::Unsigned};
use tally_consensus_misc::{
    beacon_block_header::BeaconBlockHeader, checkpoint::Checkpoint, eth_1_data::Eth1Data,
    fork::Fork, pending_attestation::PendingAttestation, validator::Validator,
};

use crate::{
    beacon_state::{BeaconState, JustificationBits},
    errors::BeaconStateError,
};

/// Owned, serializable image of a [`BeaconState`].
///
/// Missing keys deserialize to `None` and `None` fields are left out when serializing, so a
/// collection that was never populated stays absent across a round trip while an empty one
/// stays empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconStateSnapshot {
    #[serde(with = "serde_utils::quoted_u64")]
    pub genesis_time: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork: Option<Fork>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_block_header: Option<BeaconBlockHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_roots: Option<Vec<B256>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_roots: Option<Vec<B256>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_roots: Option<Vec<B256>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth1_data: Option<Eth1Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth1_data_votes: Option<Vec<Eth1Data>>,
    #[serde(with = "serde_utils::quoted_u64")]
    pub eth1_deposit_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validators: Option<Vec<Validator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balances: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randao_mixes: Option<Vec<B256>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slashings: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_epoch_attestations: Option<Vec<PendingAttestation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_epoch_attestations: Option<Vec<PendingAttestation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification_bits: Option<JustificationBits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_justified_checkpoint: Option<Checkpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_justified_checkpoint: Option<Checkpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_checkpoint: Option<Checkpoint>,
}

impl BeaconState {
    /// Deep copy of every field, detached from this state.
    pub fn snapshot(&self) -> BeaconStateSnapshot {
        BeaconStateSnapshot {
            genesis_time: self.genesis_time,
            slot: self.slot,
            fork: self.fork,
            latest_block_header: self.latest_block_header.clone(),
            block_roots: self.block_roots.as_ref().map(|roots| roots.to_vec()),
            state_roots: self.state_roots.as_ref().map(|roots| roots.to_vec()),
            historical_roots: self.historical_roots.as_ref().map(|roots| roots.to_vec()),
            eth1_data: self.eth1_data.clone(),
            eth1_data_votes: self.eth1_data_votes.as_ref().map(|votes| votes.to_vec()),
            eth1_deposit_index: self.eth1_deposit_index,
            validators: self.validators.as_ref().map(|validators| validators.to_vec()),
            balances: self.balances.as_ref().map(|balances| balances.to_vec()),
            randao_mixes: self.randao_mixes.as_ref().map(|mixes| mixes.to_vec()),
            slashings: self.slashings.as_ref().map(|slashings| slashings.to_vec()),
            previous_epoch_attestations: self
                .previous_epoch_attestations
                .as_ref()
                .map(|attestations| attestations.to_vec()),
            current_epoch_attestations: self
                .current_epoch_attestations
                .as_ref()
                .map(|attestations| attestations.to_vec()),
            justification_bits: self.justification_bits.clone(),
            previous_justified_checkpoint: self.previous_justified_checkpoint,
            current_justified_checkpoint: self.current_justified_checkpoint,
            finalized_checkpoint: self.finalized_checkpoint,
        }
    }
}

/// Zero-pads a short vector up to its fixed length.
fn fixed_vector<T: Default + Clone, N: Unsigned>(
    field: &'static str,
    items: Option<Vec<T>>,
) -> Result<Option<FixedVector<T, N>>, BeaconStateError> {
    items
        .map(|items| {
            if items.len() > N::to_usize() {
                return Err(BeaconStateError::CollectionTooLong {
                    field,
                    len: items.len(),
                    limit: N::to_usize(),
                });
            }
            Ok(FixedVector::from(items))
        })
        .transpose()
}

fn variable_list<T, N: Unsigned>(
    field: &'static str,
    items: Option<Vec<T>>,
) -> Result<Option<VariableList<T, N>>, BeaconStateError> {
    items
        .map(|items| {
            let len = items.len();
            VariableList::new(items).map_err(|_| BeaconStateError::CollectionTooLong {
                field,
                len,
                limit: N::to_usize(),
            })
        })
        .transpose()
}

impl TryFrom<BeaconStateSnapshot> for BeaconState {
    type Error = BeaconStateError;

    fn try_from(snapshot: BeaconStateSnapshot) -> Result<Self, Self::Error> {
        Ok(BeaconState {
            genesis_time: snapshot.genesis_time,
            slot: snapshot.slot,
            fork: snapshot.fork,
            latest_block_header: snapshot.latest_block_header,
            block_roots: fixed_vector("block_roots", snapshot.block_roots)?,
            state_roots: fixed_vector("state_roots", snapshot.state_roots)?,
            historical_roots: variable_list("historical_roots", snapshot.historical_roots)?,
            eth1_data: snapshot.eth1_data,
            eth1_data_votes: variable_list("eth1_data_votes", snapshot.eth1_data_votes)?,
            eth1_deposit_index: snapshot.eth1_deposit_index,
            validators: variable_list("validators", snapshot.validators)?,
            balances: variable_list("balances", snapshot.balances)?,
            randao_mixes: fixed_vector("randao_mixes", snapshot.randao_mixes)?,
            slashings: fixed_vector("slashings", snapshot.slashings)?,
            previous_epoch_attestations: variable_list(
                "previous_epoch_attestations",
                snapshot.previous_epoch_attestations,
            )?,
            current_epoch_attestations: variable_list(
                "current_epoch_attestations",
                snapshot.current_epoch_attestations,
            )?,
            justification_bits: snapshot.justification_bits,
            previous_justified_checkpoint: snapshot.previous_justified_checkpoint,
            current_justified_checkpoint: snapshot.current_justified_checkpoint,
            finalized_checkpoint: snapshot.finalized_checkpoint,
        })
    }
}
