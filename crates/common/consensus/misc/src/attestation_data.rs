use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::checkpoint::Checkpoint;

/// What a committee voted for at ``slot``.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct AttestationData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    /// Committee index within the slot.
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,

    /// Head vote, matched against the block root at ``slot``
    pub beacon_block_root: B256,

    /// Justification vote, the target matched against the block root at the epoch start
    pub source: Checkpoint,
    pub target: Checkpoint,
}
