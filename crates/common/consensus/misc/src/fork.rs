use alloy_primitives::aliases::B32;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Fork versions around the most recent fork ``epoch``. Both versions are kept in state copies.
#[derive(
    Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Encode, Decode, TreeHash, Eq, Default,
)]
pub struct Fork {
    pub previous_version: B32,
    pub current_version: B32,
    /// First epoch of ``current_version``.
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
}
