use safe_arith::{ArithError, SafeArith};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitList, typenum::U2048};
use tree_hash_derive::TreeHash;

use crate::attestation_data::AttestationData;

/// An attestation that has been included in a block but not yet tallied at an epoch boundary.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct PendingAttestation {
    /// One bit per member of the committee at ``(data.slot, data.index)``.
    pub aggregation_bits: BitList<U2048>,
    pub data: AttestationData,
    /// Slots between the attested slot and the block that included it.
    #[serde(with = "serde_utils::quoted_u64")]
    pub inclusion_delay: u64,
    /// Proposer of the including block, credited with the inclusion reward.
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
}

impl PendingAttestation {
    /// Slot of the block that included this attestation.
    pub fn inclusion_slot(&self) -> Result<u64, ArithError> {
        self.data.slot.safe_add(self.inclusion_delay)
    }
}
