use safe_arith::ArithError;

#[derive(Debug, thiserror::Error)]
pub enum BeaconStateError {
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: u64, len: usize },
    #[error("{0} is not populated in this state")]
    AbsentCollection(&'static str),
    #[error("slot {slot} is outside the historical root window of state slot {state_slot}")]
    SlotOutOfRange { slot: u64, state_slot: u64 },
    #[error("arithmetic error: {0:?}")]
    Arith(ArithError),
    #[error("justification bits: {0:?}")]
    JustificationBits(ssz::BitfieldError),
    #[error("{field} holds {len} entries, more than its limit of {limit}")]
    CollectionTooLong {
        field: &'static str,
        len: usize,
        limit: usize,
    },
    #[error(transparent)]
    Committee(#[from] anyhow::Error),
}

impl From<ArithError> for BeaconStateError {
    fn from(err: ArithError) -> Self {
        BeaconStateError::Arith(err)
    }
}
