use safe_arith::ArithError;
use tally_consensus_beacon::errors::BeaconStateError;
use tally_network_spec::errors::NetworkSpecError;

#[derive(Debug, thiserror::Error)]
pub enum EpochProcessingError {
    #[error(
        "precomputed statuses ({statuses}) do not line up with {validators} validators and {balances} balances"
    )]
    LengthMismatch {
        statuses: usize,
        validators: usize,
        balances: usize,
    },
    #[error("proposer index {proposer_index} is outside the registry of {validators} validators")]
    ProposerIndexOutOfRange {
        proposer_index: u64,
        validators: usize,
    },
    #[error("attestation for slot {slot} has an inclusion delay of zero")]
    ZeroInclusionDelay { slot: u64 },
    #[error(transparent)]
    BeaconState(#[from] BeaconStateError),
    #[error("arithmetic error: {0:?}")]
    Arith(ArithError),
    #[error(transparent)]
    NetworkSpec(#[from] NetworkSpecError),
}

impl From<ArithError> for EpochProcessingError {
    fn from(err: ArithError) -> Self {
        EpochProcessingError::Arith(err)
    }
}
