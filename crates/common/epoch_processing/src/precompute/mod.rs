//! Epoch processing over precomputed participation records.
//!
//! The registry and pending attestations are scanned once into [`ValidatorStatus`] records and a
//! [`TotalBalances`] aggregate. Every later pass reads those instead of walking the state again.

pub mod attestations;
pub mod justification_and_finalization;
pub mod rewards_and_penalties;
pub mod slashings;
pub mod validator_status;

pub use attestations::{new, process_attestations, process_balances};
pub use justification_and_finalization::process_justification_and_finalization_precompute;
pub use rewards_and_penalties::{
    Delta, attestation_delta, attestation_deltas, base_reward, finality_delay,
    process_rewards_and_penalties_precompute, proposer_deltas,
};
pub use slashings::process_slashings_precompute;
pub use validator_status::{TotalBalances, ValidatorStatus};
