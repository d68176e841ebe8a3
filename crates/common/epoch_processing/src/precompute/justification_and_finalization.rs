use safe_arith::SafeArith;
use tally_consensus_beacon::{
    beacon_state::{BeaconState, JustificationBits},
    errors::BeaconStateError,
};
use tally_consensus_misc::{
    checkpoint::Checkpoint,
    constants::{GENESIS_EPOCH, JUSTIFICATION_BITS_LENGTH},
};
use tracing::debug;

use super::validator_status::TotalBalances;
use crate::errors::EpochProcessingError;

/// Update justification bits and checkpoints from the precomputed target balances.
///
/// Skipped for the first two epochs, whose block roots are not all available yet.
pub fn process_justification_and_finalization_precompute(
    state: &mut BeaconState,
    totals: &TotalBalances,
) -> Result<(), EpochProcessingError> {
    let current_epoch = state.current_epoch();
    if current_epoch <= GENESIS_EPOCH.safe_add(1)? {
        return Ok(());
    }
    let previous_epoch = state.previous_epoch();

    let old_previous_justified_checkpoint =
        state.previous_justified_checkpoint().unwrap_or_default();
    let old_current_justified_checkpoint =
        state.current_justified_checkpoint().unwrap_or_default();
    let mut current_justified_checkpoint = old_current_justified_checkpoint;
    let mut finalized_checkpoint = state.finalized_checkpoint().unwrap_or_default();

    let mut justification_bits = state
        .justification_bits()
        .unwrap_or_else(JustificationBits::new);
    for i in (1..JUSTIFICATION_BITS_LENGTH).rev() {
        let bit = justification_bits
            .get(i - 1)
            .map_err(BeaconStateError::JustificationBits)?;
        justification_bits
            .set(i, bit)
            .map_err(BeaconStateError::JustificationBits)?;
    }
    justification_bits
        .set(0, false)
        .map_err(BeaconStateError::JustificationBits)?;

    let total_active_balance = totals.current_epoch.safe_mul(2)?;
    if totals.prev_epoch_target_attesters.safe_mul(3)? >= total_active_balance {
        current_justified_checkpoint = Checkpoint {
            epoch: previous_epoch,
            root: state.get_block_root(previous_epoch)?,
        };
        justification_bits
            .set(1, true)
            .map_err(BeaconStateError::JustificationBits)?;
    }
    if totals.current_epoch_target_attesters.safe_mul(3)? >= total_active_balance {
        current_justified_checkpoint = Checkpoint {
            epoch: current_epoch,
            root: state.get_block_root(current_epoch)?,
        };
        justification_bits
            .set(0, true)
            .map_err(BeaconStateError::JustificationBits)?;
    }

    let bits: Vec<bool> = justification_bits.iter().collect();

    // The 2nd/3rd/4th most recent epochs are justified, the 2nd using the 4th as source
    if bits[1..4].iter().all(|&b| b)
        && old_previous_justified_checkpoint.epoch.safe_add(3)? == current_epoch
    {
        finalized_checkpoint = old_previous_justified_checkpoint;
    }
    // The 2nd/3rd most recent epochs are justified, the 2nd using the 3rd as source
    if bits[1..3].iter().all(|&b| b)
        && old_previous_justified_checkpoint.epoch.safe_add(2)? == current_epoch
    {
        finalized_checkpoint = old_previous_justified_checkpoint;
    }
    // The 1st/2nd/3rd most recent epochs are justified, the 1st using the 3rd as source
    if bits[0..3].iter().all(|&b| b)
        && old_current_justified_checkpoint.epoch.safe_add(2)? == current_epoch
    {
        finalized_checkpoint = old_current_justified_checkpoint;
    }
    // The 1st/2nd most recent epochs are justified, the 1st using the 2nd as source
    if bits[0..2].iter().all(|&b| b)
        && old_current_justified_checkpoint.epoch.safe_add(1)? == current_epoch
    {
        finalized_checkpoint = old_current_justified_checkpoint;
    }

    debug!(
        current_epoch,
        justified_epoch = current_justified_checkpoint.epoch,
        finalized_epoch = finalized_checkpoint.epoch,
        "Processed justification and finalization"
    );

    state.set_previous_justified_checkpoint(old_current_justified_checkpoint);
    state.set_current_justified_checkpoint(current_justified_checkpoint);
    state.set_justification_bits(justification_bits);
    state.set_finalized_checkpoint(finalized_checkpoint);

    Ok(())
}
