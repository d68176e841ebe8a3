use safe_arith::{SafeArith, SafeArithIter};
use tally_consensus_beacon::beacon_state::BeaconState;
use tally_network_spec::networks::BeaconNetworkSpec;
use tracing::debug;

use super::validator_status::TotalBalances;
use crate::errors::EpochProcessingError;

/// Penalize slashed validators halfway through their withdrawability delay, in proportion to the
/// total amount slashed over the slashings window.
pub fn process_slashings_precompute(
    state: &mut BeaconState,
    totals: &TotalBalances,
    network_spec: &BeaconNetworkSpec,
) -> Result<(), EpochProcessingError> {
    let current_epoch = state.current_epoch();
    let total_balance = totals.current_epoch;

    let sum_slashings = match state.slashings() {
        Some(slashings) => slashings.iter().copied().safe_sum()?,
        None => 0,
    };
    let adjusted_total_slashing_balance = sum_slashings
        .safe_mul(network_spec.proportional_slashing_multiplier)?
        .min(total_balance);

    let target_withdrawable_epoch =
        current_epoch.safe_add(network_spec.epochs_per_slashings_vector.safe_div(2)?)?;
    let increment = network_spec.effective_balance_increment;

    let penalties = state
        .validators()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.slashed && validator.withdrawable_epoch == target_withdrawable_epoch
        })
        .map(|(index, validator)| {
            let penalty = validator
                .effective_balance
                .safe_div(increment)?
                .safe_mul(adjusted_total_slashing_balance)?
                .safe_div(total_balance)?
                .safe_mul(increment)?;
            Ok((index as u64, penalty))
        })
        .collect::<Result<Vec<_>, EpochProcessingError>>()?;

    for (index, penalty) in &penalties {
        state.decrease_balance(*index, *penalty)?;
    }

    debug!(
        current_epoch,
        sum_slashings,
        penalized = penalties.len(),
        "Processed slashings"
    );

    Ok(())
}
