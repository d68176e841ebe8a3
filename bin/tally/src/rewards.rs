use std::{fs, path::Path};

use anyhow::Context;
use tally_consensus_beacon::{beacon_state::BeaconState, snapshot::BeaconStateSnapshot};
use tally_epoch_processing::epoch::{EpochSummary, process_epoch_precompute};
use tracing::info;

use crate::cli::rewards::RewardsConfig;

pub fn read_state(path: &Path) -> anyhow::Result<BeaconState> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read state snapshot {}", path.display()))?;
    let snapshot: BeaconStateSnapshot = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse state snapshot {}", path.display()))?;
    BeaconState::try_from(snapshot).context("invalid state snapshot")
}

/// Serialize `state` as a YAML snapshot to `output`, or to stdout when no path is given.
pub fn write_state(state: &BeaconState, output: Option<&Path>) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(&state.snapshot())?;
    match output {
        Some(path) => fs::write(path, yaml)
            .with_context(|| format!("failed to write state snapshot {}", path.display())),
        None => {
            print!("{yaml}");
            Ok(())
        }
    }
}

/// Load the pre-state, run one epoch transition and write the post-state.
pub fn run_rewards(config: &RewardsConfig) -> anyhow::Result<EpochSummary> {
    let mut state = read_state(&config.state)?;
    info!(
        slot = state.slot(),
        network = ?config.network.network,
        "Loaded state snapshot"
    );

    let summary =
        process_epoch_precompute(&mut state, &config.network).context("epoch processing failed")?;
    write_state(&state, config.output.as_deref())?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use tally_consensus_misc::{
        checkpoint::Checkpoint,
        constants::{FAR_FUTURE_EPOCH, MAX_EFFECTIVE_BALANCE, SLOTS_PER_EPOCH},
        validator::Validator,
    };
    use tally_network_spec::networks::MAINNET;

    use super::*;
    use crate::cli::verbosity::Verbosity;

    fn pre_state_snapshot(validators: usize) -> BeaconStateSnapshot {
        let validator = Validator {
            effective_balance: MAX_EFFECTIVE_BALANCE,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
            ..Default::default()
        };
        BeaconStateSnapshot {
            slot: 5 * SLOTS_PER_EPOCH - 1,
            block_roots: Some(vec![]),
            validators: Some(vec![validator; validators]),
            balances: Some(vec![MAX_EFFECTIVE_BALANCE; validators]),
            previous_epoch_attestations: Some(vec![]),
            current_epoch_attestations: Some(vec![]),
            previous_justified_checkpoint: Some(Checkpoint::default()),
            current_justified_checkpoint: Some(Checkpoint::default()),
            finalized_checkpoint: Some(Checkpoint::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_rewards_writes_post_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state_path = dir.path().join("pre.yaml");
        let output_path = dir.path().join("post.yaml");
        fs::write(
            &state_path,
            serde_yaml::to_string(&pre_state_snapshot(4)).expect("serializes"),
        )
        .expect("write");

        let config = RewardsConfig {
            verbosity: Verbosity::Info,
            network: MAINNET.clone(),
            state: state_path,
            output: Some(output_path.clone()),
        };
        let summary = run_rewards(&config).expect("processed");

        assert_eq!(summary.epoch, 4);
        assert_eq!(summary.validators, 4);
        assert_eq!(summary.total_rewards, 0);

        let post = read_state(&output_path).expect("post state");
        for balance in post.balances().expect("balances").iter() {
            assert!(*balance < MAX_EFFECTIVE_BALANCE);
        }
    }

    #[test]
    fn test_missing_state_names_the_path() {
        let err = read_state(Path::new("/nonexistent/tally/pre.yaml")).expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/tally/pre.yaml"));
    }
}
