use std::{fs, path::Path, sync::Arc};

use tracing::debug;

use crate::{
    errors::NetworkSpecError,
    networks::{BeaconNetworkSpec, MAINNET, MINIMAL},
};

pub fn beacon_network_parser(network_string: &str) -> Result<Arc<BeaconNetworkSpec>, String> {
    match network_string {
        "mainnet" => Ok(MAINNET.clone()),
        "minimal" => Ok(MINIMAL.clone()),
        path => read_network_spec(path)
            .map(Arc::new)
            .map_err(|err| err.to_string()),
    }
}

pub fn read_network_spec(path: impl AsRef<Path>) -> Result<BeaconNetworkSpec, NetworkSpecError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| NetworkSpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let network_spec = BeaconNetworkSpec::from_yaml_str(&contents)?;
    debug!(path = %path.display(), network = ?network_spec.network, "Loaded network spec");
    Ok(network_spec)
}
