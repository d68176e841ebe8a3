#![warn(clippy::unwrap_used)]

pub mod accessors;
pub mod beacon_state;
pub mod errors;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_utils;
