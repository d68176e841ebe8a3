#![warn(clippy::unwrap_used)]

pub mod attestation_data;
pub mod beacon_block_header;
pub mod checkpoint;
pub mod constants;
pub mod eth_1_data;
pub mod fork;
pub mod misc;
pub mod pending_attestation;
pub mod validator;
