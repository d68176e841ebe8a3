#![warn(clippy::unwrap_used)]

pub mod cli;
pub mod errors;
pub mod networks;
