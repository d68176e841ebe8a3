#![warn(clippy::unwrap_used)]

pub mod epoch;
pub mod errors;
pub mod precompute;

#[cfg(test)]
pub(crate) mod test_utils;
