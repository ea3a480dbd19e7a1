//! Token pair and secret wrappers.

pub mod pair;
pub mod secret;
