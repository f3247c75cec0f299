//! Shared pieces of the validator CLI binary.

pub mod logging;
