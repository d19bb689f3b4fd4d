//! Class-balanced validation splitting and oversampled batch feeding for
//! binary particle-image classifiers.

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::RunConfig;
pub use crate::core::{BalanceError, BalanceResult};
