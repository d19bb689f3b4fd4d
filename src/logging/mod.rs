//! Logging for the particle-balance tools
//!
//! This module provides:
//! - Bracketed event formatting with the active span chain
//! - Dual logging (file + stderr)
//! - Timestamped log files

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::{setup_logging, DEFAULT_FILTER};
