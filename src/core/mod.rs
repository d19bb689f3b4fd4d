pub mod analysis;
pub mod batching;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod image;
pub mod manifest;
pub mod training;

pub use analysis::*;
pub use batching::*;
pub use dataset::*;
pub use error::{BalanceError, BalanceResult};
pub use manifest::{SplitManifest, MANIFEST_FILE};
