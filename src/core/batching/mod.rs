mod assembler;
mod sampler;

pub use assembler::{Batch, BatchAssembler};
pub use sampler::{validate_batch_size, BalancedBatchSampler, EpochOrder};
