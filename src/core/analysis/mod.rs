mod class_stats;
mod oversampler;
mod splitter;

pub use class_stats::ClassStats;
pub use oversampler::{cycle_to_length, equalize, equalize_pools, EqualizedIndices};
pub use splitter::{
    split, split_uniform, split_with_strategy, target_per_class, SplitStrategy, ValidationSplit,
};
