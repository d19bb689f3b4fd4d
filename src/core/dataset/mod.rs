mod label;
mod loader;
mod metadata;
mod sample;

pub use label::{parse_label_file, parse_labels};
pub use loader::load_sample_pool;
pub use metadata::{parse_metadata, read_image_column, IMAGE_COLUMN};
pub use sample::{ClassPools, Sample, SamplePool};
