use std::path::Path;
use tracing::{info, warn};

use super::{parse_label_file, read_image_column, SamplePool};
use crate::core::error::BalanceResult;

/// Build the sample pool from a metadata table and its label file.
///
/// The i-th label belongs to the i-th image reference.
pub fn load_sample_pool(metadata_path: &Path, labels_path: &Path) -> BalanceResult<SamplePool> {
    info!("Loading metadata from: {:?}", metadata_path);
    let images = read_image_column(metadata_path)?;

    info!("Loading labels from: {:?}", labels_path);
    let labels = parse_label_file(labels_path)?;

    let pool = SamplePool::from_parts(images, labels)?;
    if pool.is_empty() {
        warn!("Metadata {:?} contains no samples", metadata_path);
    }

    info!(
        "Loaded {} samples ({} label 0, {} label 1)",
        pool.len(),
        pool.count_label(0),
        pool.count_label(1)
    );
    Ok(pool)
}
