use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::error::{BalanceError, BalanceResult};

/// Parse a label file and return one class label per sample.
///
/// # Arguments
/// * `label_path` - Path to the label file, one number per line
///
/// # Returns
/// * `Ok(labels)` in file order
/// * `Err(BalanceError::Parse)` on the first malformed line
pub fn parse_label_file(label_path: &Path) -> BalanceResult<Vec<u32>> {
    let content = fs::read_to_string(label_path)?;
    let labels = parse_labels(&content, label_path)?;
    info!("Read {} labels from {:?}", labels.len(), label_path);
    Ok(labels)
}

/// Parse label text. Values are written as floats (`1.000000e+00`), so each
/// number is read as `f64` and truncated. Several numbers on one line are
/// all taken in order.
pub fn parse_labels(content: &str, source: &Path) -> BalanceResult<Vec<u32>> {
    let mut labels = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for token in line.split_whitespace() {
            let parse_error = |message: String| BalanceError::Parse {
                path: source.to_path_buf(),
                line: line_no + 1,
                message,
            };
            let value: f64 = token
                .parse()
                .map_err(|_| parse_error(format!("'{}' is not a number", token)))?;
            if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
                return Err(parse_error(format!("'{}' is not a valid class label", token)));
            }
            labels.push(value.trunc() as u32);
        }
    }

    debug!("Parsed {} labels", labels.len());
    Ok(labels)
}
