//! Metadata table reader.
//!
//! Accepts STAR-style metadata (`data_` block, `loop_`, `_column` headers)
//! and takes the `_image` column, or a plain list with one image reference
//! per line.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::error::{BalanceError, BalanceResult};

/// Column holding the image reference in STAR metadata
pub const IMAGE_COLUMN: &str = "_image";

/// Read image references from a metadata file
pub fn read_image_column(path: &Path) -> BalanceResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let images = parse_metadata(&content, path)?;
    info!("Read {} image references from {:?}", images.len(), path);
    Ok(images)
}

pub fn parse_metadata(content: &str, source: &Path) -> BalanceResult<Vec<String>> {
    let is_star = content
        .lines()
        .any(|line| line.trim_start().starts_with("data_"));

    if is_star {
        parse_star(content, source)
    } else {
        Ok(parse_plain_list(content))
    }
}

fn parse_plain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

fn parse_star(content: &str, source: &Path) -> BalanceResult<Vec<String>> {
    let mut columns: Vec<String> = Vec::new();
    let mut in_loop = false;
    let mut images = Vec::new();

    let parse_error = |line: usize, message: String| BalanceError::Parse {
        path: source.to_path_buf(),
        line,
        message,
    };

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("data_") {
            // Only the first block is read
            if !images.is_empty() || !columns.is_empty() {
                break;
            }
            continue;
        }

        if line == "loop_" {
            in_loop = true;
            columns.clear();
            continue;
        }

        if line.starts_with('_') {
            let mut parts = line.split_whitespace();
            let name = parts.next().unwrap_or_default().to_string();
            if in_loop {
                columns.push(name);
            } else if name == IMAGE_COLUMN {
                // Single-row block written as `_label value` pairs
                let value = parts.next().ok_or_else(|| {
                    parse_error(line_no + 1, format!("{} has no value", IMAGE_COLUMN))
                })?;
                images.push(value.to_string());
            }
            continue;
        }

        if !in_loop {
            continue;
        }

        let column = columns
            .iter()
            .position(|c| c == IMAGE_COLUMN)
            .ok_or_else(|| parse_error(line_no + 1, format!("no {} column", IMAGE_COLUMN)))?;
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != columns.len() {
            return Err(parse_error(
                line_no + 1,
                format!("expected {} values, found {}", columns.len(), values.len()),
            ));
        }
        images.push(values[column].to_string());
    }

    debug!("STAR metadata columns: {:?}", columns);
    Ok(images)
}
