use std::path::Path;
use tracing::info;

use crate::core::dataset::{parse_labels, Sample};
use crate::core::error::{BalanceError, BalanceResult};

/// Mean absolute error between true labels and predicted scores
pub fn mean_absolute_error(truth: &[f64], predictions: &[f64]) -> BalanceResult<f64> {
    if truth.len() != predictions.len() {
        return Err(BalanceError::Configuration(format!(
            "{} labels but {} predictions",
            truth.len(),
            predictions.len()
        )));
    }
    if truth.is_empty() {
        return Err(BalanceError::Configuration(
            "cannot compute mean absolute error of empty inputs".to_string(),
        ));
    }

    let total: f64 = truth
        .iter()
        .zip(predictions)
        .map(|(t, p)| (t - p).abs())
        .sum();
    Ok(total / truth.len() as f64)
}

/// MAE of predictions against the labels of a validation set
pub fn validation_mae(validation: &[Sample], predictions: &[f64]) -> BalanceResult<f64> {
    let truth: Vec<f64> = validation.iter().map(|s| s.label as f64).collect();
    let mae = mean_absolute_error(&truth, predictions)?;
    info!("Final model mean absolute error val_loss {:.6}", mae);
    Ok(mae)
}

/// Read one predicted score per whitespace-separated token
pub fn parse_predictions(content: &str, source: &Path) -> BalanceResult<Vec<f64>> {
    let mut values = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| BalanceError::Parse {
                path: source.to_path_buf(),
                line: line_no + 1,
                message: format!("'{}' is not a number", token),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// MAE between a label file and a predictions file
pub fn evaluate_files(labels_path: &Path, predictions_path: &Path) -> BalanceResult<f64> {
    let labels = parse_labels(&std::fs::read_to_string(labels_path)?, labels_path)?;
    let predictions = parse_predictions(&std::fs::read_to_string(predictions_path)?, predictions_path)?;
    let truth: Vec<f64> = labels.into_iter().map(f64::from).collect();
    let mae = mean_absolute_error(&truth, &predictions)?;
    info!(
        "Mean absolute error over {} samples: {:.6}",
        truth.len(),
        mae
    );
    Ok(mae)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mae_identical_is_zero() {
        let v = vec![0.0, 1.0, 1.0, 0.0];
        assert_eq!(mean_absolute_error(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn test_mae_value() {
        let mae = mean_absolute_error(&[0.0, 1.0], &[0.25, 0.5]).unwrap();
        assert!((mae - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_mae_rejects_bad_inputs() {
        assert!(mean_absolute_error(&[0.0], &[0.0, 1.0]).is_err());
        assert!(mean_absolute_error(&[], &[]).is_err());
    }

    #[test]
    fn test_validation_mae_uses_labels() {
        let val = vec![Sample::new("a", 1), Sample::new("b", 0)];
        let mae = validation_mae(&val, &[0.9, 0.1]).unwrap();
        assert!((mae - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_parse_predictions() {
        let values = parse_predictions("0.1\n0.9 0.5\n", &PathBuf::from("p.txt")).unwrap();
        assert_eq!(values, vec![0.1, 0.9, 0.5]);
        assert!(parse_predictions("x\n", &PathBuf::from("p.txt")).is_err());
    }
}
