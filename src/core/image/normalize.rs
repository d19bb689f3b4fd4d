/// Mean and population standard deviation of a pixel buffer
pub fn mean_and_std(pixels: &[f32]) -> (f32, f32) {
    if pixels.is_empty() {
        return (0.0, 0.0);
    }
    let n = pixels.len() as f64;
    let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / n;
    let variance = pixels
        .iter()
        .map(|&p| {
            let d = p as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean as f32, variance.sqrt() as f32)
}

/// Standardize in place to zero mean and unit variance.
///
/// A flat image (std == 0) is only centred so it never turns into NaN.
pub fn standardize(pixels: &mut [f32]) {
    let (mean, std) = mean_and_std(pixels);
    if std > f32::EPSILON {
        for p in pixels.iter_mut() {
            *p = (*p - mean) / std;
        }
    } else {
        for p in pixels.iter_mut() {
            *p -= mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_zero_mean_unit_std() {
        let mut pixels = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        standardize(&mut pixels);
        let (mean, std) = mean_and_std(&pixels);
        assert!(mean.abs() < 1e-6);
        assert!((std - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_standardize_flat_image() {
        let mut pixels = vec![0.5; 16];
        standardize(&mut pixels);
        assert!(pixels.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_mean_and_std_empty() {
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }
}
