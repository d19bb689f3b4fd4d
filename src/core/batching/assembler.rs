use tracing::debug;

use crate::core::dataset::Sample;
use crate::core::error::{BalanceError, BalanceResult};
use crate::core::image::{standardize, ImageSource};

/// Stacked pixel data and labels for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// `len() * dim * dim` standardized values, one image after another
    pub pixels: Vec<f32>,
    pub labels: Vec<u32>,
    pub dim: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pixels of the i-th image
    pub fn image(&self, i: usize) -> Option<&[f32]> {
        let size = self.dim * self.dim;
        self.pixels.get(i * size..(i + 1) * size)
    }
}

/// Turns sample ids into standardized pixel batches
pub struct BatchAssembler<S: ImageSource> {
    source: S,
    samples: Vec<Sample>,
}

impl<S: ImageSource> BatchAssembler<S> {
    /// `samples` is the training collection the sampler's ids index into
    pub fn new(source: S, samples: Vec<Sample>) -> Self {
        Self { source, samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn dim(&self) -> usize {
        self.source.dim()
    }

    /// Load, standardize and stack the samples at `ids`
    pub fn assemble(&self, ids: &[usize]) -> BalanceResult<Batch> {
        let mut selected = Vec::with_capacity(ids.len());
        for &id in ids {
            let sample = self.samples.get(id).ok_or_else(|| {
                BalanceError::Configuration(format!(
                    "sample id {} outside training collection of {}",
                    id,
                    self.samples.len()
                ))
            })?;
            selected.push(sample);
        }
        self.stack(selected.into_iter())
    }

    /// Load, standardize and stack arbitrary samples, e.g. the validation set
    pub fn assemble_samples(&self, samples: &[Sample]) -> BalanceResult<Batch> {
        self.stack(samples.iter())
    }

    fn stack<'a>(&self, samples: impl ExactSizeIterator<Item = &'a Sample>) -> BalanceResult<Batch> {
        let dim = self.source.dim();
        let size = dim * dim;
        let mut pixels = Vec::with_capacity(samples.len() * size);
        let mut labels = Vec::with_capacity(samples.len());

        for sample in samples {
            let mut image = self.source.load(&sample.image)?;
            if image.len() != size {
                return Err(BalanceError::Image(format!(
                    "{} has {} pixels, expected {}",
                    sample.image,
                    image.len(),
                    size
                )));
            }
            standardize(&mut image);
            pixels.extend_from_slice(&image);
            labels.push(sample.label);
        }

        debug!("Assembled batch of {} images", labels.len());
        Ok(Batch {
            pixels,
            labels,
            dim,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same 2x2 ramp for every reference except "broken"
    struct RampSource;

    impl ImageSource for RampSource {
        fn dim(&self) -> usize {
            2
        }

        fn load(&self, reference: &str) -> BalanceResult<Vec<f32>> {
            if reference == "broken" {
                return Err(BalanceError::Image("unreadable".to_string()));
            }
            Ok(vec![0.0, 1.0, 2.0, 3.0])
        }
    }

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new("a", 0),
            Sample::new("b", 1),
            Sample::new("c", 0),
        ]
    }

    #[test]
    fn test_assemble_stacks_in_id_order() {
        let assembler = BatchAssembler::new(RampSource, samples());
        let batch = assembler.assemble(&[2, 1]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.labels, vec![0, 1]);
        assert_eq!(batch.pixels.len(), 8);

        let first = batch.image(0).unwrap();
        let mean: f32 = first.iter().sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-6);
    }

    #[test]
    fn test_assemble_unknown_id_fails() {
        let assembler = BatchAssembler::new(RampSource, samples());
        assert!(matches!(
            assembler.assemble(&[7]),
            Err(BalanceError::Configuration(_))
        ));
    }

    #[test]
    fn test_assemble_propagates_load_errors() {
        let assembler = BatchAssembler::new(RampSource, samples());
        let result = assembler.assemble_samples(&[Sample::new("broken", 1)]);
        assert!(matches!(result, Err(BalanceError::Image(_))));
    }
}
