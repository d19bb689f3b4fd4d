use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::{BalanceError, BalanceResult};

/// Provides square grayscale pixel data for an image reference
pub trait ImageSource {
    /// Side length of every image this source returns
    fn dim(&self) -> usize;

    /// Row-major `dim * dim` grayscale values for `reference`
    fn load(&self, reference: &str) -> BalanceResult<Vec<f32>>;
}

/// Reads images from disk through the `image` crate.
/// Relative references are resolved against `root`.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    root: Option<PathBuf>,
    dim: usize,
}

impl FileImageSource {
    pub fn new(root: Option<PathBuf>, dim: usize) -> Self {
        Self { root, dim }
    }

    pub fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageSource for FileImageSource {
    fn dim(&self) -> usize {
        self.dim
    }

    fn load(&self, reference: &str) -> BalanceResult<Vec<f32>> {
        let path = self.resolve(reference);
        debug!("Loading image {:?}", path);

        let img = ::image::open(&path)?;
        let (width, height) = (img.width() as usize, img.height() as usize);
        if width != self.dim || height != self.dim {
            return Err(BalanceError::Image(format!(
                "{:?} is {}x{}, expected {}x{}",
                path, width, height, self.dim, self.dim
            )));
        }

        Ok(img.to_luma32f().into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_against_root() {
        let source = FileImageSource::new(Some(PathBuf::from("/data/run1")), 64);
        assert_eq!(
            source.resolve("particles/p1.png"),
            PathBuf::from("/data/run1/particles/p1.png")
        );
    }

    #[test]
    fn test_resolve_without_root() {
        let source = FileImageSource::new(None, 64);
        assert_eq!(source.resolve("p1.png"), PathBuf::from("p1.png"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let source = FileImageSource::new(None, 8);
        assert!(source.load("/definitely/not/here.png").is_err());
    }
}
