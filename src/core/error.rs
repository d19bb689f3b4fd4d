use std::path::PathBuf;

/// Result type for splitting, sampling and loading operations
pub type BalanceResult<T> = Result<T, BalanceError>;

/// Error types for the data preparation pipeline
#[derive(Debug)]
pub enum BalanceError {
    /// A class has no samples to withdraw validation examples from
    InsufficientData { label: u32 },
    /// A class index list is empty at equalization time
    EmptyClass { label: u32 },
    /// Invalid fraction, batch size, dimension or mismatched inputs
    Configuration(String),
    /// A sample carries a label outside the binary {0, 1} set
    UnexpectedLabel { index: usize, label: u32 },
    /// A batch index past the end of the epoch
    BatchOutOfRange { index: usize, len: usize },
    /// A metadata or label file line could not be parsed
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    Image(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::InsufficientData { label } => {
                write!(f, "Insufficient data: class {} has no samples", label)
            }
            BalanceError::EmptyClass { label } => {
                write!(f, "Empty class: index list for class {} is empty", label)
            }
            BalanceError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            BalanceError::UnexpectedLabel { index, label } => write!(
                f,
                "Unexpected label {} for sample {} (expected 0 or 1)",
                label, index
            ),
            BalanceError::BatchOutOfRange { index, len } => {
                write!(f, "Batch {} out of range (epoch has {} batches)", index, len)
            }
            BalanceError::Parse {
                path,
                line,
                message,
            } => write!(f, "Parse error in {:?} line {}: {}", path, line, message),
            BalanceError::Image(msg) => write!(f, "Image error: {}", msg),
            BalanceError::Io(e) => write!(f, "I/O error: {}", e),
            BalanceError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for BalanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BalanceError::Io(e) => Some(e),
            BalanceError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BalanceError {
    fn from(error: std::io::Error) -> Self {
        BalanceError::Io(error)
    }
}

impl From<serde_json::Error> for BalanceError {
    fn from(error: serde_json::Error) -> Self {
        BalanceError::Json(error)
    }
}

impl From<::image::ImageError> for BalanceError {
    fn from(error: ::image::ImageError) -> Self {
        BalanceError::Image(error.to_string())
    }
}

/// Check that a fraction lies in (0, 1]
pub fn validate_fraction(fraction: f64) -> BalanceResult<()> {
    if fraction.is_nan() || fraction <= 0.0 || fraction > 1.0 {
        return Err(BalanceError::Configuration(format!(
            "fraction must be in (0, 1], got {}",
            fraction
        )));
    }
    Ok(())
}
