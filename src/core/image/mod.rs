mod normalize;
mod source;

pub use normalize::{mean_and_std, standardize};
pub use source::{FileImageSource, ImageSource};
