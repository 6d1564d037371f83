pub mod params;
pub mod pixel;

pub use params::NormalizeParams;
pub use pixel::{normalize, FeatureVector};
