pub mod error;
pub mod preprocess;
pub mod source;
pub mod dataset;
pub mod config;

// Convenience re-exports
pub use error::{PrepError, PrepResult};
pub use preprocess::{normalize, FeatureVector, NormalizeParams};
pub use source::{FsImageSource, ImageSource, MemoryImageSource};
pub use dataset::{load_test_set, load_train_set, DatasetAssembler, ImageClass, Label, TestSet, TrainSet};
pub use config::{PrepConfig, Prepared};
