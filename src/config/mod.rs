pub mod prep_config;

pub use prep_config::{PrepConfig, Prepared, TestSource, TrainSource};
