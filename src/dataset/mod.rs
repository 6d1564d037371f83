pub mod assembler;
pub mod class;
pub mod naming;
pub mod sets;

pub use assembler::{load_test_set, load_train_set, DatasetAssembler};
pub use class::{ImageClass, Label};
pub use sets::{TestSet, TrainSet};
