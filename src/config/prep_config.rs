use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetAssembler, TestSet, TrainSet};
use crate::error::PrepResult;
use crate::preprocess::NormalizeParams;
use crate::source::ImageSource;

/// Where the paired `cat.<i>.jpg` / `dog.<i>.jpg` training files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSource {
    pub path_prefix: String,
    /// Number of index pairs; the set holds twice as many images.
    pub count: usize,
    #[serde(default)]
    pub start_index: usize,
}

/// Where the numbered `<i>.jpg` test files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSource {
    pub path_prefix: String,
    pub count: usize,
}

/// A complete, JSON-serializable description of one preparation run.
///
/// Example:
/// ```json
/// {
///   "normalize": { "width": 32, "height": 32, "x_padding": 2, "y_padding": 2,
///                  "scale_min": -1.0, "scale_max": 1.0 },
///   "train": { "path_prefix": "data/train/", "count": 1000 },
///   "test":  { "path_prefix": "data/test1/", "count": 200 },
///   "val_split_pct": 10,
///   "shuffle_seed": 42
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    pub normalize: NormalizeParams,
    #[serde(default)]
    pub train: Option<TrainSource>,
    #[serde(default)]
    pub test: Option<TestSource>,
    /// Percentage of the training set moved to validation (capped at 50).
    #[serde(default)]
    pub val_split_pct: u8,
    /// When set, the training set is shuffled with this seed before the split.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    #[serde(default)]
    pub parallel: bool,
}

/// Datasets produced by [`PrepConfig::prepare`]. Absent sections stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prepared {
    pub train: Option<TrainSet>,
    pub validation: Option<TrainSet>,
    pub test: Option<TestSet>,
}

impl PrepConfig {
    pub fn new(normalize: NormalizeParams) -> Self {
        PrepConfig {
            normalize,
            train: None,
            test: None,
            val_split_pct: 0,
            shuffle_seed: None,
            parallel: false,
        }
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> PrepResult<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `PrepConfig` from a JSON file and validates its params.
    pub fn load_json(path: impl AsRef<Path>) -> PrepResult<PrepConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: PrepConfig = serde_json::from_reader(reader)?;
        config.normalize.validate()?;
        Ok(config)
    }

    /// Loads every configured set through `source`.
    ///
    /// Params are checked before the first decode. Any missing image fails the
    /// whole run.
    pub fn prepare<S: ImageSource>(&self, source: S) -> PrepResult<Prepared> {
        let assembler = DatasetAssembler::new(source, self.normalize)?.with_parallel(self.parallel);
        let mut prepared = Prepared::default();

        if let Some(train) = &self.train {
            let mut set = assembler.load_train_set(&train.path_prefix, train.count, train.start_index)?;
            if let Some(seed) = self.shuffle_seed {
                set.shuffle(&mut StdRng::seed_from_u64(seed));
            }
            if self.val_split_pct > 0 {
                let (train_set, validation) = set.split_validation(self.val_split_pct);
                info!(
                    "split {} training / {} validation samples",
                    train_set.len(),
                    validation.len()
                );
                prepared.train = Some(train_set);
                prepared.validation = Some(validation);
            } else {
                prepared.train = Some(set);
            }
        }

        if let Some(test) = &self.test {
            prepared.test = Some(assembler.load_test_set(&test.path_prefix, test.count)?);
        }

        Ok(prepared)
    }
}
