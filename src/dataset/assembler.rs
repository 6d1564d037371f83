use std::ops::Range;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::GenericImageView;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::dataset::class::ImageClass;
use crate::dataset::naming::{test_image_path, train_image_path};
use crate::dataset::sets::{TestSet, TrainSet};
use crate::error::{PrepError, PrepResult};
use crate::preprocess::pixel::normalize_unchecked;
use crate::preprocess::{FeatureVector, NormalizeParams};
use crate::source::{FsImageSource, ImageSource};

/// Loads numbered photographs through an [`ImageSource`] and lays the
/// normalized vectors out in index order.
///
/// Every load is all-or-nothing: the first index whose file yields no image
/// data aborts the call with [`PrepError::MissingData`] and nothing is
/// returned. Params are validated once, in [`DatasetAssembler::new`].
///
/// With [`with_parallel`](Self::with_parallel) indices are decoded on the
/// rayon pool. Output order and the reported failure (lowest index) are the
/// same as in the sequential path; once an index fails, higher indices that
/// have not started yet are skipped.
#[derive(Debug, Clone)]
pub struct DatasetAssembler<S> {
    source: S,
    params: NormalizeParams,
    parallel: bool,
}

impl<S: ImageSource> DatasetAssembler<S> {
    pub fn new(source: S, params: NormalizeParams) -> PrepResult<Self> {
        params.validate()?;
        Ok(DatasetAssembler { source, params, parallel: false })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &NormalizeParams {
        &self.params
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads `<prefix>0.jpg` … `<prefix>{count-1}.jpg`; position `i` holds image `i`.
    pub fn load_test_set(&self, path_prefix: &str, count: usize) -> PrepResult<TestSet> {
        let images = self.collect_indexed(0..count, |i| {
            self.load_one(test_image_path(path_prefix, i), i)
        })?;

        info!("loaded {} test images from '{}'", images.len(), path_prefix);
        Ok(images.into_iter().collect())
    }

    /// Loads the cat/dog pairs with indices `start_index .. start_index + count`.
    ///
    /// Pair `i` lands at positions `2 * (i - start_index)` (cat, label 0) and
    /// `2 * (i - start_index) + 1` (dog, label 1), so both returned sequences
    /// have length `2 * count`.
    pub fn load_train_set(
        &self,
        path_prefix: &str,
        count: usize,
        start_index: usize,
    ) -> PrepResult<TrainSet> {
        let end = start_index.checked_add(count).ok_or_else(|| {
            PrepError::configuration(format!(
                "start_index {} + count {} overflows",
                start_index, count
            ))
        })?;

        let pairs = self.collect_indexed(start_index..end, |i| self.load_pair(path_prefix, i))?;
        let set: TrainSet = pairs.into_iter().flatten().collect();

        info!(
            "loaded {} training pairs ({}..{}) from '{}'",
            count, start_index, end, path_prefix
        );
        Ok(set)
    }

    /// Both classes for one index, in [`ImageClass::ALL`] order.
    fn load_pair(&self, path_prefix: &str, index: usize) -> PrepResult<Vec<(FeatureVector, ImageClass)>> {
        let mut pair = Vec::with_capacity(ImageClass::COUNT);
        for class in ImageClass::ALL {
            let image = self.load_one(train_image_path(path_prefix, class, index), index)?;
            pair.push((image, class));
        }
        Ok(pair)
    }

    fn load_one(&self, path: String, index: usize) -> PrepResult<FeatureVector> {
        let path = PathBuf::from(path);
        match self.source.decode(&path) {
            Some(image) => {
                let (width, height) = image.dimensions();
                debug!("{}: {}x{}", path.display(), width, height);
                Ok(normalize_unchecked(&image, &self.params))
            }
            None => {
                warn!("no image data at {} (index {})", path.display(), index);
                Err(PrepError::MissingData { index, path })
            }
        }
    }

    fn collect_indexed<T, F>(&self, indices: Range<usize>, load: F) -> PrepResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> PrepResult<T> + Sync,
    {
        if self.parallel {
            // Lowest index seen failing; anything above it is skipped (`None`).
            // Every index below it is still loaded, so the in-order scan meets
            // that failure before any skipped slot.
            let first_failure = AtomicUsize::new(usize::MAX);
            let results: Vec<Option<PrepResult<T>>> = indices
                .into_par_iter()
                .map(|i| {
                    if i > first_failure.load(Ordering::Relaxed) {
                        return None;
                    }
                    let result = load(i);
                    if result.is_err() {
                        first_failure.fetch_min(i, Ordering::Relaxed);
                    }
                    Some(result)
                })
                .collect();
            results
                .into_iter()
                .map_while(|slot| slot)
                .collect()
        } else {
            indices.map(load).collect()
        }
    }
}

// ---------------------------------------------------------------------------
// One-shot helpers reading from disk
// ---------------------------------------------------------------------------

/// Loads an unlabeled test set from `<path_prefix><i>.jpg` files.
pub fn load_test_set(
    path_prefix: &str,
    count: usize,
    params: &NormalizeParams,
) -> PrepResult<TestSet> {
    DatasetAssembler::new(FsImageSource, *params)?.load_test_set(path_prefix, count)
}

/// Loads an interleaved cat/dog training set from
/// `<path_prefix>cat.<i>.jpg` / `<path_prefix>dog.<i>.jpg` files.
pub fn load_train_set(
    path_prefix: &str,
    count: usize,
    params: &NormalizeParams,
    start_index: usize,
) -> PrepResult<TrainSet> {
    DatasetAssembler::new(FsImageSource, *params)?.load_train_set(path_prefix, count, start_index)
}
