use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::class::{ImageClass, Label};
use crate::preprocess::FeatureVector;

/// Upper bound on the validation share, in percent.
pub const MAX_VAL_SPLIT_PCT: u8 = 50;

// ---------------------------------------------------------------------------
// Test set
// ---------------------------------------------------------------------------

/// Unlabeled feature vectors; position `i` holds the image with index `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSet {
    images: Vec<FeatureVector>,
}

impl TestSet {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeatureVector> {
        self.images.get(index)
    }

    pub fn images(&self) -> &[FeatureVector] {
        &self.images
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureVector> {
        self.images.iter()
    }

    pub fn into_images(self) -> Vec<FeatureVector> {
        self.images
    }
}

impl FromIterator<FeatureVector> for TestSet {
    fn from_iter<I: IntoIterator<Item = FeatureVector>>(iter: I) -> Self {
        TestSet { images: iter.into_iter().collect() }
    }
}

// ---------------------------------------------------------------------------
// Training set
// ---------------------------------------------------------------------------

/// Feature vectors paired by position with their class labels.
///
/// `images.len() == labels.len()` always holds: the fields are private and
/// every constructor builds both sides from the same sequence of pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainSet {
    images: Vec<FeatureVector>,
    labels: Vec<Label>,
}

impl TrainSet {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[FeatureVector] {
        &self.images
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<(&FeatureVector, Label)> {
        Some((self.images.get(index)?, self.labels[index]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureVector, Label)> + '_ {
        self.images.iter().zip(self.labels.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<FeatureVector>, Vec<Label>) {
        (self.images, self.labels)
    }

    /// Labels as one-hot vectors of length [`ImageClass::COUNT`], the target
    /// format a softmax/cross-entropy training loop expects.
    pub fn one_hot_labels(&self) -> Vec<Vec<f64>> {
        self.labels
            .iter()
            .map(|&label| {
                let mut one_hot = vec![0.0f64; ImageClass::COUNT];
                one_hot[label] = 1.0;
                one_hot
            })
            .collect()
    }

    /// Number of samples per class, indexed by label.
    pub fn class_counts(&self) -> [usize; ImageClass::COUNT] {
        let mut counts = [0; ImageClass::COUNT];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }

    /// Applies one random permutation to images and labels together.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut pairs: Vec<(FeatureVector, Label)> = std::mem::take(&mut self.images)
            .into_iter()
            .zip(std::mem::take(&mut self.labels))
            .collect();
        pairs.shuffle(rng);
        let (images, labels) = pairs.into_iter().unzip();
        self.images = images;
        self.labels = labels;
    }

    /// Splits off the last `val_split_pct` percent (capped at
    /// [`MAX_VAL_SPLIT_PCT`]) as a validation set.
    ///
    /// Returns `(train, validation)`. No shuffling happens here; call
    /// [`shuffle`](Self::shuffle) first when the tail is not representative.
    pub fn split_validation(mut self, val_split_pct: u8) -> (TrainSet, TrainSet) {
        let pct = val_split_pct.min(MAX_VAL_SPLIT_PCT) as usize;
        let val_n = (self.len() * pct) / 100;
        let train_n = self.len() - val_n;

        let validation = TrainSet {
            images: self.images.split_off(train_n),
            labels: self.labels.split_off(train_n),
        };
        (self, validation)
    }
}

impl FromIterator<(FeatureVector, ImageClass)> for TrainSet {
    fn from_iter<I: IntoIterator<Item = (FeatureVector, ImageClass)>>(iter: I) -> Self {
        let (images, labels) = iter
            .into_iter()
            .map(|(image, class)| (image, class.label()))
            .unzip();
        TrainSet { images, labels }
    }
}
