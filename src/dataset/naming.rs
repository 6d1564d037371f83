use crate::dataset::class::ImageClass;

// The prefix is concatenated verbatim: "data/train/" and "data/train_" are both valid.

/// `<prefix><index>.jpg`
pub fn test_image_path(prefix: &str, index: usize) -> String {
    format!("{}{}.jpg", prefix, index)
}

/// `<prefix><class>.<index>.jpg`, e.g. `train/dog.7.jpg`.
pub fn train_image_path(prefix: &str, class: ImageClass, index: usize) -> String {
    format!("{}{}.{}.jpg", prefix, class.file_stem(), index)
}
