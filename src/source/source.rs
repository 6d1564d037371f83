use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GenericImageView};
use log::debug;

/// Decodes the image stored at a path.
///
/// `None` is the "no image data" signal; the decoder's own error taxonomy is
/// not surfaced. Implementations must be shareable across threads because the
/// assembler may decode several indices at once.
pub trait ImageSource: Send + Sync {
    fn decode(&self, path: &Path) -> Option<DynamicImage>;
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn decode(&self, path: &Path) -> Option<DynamicImage> {
        (**self).decode(path)
    }
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn decode(&self, path: &Path) -> Option<DynamicImage> {
        (**self).decode(path)
    }
}

/// Reads and decodes files from disk with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn decode(&self, path: &Path) -> Option<DynamicImage> {
        match image::open(path) {
            Ok(img) if img.dimensions().0 > 0 && img.dimensions().1 > 0 => Some(img),
            Ok(_) => {
                debug!("{}: decoded to an empty image", path.display());
                None
            }
            Err(e) => {
                debug!("{}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Serves already-decoded images keyed by path.
///
/// Counts every decode request, hits and misses alike.
#[derive(Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<PathBuf, DynamicImage>,
    requests: AtomicUsize,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, image: DynamicImage) -> Option<DynamicImage> {
        self.images.insert(path.into(), image)
    }

    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<DynamicImage> {
        self.images.remove(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of `decode` calls served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl<P: Into<PathBuf>> FromIterator<(P, DynamicImage)> for MemoryImageSource {
    fn from_iter<I: IntoIterator<Item = (P, DynamicImage)>>(iter: I) -> Self {
        MemoryImageSource {
            images: iter.into_iter().map(|(p, img)| (p.into(), img)).collect(),
            requests: AtomicUsize::new(0),
        }
    }
}

impl ImageSource for MemoryImageSource {
    fn decode(&self, path: &Path) -> Option<DynamicImage> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.images.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn pixel(level: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([level; 3])))
    }

    #[test]
    fn memory_source_counts_hits_and_misses() {
        let source: MemoryImageSource = vec![("a.jpg", pixel(1)), ("b.jpg", pixel(2))]
            .into_iter()
            .collect();
        assert_eq!(source.len(), 2);

        assert!(source.decode(Path::new("a.jpg")).is_some());
        assert!(source.decode(Path::new("missing.jpg")).is_none());
        assert_eq!(source.requests(), 2);
    }

    #[test]
    fn borrowed_source_delegates() {
        let mut source = MemoryImageSource::new();
        source.insert("x.jpg", pixel(9));
        let by_ref = &source;
        assert!(by_ref.decode(Path::new("x.jpg")).is_some());
        assert_eq!(source.requests(), 1);
    }

    #[test]
    fn fs_source_reports_missing_file_as_no_data() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsImageSource.decode(&dir.path().join("nope.jpg")).is_none());
    }

    #[test]
    fn fs_source_reports_garbage_as_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(FsImageSource.decode(&path).is_none());
    }
}
