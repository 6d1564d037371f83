/// Class index stored alongside each training vector.
pub type Label = usize;

/// The two photograph classes of the paired training layout.
///
/// Labels are `Cat → 0` and `Dog → 1`, matching the datasets this crate has
/// always produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageClass {
    Cat,
    Dog,
}

impl ImageClass {
    /// Every class in storage order: within each index pair, cat precedes dog.
    pub const ALL: [ImageClass; 2] = [ImageClass::Cat, ImageClass::Dog];

    pub const COUNT: usize = Self::ALL.len();

    pub fn label(self) -> Label {
        match self {
            ImageClass::Cat => 0,
            ImageClass::Dog => 1,
        }
    }

    /// File name component, as in `cat.12.jpg`.
    pub fn file_stem(self) -> &'static str {
        match self {
            ImageClass::Cat => "cat",
            ImageClass::Dog => "dog",
        }
    }
}
