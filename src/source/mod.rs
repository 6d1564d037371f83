pub mod source;

pub use source::{FsImageSource, ImageSource, MemoryImageSource};
