//! Exported slide images.
//!
//! Slides are exported as `slide_{n}.png` with a 1-based index. Ordering is
//! always by that index, never by file name: `slide_10.png` follows
//! `slide_2.png`.

use std::path::PathBuf;

const SLIDE_PREFIX: &str = "slide_";
const SLIDE_EXTENSION: &str = ".png";

/// One exported slide on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideImage {
    /// 1-based slide number.
    pub index: u32,

    /// Location of the PNG.
    pub path: PathBuf,
}

impl SlideImage {
    pub fn new(index: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            index,
            path: path.into(),
        }
    }

    /// Build from a path whose file name follows the slide naming scheme.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let index = path.file_name().and_then(|n| n.to_str()).and_then(slide_index)?;
        Some(Self { index, path })
    }
}

/// File name for a 1-based slide index.
pub fn slide_file_name(index: u32) -> String {
    format!("{SLIDE_PREFIX}{index}{SLIDE_EXTENSION}")
}

/// Extract the slide index from a file name like `slide_12.png`.
pub fn slide_index(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(SLIDE_EXTENSION)?
        .parse()
        .ok()
}

/// Sort slides by their numeric index.
pub fn sort_by_index(slides: &mut [SlideImage]) {
    slides.sort_by_key(|slide| slide.index);
}
