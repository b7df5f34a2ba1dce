//! Common frame size for slides exported at native resolution.
//!
//! yuv420p needs even width and height, so the largest observed dimensions
//! are rounded up to the next even number.

use std::path::Path;

use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_project_model::slide::{sort_by_index, SlideImage};

/// List the exported slides in `dir`, ordered by slide index.
///
/// Files that do not follow the `slide_{n}.png` scheme are ignored.
pub fn scan_slide_images(dir: &Path) -> SlidecastResult<Vec<SlideImage>> {
    let mut slides = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(slide) = SlideImage::from_path(entry.path()) {
            slides.push(slide);
        }
    }
    sort_by_index(&mut slides);
    Ok(slides)
}

/// Maximum width and height over all slides, each rounded up to even.
///
/// Only image headers are read.
pub fn max_even_dimensions(slides: &[SlideImage]) -> SlidecastResult<(u32, u32)> {
    if slides.is_empty() {
        return Err(SlidecastError::timeline(
            "no slide images to derive dimensions from",
        ));
    }

    let mut sizes = Vec::with_capacity(slides.len());
    for slide in slides {
        let size = image::image_dimensions(&slide.path)?;
        tracing::trace!(index = slide.index, width = size.0, height = size.1, "Slide size");
        sizes.push(size);
    }

    let (width, height) = max_even_of(sizes);
    tracing::debug!(width, height, slides = slides.len(), "Derived output dimensions");
    Ok((width, height))
}

/// Pure core of [`max_even_dimensions`].
pub fn max_even_of(sizes: impl IntoIterator<Item = (u32, u32)>) -> (u32, u32) {
    let (w, h) = sizes
        .into_iter()
        .fold((0, 0), |(mw, mh), (w, h)| (mw.max(w), mh.max(h)));
    (round_up_even(w), round_up_even(h))
}

pub fn round_up_even(n: u32) -> u32 {
    n + (n % 2)
}
