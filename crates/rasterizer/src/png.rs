//! Post-export PNG recompression.

use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use slidecast_common::error::SlidecastResult;

/// Re-encode the PNG at `path` with maximum compression, in place.
///
/// Pixels are unchanged. The file is replaced in a single write once the new
/// encoding is complete.
pub fn optimize_png(path: &Path) -> SlidecastResult<()> {
    let image = image::open(path)?;
    let before = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let mut encoded = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut encoded, CompressionType::Best, FilterType::Adaptive);
    image.write_with_encoder(encoder)?;

    std::fs::write(path, &encoded)?;
    tracing::trace!(
        path = %path.display(),
        before_bytes = before,
        after_bytes = encoded.len(),
        "Optimized PNG"
    );
    Ok(())
}
