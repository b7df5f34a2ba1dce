//! Slidecast Rasterizer
//!
//! Exports every slide of a presentation as `slide_{n}.png` in the run
//! workspace. The default backend drives a headless LibreOffice to render the
//! deck to PDF and rasterizes each page with `pdftoppm`.
//!
//! The presentation editor is held through an [`EditorSession`] for the
//! duration of an export and is released on every exit path.

pub mod office;
pub mod png;
pub mod session;

use std::path::Path;

use slidecast_common::error::SlidecastResult;
use slidecast_project_model::params::Resolution;
use slidecast_project_model::slide::SlideImage;
use slidecast_project_model::workspace::RunWorkspace;

pub use office::OfficeRasterizer;
pub use session::EditorSession;

/// Slide export progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterProgress {
    /// Slides exported so far.
    pub current: u32,
    /// Slides in the deck.
    pub total: u32,
}

impl RasterProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Backend that turns a presentation into slide images.
#[allow(async_fn_in_trait)]
pub trait SlideRasterizer {
    /// Export every slide into `workspace`, one PNG per slide, in order.
    ///
    /// Each file is on disk before the next slide is exported and before
    /// this returns.
    async fn rasterize(
        &self,
        deck: &Path,
        workspace: &RunWorkspace,
        resolution: Resolution,
        progress: &mut dyn FnMut(RasterProgress),
    ) -> SlidecastResult<Vec<SlideImage>>;

    /// Backend name.
    fn name(&self) -> &str;
}
