//! Everything decided before the encoder starts.

use std::path::Path;

use slidecast_common::error::SlidecastResult;
use slidecast_processing_core::dimensions::max_even_dimensions;
use slidecast_processing_core::timeline::Timeline;
use slidecast_project_model::params::{ParameterSet, Resolution, ResolvedTransition};
use slidecast_project_model::slide::SlideImage;
use slidecast_project_model::workspace::RunWorkspace;

use crate::encode::EncodeJob;
use crate::filter_graph::{fade_start_secs, FilterGraph, FilterGraphInput};

/// Timeline, filter graph and encoder job for one run.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub timeline: Timeline,
    pub dimensions: (u32, u32),
    pub transition: ResolvedTransition,
    pub filter_graph: FilterGraph,
    pub job: EncodeJob,
}

impl ConversionPlan {
    /// Combine exported slides with the run parameters.
    ///
    /// `transition` must already be resolved; it is used as given.
    pub fn build(
        params: &ParameterSet,
        workspace: &RunWorkspace,
        audio: &Path,
        slides: Vec<SlideImage>,
        dimensions: (u32, u32),
        transition: ResolvedTransition,
    ) -> SlidecastResult<Self> {
        let timeline = Timeline::from_images(slides, params.slide_duration_secs)?;
        let total_duration_secs = timeline.total_duration_secs();

        let filter_graph = FilterGraph::build(&FilterGraphInput {
            width: dimensions.0,
            height: dimensions.1,
            transition,
            transition_duration_secs: params.transition_duration_secs,
            total_duration_secs,
            bgm_volume: params.bgm_volume,
        });

        let job = EncodeJob {
            manifest: workspace.manifest_path(),
            audio: audio.to_path_buf(),
            filter_graph: filter_graph.clone(),
            quality: params.quality,
            output: workspace.output_path(),
            expected_duration_secs: total_duration_secs,
        };

        Ok(Self {
            timeline,
            dimensions,
            transition,
            filter_graph,
            job,
        })
    }

    pub fn total_duration_secs(&self) -> f64 {
        self.timeline.total_duration_secs()
    }

    pub fn fade_start_secs(&self) -> f64 {
        fade_start_secs(self.total_duration_secs())
    }

    pub fn ffmpeg_args(&self) -> Vec<String> {
        self.job.ffmpeg_args()
    }
}

/// Output frame size: the requested one, or the largest slide rounded up to
/// even dimensions.
pub fn resolve_dimensions(
    resolution: Resolution,
    slides: &[SlideImage],
) -> SlidecastResult<(u32, u32)> {
    match resolution.dimensions() {
        Some(dimensions) => Ok(dimensions),
        None => max_even_dimensions(slides),
    }
}
