//! End-to-end conversion run.
//!
//! Stages run strictly in order: input checks, workspace reset, log reset,
//! optional transcript, slide export, dimensions, transition, manifest,
//! encode. Any failure after the log reset is also appended to the log.

use std::path::PathBuf;

use slidecast_common::clock::RunClock;
use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_project_model::params::{ParameterSet, ResolvedTransition};
use slidecast_project_model::workspace::RunWorkspace;
use slidecast_rasterizer::{RasterProgress, SlideRasterizer};
use slidecast_transcript::{extract_transcript, TranscriptOutcome};

use crate::encode::{ProgressCallback, VideoEncoder};
use crate::log_sink::LogSink;
use crate::plan::{resolve_dimensions, ConversionPlan};

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub deck: PathBuf,
    pub audio: PathBuf,
    pub params: ParameterSet,
    pub workspace: RunWorkspace,
    /// Where the slide text goes when `params.save_text` is set.
    pub transcript_path: PathBuf,
}

impl ConversionRequest {
    /// Both input files must exist.
    pub fn validate(&self) -> SlidecastResult<()> {
        if !self.deck.is_file() {
            return Err(SlidecastError::missing_input("presentation", &self.deck));
        }
        if !self.audio.is_file() {
            return Err(SlidecastError::missing_input("background audio", &self.audio));
        }
        Ok(())
    }
}

/// Optional observers for the two long-running stages.
#[derive(Default)]
pub struct ConversionHooks {
    pub on_raster: Option<Box<dyn FnMut(RasterProgress)>>,
    pub on_encode: Option<ProgressCallback>,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub slides: usize,
    pub dimensions: (u32, u32),
    pub transition: ResolvedTransition,
    pub total_duration_secs: f64,
    pub fade_start_secs: f64,
    pub output: PathBuf,
    pub transcript: Option<TranscriptOutcome>,
    pub elapsed_secs: f64,
}

/// Run a full conversion.
///
/// Missing inputs are rejected before anything on disk changes.
pub async fn run_conversion<R, E>(
    request: &ConversionRequest,
    rasterizer: &R,
    encoder: &E,
    log: &mut dyn LogSink,
    mut hooks: ConversionHooks,
) -> SlidecastResult<ConversionReport>
where
    R: SlideRasterizer,
    E: VideoEncoder,
{
    request.validate()?;

    let clock = RunClock::start();
    tracing::info!(
        deck = %request.deck.display(),
        audio = %request.audio.display(),
        workspace = %request.workspace.root().display(),
        rasterizer = rasterizer.name(),
        encoder = encoder.name(),
        started_at = clock.epoch_wall(),
        "Starting conversion"
    );

    request.workspace.reset()?;
    log.reset()?;

    match convert(request, rasterizer, encoder, log, &mut hooks, &clock).await {
        Ok(report) => {
            tracing::info!(
                output = %report.output.display(),
                slides = report.slides,
                total_duration_secs = report.total_duration_secs,
                elapsed_secs = report.elapsed_secs,
                "Conversion finished"
            );
            Ok(report)
        }
        Err(e) => {
            if let Err(log_err) = log.append_error(&e.to_string()) {
                tracing::warn!(error = %log_err, "Failed to record error in encoder log");
            }
            tracing::error!(error = %e, elapsed_secs = clock.elapsed_secs(), "Conversion failed");
            Err(e)
        }
    }
}

async fn convert<R, E>(
    request: &ConversionRequest,
    rasterizer: &R,
    encoder: &E,
    log: &mut dyn LogSink,
    hooks: &mut ConversionHooks,
    clock: &RunClock,
) -> SlidecastResult<ConversionReport>
where
    R: SlideRasterizer,
    E: VideoEncoder,
{
    let params = &request.params;
    let workspace = &request.workspace;

    let transcript = params
        .save_text
        .then(|| extract_transcript(&request.deck, &request.transcript_path));

    let slides = rasterizer
        .rasterize(&request.deck, workspace, params.resolution, &mut |p| {
            if let Some(cb) = hooks.on_raster.as_mut() {
                cb(p);
            }
        })
        .await?;
    if slides.is_empty() {
        return Err(SlidecastError::automation("no slides were exported"));
    }

    let dimensions = resolve_dimensions(params.resolution, &slides)?;
    let transition = params.transition.resolve(&mut rand::rng());
    tracing::info!(
        slides = slides.len(),
        width = dimensions.0,
        height = dimensions.1,
        transition = transition.filter_name(),
        "Slides ready"
    );

    let plan = ConversionPlan::build(
        params,
        workspace,
        &request.audio,
        slides,
        dimensions,
        transition,
    )?;
    plan.timeline.write_manifest(&workspace.manifest_path())?;

    encoder
        .encode(&plan.job, log, hooks.on_encode.as_ref())
        .await?;

    if !workspace.has_output() {
        return Err(SlidecastError::encode(format!(
            "{} finished without writing {}",
            encoder.name(),
            workspace.output_path().display()
        )));
    }

    Ok(ConversionReport {
        slides: plan.timeline.len(),
        dimensions,
        transition,
        total_duration_secs: plan.total_duration_secs(),
        fade_start_secs: plan.fade_start_secs(),
        output: workspace.output_path(),
        transcript,
        elapsed_secs: clock.elapsed_secs(),
    })
}
