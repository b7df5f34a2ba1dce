//! Convert a presentation into a video.

use std::io::Write;
use std::path::PathBuf;

use slidecast_project_model::params::ParameterOverrides;
use slidecast_project_model::workspace::RunWorkspace;
use slidecast_rasterizer::{OfficeRasterizer, RasterProgress};
use slidecast_render_engine::{
    run_conversion, ConversionHooks, ConversionRequest, EncodeProgress, FfmpegEncoder,
    FileLogSink,
};
use slidecast_transcript::TranscriptOutcome;

use crate::Context;

pub async fn run(
    ctx: &Context,
    deck: PathBuf,
    audio: PathBuf,
    overrides: ParameterOverrides,
) -> anyhow::Result<()> {
    let params = ctx.settings.load_or_default().with_overrides(&overrides);

    println!("Converting: {}", deck.display());
    println!("  Music: {}", audio.display());
    println!(
        "  Slides: {}s each, transition {} ({}s)",
        params.slide_duration_secs, params.transition, params.transition_duration_secs
    );
    println!(
        "  Quality: {}  Resolution: {}  Volume: {}",
        params.quality, params.resolution, params.bgm_volume
    );

    let request = ConversionRequest {
        deck,
        audio,
        params,
        workspace: RunWorkspace::new(&ctx.config.paths.work_dir),
        transcript_path: ctx.config.paths.transcript_file.clone(),
    };

    let rasterizer = OfficeRasterizer::from_config(&ctx.config);
    let encoder = FfmpegEncoder::new(&ctx.config.tools.ffmpeg);
    let mut log = FileLogSink::new(&ctx.config.paths.log_file);

    let hooks = ConversionHooks {
        on_raster: Some(Box::new(|p: RasterProgress| {
            print!(
                "\r  Exporting slides: {}/{} ({:.0}%)  ",
                p.current,
                p.total,
                p.fraction() * 100.0
            );
            let _ = std::io::stdout().flush();
        })),
        on_encode: Some(Box::new(|p: EncodeProgress| {
            print!(
                "\r  Encoding: {:.1}% ({:.1}/{:.1}s)  ",
                p.progress * 100.0,
                p.out_time_secs,
                p.expected_duration_secs
            );
            let _ = std::io::stdout().flush();
        })),
    };

    let report = match run_conversion(&request, &rasterizer, &encoder, &mut log, hooks).await {
        Ok(report) => report,
        Err(e) => {
            println!();
            println!("Conversion failed: {e}");
            if !e.is_precondition() {
                println!("  See the log with: slidecast log");
            }
            return Err(e.into());
        }
    };

    println!();
    match &report.transcript {
        Some(TranscriptOutcome::Written { slides, with_text }) => println!(
            "  Transcript: {} ({with_text} of {slides} slides with text)",
            request.transcript_path.display()
        ),
        Some(TranscriptOutcome::NoText) => println!("  Transcript: no text found"),
        Some(TranscriptOutcome::Failed(msg)) => println!("  Transcript failed: {msg}"),
        None => {}
    }
    println!(
        "Conversion complete: {} slides, {}x{}, {:.1}s in {:.1}s",
        report.slides,
        report.dimensions.0,
        report.dimensions.1,
        report.total_duration_secs,
        report.elapsed_secs
    );
    println!("  Video: {}", report.output.display());
    println!("  Save it with: slidecast save <DEST>");

    Ok(())
}
