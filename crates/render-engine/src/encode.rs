//! Encoder invocation.
//!
//! The encoder runs as a child process. Its stderr is streamed line by line
//! into a [`LogSink`] while the run is in progress, and `time=` stamps in the
//! stream drive the progress callback.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_common::tools::command_exists;
use slidecast_project_model::params::QualityTier;

use crate::filter_graph::FilterGraph;
use crate::log_sink::LogSink;

/// stderr lines kept for the failure message.
const STDERR_TAIL_LINES: usize = 12;

/// One encoder invocation.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Concat manifest listing the slides.
    pub manifest: PathBuf,

    /// Background track.
    pub audio: PathBuf,

    pub filter_graph: FilterGraph,

    pub quality: QualityTier,

    /// Encoded video destination.
    pub output: PathBuf,

    /// Used only to scale progress reports.
    pub expected_duration_secs: f64,
}

impl EncodeJob {
    /// The full encoder argument list, in order.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            path_arg(&self.manifest),
            "-i".to_string(),
            path_arg(&self.audio),
            "-filter_complex".to_string(),
            self.filter_graph.as_str().to_string(),
            "-map".to_string(),
            "[vout]".to_string(),
            "-map".to_string(),
            "[aout]".to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
        ];
        args.extend(self.quality.ffmpeg_args());
        args.extend([
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-shortest".to_string(),
            path_arg(&self.output),
        ]);
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Progress callback for encoding.
pub type ProgressCallback = Box<dyn Fn(EncodeProgress) + Send>;

/// Encoding progress report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Output timestamp reached by the encoder.
    pub out_time_secs: f64,

    pub expected_duration_secs: f64,
}

/// Trait for video encoders.
#[allow(async_fn_in_trait)]
pub trait VideoEncoder {
    /// Run the job to completion, streaming diagnostics into `sink`.
    async fn encode(
        &self,
        job: &EncodeJob,
        sink: &mut dyn LogSink,
        progress: Option<&ProgressCallback>,
    ) -> SlidecastResult<()>;

    /// Check if this encoder is available on the system.
    fn is_available(&self) -> bool;

    /// Encoder name.
    fn name(&self) -> &str;
}

/// Runs the job through an `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl VideoEncoder for FfmpegEncoder {
    async fn encode(
        &self,
        job: &EncodeJob,
        sink: &mut dyn LogSink,
        progress: Option<&ProgressCallback>,
    ) -> SlidecastResult<()> {
        let args = job.ffmpeg_args();
        tracing::debug!(program = %self.program.display(), args = ?args, "Running encoder");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SlidecastError::encode(format!(
                    "Failed to start {}: {e}",
                    self.program.display()
                ))
            })?;

        tracing::info!(
            pid = child.id(),
            output = %job.output.display(),
            expected_duration_secs = job.expected_duration_secs,
            "Encoder started"
        );

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SlidecastError::encode("Failed to capture encoder stderr"))?;

        let mut splitter = LineSplitter::default();
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        let mut buf = [0u8; 4096];
        let mut handle_line = |line: String| -> SlidecastResult<()> {
            sink.write_line(&line)?;
            if let (Some(cb), Some(out_time_secs)) = (progress, parse_time_stamp(&line)) {
                cb(progress_report(out_time_secs, job.expected_duration_secs));
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
            Ok(())
        };

        loop {
            let n = stderr
                .read(&mut buf)
                .await
                .map_err(|e| SlidecastError::encode(format!("Failed reading encoder output: {e}")))?;
            if n == 0 {
                break;
            }
            for line in splitter.push(&buf[..n]) {
                handle_line(line)?;
            }
        }
        if let Some(line) = splitter.finish() {
            handle_line(line)?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| SlidecastError::encode(format!("Failed to wait on encoder: {e}")))?;

        if !status.success() {
            let tail: Vec<String> = tail.into_iter().collect();
            return Err(SlidecastError::encode(format!(
                "{} exited with {status}: {}",
                self.program.display(),
                tail.join(" | ")
            )));
        }

        if let Some(cb) = progress {
            cb(EncodeProgress {
                progress: 1.0,
                out_time_secs: job.expected_duration_secs,
                expected_duration_secs: job.expected_duration_secs,
            });
        }
        tracing::info!(output = %job.output.display(), "Encoder finished");
        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists(&self.program)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

fn progress_report(out_time_secs: f64, expected_duration_secs: f64) -> EncodeProgress {
    let progress = if expected_duration_secs > 0.0 {
        (out_time_secs / expected_duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    EncodeProgress {
        progress,
        out_time_secs,
        expected_duration_secs,
    }
}

/// Splits a byte stream on `\n` and `\r`, dropping empty lines.
///
/// ffmpeg rewrites its status line with bare carriage returns.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in bytes {
            if byte == b'\n' || byte == b'\r' {
                if !self.pending.is_empty() {
                    lines.push(String::from_utf8_lossy(&self.pending).into_owned());
                    self.pending.clear();
                }
            } else {
                self.pending.push(byte);
            }
        }
        lines
    }

    /// Whatever remains after the stream ended without a newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(line)
    }
}

/// Seconds from the `time=HH:MM:SS.xx` field of an ffmpeg status line.
pub fn parse_time_stamp(line: &str) -> Option<f64> {
    let start = line.find("time=")? + "time=".len();
    let value = line[start..].split_whitespace().next()?;
    let mut parts = value.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}
