//! Slidecast Render Engine
//!
//! Turns exported slides and a background track into a video.
//!
//! # Pipeline Architecture
//!
//! ```text
//! deck.pptx ── rasterizer ── slide_N.png ──┐
//!                                           ├── dimensions ── filter graph ──┐
//!                               timeline ───┴── input.txt (concat manifest) ─┤
//!                                                                            │
//! bgm.mp3 ───────────────────────────────────────────────────────────────────┤
//!                                                                            ▼
//!                                                                 ffmpeg (H.264)
//!                                                                            │
//!                                                                            ▼
//!                                                                     output.mp4
//! ```

pub mod encode;
pub mod filter_graph;
pub mod log_sink;
pub mod pipeline;
pub mod plan;

pub use encode::{EncodeJob, EncodeProgress, FfmpegEncoder, ProgressCallback, VideoEncoder};
pub use filter_graph::{fade_start_secs, FilterGraph, FilterGraphInput, AUDIO_FADE_SECS};
pub use log_sink::{FileLogSink, LogSink, MemoryLogSink};
pub use pipeline::{run_conversion, ConversionHooks, ConversionReport, ConversionRequest};
pub use plan::{resolve_dimensions, ConversionPlan};
