//! Slidecast Processing Core
//!
//! Turns a directory of exported slides into the inputs the encoder needs:
//! - **Dimensions:** A common even-valued frame size when none was requested
//! - **Timeline:** Numerically ordered slides with per-slide durations,
//!   rendered as a concat manifest
//!
//! Everything here runs after slide export has fully completed and before
//! the encoder is started.

pub mod dimensions;
pub mod timeline;

pub use dimensions::{max_even_dimensions, round_up_even, scan_slide_images};
pub use timeline::{format_secs, Timeline, TimelineEntry, TERMINAL_DURATION_SECS};
