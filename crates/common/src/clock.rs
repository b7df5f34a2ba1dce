//! Run timing and bounded waiting.
//!
//! External tools (the presentation editor, the rasterizer) write their
//! output asynchronously relative to the call that requested it. Instead of
//! blocking until a file shows up, callers poll with an explicit upper bound
//! and get a [`SlidecastError::Timeout`] when it expires.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{SlidecastError, SlidecastResult};

/// A clock anchored at the start of a conversion run.
#[derive(Debug, Clone)]
pub struct RunClock {
    /// The instant the run started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl RunClock {
    /// Create a new run clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at run start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// A fixed point in time after which a wait gives up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn after(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.limit
    }

    pub fn waited_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Wait until `path` exists and is non-empty, polling every `interval`.
///
/// Yields to the runtime between polls so other tasks on the same thread
/// (progress reporting) keep running.
pub async fn wait_for_file(
    path: &Path,
    interval: Duration,
    timeout: Duration,
) -> SlidecastResult<()> {
    let deadline = Deadline::after(timeout);
    loop {
        if is_materialized(path) {
            return Ok(());
        }
        if deadline.expired() {
            return Err(SlidecastError::timeout(
                format!("{}", path.display()),
                deadline.waited_ms(),
            ));
        }
        tokio::time::sleep(interval).await;
    }
}

fn is_materialized(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
