//! Temporary working directory owned by one conversion run.
//!
//! The directory holds the exported slides, the intermediate PDF, the concat
//! manifest and the encoded video. It is destroyed and recreated at the start
//! of every run, so nothing in it outlives the next conversion.

use std::path::{Path, PathBuf};

use crate::slide::slide_file_name;

const MANIFEST_FILE: &str = "input.txt";
const OUTPUT_FILE: &str = "output.mp4";
const DECK_PDF_FILE: &str = "deck.pdf";

/// Layout of a run's working directory.
#[derive(Debug, Clone)]
pub struct RunWorkspace {
    root: PathBuf,
}

impl RunWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destroy any previous run's files and recreate an empty directory.
    pub fn reset(&self) -> std::io::Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        std::fs::create_dir_all(&self.root)?;
        tracing::debug!(root = %self.root.display(), "Workspace reset");
        Ok(())
    }

    /// Concat manifest consumed by the encoder.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Encoded video.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(OUTPUT_FILE)
    }

    /// Intermediate PDF rendered by the presentation editor.
    pub fn deck_pdf_path(&self) -> PathBuf {
        self.root.join(DECK_PDF_FILE)
    }

    /// PNG for a 1-based slide index.
    pub fn slide_path(&self, index: u32) -> PathBuf {
        self.root.join(slide_file_name(index))
    }

    /// Whether a finished video is waiting to be saved.
    pub fn has_output(&self) -> bool {
        self.output_path().is_file()
    }
}
