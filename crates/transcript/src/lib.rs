//! Slidecast Transcript
//!
//! Writes the text of every slide to a plain-text transcript the operator can
//! edit into narration. Extraction never fails the caller: problems are
//! written into the transcript itself and reported through
//! [`TranscriptOutcome`].
//!
//! ```text
//! === Slide 1 ===
//! Quarterly Review
//! Agenda
//!
//! === Slide 2 ===
//!
//! ```

pub mod pptx;

use std::fmt::Write as _;
use std::path::Path;

pub use pptx::{read_slides, SlideText};

/// Written when no slide carries any text.
pub const NO_TEXT_SENTINEL: &str = "No text content detected in the presentation\n";

/// What ended up in the transcript file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    Written { slides: usize, with_text: usize },
    NoText,
    Failed(String),
}

impl TranscriptOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TranscriptOutcome::Failed(_))
    }
}

/// Extract the deck's text into `out`, overwriting it.
pub fn extract_transcript(deck: &Path, out: &Path) -> TranscriptOutcome {
    let (contents, outcome) = match read_slides(deck) {
        Ok(slides) => {
            let with_text = slides.iter().filter(|s| !s.shapes.is_empty()).count();
            if with_text == 0 {
                (NO_TEXT_SENTINEL.to_string(), TranscriptOutcome::NoText)
            } else {
                (
                    render_transcript(&slides),
                    TranscriptOutcome::Written {
                        slides: slides.len(),
                        with_text,
                    },
                )
            }
        }
        Err(e) => {
            let message = e.to_string();
            (error_line(&message), TranscriptOutcome::Failed(message))
        }
    };

    if let Err(e) = std::fs::write(out, contents) {
        tracing::warn!(path = %out.display(), error = %e, "Failed to write transcript");
        return TranscriptOutcome::Failed(e.to_string());
    }

    match &outcome {
        TranscriptOutcome::Failed(message) => {
            tracing::warn!(deck = %deck.display(), error = %message, "Text extraction failed")
        }
        other => tracing::info!(deck = %deck.display(), out = %out.display(), outcome = ?other, "Transcript written"),
    }
    outcome
}

/// Transcript body for slides that carry text.
pub fn render_transcript(slides: &[SlideText]) -> String {
    let mut out = String::new();
    for (i, slide) in slides.iter().enumerate() {
        let _ = writeln!(out, "=== Slide {} ===", i + 1);
        if !slide.shapes.is_empty() {
            out.push_str(&slide.shapes.join("\n"));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn error_line(message: &str) -> String {
    format!("Error while extracting text: {message}\n")
}
