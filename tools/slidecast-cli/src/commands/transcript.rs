//! Extract slide text without converting.

use std::path::PathBuf;

use slidecast_transcript::{extract_transcript, TranscriptOutcome};

use crate::Context;

pub fn run(ctx: &Context, deck: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| ctx.config.paths.transcript_file.clone());

    match extract_transcript(&deck, &output) {
        TranscriptOutcome::Written { slides, with_text } => {
            println!("Transcript written: {}", output.display());
            println!("  {with_text} of {slides} slides contain text");
            Ok(())
        }
        TranscriptOutcome::NoText => {
            println!("No text found in {}", deck.display());
            Ok(())
        }
        TranscriptOutcome::Failed(msg) => {
            Err(anyhow::anyhow!("Failed to extract text from {}: {msg}", deck.display()))
        }
    }
}
