//! Show the encoder log.

use std::io::Write;
use std::time::Duration;

use crate::Context;

const FOLLOW_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run(ctx: &Context, follow: bool) -> anyhow::Result<()> {
    let path = &ctx.config.paths.log_file;

    if !follow {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read log {}: {e}", path.display()))?;
        print!("{content}");
        return Ok(());
    }

    let mut printed = String::new();
    loop {
        if let Ok(content) = std::fs::read_to_string(path) {
            print!("{}", unseen(&printed, &content));
            let _ = std::io::stdout().flush();
            printed = content;
        }
        tokio::select! {
            _ = tokio::time::sleep(FOLLOW_INTERVAL) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

/// The part of `content` not yet shown. A log that no longer starts with what
/// was printed was rewritten by a new run and is shown from the top.
fn unseen<'a>(printed: &str, content: &'a str) -> &'a str {
    content.strip_prefix(printed).unwrap_or(content)
}
