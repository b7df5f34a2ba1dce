//! Open the transcript in the system's default editor.

use std::path::Path;
use std::process::Command;

use crate::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let path = &ctx.config.paths.transcript_file;
    if !path.is_file() {
        anyhow::bail!(
            "No transcript at {}. Run `slidecast transcript <DECK>` first.",
            path.display()
        );
    }

    open_command(path)
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?;
    println!("Opened: {}", path.display());
    Ok(())
}

#[cfg(target_os = "windows")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
