//! Save the last converted video.

use std::path::{Path, PathBuf};

use slidecast_project_model::workspace::RunWorkspace;

use crate::Context;

pub fn run(ctx: &Context, dest: PathBuf) -> anyhow::Result<()> {
    let workspace = RunWorkspace::new(&ctx.config.paths.work_dir);
    if !workspace.has_output() {
        anyhow::bail!(
            "No converted video at {}. Run `slidecast convert` first.",
            workspace.output_path().display()
        );
    }

    let dest = with_default_extension(&dest);
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = std::fs::copy(workspace.output_path(), &dest)?;
    tracing::info!(dest = %dest.display(), bytes, "Video saved");
    println!("Video saved: {}", dest.display());
    Ok(())
}

fn with_default_extension(dest: &Path) -> PathBuf {
    if dest.extension().is_some() {
        dest.to_path_buf()
    } else {
        dest.with_extension("mp4")
    }
}
