//! Check external tools.

use slidecast_common::config::config_file_path;
use slidecast_common::tools::command_exists;

use crate::Context;

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    println!("Slidecast System Check");
    println!("{}", "=".repeat(50));

    let tools = &ctx.config.tools;
    let checks = [
        ("Encoder", &tools.ffmpeg),
        ("Presentation editor", &tools.soffice),
        ("PDF rasterizer", &tools.pdftoppm),
        ("PDF info", &tools.pdfinfo),
    ];

    let mut all_ok = true;
    for (label, program) in checks {
        if command_exists(program) {
            println!("[OK] {label}: {}", program.display());
        } else {
            all_ok = false;
            println!("[MISSING] {label}: {}", program.display());
        }
    }

    println!();
    println!("Config: {}", config_file_path().display());
    println!("Settings: {}", ctx.settings.path().display());
    println!("Workspace: {}", ctx.config.paths.work_dir.display());

    println!();
    if all_ok {
        println!("All tools are available. Slidecast is ready.");
    } else {
        println!("Some tools are missing. Install them or set their paths in the config file.");
    }

    Ok(())
}
