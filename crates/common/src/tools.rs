//! External tool discovery.

use std::path::Path;
use std::process::Command;

/// Whether `program` can be executed.
///
/// Paths with a directory component must point at an existing file; bare
/// names are looked up on `PATH` through the shell.
pub fn command_exists(program: &Path) -> bool {
    if program.components().count() > 1 {
        return program.is_file();
    }
    Command::new("sh")
        .arg("-c")
        .arg(format!(
            "command -v '{}' >/dev/null 2>&1",
            program.to_string_lossy()
        ))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
