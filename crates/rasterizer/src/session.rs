//! Scoped ownership of the headless presentation editor.
//!
//! An [`EditorSession`] owns the editor process and its private profile
//! directory. The process is spawned with `kill_on_drop`, and the profile is
//! removed when the session drops, so an early return or a failed export
//! never leaves the editor behind.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

use slidecast_common::error::{SlidecastError, SlidecastResult};

/// A running headless editor converting one deck.
#[derive(Debug)]
pub struct EditorSession {
    child: Option<Child>,
    profile_dir: PathBuf,
    pdf_path: PathBuf,
}

impl EditorSession {
    /// Start the editor converting `deck` to PDF inside `out_dir`.
    pub fn open(soffice: &Path, deck: &Path, out_dir: &Path) -> SlidecastResult<Self> {
        let stem = deck
            .file_stem()
            .ok_or_else(|| SlidecastError::automation("presentation path has no file name"))?;
        // The editor only replaces the last extension, so `Q3.2024 review.pptx`
        // becomes `Q3.2024 review.pdf`.
        let mut pdf_name = stem.to_os_string();
        pdf_name.push(".pdf");
        let pdf_path = out_dir.join(pdf_name);

        let profile_dir = out_dir.join(".editor-profile");
        let args = convert_args(deck, out_dir, &profile_dir)?;
        std::fs::create_dir_all(&profile_dir)?;
        tracing::debug!(program = %soffice.display(), args = ?args, "Starting presentation editor");

        let spawned = Command::new(soffice)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let _ = std::fs::remove_dir_all(&profile_dir);
                return Err(SlidecastError::automation(format!(
                    "Failed to start presentation editor {}: {e}",
                    soffice.display()
                )));
            }
        };

        tracing::info!(pid = child.id(), deck = %deck.display(), "Presentation editor started");

        Ok(Self {
            child: Some(child),
            profile_dir,
            pdf_path,
        })
    }

    /// Where the editor writes the rendered deck.
    pub fn pdf_path(&self) -> &Path {
        &self.pdf_path
    }

    /// Wait for the conversion to finish, bounded by `timeout`.
    pub async fn wait_converted(&mut self, timeout: Duration) -> SlidecastResult<()> {
        let Some(child) = self.child.take() else {
            return Ok(());
        };

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                SlidecastError::automation(format!("Failed to wait on presentation editor: {e}"))
            })?,
            // The child future was dropped with the timeout, which kills it.
            Err(_) => {
                return Err(SlidecastError::timeout(
                    "presentation editor to render the deck",
                    timeout.as_millis() as u64,
                ))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SlidecastError::automation(format!(
                "Presentation editor failed (status {}): {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::debug!(pdf = %self.pdf_path.display(), "Presentation editor finished");
        Ok(())
    }

    /// Release the editor and its profile.
    pub async fn close(mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        // Drop removes the profile directory.
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
        let _ = std::fs::remove_dir_all(&self.profile_dir);
    }
}

/// PDF export filter that keeps hidden slides, so every slide gets a page.
const PDF_EXPORT_FILTER: &str =
    r#"pdf:impress_pdf_Export:{"ExportHiddenSlides":{"type":"boolean","value":"true"}}"#;

fn convert_args(deck: &Path, out_dir: &Path, profile_dir: &Path) -> SlidecastResult<Vec<String>> {
    let profile_url = file_url(&std::path::absolute(profile_dir)?);
    Ok(vec![
        "--headless".to_string(),
        "--norestore".to_string(),
        "--nologo".to_string(),
        format!("-env:UserInstallation={profile_url}"),
        "--convert-to".to_string(),
        PDF_EXPORT_FILTER.to_string(),
        "--outdir".to_string(),
        out_dir.to_string_lossy().into_owned(),
        deck.to_string_lossy().into_owned(),
    ])
}

/// `file://` URL for an absolute path, with forward slashes.
pub fn file_url(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url() {
        assert_eq!(
            file_url(Path::new("/work/TEMP/.editor-profile")),
            "file:///work/TEMP/.editor-profile"
        );
        assert_eq!(
            file_url(Path::new(r"C:\work\TEMP")),
            "file:///C:/work/TEMP"
        );
    }

    #[test]
    fn test_convert_args_end_with_deck() {
        let args = convert_args(
            Path::new("/decks/talk.pptx"),
            Path::new("/work/TEMP"),
            Path::new("/work/TEMP/.editor-profile"),
        )
        .unwrap();
        assert_eq!(args.first().map(String::as_str), Some("--headless"));
        assert_eq!(args.last().map(String::as_str), Some("/decks/talk.pptx"));
        let outdir = args.iter().position(|a| a == "--outdir").unwrap();
        assert_eq!(args[outdir + 1], "/work/TEMP");
        assert!(args
            .iter()
            .any(|a| a == "-env:UserInstallation=file:///work/TEMP/.editor-profile"));
        let convert_to = args.iter().position(|a| a == "--convert-to").unwrap();
        assert_eq!(
            args[convert_to + 1],
            r#"pdf:impress_pdf_Export:{"ExportHiddenSlides":{"type":"boolean","value":"true"}}"#
        );
    }

    #[tokio::test]
    async fn test_missing_editor_is_automation_error() {
        let dir = std::env::temp_dir().join("slidecast_test_session_missing");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let err = EditorSession::open(
            Path::new("/nonexistent/slidecast-soffice"),
            Path::new("/decks/talk.pptx"),
            &dir,
        )
        .unwrap_err();
        assert!(matches!(err, SlidecastError::Automation { .. }));
        assert!(!dir.join(".editor-profile").exists());
    }
}
