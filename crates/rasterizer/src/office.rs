//! LibreOffice + poppler rasterizer.
//!
//! The deck is rendered to PDF once by a headless editor session, then each
//! page is rasterized on its own with `pdftoppm`. Slides are exported strictly
//! one after another and each PNG must be on disk before the next starts.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use slidecast_common::clock::wait_for_file;
use slidecast_common::config::AppConfig;
use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_common::tools::command_exists;
use slidecast_project_model::params::Resolution;
use slidecast_project_model::slide::SlideImage;
use slidecast_project_model::workspace::RunWorkspace;

use crate::png::optimize_png;
use crate::session::EditorSession;
use crate::{RasterProgress, SlideRasterizer};

/// Rasterizer backed by `soffice`, `pdfinfo` and `pdftoppm`.
#[derive(Debug, Clone)]
pub struct OfficeRasterizer {
    soffice: PathBuf,
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
    native_dpi: u32,
    export_timeout: Duration,
    poll_interval: Duration,
    optimize: bool,
}

impl OfficeRasterizer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            soffice: config.tools.soffice.clone(),
            pdfinfo: config.tools.pdfinfo.clone(),
            pdftoppm: config.tools.pdftoppm.clone(),
            native_dpi: config.rasterizer.native_dpi.max(1),
            export_timeout: config.rasterizer.export_timeout(),
            poll_interval: config.rasterizer.poll_interval(),
            optimize: config.rasterizer.optimize_png,
        }
    }

    /// Whether all three tools can be found.
    pub fn is_available(&self) -> bool {
        command_exists(&self.soffice)
            && command_exists(&self.pdfinfo)
            && command_exists(&self.pdftoppm)
    }

    /// Render the deck to `workspace.deck_pdf_path()`.
    async fn render_pdf(&self, deck: &Path, workspace: &RunWorkspace) -> SlidecastResult<PathBuf> {
        let mut session = EditorSession::open(&self.soffice, deck, workspace.root())?;
        session.wait_converted(self.export_timeout).await?;
        wait_for_file(session.pdf_path(), self.poll_interval, self.export_timeout).await?;

        let pdf = workspace.deck_pdf_path();
        if session.pdf_path() != pdf {
            std::fs::rename(session.pdf_path(), &pdf)?;
        }
        session.close().await;
        Ok(pdf)
    }

    async fn page_count(&self, pdf: &Path) -> SlidecastResult<u32> {
        let output = self.run_tool(&self.pdfinfo, &[pdf.to_string_lossy().into_owned()]).await?;
        let stdout = String::from_utf8_lossy(&output);
        parse_page_count(&stdout).ok_or_else(|| {
            SlidecastError::automation(format!(
                "Could not read the slide count of {}",
                pdf.display()
            ))
        })
    }

    async fn run_tool(&self, program: &Path, args: &[String]) -> SlidecastResult<Vec<u8>> {
        tracing::trace!(program = %program.display(), args = ?args, "Running tool");
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SlidecastError::automation(format!("Failed to start {}: {e}", program.display()))
            })?;

        let output = tokio::time::timeout(self.export_timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                SlidecastError::timeout(
                    format!("{} to finish", program.display()),
                    self.export_timeout.as_millis() as u64,
                )
            })?
            .map_err(|e| {
                SlidecastError::automation(format!("Failed to wait on {}: {e}", program.display()))
            })?;

        if !output.status.success() {
            return Err(SlidecastError::automation(format!(
                "{} failed (status {}): {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl SlideRasterizer for OfficeRasterizer {
    async fn rasterize(
        &self,
        deck: &Path,
        workspace: &RunWorkspace,
        resolution: Resolution,
        progress: &mut dyn FnMut(RasterProgress),
    ) -> SlidecastResult<Vec<SlideImage>> {
        if !deck.is_file() {
            return Err(SlidecastError::missing_input("presentation", deck));
        }

        let pdf = self.render_pdf(deck, workspace).await?;
        let total = self.page_count(&pdf).await?;
        if total == 0 {
            return Err(SlidecastError::automation(format!(
                "{} contains no slides",
                deck.display()
            )));
        }
        tracing::info!(deck = %deck.display(), slides = total, %resolution, "Exporting slides");

        let mut slides = Vec::with_capacity(total as usize);
        for index in 1..=total {
            let target = workspace.slide_path(index);
            let args = pdftoppm_args(&pdf, index, resolution, self.native_dpi, &target);
            self.run_tool(&self.pdftoppm, &args).await?;
            wait_for_file(&target, self.poll_interval, self.export_timeout).await?;

            if self.optimize {
                optimize_png(&target)?;
            }

            tracing::debug!(index, path = %target.display(), "Slide exported");
            slides.push(SlideImage::new(index, target));
            progress(RasterProgress {
                current: index,
                total,
            });
        }

        Ok(slides)
    }

    fn name(&self) -> &str {
        "libreoffice"
    }
}

/// Arguments exporting one 1-based page of `pdf` to exactly `target`.
///
/// With `-singlefile`, pdftoppm appends `.png` to the output root, so the
/// root is `target` without its extension.
pub fn pdftoppm_args(
    pdf: &Path,
    index: u32,
    resolution: Resolution,
    native_dpi: u32,
    target: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-png".to_string(),
        "-f".to_string(),
        index.to_string(),
        "-l".to_string(),
        index.to_string(),
        "-singlefile".to_string(),
    ];
    match resolution.dimensions() {
        Some((width, height)) => {
            args.push("-scale-to-x".to_string());
            args.push(width.to_string());
            args.push("-scale-to-y".to_string());
            args.push(height.to_string());
        }
        None => {
            args.push("-r".to_string());
            args.push(native_dpi.to_string());
        }
    }
    args.push(pdf.to_string_lossy().into_owned());
    args.push(target.with_extension("").to_string_lossy().into_owned());
    args
}

/// Read `Pages: N` from `pdfinfo` output.
pub fn parse_page_count(pdfinfo_output: &str) -> Option<u32> {
    pdfinfo_output.lines().find_map(|line| {
        let rest = line.strip_prefix("Pages:")?;
        rest.trim().parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_count() {
        let output = "Title:          Quarterly\nCreator:        Impress\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(output), Some(12));
        assert_eq!(parse_page_count("Pages: 0"), Some(0));
        assert_eq!(parse_page_count("Title: Pages: 3"), None);
        assert_eq!(parse_page_count("Pages: many"), None);
        assert_eq!(parse_page_count(""), None);
    }

    #[test]
    fn test_pdftoppm_args_explicit_resolution() {
        let args = pdftoppm_args(
            Path::new("/work/TEMP/deck.pdf"),
            3,
            Resolution::Explicit {
                width: 1920,
                height: 1080,
            },
            96,
            Path::new("/work/TEMP/slide_3.png"),
        );
        assert_eq!(
            args,
            vec![
                "-png",
                "-f",
                "3",
                "-l",
                "3",
                "-singlefile",
                "-scale-to-x",
                "1920",
                "-scale-to-y",
                "1080",
                "/work/TEMP/deck.pdf",
                "/work/TEMP/slide_3",
            ]
        );
    }

    #[test]
    fn test_pdftoppm_args_native_resolution() {
        let args = pdftoppm_args(
            Path::new("deck.pdf"),
            1,
            Resolution::Auto,
            150,
            Path::new("TEMP/slide_1.png"),
        );
        assert!(args.windows(2).any(|w| w == ["-r", "150"]));
        assert!(!args.iter().any(|a| a == "-scale-to-x"));
        assert_eq!(args.last().map(String::as_str), Some("TEMP/slide_1"));
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.rasterizer.native_dpi = 0;
        let rasterizer = OfficeRasterizer::from_config(&config);
        assert_eq!(rasterizer.native_dpi, 1);
        assert_eq!(rasterizer.name(), "libreoffice");
    }
}
