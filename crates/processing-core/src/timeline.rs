//! Slide timeline and concat manifest.
//!
//! Every slide but the last is held for the configured slide duration; the
//! last one is held for [`TERMINAL_DURATION_SECS`]. The manifest follows the
//! ffmpeg concat demuxer convention:
//!
//! ```text
//! file '/abs/path/slide_1.png'
//! duration 5
//! file '/abs/path/slide_2.png'
//! duration 1
//! ```

use std::fmt::Write as _;
use std::path::Path;

use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_project_model::slide::{sort_by_index, SlideImage};

use crate::dimensions::scan_slide_images;

/// Hold time of the final slide, independent of the configured duration.
pub const TERMINAL_DURATION_SECS: f64 = 1.0;

/// A slide and how long it stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub slide: SlideImage,
    pub duration_secs: f64,
}

/// Ordered, timed slides for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    slide_duration_secs: f64,
}

impl Timeline {
    /// Build from the slides exported into `dir`.
    pub fn from_dir(dir: &Path, slide_duration_secs: f64) -> SlidecastResult<Self> {
        let slides = scan_slide_images(dir)?;
        Self::from_images(slides, slide_duration_secs)
    }

    /// Build from an arbitrary set of slides; they are re-sorted by index.
    pub fn from_images(
        mut slides: Vec<SlideImage>,
        slide_duration_secs: f64,
    ) -> SlidecastResult<Self> {
        if slides.is_empty() {
            return Err(SlidecastError::timeline("no slide images were exported"));
        }
        sort_by_index(&mut slides);

        let last = slides.len() - 1;
        let entries = slides
            .into_iter()
            .enumerate()
            .map(|(i, slide)| TimelineEntry {
                slide,
                duration_secs: if i < last {
                    slide_duration_secs
                } else {
                    TERMINAL_DURATION_SECS
                },
            })
            .collect::<Vec<_>>();

        tracing::debug!(slides = entries.len(), slide_duration_secs, "Built timeline");
        Ok(Self {
            entries,
            slide_duration_secs,
        })
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(count - 1) * slide_duration + 1`.
    pub fn total_duration_secs(&self) -> f64 {
        (self.entries.len() as f64 - 1.0) * self.slide_duration_secs + TERMINAL_DURATION_SECS
    }

    pub fn slide_duration_secs(&self) -> f64 {
        self.slide_duration_secs
    }

    /// Render the concat manifest. Paths are absolute with forward slashes.
    pub fn render_manifest(&self) -> SlidecastResult<String> {
        let mut manifest = String::new();
        for entry in &self.entries {
            let path = manifest_path(&entry.slide.path)?;
            // Writing to a String cannot fail.
            let _ = writeln!(manifest, "file '{path}'");
            let _ = writeln!(manifest, "duration {}", format_secs(entry.duration_secs));
        }
        Ok(manifest)
    }

    /// Write the manifest in one piece.
    pub fn write_manifest(&self, path: &Path) -> SlidecastResult<()> {
        let manifest = self.render_manifest()?;
        std::fs::write(path, manifest)?;
        tracing::debug!(path = %path.display(), entries = self.entries.len(), "Wrote manifest");
        Ok(())
    }
}

/// Shortest decimal form: `5`, `2.5`, `-2`.
pub fn format_secs(secs: f64) -> String {
    format!("{secs}")
}

fn manifest_path(path: &Path) -> SlidecastResult<String> {
    let absolute = std::path::absolute(path)?;
    let text = absolute.to_string_lossy().replace('\\', "/");
    Ok(text.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn slides(indices: &[u32]) -> Vec<SlideImage> {
        indices
            .iter()
            .map(|&i| SlideImage::new(i, PathBuf::from(format!("/deck/slide_{i}.png"))))
            .collect()
    }

    fn durations(manifest: &str) -> Vec<String> {
        manifest
            .lines()
            .filter_map(|l| l.strip_prefix("duration "))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_three_slides_five_seconds() {
        let timeline = Timeline::from_images(slides(&[1, 2, 3]), 5.0).unwrap();
        let manifest = timeline.render_manifest().unwrap();

        assert_eq!(durations(&manifest), vec!["5", "5", "1"]);
        assert_eq!(timeline.total_duration_secs(), 11.0);
    }

    #[test]
    fn test_single_slide_uses_terminal_duration() {
        let timeline = Timeline::from_images(slides(&[1]), 5.0).unwrap();
        let manifest = timeline.render_manifest().unwrap();

        assert_eq!(manifest.lines().count(), 2);
        assert_eq!(durations(&manifest), vec!["1"]);
        assert_eq!(timeline.total_duration_secs(), 1.0);
    }

    #[test]
    fn test_manifest_line_format() {
        let timeline = Timeline::from_images(slides(&[2, 1]), 2.5).unwrap();
        let manifest = timeline.render_manifest().unwrap();
        assert_eq!(
            manifest,
            "file '/deck/slide_1.png'\nduration 2.5\nfile '/deck/slide_2.png'\nduration 1\n"
        );
    }

    #[test]
    fn test_numeric_order_beats_lexical_order() {
        let timeline = Timeline::from_images(slides(&[10, 2, 1, 11, 3]), 4.0).unwrap();
        let manifest = timeline.render_manifest().unwrap();
        let files: Vec<&str> = manifest
            .lines()
            .filter(|l| l.starts_with("file "))
            .collect();
        assert_eq!(files[1], "file '/deck/slide_2.png'");
        assert_eq!(files[3], "file '/deck/slide_10.png'");
        assert_eq!(files[4], "file '/deck/slide_11.png'");
    }

    #[test]
    fn test_single_quotes_are_escaped() {
        let timeline = Timeline::from_images(
            vec![SlideImage::new(1, "/talks/Bob's deck/slide_1.png")],
            5.0,
        )
        .unwrap();
        let manifest = timeline.render_manifest().unwrap();
        assert!(manifest.starts_with(r"file '/talks/Bob'\''s deck/slide_1.png'"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let timeline =
            Timeline::from_images(vec![SlideImage::new(1, "TEMP/slide_1.png")], 5.0).unwrap();
        let manifest = timeline.render_manifest().unwrap();
        let path = manifest
            .lines()
            .next()
            .unwrap()
            .trim_start_matches("file '")
            .trim_end_matches('\'');
        assert!(Path::new(path).is_absolute());
        assert!(!path.contains('\\'));
        assert!(path.ends_with("TEMP/slide_1.png"));
    }

    #[test]
    fn test_empty_timeline_is_rejected() {
        assert!(matches!(
            Timeline::from_images(Vec::new(), 5.0),
            Err(SlidecastError::Timeline { .. })
        ));
    }

    #[test]
    fn test_from_dir_and_write_manifest() {
        let dir = std::env::temp_dir().join("slidecast_test_timeline_dir");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for i in [1, 2, 10] {
            std::fs::write(dir.join(format!("slide_{i}.png")), b"png").unwrap();
        }

        let timeline = Timeline::from_dir(&dir, 3.0).unwrap();
        let manifest_path = dir.join("input.txt");
        timeline.write_manifest(&manifest_path).unwrap();

        let written = std::fs::read_to_string(&manifest_path).unwrap();
        assert_eq!(durations(&written), vec!["3", "3", "1"]);
        assert!(written.lines().nth(4).unwrap().ends_with("slide_10.png'"));
    }

    proptest! {
        #[test]
        fn prop_manifest_shape(count in 1usize..60, slide_duration in 0.1f64..30.0) {
            let indices: Vec<u32> = (1..=count as u32).rev().collect();
            let timeline = Timeline::from_images(slides(&indices), slide_duration).unwrap();
            let manifest = timeline.render_manifest().unwrap();

            let file_lines = manifest.lines().filter(|l| l.starts_with("file '")).count();
            let duration_lines = durations(&manifest);
            prop_assert_eq!(file_lines, count);
            prop_assert_eq!(duration_lines.len(), count);
            prop_assert_eq!(duration_lines.last().unwrap().as_str(), "1");

            let expected = (count as f64 - 1.0) * slide_duration + 1.0;
            prop_assert!((timeline.total_duration_secs() - expected).abs() < 1e-6);
        }

        #[test]
        fn prop_entries_sorted_by_index(
            indices in proptest::collection::hash_set(1u32..500, 1..40)
        ) {
            let indices: Vec<u32> = indices.into_iter().collect();
            let timeline = Timeline::from_images(slides(&indices), 5.0).unwrap();
            let order: Vec<u32> = timeline.entries().iter().map(|e| e.slide.index).collect();
            let mut expected = indices.clone();
            expected.sort_unstable();
            prop_assert_eq!(order, expected);
        }
    }
}
