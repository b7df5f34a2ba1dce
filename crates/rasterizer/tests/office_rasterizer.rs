//! Drives `OfficeRasterizer` against shell stand-ins for soffice, pdfinfo and
//! pdftoppm.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use slidecast_common::config::AppConfig;
use slidecast_common::error::SlidecastError;
use slidecast_project_model::params::Resolution;
use slidecast_project_model::workspace::RunWorkspace;
use slidecast_rasterizer::{OfficeRasterizer, RasterProgress, SlideRasterizer};

struct Fixture {
    root: PathBuf,
    deck: PathBuf,
    workspace: RunWorkspace,
    config: AppConfig,
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn fixture(name: &str, pages: u32, soffice_exit: i32) -> Fixture {
    fixture_with_deck(name, "talk.pptx", pages, soffice_exit)
}

fn fixture_with_deck(name: &str, deck_name: &str, pages: u32, soffice_exit: i32) -> Fixture {
    let root = std::env::temp_dir().join(format!("slidecast_test_office_{name}"));
    let _ = std::fs::remove_dir_all(&root);
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();

    let template = root.join("template.png");
    image::RgbImage::from_pixel(17, 9, image::Rgb([200, 10, 10]))
        .save(&template)
        .unwrap();

    let deck = root.join(deck_name);
    std::fs::write(&deck, b"pptx").unwrap();

    let soffice = bin.join("soffice");
    let soffice_body = if soffice_exit == 0 {
        r#"outdir=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--outdir" ]; then outdir="$arg"; fi
  prev="$arg"
  deck="$arg"
done
name=$(basename "$deck")
printf '%%PDF-1.4 fake' > "$outdir/${name%.*}.pdf""#
            .to_string()
    } else {
        format!("echo 'source file could not be loaded' >&2\nexit {soffice_exit}")
    };
    write_script(&soffice, &soffice_body);

    let pdfinfo = bin.join("pdfinfo");
    write_script(
        &pdfinfo,
        &format!("echo 'Producer:       fake'\necho 'Pages:          {pages}'"),
    );

    let calls = root.join("pdftoppm_calls.txt");
    let pdftoppm = bin.join("pdftoppm");
    write_script(
        &pdftoppm,
        &format!(
            "echo \"$*\" >> '{}'\nfor last in \"$@\"; do :; done\ncp '{}' \"$last.png\"",
            calls.display(),
            template.display()
        ),
    );

    let mut config = AppConfig::default();
    config.tools.soffice = soffice;
    config.tools.pdfinfo = pdfinfo;
    config.tools.pdftoppm = pdftoppm;
    config.rasterizer.export_timeout_secs = 10;
    config.rasterizer.poll_interval_ms = 10;

    let workspace = RunWorkspace::new(root.join("TEMP"));
    workspace.reset().unwrap();

    Fixture {
        root,
        deck,
        workspace,
        config,
    }
}

#[tokio::test]
async fn test_exports_every_slide_in_order() {
    let fx = fixture("three", 3, 0);
    let rasterizer = OfficeRasterizer::from_config(&fx.config);
    assert!(rasterizer.is_available());

    let mut seen = Vec::new();
    let slides = rasterizer
        .rasterize(&fx.deck, &fx.workspace, Resolution::Auto, &mut |p| {
            seen.push(p)
        })
        .await
        .unwrap();

    assert_eq!(
        slides.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    for slide in &slides {
        assert_eq!(slide.path, fx.workspace.slide_path(slide.index));
        assert_eq!(image::image_dimensions(&slide.path).unwrap(), (17, 9));
    }
    assert_eq!(
        seen,
        vec![
            RasterProgress { current: 1, total: 3 },
            RasterProgress { current: 2, total: 3 },
            RasterProgress { current: 3, total: 3 },
        ]
    );
    assert!(fx.workspace.deck_pdf_path().is_file());
    assert!(!fx.workspace.root().join(".editor-profile").exists());

    let calls = std::fs::read_to_string(fx.root.join("pdftoppm_calls.txt")).unwrap();
    let calls: Vec<&str> = calls.lines().collect();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("-png -f 1 -l 1 -singlefile -r 96 "));
    assert!(calls[2].starts_with("-png -f 3 -l 3 -singlefile -r 96 "));
}

#[tokio::test]
async fn test_explicit_resolution_is_passed_to_pdftoppm() {
    let fx = fixture("explicit", 1, 0);
    let rasterizer = OfficeRasterizer::from_config(&fx.config);

    rasterizer
        .rasterize(
            &fx.deck,
            &fx.workspace,
            Resolution::Explicit {
                width: 1280,
                height: 720,
            },
            &mut |_| {},
        )
        .await
        .unwrap();

    let calls = std::fs::read_to_string(fx.root.join("pdftoppm_calls.txt")).unwrap();
    assert!(calls.contains("-scale-to-x 1280 -scale-to-y 720"));
}

#[tokio::test]
async fn test_editor_failure_aborts_and_releases_profile() {
    let fx = fixture("editor_fails", 3, 2);
    let rasterizer = OfficeRasterizer::from_config(&fx.config);

    let err = rasterizer
        .rasterize(&fx.deck, &fx.workspace, Resolution::Auto, &mut |_| {})
        .await
        .unwrap_err();

    match err {
        SlidecastError::Automation { message } => {
            assert!(message.contains("could not be loaded"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fx.workspace.root().join(".editor-profile").exists());
    assert!(!fx.workspace.slide_path(1).exists());
}

#[tokio::test]
async fn test_empty_deck_is_an_automation_error() {
    let fx = fixture("empty", 0, 0);
    let rasterizer = OfficeRasterizer::from_config(&fx.config);

    let err = rasterizer
        .rasterize(&fx.deck, &fx.workspace, Resolution::Auto, &mut |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, SlidecastError::Automation { .. }));
}

#[tokio::test]
async fn test_missing_deck_is_reported_before_any_tool_runs() {
    let fx = fixture("missing_deck", 2, 0);
    let rasterizer = OfficeRasterizer::from_config(&fx.config);

    let err = rasterizer
        .rasterize(
            &fx.root.join("absent.pptx"),
            &fx.workspace,
            Resolution::Auto,
            &mut |_| {},
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SlidecastError::MissingInput { .. }));
    assert!(!fx.root.join("pdftoppm_calls.txt").exists());
}

#[tokio::test]
async fn test_deck_name_with_dots_keeps_full_stem() {
    let fx = fixture_with_deck("dotted", "Q3.2024 review.pptx", 2, 0);
    let rasterizer = OfficeRasterizer::from_config(&fx.config);

    let slides = rasterizer
        .rasterize(&fx.deck, &fx.workspace, Resolution::Auto, &mut |_| {})
        .await
        .unwrap();

    assert_eq!(slides.len(), 2);
    assert!(fx.workspace.deck_pdf_path().is_file());
    assert!(!fx.workspace.root().join("Q3.2024 review.pdf").exists());
}
