use super::*;
use crate::foundation::core::Canvas;

#[derive(Default)]
struct FakePlatform {
    direct: bool,
    clipboard: bool,
    download: bool,
    links: bool,
    shared: Vec<(String, String)>,
    clipboard_files: Vec<String>,
    downloads: Vec<String>,
    opened: Vec<String>,
}

impl SharePlatform for FakePlatform {
    fn share_files(&mut self, image: &ExportedImage, text: &str) -> TricolorResult<()> {
        if !self.direct {
            return Err(TricolorError::share_unsupported("no share sheet"));
        }
        self.shared.push((image.filename.clone(), text.to_string()));
        Ok(())
    }

    fn write_clipboard_image(&mut self, image: &ExportedImage) -> TricolorResult<()> {
        if !self.clipboard {
            return Err(TricolorError::share_unsupported("no clipboard"));
        }
        self.clipboard_files.push(image.filename.clone());
        Ok(())
    }

    fn save_download(&mut self, image: &ExportedImage) -> TricolorResult<String> {
        if !self.download {
            return Err(TricolorError::share_unsupported("no downloads"));
        }
        self.downloads.push(image.filename.clone());
        Ok(format!("downloads/{}", image.filename))
    }

    fn open_url(&mut self, url: &str) -> TricolorResult<()> {
        if !self.links {
            return Err(TricolorError::share_unsupported("no browser"));
        }
        self.opened.push(url.to_string());
        Ok(())
    }
}

fn surface() -> RasterSurface {
    RasterSurface::new(Canvas::new(40, 30).unwrap())
}

#[test]
fn caption_mentions_year_and_hashtag() {
    let svc = ExportService::new(FakePlatform::default(), 2025);
    assert_eq!(
        svc.caption(),
        "Celebrating Independence Day 2025! Proud to be Indian #IndependenceDay2025 #JaiHind"
    );
    let svc = svc.with_caption("Happy {year}");
    assert_eq!(svc.caption(), "Happy 2025");
}

#[test]
fn deep_link_encodes_caption() {
    let svc = ExportService::new(FakePlatform::default(), 2025);
    let link = svc.deep_link().unwrap();
    assert!(link.starts_with("https://wa.me/?text="), "{link}");
    assert!(link.contains("%23IndependenceDay2025"), "{link}");
    assert!(!link.contains(' '));

    let parsed = url::Url::parse(&link).unwrap();
    let (_, text) = parsed.query_pairs().next().unwrap();
    assert_eq!(text, svc.caption());
}

#[test]
fn direct_share_is_preferred() {
    let platform = FakePlatform {
        direct: true,
        clipboard: true,
        download: true,
        links: true,
        ..FakePlatform::default()
    };
    let mut svc = ExportService::new(platform, 2025);
    let outcome = svc.share(&surface(), "Asha Rani").unwrap();
    assert_eq!(outcome, ShareOutcome::SharedDirectly);
    assert_eq!(outcome.message(), "Shared successfully! 🇮🇳");

    let p = svc.platform();
    assert_eq!(p.shared.len(), 1);
    assert_eq!(p.shared[0].0, "IndependenceDay2025_Asha_Rani.png");
    assert!(p.clipboard_files.is_empty());
    assert!(p.downloads.is_empty());
}

#[test]
fn clipboard_tier_opens_deep_link() {
    let platform = FakePlatform {
        clipboard: true,
        download: true,
        links: true,
        ..FakePlatform::default()
    };
    let mut svc = ExportService::new(platform, 2025);
    let link = svc.deep_link().unwrap();
    let outcome = svc.share(&surface(), "Asha").unwrap();
    assert_eq!(
        outcome,
        ShareOutcome::CopiedToClipboard {
            deep_link: link.clone()
        }
    );
    assert_eq!(svc.platform().opened, vec![link]);
    assert!(svc.platform().downloads.is_empty());
}

#[test]
fn clipboard_without_links_falls_through_to_download() {
    let platform = FakePlatform {
        clipboard: true,
        download: true,
        ..FakePlatform::default()
    };
    let mut svc = ExportService::new(platform, 2025);
    let outcome = svc.share(&surface(), "Asha").unwrap();
    match outcome {
        ShareOutcome::Downloaded {
            location,
            link_opened,
            ..
        } => {
            assert_eq!(location, "downloads/IndependenceDay2025_Asha.png");
            assert!(!link_opened);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn nothing_available_yields_manual_instructions() {
    let mut svc = ExportService::new(FakePlatform::default(), 2025);
    let outcome = svc.share(&surface(), "Asha").unwrap();
    assert!(matches!(outcome, ShareOutcome::ManualInstructions { .. }));
    assert!(!outcome.message().is_empty());
}

#[test]
fn empty_name_fails_before_any_side_effect() {
    let platform = FakePlatform {
        direct: true,
        clipboard: true,
        download: true,
        links: true,
        ..FakePlatform::default()
    };
    let mut svc = ExportService::new(platform, 2025);
    assert!(matches!(
        svc.share(&surface(), "  "),
        Err(TricolorError::Validation(_))
    ));
    assert!(matches!(
        svc.download(&surface(), ""),
        Err(TricolorError::Validation(_))
    ));
    let p = svc.platform();
    assert!(p.shared.is_empty() && p.downloads.is_empty() && p.opened.is_empty());
}

#[test]
fn desktop_platform_writes_downloads() {
    let dir = std::path::PathBuf::from("target/share_desktop_test");
    let _ = std::fs::remove_dir_all(&dir);

    let mut svc = ExportService::new(DesktopPlatform::new(&dir), 2026);
    let receipt = svc.download(&surface(), "Ravi").unwrap();
    assert_eq!(receipt.filename, "IndependenceDay2026_Ravi.png");
    let bytes = std::fs::read(dir.join(&receipt.filename)).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));

    let outcome = svc.share(&surface(), "Ravi").unwrap();
    assert!(matches!(
        outcome,
        ShareOutcome::Downloaded {
            link_opened: true,
            ..
        }
    ));
    assert_eq!(svc.platform().opened_links().len(), 1);
}
