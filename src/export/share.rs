use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    export::encode::{ExportFormat, ExportedImage, export_filename, to_file},
    foundation::error::{TricolorError, TricolorResult},
    render::surface::RasterSurface,
};

/// Messaging deep link the caption is handed to.
pub const SHARE_BASE_URL: &str = "https://wa.me/";

/// Default caption; `{year}` is replaced by the celebration year.
pub const DEFAULT_CAPTION: &str =
    "Celebrating Independence Day {year}! Proud to be Indian #IndependenceDay{year} #JaiHind";

/// Platform capabilities the share chain is built on.
///
/// Capabilities a platform lacks report [`TricolorError::ShareUnsupported`].
pub trait SharePlatform {
    /// Share image and caption together in one call.
    fn share_files(&mut self, image: &ExportedImage, text: &str) -> TricolorResult<()>;
    fn write_clipboard_image(&mut self, image: &ExportedImage) -> TricolorResult<()>;
    /// Save the image locally; returns where it went.
    fn save_download(&mut self, image: &ExportedImage) -> TricolorResult<String>;
    fn open_url(&mut self, url: &str) -> TricolorResult<()>;
}

impl<T: SharePlatform + ?Sized> SharePlatform for &mut T {
    fn share_files(&mut self, image: &ExportedImage, text: &str) -> TricolorResult<()> {
        (**self).share_files(image, text)
    }

    fn write_clipboard_image(&mut self, image: &ExportedImage) -> TricolorResult<()> {
        (**self).write_clipboard_image(image)
    }

    fn save_download(&mut self, image: &ExportedImage) -> TricolorResult<String> {
        (**self).save_download(image)
    }

    fn open_url(&mut self, url: &str) -> TricolorResult<()> {
        (**self).open_url(url)
    }
}

/// Result of a [`ExportService::download`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadReceipt {
    pub filename: String,
    pub location: String,
}

/// Which share tier succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform shared image and caption together.
    SharedDirectly,
    /// Image is on the clipboard and the deep link was opened.
    CopiedToClipboard { deep_link: String },
    /// Image was saved locally; `link_opened` tells whether the deep link could be opened.
    Downloaded {
        location: String,
        deep_link: String,
        link_opened: bool,
    },
    /// Nothing automatic worked.
    ManualInstructions { deep_link: String },
}

impl ShareOutcome {
    /// What to tell the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::SharedDirectly => "Shared successfully! 🇮🇳",
            Self::CopiedToClipboard { .. } => {
                "Image copied to clipboard. Paste it into your message to share it."
            }
            Self::Downloaded { .. } => {
                "Image downloaded. Attach the saved file to your message to share it."
            }
            Self::ManualInstructions { .. } => {
                "Sharing is not available here. Save the image and share it manually."
            }
        }
    }
}

/// Saves and shares rendered cards.
pub struct ExportService<P> {
    platform: P,
    year: u32,
    format: ExportFormat,
    caption: String,
}

impl<P: SharePlatform> ExportService<P> {
    pub fn new(platform: P, year: u32) -> Self {
        Self {
            platform,
            year,
            format: ExportFormat::Png,
            caption: DEFAULT_CAPTION.replace("{year}", &year.to_string()),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the caption; `{year}` is substituted.
    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = caption.replace("{year}", &self.year.to_string());
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Deep link carrying the caption as its `text` query parameter.
    pub fn deep_link(&self) -> TricolorResult<String> {
        let url = url::Url::parse_with_params(SHARE_BASE_URL, &[("text", self.caption.as_str())])
            .map_err(|e| TricolorError::validation(format!("share link: {e}")))?;
        Ok(url.to_string())
    }

    /// Encode `surface` as a file called `filename`.
    pub fn to_file(&self, surface: &RasterSurface, filename: &str) -> TricolorResult<ExportedImage> {
        to_file(surface, filename, self.format)
    }

    /// File for a card made for `name`. Fails before encoding when the name is empty.
    pub fn export_for(&self, surface: &RasterSurface, name: &str) -> TricolorResult<ExportedImage> {
        let filename = export_filename(self.year, name, self.format.extension())?;
        self.to_file(surface, &filename)
    }

    /// Save the card locally.
    pub fn download(&mut self, surface: &RasterSurface, name: &str) -> TricolorResult<DownloadReceipt> {
        let image = self.export_for(surface, name)?;
        let location = self.platform.save_download(&image)?;
        info!(file = %image.filename, location = %location, "card downloaded");
        Ok(DownloadReceipt {
            filename: image.filename,
            location,
        })
    }

    /// Share the card through the best tier the platform supports.
    ///
    /// Only an empty name or an encoding failure is an error. Tier failures fall through to
    /// the next tier, and when the last one fails too the user gets manual instructions.
    #[tracing::instrument(skip(self, surface))]
    pub fn share(&mut self, surface: &RasterSurface, name: &str) -> TricolorResult<ShareOutcome> {
        let image = self.export_for(surface, name)?;
        let deep_link = self.deep_link()?;

        match self.platform.share_files(&image, &self.caption) {
            Ok(()) => {
                info!("shared through the platform share sheet");
                return Ok(ShareOutcome::SharedDirectly);
            }
            Err(e) => debug!(error = %e, "direct file share unavailable"),
        }

        match self
            .platform
            .write_clipboard_image(&image)
            .and_then(|()| self.platform.open_url(&deep_link))
        {
            Ok(()) => {
                info!("image copied to clipboard, deep link opened");
                return Ok(ShareOutcome::CopiedToClipboard { deep_link });
            }
            Err(e) => debug!(error = %e, "clipboard share unavailable"),
        }

        let location = match self.platform.save_download(&image) {
            Ok(loc) => loc,
            Err(e) => {
                warn!(error = %e, "download failed; falling back to manual instructions");
                return Ok(ShareOutcome::ManualInstructions { deep_link });
            }
        };
        let link_opened = match self.platform.open_url(&deep_link) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not open share link");
                false
            }
        };
        info!(location = %location, link_opened, "card downloaded for manual sharing");
        Ok(ShareOutcome::Downloaded {
            location,
            deep_link,
            link_opened,
        })
    }
}

/// Desktop platform used by the CLI: downloads land in a directory, links are recorded and
/// logged, and neither direct sharing nor clipboard images are available.
#[derive(Clone, Debug)]
pub struct DesktopPlatform {
    out_dir: PathBuf,
    opened: Vec<String>,
}

impl DesktopPlatform {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            opened: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Links handed to [`SharePlatform::open_url`], oldest first.
    pub fn opened_links(&self) -> &[String] {
        &self.opened
    }
}

impl SharePlatform for DesktopPlatform {
    fn share_files(&mut self, _image: &ExportedImage, _text: &str) -> TricolorResult<()> {
        Err(TricolorError::share_unsupported("no system share sheet"))
    }

    fn write_clipboard_image(&mut self, _image: &ExportedImage) -> TricolorResult<()> {
        Err(TricolorError::share_unsupported("clipboard images are not supported"))
    }

    fn save_download(&mut self, image: &ExportedImage) -> TricolorResult<String> {
        if image.filename.contains(['/', '\\']) {
            return Err(TricolorError::validation(format!(
                "download name \"{}\" must be a plain file name",
                image.filename
            )));
        }
        fs::create_dir_all(&self.out_dir).map_err(|e| {
            anyhow::Error::new(e).context(format!("create '{}'", self.out_dir.display()))
        })?;
        let path = self.out_dir.join(&image.filename);
        fs::write(&path, &image.bytes)
            .map_err(|e| anyhow::Error::new(e).context(format!("write '{}'", path.display())))?;
        Ok(path.display().to_string())
    }

    fn open_url(&mut self, url: &str) -> TricolorResult<()> {
        info!(url, "open share link");
        self.opened.push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/share.rs"]
mod tests;
