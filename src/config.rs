use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    foundation::{
        core::Canvas,
        error::{TricolorError, TricolorResult},
    },
    votes::service::VotePolicy,
};

/// Uploads above this size are rejected before they are read.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_CELEBRATION_YEAR: u32 = 2025;

/// Runtime settings for the CLI and the services it wires together.
///
/// Every field has a default, so an empty JSON object (or no file at all) is a valid config.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root for the vote documents and the local ledger.
    pub data_dir: PathBuf,
    /// Base directory relative asset references resolve against.
    pub assets_root: PathBuf,
    /// Font used for card text; the system font directories are searched when unset.
    pub font_path: Option<PathBuf>,
    pub celebration_year: u32,
    pub canvas: Canvas,
    pub max_upload_bytes: u64,
    pub vote_policy: VotePolicy,
    /// Share caption override. `{year}` is replaced by the celebration year.
    pub share_caption: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("tricolor-data"),
            assets_root: PathBuf::from("."),
            font_path: None,
            celebration_year: DEFAULT_CELEBRATION_YEAR,
            canvas: Canvas::canonical(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            vote_policy: VotePolicy::default(),
            share_caption: None,
        }
    }
}

impl Config {
    /// Read `path` when given, then apply `TRICOLOR_*` environment overrides.
    pub fn load(path: Option<&Path>) -> TricolorResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> TricolorResult<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_json_str(&text)?;
        info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> TricolorResult<Self> {
        serde_json::from_str(text).map_err(|e| TricolorError::serde(format!("config: {e}")))
    }

    /// Apply overrides from `lookup`, which maps an environment variable name to its value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> TricolorResult<()> {
        if let Some(v) = lookup("TRICOLOR_DATA_DIR") {
            info!(value = %v, "TRICOLOR_DATA_DIR override");
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("TRICOLOR_ASSETS_ROOT") {
            info!(value = %v, "TRICOLOR_ASSETS_ROOT override");
            self.assets_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("TRICOLOR_FONT") {
            info!(value = %v, "TRICOLOR_FONT override");
            self.font_path = Some(PathBuf::from(v));
        }
        if let Some(v) = parsed(&lookup, "TRICOLOR_YEAR")? {
            self.celebration_year = v;
        }
        if let Some(v) = parsed(&lookup, "TRICOLOR_MAX_UPLOAD_BYTES")? {
            self.max_upload_bytes = v;
        }
        if let Some(v) = parsed(&lookup, "TRICOLOR_VOTE_POLICY")? {
            self.vote_policy = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> TricolorResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if self.max_upload_bytes == 0 {
            return Err(TricolorError::validation("max_upload_bytes must be > 0"));
        }
        if !(1947..=9999).contains(&self.celebration_year) {
            return Err(TricolorError::validation(format!(
                "celebration_year {} is out of range",
                self.celebration_year
            )));
        }
        Ok(())
    }

    /// Directory holding the `freedom_fighter_votes` collection.
    pub fn remote_dir(&self) -> PathBuf {
        self.data_dir.join("remote")
    }

    /// Directory backing the client-side key/value storage.
    pub fn local_dir(&self) -> PathBuf {
        self.data_dir.join("local")
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> TricolorResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        debug!("{key} not set, keeping configured value");
        return Ok(None);
    };
    let v = raw
        .trim()
        .parse::<T>()
        .map_err(|e| TricolorError::validation(format!("invalid {key} value \"{raw}\": {e}")))?;
    info!(value = %raw, "{key} override");
    Ok(Some(v))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
