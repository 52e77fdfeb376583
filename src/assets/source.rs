use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    sync::Arc,
};

use tracing::debug;

use crate::foundation::error::{TricolorError, TricolorResult};

/// Resolves a scene's asset reference (background bitmap, user photo) to raw bytes.
pub trait AssetSource {
    fn load(&self, reference: &str) -> TricolorResult<Vec<u8>>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn load(&self, reference: &str) -> TricolorResult<Vec<u8>> {
        (**self).load(reference)
    }
}

impl<T: AssetSource + ?Sized> AssetSource for Rc<T> {
    fn load(&self, reference: &str) -> TricolorResult<Vec<u8>> {
        (**self).load(reference)
    }
}

/// Reject an upload of `size` bytes when it exceeds `limit`.
pub fn validate_upload(size: u64, limit: u64) -> TricolorResult<()> {
    if size > limit {
        return Err(TricolorError::FileTooLarge { size, limit });
    }
    Ok(())
}

/// Normalize a relative asset path: `/` separators, no `.` segments, no absolute paths and no
/// parent traversal.
pub fn normalize_rel_path(source: &str) -> TricolorResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(TricolorError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') || s.contains(':') {
        return Err(TricolorError::validation(format!(
            "asset path \"{source}\" must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(TricolorError::validation(format!(
                    "asset path \"{source}\" must not contain '..'"
                )));
            }
            p => out.push(p),
        }
    }
    if out.is_empty() {
        return Err(TricolorError::validation("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Assets read from files below a root directory.
///
/// The size ceiling is checked against file metadata, so an oversized upload is rejected
/// without reading it.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
    max_bytes: Option<u64>,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: None,
        }
    }

    pub fn with_max_bytes(mut self, limit: u64) -> Self {
        self.max_bytes = Some(limit);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, reference: &str) -> TricolorResult<PathBuf> {
        Ok(self.root.join(normalize_rel_path(reference)?))
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, reference: &str) -> TricolorResult<Vec<u8>> {
        let path = self.resolve(reference)?;
        let meta = fs::metadata(&path)
            .map_err(|e| TricolorError::asset_load(format!("'{}': {e}", path.display())))?;
        if !meta.is_file() {
            return Err(TricolorError::asset_load(format!(
                "'{}' is not a file",
                path.display()
            )));
        }
        if let Some(limit) = self.max_bytes {
            validate_upload(meta.len(), limit)?;
        }
        let bytes = fs::read(&path)
            .map_err(|e| TricolorError::asset_load(format!("read '{}': {e}", path.display())))?;
        debug!(path = %path.display(), len = bytes.len(), "asset read");
        Ok(bytes)
    }
}

/// Assets held in memory under normalized names.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    items: BTreeMap<String, Arc<[u8]>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: &str, bytes: impl Into<Arc<[u8]>>) -> TricolorResult<()> {
        self.items
            .insert(normalize_rel_path(reference)?, bytes.into());
        Ok(())
    }

    pub fn with(mut self, reference: &str, bytes: impl Into<Arc<[u8]>>) -> TricolorResult<Self> {
        self.insert(reference, bytes)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, reference: &str) -> TricolorResult<Vec<u8>> {
        let key = normalize_rel_path(reference)?;
        self.items
            .get(&key)
            .map(|b| b.to_vec())
            .ok_or_else(|| TricolorError::asset_load(format!("no asset named \"{key}\"")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
