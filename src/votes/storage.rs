use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context;

use crate::foundation::error::{TricolorError, TricolorResult};

/// Durable string key/value storage on the client, the shape of browser local storage.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> TricolorResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> TricolorResult<()>;
    fn remove_item(&self, key: &str) -> TricolorResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn get_item(&self, key: &str) -> TricolorResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> TricolorResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> TricolorResult<()> {
        (**self).remove_item(key)
    }
}

/// Volatile storage for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> TricolorResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> TricolorResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> TricolorResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// One file per key below a directory (`<dir>/<key>.json`).
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> TricolorResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create storage dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> TricolorResult<PathBuf> {
        if key.is_empty()
            || !key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(TricolorError::validation(format!(
                "storage key \"{key}\" must be non-empty [A-Za-z0-9_-]"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> TricolorResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read storage item '{}'", path.display()))
                .into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> TricolorResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .with_context(|| format!("write storage item '{}'", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> TricolorResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove storage item '{}'", path.display()))
                .into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/storage.rs"]
mod tests;
