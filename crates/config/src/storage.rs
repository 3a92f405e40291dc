// Local key/value store
// One JSON document per key under ~/.config/sitetools/storage/<key>.json

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use sitetools_core::lenient::parse_entries;

/// Palette, pins and saved styles. Shared by every tool.
pub const COLORS_KEY: &str = "websitetools-colors";
pub const PAGES_KEY: &str = "frontmatterPages";
pub const IMAGES_KEY: &str = "imageShortcodeGeneratorState";
pub const VIDEOS_KEY: &str = "videoShortcodeGeneratorState";

#[derive(Debug)]
pub enum StorageError {
    InvalidKey(String),
    Io { path: PathBuf, message: String },
    Parse { key: String, message: String },
    Encode { key: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidKey(key) => write!(f, "invalid storage key '{}'", key),
            StorageError::Io { path, message } => write!(f, "{}: {}", path.display(), message),
            StorageError::Parse { key, message } => write!(f, "stored '{}' is not valid: {}", key, message),
            StorageError::Encode { key, message } => write!(f, "could not encode '{}': {}", key, message),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Default store directory
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitetools")
            .join("storage")
    }

    pub fn open_default() -> Self {
        Self::at(Self::default_root())
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    /// Raw document text, or None if the key was never written.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Io { path, message: e.to_string() })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_raw(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::Parse { key: key.to_string(), message: e.to_string() }),
            None => Ok(None),
        }
    }

    /// Load a document, falling back to the default when it is missing or
    /// unreadable. An unreadable document is moved aside first so the next
    /// write cannot destroy it.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("{}; starting from empty state", e);
                self.set_aside(key);
                T::default()
            }
        }
    }

    /// Load a list document entry by entry. Entries that fail to decode are
    /// skipped and the original document is copied aside.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.get::<Value>(key) {
            Ok(Some(Value::Array(values))) => {
                let total = values.len();
                let items: Vec<T> = parse_entries(values);
                if items.len() < total {
                    self.copy_aside(key);
                }
                items
            }
            Ok(Some(Value::Null)) | Ok(None) => Vec::new(),
            Ok(Some(_)) => {
                log::warn!("stored '{}' is not a list; starting from empty state", key);
                self.set_aside(key);
                Vec::new()
            }
            Err(e) => {
                log::warn!("{}; starting from empty state", e);
                self.set_aside(key);
                Vec::new()
            }
        }
    }

    /// Path an unreadable document is moved to.
    pub fn set_aside_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.path_for(key)?.with_extension("json.bad"))
    }

    fn set_aside(&self, key: &str) {
        let (Ok(path), Ok(bad)) = (self.path_for(key), self.set_aside_path(key)) else {
            return;
        };
        match fs::rename(&path, &bad) {
            Ok(()) => log::warn!("kept unreadable '{}' as {}", key, bad.display()),
            Err(e) => log::warn!("could not move {} aside: {}", path.display(), e),
        }
    }

    fn copy_aside(&self, key: &str) {
        let (Ok(path), Ok(bad)) = (self.path_for(key), self.set_aside_path(key)) else {
            return;
        };
        match fs::copy(&path, &bad) {
            Ok(_) => log::warn!("kept original '{}' as {}", key, bad.display()),
            Err(e) => log::warn!("could not copy {} aside: {}", path.display(), e),
        }
    }

    /// Write a document. Written to a sibling temp file first, then renamed
    /// over the old one.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |path: &Path, e: std::io::Error| StorageError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.root).map_err(|e| io_err(&self.root, e))?;

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Encode { key: key.to_string(), message: e.to_string() })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Delete a key. Returns whether anything was removed.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| StorageError::Io { path, message: e.to_string() })?;
        Ok(true)
    }

    /// Read-modify-write. A corrupt document is set aside and replaced by
    /// the default.
    pub fn update<T, R, F>(&self, key: &str, f: F) -> Result<R, StorageError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let mut value: T = self.load_or_default(key);
        let result = f(&mut value);
        self.set(key, &value)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path().join("store"));
        assert!(store.get_raw(PAGES_KEY).unwrap().is_none());
        assert_eq!(store.load_or_default::<Vec<String>>(PAGES_KEY), Vec::<String>::new());
        assert!(!store.remove(PAGES_KEY).unwrap());
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());

        store.set(VIDEOS_KEY, &vec![1, 2, 3]).unwrap();
        assert!(dir.path().join("videoShortcodeGeneratorState.json").exists());
        assert_eq!(store.get::<Vec<i32>>(VIDEOS_KEY).unwrap(), Some(vec![1, 2, 3]));

        assert!(store.remove(VIDEOS_KEY).unwrap());
        assert!(store.get::<Vec<i32>>(VIDEOS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_document() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        fs::write(dir.path().join("frontmatterPages.json"), "{not json").unwrap();

        assert!(matches!(store.get::<Vec<i32>>(PAGES_KEY), Err(StorageError::Parse { .. })));
        assert!(store.load_or_default::<Vec<i32>>(PAGES_KEY).is_empty());

        // The broken text survives a later write.
        store.set(PAGES_KEY, &vec![1]).unwrap();
        let kept = fs::read_to_string(store.set_aside_path(PAGES_KEY).unwrap()).unwrap();
        assert_eq!(kept, "{not json");
    }

    #[test]
    fn test_load_list_skips_bad_entries() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        fs::write(dir.path().join("frontmatterPages.json"), r#"[1, "two", 3, null]"#).unwrap();

        assert_eq!(store.load_list::<i32>(PAGES_KEY), vec![1, 3]);
        assert!(store.load_list::<i32>(VIDEOS_KEY).is_empty());

        let kept = fs::read_to_string(store.set_aside_path(PAGES_KEY).unwrap()).unwrap();
        assert_eq!(kept, r#"[1, "two", 3, null]"#);
        assert!(store.get_raw(PAGES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_list_sets_aside_non_list() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        fs::write(dir.path().join("frontmatterPages.json"), r#"{"pages": []}"#).unwrap();

        assert!(store.load_list::<i32>(PAGES_KEY).is_empty());
        assert!(store.set_aside_path(PAGES_KEY).unwrap().exists());
        assert!(store.get_raw(PAGES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());

        let len = store.update(IMAGES_KEY, |v: &mut Vec<String>| {
            v.push("a".into());
            v.len()
        });
        assert_eq!(len.unwrap(), 1);
        store.update(IMAGES_KEY, |v: &mut Vec<String>| v.push("b".into())).unwrap();
        assert_eq!(store.get::<Vec<String>>(IMAGES_KEY).unwrap().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_key() {
        let store = Store::at("/tmp/unused");
        assert!(matches!(store.path_for("../etc"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.path_for(""), Err(StorageError::InvalidKey(_))));
    }
}
