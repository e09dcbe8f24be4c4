//! Persisted session storage
//!
//! The session survives restarts as two key-value entries: the bearer token
//! and the serialized user. Backends only know about string keys and values;
//! [`SessionStorage`] gives them their typed meaning.

use crate::error::StorageError;
use crate::types::User;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Storage key names
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token entry
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Serialized user entry
    pub const USER: &'static str = "user";
}

/// A string key-value store, shaped like browser local storage
pub trait StorageBackend: Send + Sync + fmt::Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Storage kept in a single JSON object on disk
///
/// Every write rewrites the whole file. A missing file reads as empty, and
/// the file is deleted once its last entry is removed.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if items.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content)?;
        debug!("Wrote session storage to {:?}", self.path);
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// Typed view over the two persisted session entries
#[derive(Debug, Clone)]
pub struct SessionStorage {
    backend: Arc<dyn StorageBackend>,
}

impl SessionStorage {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Storage that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Storage persisted to a JSON file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .backend
            .get_item(StorageKeys::ACCESS_TOKEN)?
            .filter(|token| !token.is_empty()))
    }

    pub fn user(&self) -> Result<Option<User>, StorageError> {
        match self.backend.get_item(StorageKeys::USER)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.backend.set_item(StorageKeys::ACCESS_TOKEN, token)
    }

    pub fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(user)?;
        self.backend.set_item(StorageKeys::USER, &serialized)
    }

    /// Write both entries of a freshly established session
    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        self.set_token(token)?;
        self.set_user(user)
    }

    /// Remove both entries. Attempts the second removal even if the first fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.backend.remove_item(StorageKeys::ACCESS_TOKEN);
        let user = self.backend.remove_item(StorageKeys::USER);
        if let Err(e) = &token {
            warn!("Failed to remove persisted token: {e}");
        }
        token.and(user)
    }

    /// True when neither entry is present
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.backend.get_item(StorageKeys::ACCESS_TOKEN)?.is_none()
            && self.backend.get_item(StorageKeys::USER)?.is_none())
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        serde_json::from_str(
            r#"{"id": 42, "username": "newuser", "email": "a@b.com", "bio": "hi"}"#,
        )
        .unwrap()
    }

    #[test]
    fn memory_storage_round_trips_session() {
        let storage = SessionStorage::in_memory();
        assert!(storage.is_empty().unwrap());

        storage.save("tok", &user()).unwrap();
        assert_eq!(storage.token().unwrap().as_deref(), Some("tok"));
        assert_eq!(storage.user().unwrap(), Some(user()));

        storage.clear().unwrap();
        assert!(storage.is_empty().unwrap());
        assert_eq!(storage.token().unwrap(), None);
        assert_eq!(storage.user().unwrap(), None);
    }

    #[test]
    fn empty_token_reads_as_absent() {
        let storage = SessionStorage::in_memory();
        storage.set_token("").unwrap();
        assert_eq!(storage.token().unwrap(), None);
    }

    #[test]
    fn corrupt_user_entry_is_an_error() {
        let backend = Arc::new(MemoryStorage::new());
        backend.set_item(StorageKeys::USER, "{not json").unwrap();
        let storage = SessionStorage::new(backend);
        assert!(matches!(storage.user(), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        SessionStorage::file(&path).save("tok", &user()).unwrap();
        assert!(path.exists());

        let reopened = SessionStorage::file(&path);
        assert_eq!(reopened.token().unwrap().as_deref(), Some("tok"));
        assert_eq!(reopened.user().unwrap().map(|u| u.id), Some(42));

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert!(reopened.is_empty().unwrap());
    }

    #[test]
    fn file_storage_treats_missing_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get_item("anything").unwrap(), None);
        storage.remove_item("anything").unwrap();
    }
}
