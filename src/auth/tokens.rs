//! Token storage and management

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Access/refresh credential pair issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token store trait for different storage backends.
///
/// Tokens are opaque strings; nothing here inspects or validates them.
/// Methods take `&self` because one store is shared by every in-flight
/// request. Writes are last-write-wins and never fail: a backend that cannot
/// persist must log and carry on.
pub trait TokenStore: Send + Sync {
    fn access(&self) -> Option<String>;
    fn refresh(&self) -> Option<String>;
    fn set_access(&self, token: &str);
    fn set_refresh(&self, token: &str);
    fn clear(&self);

    fn set_pair(&self, access: &str, refresh: &str) {
        self.set_access(access);
        self.set_refresh(refresh);
    }

    fn pair(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access: self.access()?,
            refresh: self.refresh()?,
        })
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: RwLock<Slots>,
}

#[derive(Debug, Default, Clone)]
struct Slots {
    access: Option<String>,
    refresh: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(access: &str, refresh: &str) -> Self {
        let store = Self::new();
        store.set_pair(access, refresh);
        store
    }

    fn read(&self) -> Slots {
        self.inner.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn write(&self, f: impl FnOnce(&mut Slots)) {
        let mut slots = self.inner.write().unwrap_or_else(|p| p.into_inner());
        f(&mut *slots);
    }
}

impl TokenStore for MemoryTokenStore {
    fn access(&self) -> Option<String> {
        self.read().access
    }

    fn refresh(&self) -> Option<String> {
        self.read().refresh
    }

    fn set_access(&self, token: &str) {
        self.write(|s| s.access = Some(token.to_string()));
    }

    fn set_refresh(&self, token: &str) {
        self.write(|s| s.refresh = Some(token.to_string()));
    }

    fn clear(&self) {
        self.write(|s| {
            s.access = None;
            s.refresh = None;
        });
    }
}

/// Store backed by the on-disk config file.
///
/// Each call re-reads the file so separate processes see each other's
/// writes. Read and write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user config location.
    pub fn default_location() -> anyhow::Result<Self> {
        Ok(Self::new(Config::config_path()?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> Config {
        match Config::load_from(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Token store unreadable, treating as empty: {:#}", e);
                Config::default()
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut Config)) {
        let mut config = self.load();
        f(&mut config);
        if let Err(e) = config.save_to(&self.path) {
            tracing::warn!("Token store write failed: {:#}", e);
        }
    }
}

impl TokenStore for FileTokenStore {
    fn access(&self) -> Option<String> {
        self.load().access_token
    }

    fn refresh(&self) -> Option<String> {
        self.load().refresh_token
    }

    fn set_access(&self, token: &str) {
        self.update(|c| c.access_token = Some(token.to_string()));
    }

    fn set_refresh(&self, token: &str) {
        self.update(|c| c.refresh_token = Some(token.to_string()));
    }

    fn set_pair(&self, access: &str, refresh: &str) {
        self.update(|c| {
            c.access_token = Some(access.to_string());
            c.refresh_token = Some(refresh.to_string());
        });
    }

    fn clear(&self) {
        self.update(|c| {
            c.access_token = None;
            c.refresh_token = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_pair() {
        let store = MemoryTokenStore::new();
        assert!(store.pair().is_none());

        store.set_pair("a1", "r1");
        assert_eq!(store.access().as_deref(), Some("a1"));
        assert_eq!(store.refresh().as_deref(), Some("r1"));

        store.set_access("a2");
        assert_eq!(
            store.pair(),
            Some(TokenPair {
                access: "a2".to_string(),
                refresh: "r1".to_string(),
            })
        );
    }

    #[test]
    fn test_clear_twice_is_harmless() {
        let store = MemoryTokenStore::with_pair("a", "r");
        store.clear();
        store.clear();
        assert!(store.access().is_none());
        assert!(store.refresh().is_none());
    }

    #[test]
    fn test_file_store_persists_under_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = FileTokenStore::new(&path);

        store.set_pair("acc", "ref");

        // A second handle on the same file sees the write.
        let other = FileTokenStore::new(&path);
        assert_eq!(other.access().as_deref(), Some("acc"));
        assert_eq!(other.refresh().as_deref(), Some("ref"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("dayflow_access_token"));
        assert!(raw.contains("dayflow_refresh_token"));
    }

    #[test]
    fn test_file_store_clear_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            api_url: Some("http://hr.internal/api".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let store = FileTokenStore::new(&path);
        store.set_pair("acc", "ref");
        store.clear();
        store.clear();

        assert!(store.access().is_none());
        assert!(store.refresh().is_none());
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api_url.as_deref(), Some("http://hr.internal/api"));
    }

    #[test]
    fn test_file_store_unwritable_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        // Parent is a regular file, so every write fails.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileTokenStore::new(blocker.join("config.toml"));

        store.set_pair("acc", "ref");
        store.clear();
        assert!(store.access().is_none());
    }
}
