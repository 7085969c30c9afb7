//! On-disk cache of the last release check.
//!
//! The cache is a single JSON file holding the latest known version and
//! when it was learned. It lives at `~/.llmkube/version_cache.json` unless
//! another location is injected.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the home directory that holds llmkube state.
const STATE_DIR: &str = ".llmkube";

/// Cache file name.
const CACHE_FILE: &str = "version_cache.json";

/// Result of the most recent successful release check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Latest released version, as published.
    pub latest_version: String,
    /// When the release feed was queried.
    pub checked_at: DateTime<Utc>,
}

impl CacheRecord {
    /// Create a record for a version learned at `checked_at`.
    pub fn new(latest_version: impl Into<String>, checked_at: DateTime<Utc>) -> Self {
        Self {
            latest_version: latest_version.into(),
            checked_at,
        }
    }

    /// Age of the record relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.checked_at)
    }

    /// Whether the record is younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// Storage for the version cache record.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the user's home directory.
    ///
    /// Returns `None` when no home directory can be resolved.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(STATE_DIR).join(CACHE_FILE)))
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached record.
    ///
    /// Every failure (missing file, bad JSON, permissions) reads as `None`.
    pub fn read(&self) -> Option<CacheRecord> {
        if let Err(e) = self.ensure_dir() {
            tracing::debug!("Version cache directory unavailable: {:#}", e);
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No version cache at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Ignoring malformed version cache: {}", e);
                None
            }
        }
    }

    /// Overwrite the cache with `record`.
    pub fn write(&self, record: &CacheRecord) -> Result<()> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write version cache {:?}", self.path))?;
        restrict_permissions(&self.path, 0o600)?;

        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory {:?}", parent))?;
        restrict_permissions(parent, 0o700)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {:?}", path))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> CacheStore {
        CacheStore::new(temp.path().join(".llmkube").join("version_cache.json"))
    }

    #[test]
    fn read_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(store.read().is_none());
    }

    #[test]
    fn read_creates_directory() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.read();

        assert!(temp.path().join(".llmkube").is_dir());
    }

    #[test]
    fn write_then_read_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let record = CacheRecord::new("v0.5.0", Utc::now());

        store.write(&record).unwrap();
        let loaded = store.read().unwrap();

        assert_eq!(loaded.latest_version, "v0.5.0");
        assert_eq!(loaded.checked_at, record.checked_at);
    }

    #[test]
    fn write_overwrites_previous_record() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.write(&CacheRecord::new("v0.4.0", Utc::now())).unwrap();
        store.write(&CacheRecord::new("v0.5.0", Utc::now())).unwrap();

        assert_eq!(store.read().unwrap().latest_version, "v0.5.0");
    }

    #[test]
    fn malformed_json_is_none() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.read().is_none());
    }

    #[test]
    fn wrong_shape_is_none() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"latest_version": 42}"#).unwrap();

        assert!(store.read().is_none());
    }

    #[test]
    fn file_uses_snake_case_fields() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let checked_at = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();

        store.write(&CacheRecord::new("v1.2.3", checked_at)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();

        assert_eq!(json["latest_version"], "v1.2.3");
        assert_eq!(json["checked_at"], "2026-10-01T12:00:00Z");
    }

    #[test]
    fn write_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = CacheStore::new(blocker.join("version_cache.json"));

        assert!(store.write(&CacheRecord::new("v1.0.0", Utc::now())).is_err());
        assert!(store.read().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn cache_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.write(&CacheRecord::new("v1.0.0", Utc::now())).unwrap();

        let dir_mode = fs::metadata(temp.path().join(".llmkube"))
            .unwrap()
            .permissions()
            .mode();
        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode();

        assert_eq!(dir_mode & 0o777, 0o700);
        assert_eq!(file_mode & 0o777, 0o600);
    }

    #[test]
    fn freshness_is_strictly_under_ttl() {
        let now = Utc::now();
        let ttl = Duration::hours(24);

        let recent = CacheRecord::new("v1.0.0", now - Duration::minutes(23 * 60 + 59));
        let stale = CacheRecord::new("v1.0.0", now - Duration::minutes(24 * 60 + 1));
        let exact = CacheRecord::new("v1.0.0", now - ttl);

        assert!(recent.is_fresh(now, ttl));
        assert!(!stale.is_fresh(now, ttl));
        assert!(!exact.is_fresh(now, ttl));
    }

    #[test]
    fn default_location_is_under_home() {
        if let Some(store) = CacheStore::default_location() {
            assert!(store.path().ends_with(".llmkube/version_cache.json"));
        }
    }
}
