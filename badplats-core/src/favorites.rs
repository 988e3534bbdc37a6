use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::Config;

pub const DB_NAME: &str = "badplatser";
pub const STORE_NAME: &str = "favorites";

/// Persistent key-value store for places the user has marked as favorites.
#[async_trait]
pub trait FavoritesStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn keys(&self) -> Result<Vec<String>>;

    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Favorites kept as one JSON object on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Store location from config, falling back to the platform data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = match &config.favorites_path {
            Some(path) => path.clone(),
            None => Self::default_path()?,
        };
        Ok(Self::new(path))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Config::project_dirs()?
            .data_dir()
            .join(DB_NAME)
            .join(format!("{STORE_NAME}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let exists = fs::try_exists(&self.path).await.with_context(|| {
            format!("Failed to access favorites file: {}", self.path.display())
        })?;
        if !exists {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).await.with_context(|| {
            format!("Failed to read favorites file: {}", self.path.display())
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse favorites file: {}", self.path.display()))
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create favorites directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(entries).context("Failed to serialize favorites")?;

        // Readers only ever see the old or the new file.
        let tmp = self.tmp_path();
        fs::write(&tmp, json).await.with_context(|| {
            format!("Failed to write favorites file: {}", tmp.display())
        })?;

        fs::rename(&tmp, &self.path).await.with_context(|| {
            format!("Failed to replace favorites file: {}", self.path.display())
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FavoritesStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!(key, path = %self.path.display(), "looking up favorite");
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await?;

        debug!(key, total = entries.len(), "favorite stored");
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read_all().await?.into_keys().collect())
    }
}
