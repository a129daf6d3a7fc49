use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::CoreError;

/// Key under which the serialized portfolio state is stored.
pub const STORAGE_KEY: &str = "stock-portfolio";

/// A durable key-value store for serialized state.
///
/// The store holds opaque text; serialization happens above it. Writes
/// replace the whole value for a key — there is no incremental update, and
/// the last full snapshot wins.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`. `None` if nothing was stored yet.
    async fn load(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// File-backed `StateStore`: each key maps to `<dir>/<key>.json`.
///
/// The directory is created on first write, so pointing this at a fresh
/// app-data path just works.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}
