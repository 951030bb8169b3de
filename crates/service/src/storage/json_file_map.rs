use std::collections::HashMap;
use std::hash::Hash;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ApiError;

/// A map mirrored to a single JSON file.
///
/// The in-memory copy only changes after the file has been rewritten, so a
/// failed write leaves both sides as they were.
#[derive(Clone)]
pub struct JsonFileMap<K, V> {
    path: PathBuf,
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> JsonFileMap<K, V>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    /// Open `path`, creating missing directories and an empty `{}` file.
    /// A file that does not parse is treated as empty.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ApiError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let entries = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "unreadable map file, starting empty");
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&path, b"{}").await?;
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries: Arc::new(RwLock::new(entries)) })
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Apply `change` to a copy, write the copy out, then adopt it.
    pub async fn update<F>(&self, change: F) -> Result<(), ApiError>
    where
        F: FnOnce(&mut HashMap<K, V>),
    {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        change(&mut next);
        fs::write(&self.path, serde_json::to_vec(&next)?).await?;
        *entries = next;
        Ok(())
    }
}
