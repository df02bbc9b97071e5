use crate::models::BearerCredential;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::error;

pub const CREDENTIAL_KEY: &str = "access_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageData {
    pub entries: BTreeMap<String, String>,
}

/// Key/value storage mirrored to a JSON file on every write when a path is set. A
/// failed write is returned to the caller; the in-memory value stays current.
#[derive(Clone)]
pub struct ClientStorage {
    path: Option<PathBuf>,
    data: Arc<Mutex<StorageData>>,
}

impl ClientStorage {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Arc::new(Mutex::new(StorageData::default())),
        }
    }

    pub async fn open(path: PathBuf) -> Self {
        let data = load_data(&path).await;
        Self {
            path: Some(path),
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.data.lock().await.entries.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), std::io::Error> {
        let mut data = self.data.lock().await;
        data.entries.insert(key.to_string(), value.into());
        self.persist(&data).await
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), std::io::Error> {
        let mut data = self.data.lock().await;
        if data.entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&data).await
    }

    pub async fn load_credential(&self) -> Option<BearerCredential> {
        let data = self.data.lock().await;
        let access_token = data.entries.get(CREDENTIAL_KEY)?.clone();
        let token_type = data
            .entries
            .get(TOKEN_TYPE_KEY)
            .cloned()
            .unwrap_or_else(|| "bearer".to_string());
        Some(BearerCredential {
            access_token,
            token_type,
        })
    }

    pub async fn has_credential(&self) -> bool {
        self.data.lock().await.entries.contains_key(CREDENTIAL_KEY)
    }

    pub async fn store_credential(&self, credential: &BearerCredential) -> Result<(), std::io::Error> {
        let mut data = self.data.lock().await;
        data.entries
            .insert(CREDENTIAL_KEY.to_string(), credential.access_token.clone());
        data.entries
            .insert(TOKEN_TYPE_KEY.to_string(), credential.token_type.clone());
        self.persist(&data).await
    }

    pub async fn erase_credential(&self) -> Result<(), std::io::Error> {
        let mut data = self.data.lock().await;
        let removed = data.entries.remove(CREDENTIAL_KEY).is_some();
        let removed_type = data.entries.remove(TOKEN_TYPE_KEY).is_some();
        if !removed && !removed_type {
            return Ok(());
        }
        self.persist(&data).await
    }

    async fn persist(&self, data: &StorageData) -> Result<(), std::io::Error> {
        match &self.path {
            Some(path) => persist_data(path, data).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ClientStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStorage").field("path", &self.path).finish()
    }
}

pub async fn load_data(path: &Path) -> StorageData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse storage file: {err}");
                StorageData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StorageData::default(),
        Err(err) => {
            error!("failed to read storage file: {err}");
            StorageData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &StorageData) -> Result<(), std::io::Error> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await
}
