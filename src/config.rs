use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_STORAGE_PATH: &str = "data/storage.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Where client storage is persisted. `None` keeps it in memory only.
    pub storage_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            storage_path: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `HABIT_API_URL`, `HABIT_STORAGE_PATH` and `HABIT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let base_url = env::var("HABIT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = env::var("HABIT_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            storage_path: Some(resolve_storage_path()),
            timeout_secs,
        }
    }
}

pub fn resolve_storage_path() -> PathBuf {
    if let Ok(path) = env::var("HABIT_STORAGE_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_STORAGE_PATH)
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}
