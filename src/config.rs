use crate::error::{ChatCliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// サーバーURLを上書きする環境変数
pub const SERVER_URL_ENV: &str = "METRON_SERVER_URL";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub user_id: Option<i64>,
    pub poll_interval_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            user_id: None,
            poll_interval_ms: 1000,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ChatCliError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("metron").join("config.json"))
    }

    /// 接続先。環境変数を優先
    pub fn server_url(&self) -> String {
        self.server_url_with(std::env::var(SERVER_URL_ENV).ok())
    }

    pub fn server_url_with(&self, env_override: Option<String>) -> String {
        env_override
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.server_url.clone())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn set_server_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ChatCliError::Config(format!("URLが不正です: {}", url)));
        }
        self.server_url = url;
        self.save()
    }

    pub fn set_user_id(&mut self, user_id: i64) -> Result<()> {
        self.user_id = Some(user_id);
        self.save()
    }
}
