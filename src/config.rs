//! 設定と認証情報
//!
//! 設定は `~/.config/mockup-kit/config.json` に保存する。
//! 写真検索APIのキーは 環境変数 → `.env`（カレントから親へ最大4階層）→ 設定ファイル の順で探す。

use crate::error::{KitError, Result};
use mockup_kit_common::row::DEFAULT_SOURCE_HTML_BASE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// APIキーの環境変数名（`.env` のキー名も同じ）
pub const API_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// `.env` を探す階層数（開始ディレクトリを含む）
pub const DOTENV_SEARCH_LEVELS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub unsplash_access_key: Option<String>,
    /// ファイル名だけの取得元に前置するURL
    pub source_html_base: String,
    /// manifest.json の `local_html` に付けるプレフィックス
    pub local_prefix_root: String,
    /// 写真APIへのリクエスト間隔
    pub request_delay_ms: u64,
    pub search_timeout_seconds: u64,
    pub download_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unsplash_access_key: None,
            source_html_base: DEFAULT_SOURCE_HTML_BASE.into(),
            local_prefix_root: "automatetemplates".into(),
            request_delay_ms: 600, // 無料枠（50 req/h）に収める
            search_timeout_seconds: 15,
            download_timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| KitError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("mockup-kit").join("config.json"))
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.unsplash_access_key = Some(key);
        self.save()
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// 表示用（先頭4文字以外を伏せる）
    pub fn masked_api_key(&self) -> String {
        match &self.unsplash_access_key {
            Some(key) if key.chars().count() > 4 => {
                format!("{}****", key.chars().take(4).collect::<String>())
            }
            Some(_) => "****".to_string(),
            None => "未設定".to_string(),
        }
    }

    /// APIキーを探す（環境変数 → .env → 設定ファイル）
    pub fn find_api_key(&self, start_dir: &Path) -> Option<String> {
        resolve_api_key(
            std::env::var(API_KEY_ENV).ok(),
            start_dir,
            self.unsplash_access_key.as_deref(),
        )
    }

    pub fn require_api_key(&self, start_dir: &Path) -> Result<String> {
        self.find_api_key(start_dir).ok_or(KitError::MissingApiKey)
    }
}

/// 環境変数の値・`.env`・設定値の順で最初に見つかったキー
pub fn resolve_api_key(
    env_value: Option<String>,
    start_dir: &Path,
    config_value: Option<&str>,
) -> Option<String> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| find_key_in_dotenv(start_dir, API_KEY_ENV, DOTENV_SEARCH_LEVELS))
        .or_else(|| config_value.filter(|v| !v.trim().is_empty()).map(str::to_string))
}

/// `start_dir` から親方向に `.env` を探し、`KEY=value` の値を返す
pub fn find_key_in_dotenv(start_dir: &Path, key: &str, levels: usize) -> Option<String> {
    let prefix = format!("{}=", key);
    for dir in start_dir.ancestors().take(levels) {
        let env_file = dir.join(".env");
        if !env_file.is_file() {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&env_file) else {
            continue;
        };
        let found = content
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix(&prefix))
            .map(|value| value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string());
        if found.is_some() {
            return found;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_html_base, DEFAULT_SOURCE_HTML_BASE);
        assert_eq!(config.request_delay(), Duration::from_millis(600));
        assert!(config.unsplash_access_key.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.unsplash_access_key = Some("abcdef".into());
        config.request_delay_ms = 0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.unsplash_access_key.as_deref(), Some("abcdef"));
        assert_eq!(loaded.request_delay_ms, 0);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"request_delay_ms": 10}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.request_delay_ms, 10);
        assert_eq!(loaded.local_prefix_root, "automatetemplates");
    }

    #[test]
    fn test_masked_api_key() {
        let mut config = Config::default();
        assert_eq!(config.masked_api_key(), "未設定");
        config.unsplash_access_key = Some("abcdefgh".into());
        assert_eq!(config.masked_api_key(), "abcd****");
    }

    #[test]
    fn test_env_value_wins() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "UNSPLASH_ACCESS_KEY=from-dotenv\n").unwrap();
        let key = resolve_api_key(Some("from-env".into()), dir.path(), Some("from-config"));
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_dotenv_in_parent() {
        let dir = tempdir().unwrap();
        let child = dir.path().join("a").join("b");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "OTHER=1\n  UNSPLASH_ACCESS_KEY = ignored\nUNSPLASH_ACCESS_KEY=\"quoted-key\"\n",
        )
        .unwrap();

        let key = resolve_api_key(None, &child, None);
        assert_eq!(key.as_deref(), Some("quoted-key"));
    }

    #[test]
    fn test_dotenv_search_is_bounded() {
        let dir = tempdir().unwrap();
        let deep = dir.path().join("1").join("2").join("3").join("4");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(dir.path().join(".env"), "UNSPLASH_ACCESS_KEY=too-far\n").unwrap();

        assert_eq!(find_key_in_dotenv(&deep, API_KEY_ENV, DOTENV_SEARCH_LEVELS), None);
        assert_eq!(
            find_key_in_dotenv(&deep, API_KEY_ENV, DOTENV_SEARCH_LEVELS + 1).as_deref(),
            Some("too-far")
        );
    }

    #[test]
    fn test_config_fallback() {
        let dir = tempdir().unwrap();
        let key = resolve_api_key(Some("  ".into()), dir.path(), Some("from-config"));
        assert_eq!(key.as_deref(), Some("from-config"));
        assert_eq!(resolve_api_key(None, dir.path(), None), None);
    }
}
