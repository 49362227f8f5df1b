//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use mockup_kit::config::{resolve_api_key, Config};
use mockup_kit::error::KitError;
use mockup_kit::table;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダから表を探した場合
#[test]
fn test_discover_table_nonexistent_folder() {
    let result = table::discover_table(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(KitError::FolderNotFound(_))));
}

/// 表ファイルが複数ある場合は --table を促す
#[test]
fn test_discover_table_ambiguous() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("a.csv"), "Name\n").unwrap();
    std::fs::write(dir.path().join("b.csv"), "Name\n").unwrap();

    let err = table::discover_table(dir.path()).unwrap_err();
    assert!(matches!(err, KitError::InputTable(_)));
    assert!(err.to_string().contains("--table"));
}

/// APIキーがどこにもなければ MissingApiKey
#[test]
fn test_missing_api_key() {
    let dir = tempdir().expect("Failed to create temp dir");
    assert_eq!(resolve_api_key(None, dir.path(), None), None);

    let config = Config::default();
    if std::env::var("UNSPLASH_ACCESS_KEY").is_err() {
        let result = config.require_api_key(dir.path());
        assert!(matches!(result, Err(KitError::MissingApiKey)));
    }
}

/// 壊れた設定ファイル
#[test]
fn test_invalid_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(KitError::JsonParse(_))));
}

/// 共通ライブラリのエラーは透過的に表示される
#[test]
fn test_common_error_is_transparent() {
    let inner = mockup_kit_common::Error::Parse("不正なカラーコード: #zz".to_string());
    let expected = inner.to_string();
    let err: KitError = inner.into();
    assert_eq!(err.to_string(), expected);
}

/// KitErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        KitError::Config("テスト設定エラー".to_string()),
        KitError::MissingApiKey,
        KitError::FileNotFound("manifest.json".to_string()),
        KitError::FolderNotFound("/path/to/html".to_string()),
        KitError::InputTable("表がありません".to_string()),
        KitError::Spreadsheet("シートがありません".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}
