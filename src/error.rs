use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("UNSPLASH_ACCESS_KEY が見つかりません。環境変数、.env、または `mockup-kit config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("入力表エラー: {0}")]
    InputTable(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV読み込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] mockup_kit_common::Error),
}

pub type Result<T> = std::result::Result<T, KitError>;
