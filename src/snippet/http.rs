//! HTTPでスニペットを取得する

use super::SnippetSource;
use crate::error::Result;
use reqwest::Client;

/// タイムアウトは指定しない（トランスポートの既定に任せる）
pub struct HttpSnippetSource {
    client: Client,
}

impl HttpSnippetSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

impl SnippetSource for HttpSnippetSource {
    /// 宣言された文字コード（なければUTF-8）で復号し、復号できないバイトは置換する
    async fn fetch(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}
