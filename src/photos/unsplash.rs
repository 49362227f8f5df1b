//! Unsplash 検索APIクライアント

use super::{PhotoHit, PhotoSource};
use crate::error::Result;
use mockup_kit_common::Orientation;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

/// 画像ダウンロード時に送るUser-Agent
pub const USER_AGENT: &str = concat!("mockup-kit/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    id: String,
    urls: ApiUrls,
    user: ApiUser,
    alt_description: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    name: String,
    links: ApiUserLinks,
}

#[derive(Debug, Deserialize)]
struct ApiUserLinks {
    html: String,
}

impl ApiPhoto {
    fn into_hit(self, query: &str) -> PhotoHit {
        let alt = [self.alt_description, self.description]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or_else(|| query.to_string());
        PhotoHit {
            id: self.id,
            url: self.urls.regular,
            author: self.user.name,
            author_url: self.user.links.html,
            alt,
        }
    }
}

/// 検索結果JSONから先頭の写真を取り出す
fn top_hit(body: &str, query: &str) -> Result<Option<PhotoHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.results.into_iter().next().map(|p| p.into_hit(query)))
}

pub struct UnsplashClient {
    client: Client,
    access_key: String,
    search_timeout: Duration,
    download_timeout: Duration,
}

impl UnsplashClient {
    pub fn new(
        access_key: impl Into<String>,
        search_timeout: Duration,
        download_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            access_key: access_key.into(),
            search_timeout,
            download_timeout,
        })
    }
}

impl PhotoSource for UnsplashClient {
    async fn search(&self, query: &str, orientation: Option<Orientation>) -> Result<Option<PhotoHit>> {
        let mut params: Vec<(&str, &str)> = vec![
            ("query", query),
            ("per_page", "1"),
            ("content_filter", "high"),
            ("client_id", &self.access_key),
        ];
        if let Some(o) = orientation {
            params.push(("orientation", o.as_str()));
        }

        let body = self
            .client
            .get(UNSPLASH_SEARCH_URL)
            .header("Accept", "application/json")
            .query(&params)
            .timeout(self.search_timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        top_hit(&body, query)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "total": 1,
        "results": [{
            "id": "Xy12",
            "width": 4000,
            "height": 3000,
            "urls": {"raw": "https://images.unsplash.com/raw", "regular": "https://images.unsplash.com/regular"},
            "alt_description": null,
            "description": "Wooden bar counter",
            "user": {"name": "Jane Doe", "username": "jane", "links": {"html": "https://unsplash.com/@jane"}}
        }]
    }"#;

    #[test]
    fn test_top_hit_parses_first_result() {
        let hit = top_hit(SAMPLE, "pub interior").unwrap().unwrap();
        assert_eq!(hit.id, "Xy12");
        assert_eq!(hit.url, "https://images.unsplash.com/regular");
        assert_eq!(hit.author, "Jane Doe");
        assert_eq!(hit.author_url, "https://unsplash.com/@jane");
        assert_eq!(hit.alt, "Wooden bar counter");
    }

    #[test]
    fn test_top_hit_alt_falls_back_to_query() {
        let body = SAMPLE.replace(r#""Wooden bar counter""#, "null");
        let hit = top_hit(&body, "pub interior").unwrap().unwrap();
        assert_eq!(hit.alt, "pub interior");
    }

    #[test]
    fn test_top_hit_empty_results() {
        assert!(top_hit(r#"{"total":0,"results":[]}"#, "x").unwrap().is_none());
        assert!(top_hit("{}", "x").unwrap().is_none());
    }

    #[test]
    fn test_top_hit_invalid_json() {
        assert!(top_hit("not json", "x").is_err());
    }
}
