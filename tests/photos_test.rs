//! 写真取得パイプラインのテスト
//!
//! 検索・ダウンロードはフェイクで置き換える

use mockup_kit::error::{KitError, Result};
use mockup_kit::photos::{run_downloads, PhotoHit, PhotoOptions, PhotoSource};
use mockup_kit_common::{ImageQuery, Orientation};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::tempdir;

#[derive(Default)]
struct FakePhotos {
    hits: HashMap<String, PhotoHit>,
    broken_urls: Vec<String>,
    searches: AtomicUsize,
    downloads: AtomicUsize,
    orientations: Mutex<Vec<Option<Orientation>>>,
}

impl FakePhotos {
    fn with_hit(mut self, query: &str, id: &str) -> Self {
        self.hits.insert(
            query.to_string(),
            PhotoHit {
                id: id.to_string(),
                url: format!("https://images.example.com/{}", id),
                author: "Jane Doe".to_string(),
                author_url: "https://unsplash.com/@jane".to_string(),
                alt: format!("photo of {}", query),
            },
        );
        self
    }

    fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl PhotoSource for FakePhotos {
    async fn search(&self, query: &str, orientation: Option<Orientation>) -> Result<Option<PhotoHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.orientations.lock().unwrap().push(orientation);
        Ok(self.hits.get(query).cloned())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.broken_urls.iter().any(|u| u == url) {
            return Err(KitError::Config(format!("接続失敗: {}", url)));
        }
        Ok(format!("jpeg:{}", url).into_bytes())
    }
}

fn query(text: &str, dimensions: &str, save_as: &str) -> ImageQuery {
    ImageQuery {
        query: text.to_string(),
        dimensions: dimensions.to_string(),
        save_as: save_as.to_string(),
        used_in: vec!["001-hero.html".to_string()],
        pages: vec!["home".to_string()],
    }
}

fn options(root: &Path) -> PhotoOptions {
    PhotoOptions {
        output_dir: root.join("photos"),
        attribution_path: root.join("docs").join("ATTRIBUTION.md"),
        dry_run: false,
        force: false,
        delay: Duration::ZERO,
        today: "2026-10-17".to_string(),
    }
}

/// 取得・保存・クレジット記録
#[tokio::test]
async fn test_downloads_and_attribution() {
    let dir = tempdir().expect("Failed to create temp dir");
    let entries = vec![
        query("Cozy tavern", "1200x600", "cozy-tavern"),
        query("Chef portrait", "400x800", "chef-portrait"),
    ];
    let source = FakePhotos::default()
        .with_hit("Cozy tavern", "t1")
        .with_hit("Chef portrait", "c1");

    let report = run_downloads(&source, &entries, &options(dir.path())).await.unwrap();
    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.attributed, 2);
    assert!(!report.has_failures());

    let bytes = std::fs::read(dir.path().join("photos").join("cozy-tavern.jpg")).unwrap();
    assert_eq!(bytes, b"jpeg:https://images.example.com/t1");
    assert_eq!(
        *source.orientations.lock().unwrap(),
        vec![Some(Orientation::Landscape), Some(Orientation::Portrait)]
    );

    let doc = std::fs::read_to_string(dir.path().join("docs").join("ATTRIBUTION.md")).unwrap();
    assert!(doc.starts_with("# Image Attribution\n"));
    assert!(doc.contains("### cozy-tavern.jpg\n"));
    assert!(doc.contains("- **Source**: [Unsplash](https://unsplash.com/photos/c1)\n"));
    assert!(doc.contains("- **Description**: photo of Chef portrait\n"));
    assert!(doc.contains("- **Downloaded**: 2026-10-17\n"));
}

/// 既存ファイルは検索もしない
#[tokio::test]
async fn test_rerun_skips_existing_without_network() {
    let dir = tempdir().expect("Failed to create temp dir");
    let entries = vec![query("Cozy tavern", "", "cozy-tavern")];
    let first = FakePhotos::default().with_hit("Cozy tavern", "t1");
    run_downloads(&first, &entries, &options(dir.path())).await.unwrap();
    let doc_before = std::fs::read_to_string(dir.path().join("docs").join("ATTRIBUTION.md")).unwrap();

    let second = FakePhotos::default().with_hit("Cozy tavern", "t2");
    let report = run_downloads(&second, &entries, &options(dir.path())).await.unwrap();

    assert_eq!(second.searches(), 0);
    assert_eq!(second.downloads(), 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.downloaded, 0);
    let doc_after = std::fs::read_to_string(dir.path().join("docs").join("ATTRIBUTION.md")).unwrap();
    assert_eq!(doc_before, doc_after);
}

/// 強制再取得でもクレジットは重複しない
#[tokio::test]
async fn test_force_does_not_duplicate_attribution() {
    let dir = tempdir().expect("Failed to create temp dir");
    let entries = vec![query("Cozy tavern", "", "cozy-tavern")];
    let source = FakePhotos::default().with_hit("Cozy tavern", "t1");
    run_downloads(&source, &entries, &options(dir.path())).await.unwrap();

    let mut forced = options(dir.path());
    forced.force = true;
    let report = run_downloads(&source, &entries, &forced).await.unwrap();
    assert_eq!(report.downloaded, 1);
    assert_eq!(source.searches(), 2);

    let doc = std::fs::read_to_string(dir.path().join("docs").join("ATTRIBUTION.md")).unwrap();
    assert_eq!(doc.matches("### cozy-tavern.jpg").count(), 1);
}

/// 検索結果なし・ダウンロード失敗は失敗として数え、続行する
#[tokio::test]
async fn test_failures_are_counted() {
    let dir = tempdir().expect("Failed to create temp dir");
    let entries = vec![
        query("Nothing here", "", "nothing"),
        query("Broken", "", "broken"),
        query("Cozy tavern", "", "cozy-tavern"),
    ];
    let mut source = FakePhotos::default()
        .with_hit("Broken", "b1")
        .with_hit("Cozy tavern", "t1");
    source.broken_urls.push("https://images.example.com/b1".to_string());

    let report = run_downloads(&source, &entries, &options(dir.path())).await.unwrap();
    assert_eq!(report.failed, 2);
    assert_eq!(report.downloaded, 1);
    assert!(report.has_failures());
    assert!(!dir.path().join("photos").join("broken.jpg").exists());

    let doc = std::fs::read_to_string(dir.path().join("docs").join("ATTRIBUTION.md")).unwrap();
    assert!(!doc.contains("broken.jpg"));
    assert!(doc.contains("### cozy-tavern.jpg"));
}

/// ドライランは通信もファイル作成もしない
#[tokio::test]
async fn test_dry_run_makes_no_calls() {
    let dir = tempdir().expect("Failed to create temp dir");
    let entries = vec![query("Cozy tavern", "800x600", "cozy-tavern")];
    let source = FakePhotos::default().with_hit("Cozy tavern", "t1");
    let mut dry = options(dir.path());
    dry.dry_run = true;

    let report = run_downloads(&source, &entries, &dry).await.unwrap();
    assert_eq!(source.searches(), 0);
    assert_eq!(source.downloads(), 0);
    assert_eq!(report.downloaded, 0);
    assert_eq!(report.failed, 0);
    assert!(!dir.path().join("photos").join("cozy-tavern.jpg").exists());
    assert!(!dir.path().join("docs").join("ATTRIBUTION.md").exists());
}
