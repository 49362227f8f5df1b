//! 写真の一括取得
//!
//! image-config.json の各クエリで写真を1枚検索・保存し、ATTRIBUTION.md にクレジットを追記する。

mod unsplash;

pub use unsplash::{UnsplashClient, UNSPLASH_SEARCH_URL, USER_AGENT};

use crate::error::{KitError, Result};
use indicatif::ProgressBar;
use mockup_kit_common::{
    append_attribution, guess_orientation, photo_filename, AttributionRecord, ImageQuery,
    Orientation,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// 検索結果の先頭1枚
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoHit {
    pub id: String,
    /// ダウンロードURL
    pub url: String,
    pub author: String,
    pub author_url: String,
    pub alt: String,
}

/// 写真の検索・取得元
#[allow(async_fn_in_trait)]
pub trait PhotoSource {
    /// 先頭の1件を返す。該当なしは `None`
    async fn search(&self, query: &str, orientation: Option<Orientation>) -> Result<Option<PhotoHit>>;

    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct PhotoOptions {
    pub output_dir: PathBuf,
    pub attribution_path: PathBuf,
    pub dry_run: bool,
    pub force: bool,
    /// リクエスト間の待ち時間
    pub delay: Duration,
    /// クレジットに記録する日付（`YYYY-MM-DD`）
    pub today: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PhotoReport {
    pub total: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// ATTRIBUTION.md に渡したクレジット数
    pub attributed: usize,
}

impl PhotoReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// image-config.json を読み込む
pub fn load_image_config(path: &Path) -> Result<Vec<ImageQuery>> {
    if !path.is_file() {
        return Err(KitError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let queries: Vec<ImageQuery> = serde_json::from_str(&content)?;
    Ok(queries)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn orientation_label(orientation: Option<Orientation>) -> &'static str {
    orientation.map(|o| o.as_str()).unwrap_or("auto")
}

/// 検索して保存する。該当なし・失敗は `Err` にせずメッセージで返す
async fn fetch_one<S: PhotoSource>(
    source: &S,
    entry: &ImageQuery,
    orientation: Option<Orientation>,
    dest: &Path,
) -> std::result::Result<PhotoHit, String> {
    let hit = match source.search(&entry.query, orientation).await {
        Ok(Some(hit)) => hit,
        Ok(None) => return Err(format!("検索結果なし: '{}'", truncate(&entry.query, 40))),
        Err(e) => return Err(format!("検索失敗 '{}': {}", truncate(&entry.query, 40), e)),
    };

    let bytes = source
        .download(&hit.url)
        .await
        .map_err(|e| format!("ダウンロード失敗 {}: {}", hit.url, e))?;
    std::fs::write(dest, bytes).map_err(|e| format!("保存失敗 {}: {}", dest.display(), e))?;
    Ok(hit)
}

/// 全クエリの写真を取得する
///
/// 既存ファイルは `force` でない限りスキップ（検索もしない）。
/// ドライランではファイル名・クエリ・向きを表示するだけで通信しない。
pub async fn run_downloads<S: PhotoSource>(
    source: &S,
    entries: &[ImageQuery],
    options: &PhotoOptions,
) -> Result<PhotoReport> {
    std::fs::create_dir_all(&options.output_dir)?;
    if let Some(parent) = options.attribution_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let total = entries.len();
    let mut report = PhotoReport {
        total,
        ..Default::default()
    };
    let mut records = Vec::new();
    let pb = ProgressBar::new(total as u64);

    for (i, entry) in entries.iter().enumerate() {
        let prefix = format!("[{}/{}]", i + 1, total);
        let filename = photo_filename(&entry.save_as);
        let dest = options.output_dir.join(&filename);
        let orientation = guess_orientation(&entry.dimensions);
        pb.inc(1);

        if dest.exists() && !options.force {
            pb.println(format!("{} スキップ（既存）: {}", prefix, filename));
            report.skipped += 1;
            continue;
        }

        if options.dry_run {
            pb.println(format!(
                "{} 取得予定: {}\n    クエリ: {}\n    向き: {}",
                prefix,
                filename,
                truncate(&entry.query, 80),
                orientation_label(orientation)
            ));
            continue;
        }

        debug!(query = %entry.query, orientation = orientation_label(orientation), "写真検索");
        match fetch_one(source, entry, orientation, &dest).await {
            Ok(hit) => {
                pb.println(format!("{} 保存: {} (by {})", prefix, filename, hit.author));
                report.downloaded += 1;
                records.push(AttributionRecord {
                    filename: filename.clone(),
                    photo_id: hit.id,
                    author: hit.author,
                    author_url: hit.author_url,
                    alt: hit.alt,
                    date: options.today.clone(),
                });
            }
            Err(msg) => {
                pb.suspend(|| warn!("{} {}", prefix, msg));
                report.failed += 1;
            }
        }

        tokio::time::sleep(options.delay).await;
    }
    pb.finish_and_clear();

    if !records.is_empty() {
        let existing = match std::fs::read_to_string(&options.attribution_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        std::fs::write(&options.attribution_path, append_attribution(&existing, &records))?;
        report.attributed = records.len();
        println!(
            "\n✔ {} に{}件のクレジットを記録",
            options.attribution_path.display(),
            records.len()
        );
    }

    println!(
        "\n取得 {}件 / スキップ {}件 / 失敗 {}件（全{}件）",
        report.downloaded, report.skipped, report.failed, total
    );
    Ok(report)
}
