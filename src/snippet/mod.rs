//! スニペット取得パイプライン
//!
//! 表の各行から取得元URLを解決し、HTMLスニペットをダウンロードして
//! `NNN-slug.html` として保存する。結果は manifest.json に書き出す。
//!
//! - 取得失敗は行単位のエラーとして記録し、残りの行は続行する
//! - 保存先が既にあれば `force` でない限り取得しない（再実行で続きから）

mod http;

pub use http::HttpSnippetSource;

use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mockup_kit_common::row::{field, plan_row};
use mockup_kit_common::{decode_sheet_export, ManifestEntry, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// スニペットの取得元
#[allow(async_fn_in_trait)]
pub trait SnippetSource {
    /// URLの本文をテキストで返す
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// ダウンロード設定
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// スニペットの保存先
    pub output_dir: PathBuf,
    /// `local_html` をこのディレクトリからの相対パスにする
    pub manifest_root: Option<PathBuf>,
    /// `local_html` に前置するパス
    pub local_prefix: Option<PathBuf>,
    /// ファイル名だけの取得元に前置するURL
    pub base_url: String,
    /// 既存ファイルも取り直す
    pub force: bool,
}

/// ダウンロード結果
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub manifest: Vec<ManifestEntry>,
    /// 行単位のエラーメッセージ
    pub errors: Vec<String>,
    pub saved: usize,
    pub skipped: usize,
}

impl DownloadReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// 相対パスをカレントディレクトリ基準の絶対パスにする
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// manifest.json のディレクトリ名から `local_html` のプレフィックスを作る
///
/// `automatetemplates` + `/path/to/html-base/manifest.json` → `automatetemplates/html-base`
pub fn local_prefix_for(prefix_root: &str, manifest_path: &Path) -> Option<PathBuf> {
    let dir_name = manifest_path.parent()?.file_name()?;
    Some(Path::new(prefix_root).join(dir_name))
}

fn manifest_local_path(dest: &Path, options: &DownloadOptions) -> String {
    let relative = options
        .manifest_root
        .as_deref()
        .and_then(|root| dest.strip_prefix(root).ok())
        .unwrap_or(dest);
    let local = match &options.local_prefix {
        Some(prefix) => prefix.join(relative),
        None => relative.to_path_buf(),
    };
    local.to_string_lossy().replace('\\', "/")
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// 全行のスニペットを取得する
pub async fn download_snippets<S: SnippetSource>(
    source: &S,
    rows: &[Row],
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    std::fs::create_dir_all(&options.output_dir)?;

    let total = rows.len();
    let pb = progress_bar(total);
    let mut report = DownloadReport::default();

    for (i, row) in rows.iter().enumerate() {
        let idx = i + 1;
        let plan = plan_row(idx, row, &options.base_url);
        let dest = options.output_dir.join(&plan.file_name);
        pb.inc(1);

        let entry = ManifestEntry {
            index: idx,
            name: plan.name.clone(),
            page: field(row, "Pages").to_string(),
            site_template: field(row, "SiteTemplates").to_string(),
            status: field(row, "Status").to_string(),
            source_html: plan.url.clone(),
            local_html: manifest_local_path(&dest, options),
            crop_section: field(row, "cropSection").to_string(),
            drive_id: field(row, "driveId").to_string(),
        };

        if plan.url.is_empty() {
            let msg = format!("[{}/{}] 取得元URLがありません: {}", idx, total, plan.name);
            pb.suspend(|| warn!("{}", msg));
            report.errors.push(msg);
            report.manifest.push(entry);
            continue;
        }

        if dest.exists() && !options.force {
            pb.println(format!("[{}/{}] スキップ（既存）: {}", idx, total, dest.display()));
            report.skipped += 1;
            report.manifest.push(entry);
            continue;
        }

        debug!(url = %plan.url, "スニペット取得");
        let html = match source.fetch(&plan.url).await {
            Ok(body) => decode_sheet_export(&body),
            Err(e) => {
                let msg = format!("[{}/{}] ダウンロード失敗 {}: {}", idx, total, plan.url, e);
                pb.suspend(|| warn!("{}", msg));
                report.errors.push(msg);
                report.manifest.push(entry);
                continue;
            }
        };

        match std::fs::write(&dest, html) {
            Ok(()) => {
                pb.println(format!("[{}/{}] 保存: {}", idx, total, dest.display()));
                report.saved += 1;
            }
            Err(e) => {
                let msg = format!("[{}/{}] 保存失敗 {}: {}", idx, total, dest.display(), e);
                pb.suspend(|| warn!("{}", msg));
                report.errors.push(msg);
            }
        }
        report.manifest.push(entry);
    }

    pb.finish_and_clear();
    Ok(report)
}

/// manifest.json を書き出す
pub fn write_manifest(manifest_path: &Path, manifest: &[ManifestEntry]) -> Result<()> {
    if let Some(parent) = manifest_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(manifest_path, json)?;
    Ok(())
}
