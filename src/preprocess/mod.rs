//! HTMLスニペットの前処理
//!
//! manifest.json と保存済みスニペットから以下を生成する:
//! - `clean-html/` ボイラープレート除去済みHTML
//! - `tokens.css` カラートークン（`@theme` ブロック）
//! - `components.json` 構造パターン
//! - `image-config.json` 写真検索クエリ
//! - `pages.json` ページ別セクション列

use crate::error::{KitError, Result};
use mockup_kit_common::cluster::reduction_stats;
use mockup_kit_common::{
    build_page_map, cluster_fragments, extract_css_vars, parse_page_slug, parse_section_pos,
    render_theme_block, strip_boilerplate, ImageManifestBuilder, ManifestEntry, PatternCluster,
    SliceMeta,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const CLEAN_HTML_DIR: &str = "clean-html";
pub const TOKENS_FILE: &str = "tokens.css";
pub const COMPONENTS_FILE: &str = "components.json";
pub const IMAGE_CONFIG_FILE: &str = "image-config.json";
pub const PAGES_FILE: &str = "pages.json";

#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    pub html_dir: PathBuf,
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
}

/// 前処理の集計
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PreprocessReport {
    /// 読み込めたスニペット数
    pub slices: usize,
    /// manifest にあるがファイルがないエントリ数
    pub missing: usize,
    /// 読み込み・書き出しに失敗してスキップしたスニペット数
    pub failed: usize,
    pub tokens: usize,
    pub patterns: usize,
    /// 構造パターンによる削減率（%）
    pub reduction: f64,
    pub images: usize,
    pub pages: usize,
}

impl PreprocessReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// manifest.json を読み込む
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    if !path.is_file() {
        return Err(KitError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

/// エントリの `local_html` のファイル名を html_dir 内で解決する
pub fn resolve_local_html(html_dir: &Path, entry: &ManifestEntry) -> Option<PathBuf> {
    let name = entry.file_name();
    if name.is_empty() {
        return None;
    }
    let path = html_dir.join(name);
    path.is_file().then_some(path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// HTMLファイルを読む。UTF-8でないバイトは置換文字にする
pub fn read_html(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("UTF-8ではないバイトを置換して読み込み: {}", path.display());
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// step_strip の結果
struct StripOutcome<'a> {
    /// ファイル名 → 除去済みHTML
    file_map: HashMap<String, String>,
    found: Vec<&'a ManifestEntry>,
    missing: usize,
    failed: usize,
}

/// 存在するスニペットを読み込み、除去済みHTMLを clean-html/ に書き出す
///
/// 読み書きに失敗したスニペットは警告を出してスキップする。
fn step_strip<'a>(
    entries: &'a [ManifestEntry],
    html_dir: &Path,
    clean_dir: &Path,
) -> Result<StripOutcome<'a>> {
    std::fs::create_dir_all(clean_dir)?;

    let mut outcome = StripOutcome {
        file_map: HashMap::new(),
        found: Vec::new(),
        missing: 0,
        failed: 0,
    };
    for entry in entries {
        let Some(path) = resolve_local_html(html_dir, entry) else {
            debug!(local_html = %entry.local_html, "スニペットが見つからないためスキップ");
            outcome.missing += 1;
            continue;
        };
        let raw = match read_html(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("読み込み失敗のためスキップ {}: {}", path.display(), e);
                outcome.failed += 1;
                continue;
            }
        };
        let stripped = strip_boilerplate(&raw);
        let name = entry.file_name().to_string();
        let dest = clean_dir.join(&name);
        if let Err(e) = std::fs::write(&dest, &stripped) {
            warn!("書き出し失敗のためスキップ {}: {}", dest.display(), e);
            outcome.failed += 1;
            continue;
        }
        outcome.file_map.insert(name, stripped);
        outcome.found.push(entry);
    }
    Ok(outcome)
}

/// ファイル名順で最初の `*.html`
fn first_html_file(dir: &Path) -> Option<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .collect();
    files.sort();
    files.into_iter().next()
}

/// 代表1ファイルからカラートークンを抽出して tokens.css に書く
///
/// カラー変数がなければ tokens.css は書かない。
fn step_tokens(html_dir: &Path, output: &Path) -> Result<usize> {
    let Some(source) = first_html_file(html_dir) else {
        warn!("HTMLファイルがないためトークン抽出をスキップ: {}", html_dir.display());
        return Ok(0);
    };
    let raw = read_html(&source)?;
    let tokens = extract_css_vars(&raw);
    if tokens.is_empty() {
        warn!("カラー変数が見つからないため {} は作成しません: {}", TOKENS_FILE, source.display());
        return Ok(0);
    }
    std::fs::write(output, render_theme_block(&tokens))?;
    Ok(tokens.len())
}

fn slice_metas(entries: &[&ManifestEntry]) -> Vec<SliceMeta> {
    entries
        .iter()
        .map(|entry| SliceMeta {
            file: entry.file_name().to_string(),
            page: parse_page_slug(&entry.page),
            position: parse_section_pos(&entry.name),
            index: entry.index,
        })
        .collect()
}

fn step_images(slices: &[SliceMeta], file_map: &HashMap<String, String>, output: &Path) -> Result<usize> {
    let mut builder = ImageManifestBuilder::new();
    for slice in slices {
        if let Some(html) = file_map.get(&slice.file) {
            builder.add_fragment(&slice.file, &slice.page, html);
        }
    }
    let queries = builder.build();
    write_json(output, &queries)?;
    Ok(queries.len())
}

fn step_pages(slices: &[SliceMeta], clusters: &[PatternCluster], output: &Path) -> Result<usize> {
    let page_map = build_page_map(slices, clusters);
    write_json(output, &page_map)?;
    Ok(page_map.len())
}

/// 前処理を実行する
pub fn run_preprocess(options: &PreprocessOptions) -> Result<PreprocessReport> {
    if !options.html_dir.is_dir() {
        return Err(KitError::FolderNotFound(options.html_dir.display().to_string()));
    }
    let entries = load_manifest(&options.manifest)?;
    std::fs::create_dir_all(&options.output_dir)?;

    println!("[1/5] ボイラープレートを除去中...");
    let clean_dir = options.output_dir.join(CLEAN_HTML_DIR);
    let StripOutcome { file_map, found, missing, failed } =
        step_strip(&entries, &options.html_dir, &clean_dir)?;
    println!("✔ {}件を {} に保存", file_map.len(), clean_dir.display());
    if missing > 0 {
        warn!("{}件のスニペットが {} にありません", missing, options.html_dir.display());
    }
    if failed > 0 {
        warn!("{}件のスニペットを読み書きできずスキップしました", failed);
    }

    println!("[2/5] デザイントークンを抽出中...");
    let tokens = step_tokens(&options.html_dir, &options.output_dir.join(TOKENS_FILE))?;
    println!("✔ {}色を {} に保存", tokens, TOKENS_FILE);

    println!("[3/5] 構造パターンを抽出中...");
    let slices = slice_metas(&found);
    let clusters = cluster_fragments(&slices, &file_map);
    write_json(&options.output_dir.join(COMPONENTS_FILE), &clusters)?;
    let (total, unique, reduction) = reduction_stats(&clusters);
    println!("✔ {}件 → {}パターン", total, unique);

    println!("[4/5] 画像クエリを収集中...");
    let images = step_images(&slices, &file_map, &options.output_dir.join(IMAGE_CONFIG_FILE))?;
    println!("✔ {}件の画像クエリ", images);

    println!("[5/5] ページ構成を作成中...");
    let pages = step_pages(&slices, &clusters, &options.output_dir.join(PAGES_FILE))?;
    println!("✔ {}ページ", pages);

    println!(
        "\nスライス {}件 / ユニークパターン {}件 / 削減率 {:.1}%",
        total, unique, reduction
    );

    Ok(PreprocessReport {
        slices: file_map.len(),
        missing,
        failed,
        tokens,
        patterns: unique,
        reduction,
        images,
        pages,
    })
}
