//! 表の行からスニペットの取得元URLと保存先ファイル名を決める
//!
//! 候補列を優先順に見て、最初に値が入っている列を採用する。

use crate::slug::slug_token;
use crate::types::Row;
use std::path::Path;

/// 取得元HTMLの列候補（優先順）
pub const SOURCE_FIELD_CANDIDATES: &[&str] = &["cropHtml", "htmlPath", "Converted Path"];

/// 表示名の列候補（優先順）
pub const NAME_FIELD_CANDIDATES: &[&str] = &["Name", "Cleaned Name"];

/// ファイル名だけが書かれている場合に前置するベースURL
pub const DEFAULT_SOURCE_HTML_BASE: &str = "https://yourtop10simages.s3.amazonaws.com/cropHtmls/";

/// 1行分の取得計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    /// 取得元URL（解決できなければ空）
    pub url: String,
    /// 取得元のファイル名
    pub source_filename: String,
    /// マニフェストに載せる表示名
    pub name: String,
    /// 保存先ファイル名（`001-hero.html`）
    pub file_name: String,
}

/// 候補列を順に見て、前後空白を除いた最初の非空値を返す
pub fn first_non_empty<'a>(row: &'a Row, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|key| row.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// 行の値をそのまま取り出す（列がなければ空）
pub fn field<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or_default()
}

fn is_absolute_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// URLまたはパスから末尾のファイル名を取り出す
pub fn extract_filename(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let path = match raw.split_once("://") {
        Some((_, rest)) => {
            let rest = rest.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
            rest.split_once('/').map(|(_, path)| path).unwrap_or_default()
        }
        None => raw,
    };

    path.trim_end_matches(|c: char| c == '/' || c == '\\')
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// 取得元URLとファイル名を解決する
///
/// 絶対URLならそのまま使い、ファイル名だけなら `base_url` を前置する。
/// どの候補列も空なら両方とも空文字列。
pub fn resolve_source_html(row: &Row, base_url: &str) -> (String, String) {
    for key in SOURCE_FIELD_CANDIDATES {
        let raw = field(row, key).trim();
        if raw.is_empty() {
            continue;
        }
        if is_absolute_url(raw) {
            return (raw.to_string(), extract_filename(raw));
        }
        let filename = extract_filename(raw);
        if !filename.is_empty() {
            return (format!("{}{}", base_url, filename), filename);
        }
    }
    (String::new(), String::new())
}

/// 表示名の候補列から最初の非空値を返す
pub fn coalesce_name(row: &Row) -> String {
    first_non_empty(row, NAME_FIELD_CANDIDATES)
        .unwrap_or_default()
        .to_string()
}

fn stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// スラッグ化（空なら `section`）
pub fn slugify(value: &str) -> String {
    let slug = slug_token(value);
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// 1行分の取得計画を立てる
///
/// `index` は1始まりの行番号。
/// スラッグは取得元ファイル名の二重拡張子（`hero.jpg.html`）を外したものを優先する。
pub fn plan_row(index: usize, row: &Row, base_url: &str) -> RowPlan {
    let (url, source_filename) = resolve_source_html(row, base_url);

    let manifest_name = stem(&source_filename);
    let name = if !manifest_name.is_empty() {
        manifest_name.clone()
    } else {
        let coalesced = coalesce_name(row);
        if coalesced.is_empty() {
            format!("row-{}", index)
        } else {
            coalesced
        }
    };

    let slug_seed = stem(&manifest_name);
    let slug = if slug_seed.is_empty() {
        slugify(&name)
    } else {
        slugify(&slug_seed)
    };

    RowPlan {
        url,
        source_filename,
        name,
        file_name: format!("{:03}-{}.html", index, slug),
    }
}
