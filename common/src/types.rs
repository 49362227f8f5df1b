//! 中間ファイルの型定義
//!
//! 各パイプラインが読み書きするJSONの形:
//! - ManifestEntry: manifest.json（download の出力、preprocess の入力）
//! - PatternCluster: components.json
//! - ImageQuery: image-config.json（photos の入力）
//! - PageSection: pages.json

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 表の1行（列名 → セル値）
pub type Row = HashMap<String, String>;

/// manifest.json の1エントリ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestEntry {
    /// 行番号（1始まり）
    pub index: usize,
    pub name: String,
    pub page: String,
    pub site_template: String,
    pub status: String,
    pub source_html: String,
    /// マニフェストから見た相対パス（プレフィックス付き）
    pub local_html: String,
    pub crop_section: String,
    pub drive_id: String,
}

impl ManifestEntry {
    /// `local_html` のファイル名部分
    pub fn file_name(&self) -> &str {
        self.local_html
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default()
    }
}

/// クラスタリング・ページ割当に使うスライスのメタ情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceMeta {
    pub file: String,
    pub page: String,
    pub position: u32,
    pub index: usize,
}

/// 構造パターン（同一スケルトンを持つスライスの集合）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCluster {
    /// `pattern-001` 形式
    pub id: String,
    /// 正規化スケルトンのハッシュ
    pub hash: String,
    /// 最初に出現したメンバーのファイル名
    pub representative: String,
    pub occurrences: usize,
    pub pages: Vec<String>,
    pub page_count: usize,
    /// (page, position) 順
    pub members: Vec<ClusterMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub file: String,
    pub page: String,
    pub position: u32,
}

/// image-config.json の1エントリ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageQuery {
    /// 最初に出現したalt属性（前後空白除去済み）
    pub query: String,
    /// `800x600` 形式、不明なら空
    pub dimensions: String,
    /// 保存ファイル名のスラッグ
    pub save_as: String,
    pub used_in: Vec<String>,
    pub pages: Vec<String>,
}

/// pages.json の1セクション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    pub position: u32,
    pub file: String,
    pub component: String,
    pub index: usize,
}
