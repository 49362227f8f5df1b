//! 画像マニフェスト
//!
//! `<img>` のalt属性を写真検索クエリとして集め、alt属性（小文字・前後空白除去）で重複排除する。
//! `placehold.co/800x600` 形式のsrcからは寸法も拾う。

use crate::slug::slug_token;
use crate::types::ImageQuery;
use crate::tags::tag_events;
use regex::Regex;
use std::collections::HashMap;

/// `save_as` スラッグの最大長
pub const SAVE_AS_MAX_LEN: usize = 60;

lazy_static::lazy_static! {
    static ref PLACEHOLD_DIM_RE: Regex = Regex::new(r"placehold\.co/(\d+)x(\d+)").unwrap();
}

/// HTML中の画像1枚
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    /// 前後空白除去済み
    pub alt: String,
    /// `800x600`、なければ空
    pub dimensions: String,
}

/// プレースホルダー画像URLから寸法を取り出す
pub fn placeholder_dimensions(src: &str) -> Option<String> {
    PLACEHOLD_DIM_RE
        .captures(src)
        .map(|caps| format!("{}x{}", &caps[1], &caps[2]))
}

/// altが空でない `<img>` をすべて取り出す
///
/// タグ単位で読むので `<noscript>` の中の画像も含む。
pub fn extract_images(html: &str) -> Vec<ImageRef> {
    tag_events(html)
        .into_iter()
        .filter(|tag| !tag.is_end && tag.name == "img")
        .filter_map(|tag| {
            let alt = tag.attr("alt")?.trim();
            if alt.is_empty() {
                return None;
            }
            let src = tag.attr("src").unwrap_or_default();
            Some(ImageRef {
                src: src.to_string(),
                alt: alt.to_string(),
                dimensions: placeholder_dimensions(src).unwrap_or_default(),
            })
        })
        .collect()
}

/// alt属性から保存名のスラッグを作る
pub fn save_as_slug(alt: &str) -> String {
    slug_token(alt).chars().take(SAVE_AS_MAX_LEN).collect()
}

/// 重複排除キー
pub fn dedup_key(alt: &str) -> String {
    alt.trim().to_lowercase()
}

/// 画像クエリを集約する
///
/// 同じキーの2回目以降は参照元ファイルとページを追加するだけで、
/// クエリ・寸法・保存名は最初のものを残す。
#[derive(Debug, Default)]
pub struct ImageManifestBuilder {
    entries: HashMap<String, ImageQuery>,
}

impl ImageManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1ファイル分の画像を追加
    pub fn add_fragment(&mut self, file: &str, page: &str, html: &str) {
        for image in extract_images(html) {
            self.add_image(file, page, &image);
        }
    }

    pub fn add_image(&mut self, file: &str, page: &str, image: &ImageRef) {
        let entry = self
            .entries
            .entry(dedup_key(&image.alt))
            .or_insert_with(|| ImageQuery {
                query: image.alt.clone(),
                dimensions: image.dimensions.clone(),
                save_as: save_as_slug(&image.alt),
                used_in: Vec::new(),
                pages: Vec::new(),
            });

        if !entry.used_in.iter().any(|f| f == file) {
            entry.used_in.push(file.to_string());
        }
        if !entry.pages.iter().any(|p| p == page) {
            entry.pages.push(page.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// クエリ文字列順のリスト
    pub fn build(self) -> Vec<ImageQuery> {
        let mut list: Vec<ImageQuery> = self.entries.into_values().collect();
        list.sort_by(|a, b| a.query.cmp(&b.query));
        list
    }
}
