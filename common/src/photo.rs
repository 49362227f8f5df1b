//! 写真取得の補助関数
//!
//! - 寸法からの向き推定
//! - 保存ファイル名の安全化
//! - ATTRIBUTION.md の生成

use std::fmt;

/// 検索時に指定する写真の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    /// 検索APIのパラメータ値
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `800x600` 形式の寸法から向きを推定する
///
/// 幅/高さ > 1.3 なら横長、< 0.77 なら縦長、それ以外は正方形寄り。
/// 寸法が読めない・高さ0なら `None`。
pub fn guess_orientation(dimensions: &str) -> Option<Orientation> {
    let (w, h) = dimensions.split_once('x')?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    if h == 0 {
        return None;
    }

    let ratio = w as f64 / h as f64;
    if ratio > 1.3 {
        Some(Orientation::Landscape)
    } else if ratio < 0.77 {
        Some(Orientation::Portrait)
    } else {
        Some(Orientation::Squarish)
    }
}

/// 保存ファイル名の最大長（拡張子なし）
pub const FILENAME_MAX_LEN: usize = 80;

/// `save_as` を安全なファイル名（`.jpg` 付き）にする
pub fn photo_filename(save_as: &str) -> String {
    let name: String = save_as
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .take(FILENAME_MAX_LEN)
        .collect();
    if name.is_empty() {
        "image.jpg".to_string()
    } else {
        format!("{}.jpg", name)
    }
}

/// クレジット1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionRecord {
    pub filename: String,
    pub photo_id: String,
    pub author: String,
    pub author_url: String,
    pub alt: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl AttributionRecord {
    fn to_markdown(&self) -> String {
        format!(
            "\n### {}\n\
             - **Photographer**: [{}]({})\n\
             - **Source**: [Unsplash](https://unsplash.com/photos/{})\n\
             - **Description**: {}\n\
             - **Downloaded**: {}\n",
            self.filename, self.author, self.author_url, self.photo_id, self.alt, self.date
        )
    }
}

pub const ATTRIBUTION_HEADER: &str = "# Image Attribution\n\
\n\
All photos are used under the [Unsplash License](https://unsplash.com/license).\n\
\n\
## Photos\n";

/// 既存のATTRIBUTION.mdにクレジットを追記した全文を返す
///
/// 既存本文にファイル名が含まれているものは追記しない。
pub fn append_attribution(existing: &str, records: &[AttributionRecord]) -> String {
    let mut out = if existing.trim().is_empty() {
        ATTRIBUTION_HEADER.to_string()
    } else {
        format!("{}\n", existing.trim_end())
    };

    for record in records {
        if existing.contains(&record.filename) {
            continue;
        }
        out.push_str(&record.to_markdown());
    }
    out
}
