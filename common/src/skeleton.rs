//! 構造スケルトン
//!
//! スライスHTMLからテキストと大半の属性を捨て、タグ列とレイアウト系クラスだけを残す。
//! 数値付きのユーティリティクラス（`px-4`, `w-[300px]`）は数値部分を `*` に置き換えるので、
//! 余白やサイズだけが違うスライスは同じスケルトンになる。

use crate::tags::{tag_events, TagEvent};
use regex::Regex;
use sha2::{Digest, Sha256};

/// 名前だけ残す構造用のdata属性
pub const STRUCTURAL_DATA_ATTRS: &[&str] = &["data-collection", "data-item"];

/// スケルトンに残すクラスのプレフィックス
pub const LAYOUT_PREFIXES: &[&str] = &[
    "grid", "flex", "col-", "row-", "gap-", "container",
    "max-w-", "mx-auto", "px-", "py-", "pt-", "pb-",
    "md:", "lg:", "sm:", "xl:", "2xl:",
    "w-", "h-", "min-h-", "items-", "justify-",
    "space-", "grid-cols-", "text-center", "text-left", "text-right",
    "relative", "absolute", "fixed", "sticky",
    "overflow-", "hidden", "block", "inline",
];

/// 終了タグを持たない要素
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "source", "track", "wbr",
];

lazy_static::lazy_static! {
    /// 数値部分をワイルドカード化するユーティリティ（レスポンシブ接頭辞付きも可）
    static ref TAILWIND_NUM_RE: Regex = Regex::new(concat!(
        r"^((?:(?:sm|md|lg|xl|2xl):)?",
        r"(?:gap|px|py|pt|pb|pl|pr|p|m|mt|mb|ml|mr|mx|my",
        r"|w|h|max-w|min-w|max-h|min-h",
        r"|text|rounded|top|bottom|left|right|inset",
        r"|space-x|space-y|col-span|row-span|grid-cols|grid-rows",
        r"|leading|tracking|border))",
        r"-\[?[\d./]+",
    )).unwrap();
}

/// レイアウト系のクラスかどうか
pub fn is_layout_class(token: &str) -> bool {
    LAYOUT_PREFIXES.iter().any(|p| token.starts_with(p))
}

/// 数値付きクラスを `prefix-*` に正規化する
pub fn normalize_class(token: &str) -> String {
    match TAILWIND_NUM_RE.captures(token) {
        Some(caps) => format!("{}-*", &caps[1]),
        None => token.to_string(),
    }
}

/// class属性値からレイアウト系クラスだけを正規化・ソートして返す
pub fn layout_classes(class_attr: &str) -> Vec<String> {
    let mut tokens: Vec<String> = class_attr
        .split_whitespace()
        .filter(|t| is_layout_class(t))
        .map(normalize_class)
        .collect();
    tokens.sort();
    tokens
}

fn start_token(tag: &TagEvent) -> String {
    let mut structural = Vec::new();

    if let Some(class_attr) = tag.attr("class") {
        let classes = layout_classes(class_attr);
        if !classes.is_empty() {
            structural.push(format!("class=\"{}\"", classes.join(" ")));
        }
    }
    for name in STRUCTURAL_DATA_ATTRS {
        if tag.attr(name).is_some() {
            structural.push(name.to_string());
        }
    }

    if structural.is_empty() {
        format!("<{}>", tag.name)
    } else {
        format!("<{} {}>", tag.name, structural.join(" "))
    }
}

/// フラグメントのスケルトン文字列
///
/// 書かれている開始・終了タグをそのまま並べる。壊れたマークアップでもエラーにはならない。
/// 空要素と `<x/>` は開始タグだけになる。
pub fn skeleton(html: &str) -> String {
    let mut out = String::new();
    for tag in tag_events(html) {
        if !tag.is_end {
            out.push_str(&start_token(&tag));
        } else if !VOID_ELEMENTS.contains(&tag.name.as_str()) {
            out.push_str(&format!("</{}>", tag.name));
        }
    }
    out
}

/// スケルトンのSHA-256（16進64桁）
pub fn structural_hash(html: &str) -> String {
    hex::encode(Sha256::digest(skeleton(html).as_bytes()))
}
