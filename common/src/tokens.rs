//! デザイントークン抽出
//!
//! 代表HTMLの最初の `<style>` から `--color-*: #hex;` を拾い、
//! OKLCH の `@theme` ブロックとして出力する。

use crate::color::{hex_to_oklch, Oklch};
use crate::error::Result;
use crate::strip::first_style_block;
use regex::Regex;

lazy_static::lazy_static! {
    static ref CSS_VAR_RE: Regex =
        Regex::new(r"--(color-[\w-]+)\s*:\s*(#[0-9A-Fa-f]{3,8})\s*;").unwrap();
}

/// カラー変数1つ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorToken {
    /// `color-primary-500`（先頭の `--` なし）
    pub name: String,
    /// `#c2410c`
    pub hex: String,
}

impl ColorToken {
    /// 変数名の2番目の区切り（`color-primary-500` → `primary`）
    pub fn group(&self) -> &str {
        self.name.split('-').nth(1).unwrap_or_default()
    }

    pub fn oklch(&self) -> Result<Oklch> {
        hex_to_oklch(&self.hex)
    }
}

/// 最初の `<style>` ブロックからカラー変数を出現順に取り出す
///
/// 同名の変数は最初の位置のまま、後の値で上書きする。
pub fn extract_css_vars(html: &str) -> Vec<ColorToken> {
    let Some(block) = first_style_block(html) else {
        return Vec::new();
    };

    let mut tokens: Vec<ColorToken> = Vec::new();
    for caps in CSS_VAR_RE.captures_iter(block) {
        let name = caps[1].to_string();
        let hex = caps[2].to_string();
        match tokens.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.hex = hex,
            None => tokens.push(ColorToken { name, hex }),
        }
    }
    tokens
}

/// `@theme { ... }` ブロックを生成する
///
/// グループが変わるたびに空行を挟む。変換できない値は出力しない。
pub fn render_theme_block(tokens: &[ColorToken]) -> String {
    let mut lines = vec!["@theme {".to_string()];
    let mut current_group = "";

    for token in tokens {
        let Ok(oklch) = token.oklch() else {
            continue;
        };
        let group = token.group();
        if group != current_group {
            if !current_group.is_empty() {
                lines.push(String::new());
            }
            current_group = group;
        }
        lines.push(format!("  --{}: {};", token.name, oklch));
    }

    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}
