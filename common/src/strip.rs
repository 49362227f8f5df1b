//! ボイラープレート除去
//!
//! モックアップHTMLから文書レベルのラッパーを取り除き、中身のマークアップだけを残す。
//! パーサーは使わず正規表現で除去する。

use regex::Regex;

lazy_static::lazy_static! {
    static ref STYLE_BLOCK_RE: Regex = Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    static ref CDN_SCRIPT_RE: Regex = Regex::new(
        r#"(?i)<script[^>]*src="[^"]*cdn\.tailwindcss\.com[^"]*"[^>]*>\s*</script>"#
    ).unwrap();
    static ref FA_LINK_RE: Regex = Regex::new(
        r#"(?i)<link[^>]*href="[^"]*font-awesome[^"]*"[^>]*/?>(?:</link>)?"#
    ).unwrap();
    static ref TITLE_RE: Regex = Regex::new(r"(?is)<title[^>]*>.*?</title>").unwrap();
    static ref META_RE: Regex = Regex::new(r"(?i)<meta\s[^>]*/?>").unwrap();
    static ref HEAD_BLOCK_RE: Regex = Regex::new(r"(?is)<head[^>]*>.*?</head>").unwrap();
    static ref BODY_OPEN_RE: Regex = Regex::new(r"(?i)<body[^>]*>").unwrap();
    static ref BODY_CLOSE_RE: Regex = Regex::new(r"(?i)</body>").unwrap();
    static ref HTML_TAG_RE: Regex = Regex::new(r"(?i)</?html[^>]*>").unwrap();
}

/// 最初の `<style>` ブロックを返す（トークン抽出用）
pub fn first_style_block(html: &str) -> Option<&str> {
    STYLE_BLOCK_RE.find(html).map(|m| m.as_str())
}

/// ボイラープレートを除去する
///
/// 除去対象: `<style>`、Tailwind CDNの `<script>`、Font Awesomeの `<link>`、
/// `<title>`、`<meta>`、`<head>` ブロック、`<body>`/`<html>` の開始・終了タグ。
/// 空行は落とす。結果に再適用しても変化しない。
pub fn strip_boilerplate(html: &str) -> String {
    let patterns: [&Regex; 9] = [
        &STYLE_BLOCK_RE,
        &CDN_SCRIPT_RE,
        &FA_LINK_RE,
        &TITLE_RE,
        &META_RE,
        &HEAD_BLOCK_RE,
        &BODY_OPEN_RE,
        &BODY_CLOSE_RE,
        &HTML_TAG_RE,
    ];

    let mut out = html.to_string();
    for re in patterns {
        out = re.replace_all(&out, "").into_owned();
    }

    let lines: Vec<&str> = out.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n", lines.join("\n"))
}
