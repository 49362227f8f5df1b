//! スラッグ生成

use regex::Regex;

lazy_static::lazy_static! {
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// 小文字化して英数字以外の連続を `-` に置換し、両端の `-` を除去する
///
/// 空文字列になり得る。既定値は呼び出し側で決める。
pub fn slug_token(value: &str) -> String {
    let lowered = value.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
