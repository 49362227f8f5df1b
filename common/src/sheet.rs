//! スプレッドシートのHTMLエクスポートからスニペットを取り出す
//!
//! 取得元がシートのHTMLエクスポート（セルID `sjs-A2`）だった場合、
//! セルにエスケープされて入っているHTMLを復元する。
//! 生のHTMLならそのまま返す。

use regex::Regex;
use scraper::Html;

/// スニペットが入っているセルのID
pub const SHEET_CELL_ID: &str = "sjs-A2";

lazy_static::lazy_static! {
    /// `data-v` 属性にエスケープ済みHTMLが入っている形式
    static ref SHEET_ATTR_RE: Regex =
        Regex::new(r#"(?s)data-v="(&lt;html&gt;.*)"\s+id="sjs-A2""#).unwrap();
    /// セル本文に入っている形式
    static ref SHEET_CELL_RE: Regex =
        Regex::new(r#"(?s)id="sjs-A2">(.*?)</td>"#).unwrap();
    /// 改行タグ（`<br>`, `<br/>`, `<BR />` など）
    static ref BR_TAG_RE: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
}

/// シートエクスポートかどうか
pub fn is_sheet_export(raw_html: &str) -> bool {
    raw_html.contains(&format!("id=\"{}\"", SHEET_CELL_ID))
}

/// HTMLエンティティを復号する
///
/// 文字列をテキストとしてパースし、テキストノードを連結する。
pub fn unescape_html(escaped: &str) -> String {
    Html::parse_fragment(escaped)
        .root_element()
        .text()
        .collect()
}

/// シートエクスポートなら中身のHTMLを、そうでなければ入力をそのまま返す
///
/// `<br>` 系のタグは改行に、NBSPは空白に置換し、末尾は改行1つで終える。
pub fn decode_sheet_export(raw_html: &str) -> String {
    if !is_sheet_export(raw_html) {
        return raw_html.to_string();
    }
    for pattern in [&*SHEET_ATTR_RE, &*SHEET_CELL_RE] {
        let Some(caps) = pattern.captures(raw_html) else {
            continue;
        };
        let payload = BR_TAG_RE.replace_all(&caps[1], "\n");
        let decoded = unescape_html(&payload).replace('\u{a0}', " ");
        let decoded = decoded.trim();
        return format!("{}\n", decoded);
    }
    raw_html.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL_EXPORT: &str = r#"<html><body><table><tr>
<td data-t="s" id="sjs-A1">cropHtml</td>
<td data-t="s" id="sjs-A2">&lt;section class=&quot;hero&quot;&gt;<br/>  &lt;h1&gt;Fish &amp;amp; Chips&lt;/h1&gt;<br />&lt;/section&gt;</td>
</tr></table></body></html>"#;

    #[test]
    fn test_decode_cell_payload() {
        let decoded = decode_sheet_export(CELL_EXPORT);
        assert_eq!(
            decoded,
            "<section class=\"hero\">\n  <h1>Fish &amp; Chips</h1>\n</section>\n"
        );
        assert!(!decoded.contains("sjs-A2"));
        assert!(!decoded.contains("<td"));
    }

    #[test]
    fn test_decode_attribute_payload() {
        let raw = r#"<td data-v="&lt;html&gt;&lt;body&gt;&lt;p&gt;Hi&amp;nbsp;there&lt;/p&gt;&lt;/body&gt;&lt;/html&gt;" id="sjs-A2">ignored</td>"#;
        let decoded = decode_sheet_export(raw);
        assert_eq!(decoded, "<html><body><p>Hi&nbsp;there</p></body></html>\n");
    }

    #[test]
    fn test_nbsp_becomes_space() {
        let raw = r#"<td id="sjs-A2">&lt;p&gt;a&nbsp;b&lt;/p&gt;</td>"#;
        assert_eq!(decode_sheet_export(raw), "<p>a b</p>\n");
    }

    #[test]
    fn test_every_br_form_is_a_newline() {
        let raw = r#"<td id="sjs-A2">&lt;p&gt;a&lt;/p&gt;<br>&lt;p&gt;b&lt;/p&gt;<BR />&lt;p&gt;c&lt;/p&gt;</td>"#;
        assert_eq!(decode_sheet_export(raw), "<p>a</p>\n<p>b</p>\n<p>c</p>\n");
    }

    #[test]
    fn test_plain_html_passthrough() {
        let raw = "<div class=\"grid\"><p>raw</p></div>";
        assert!(!is_sheet_export(raw));
        assert_eq!(decode_sheet_export(raw), raw);
    }

    #[test]
    fn test_is_sheet_export() {
        assert!(is_sheet_export(CELL_EXPORT));
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("&lt;a href=&quot;x&quot;&gt;"), "<a href=\"x\">");
        assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
    }
}
