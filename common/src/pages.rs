//! ページ割当
//!
//! 各スライスをページ（スラッグ）と表示順に割り当て、ページごとのセクション列を作る。

use crate::cluster::file_to_component;
use crate::slug::slug_token;
use crate::types::{PageSection, PatternCluster, SliceMeta};
use regex::Regex;
use std::collections::BTreeMap;

/// ページ名が空のときのスラッグ
pub const UNKNOWN_PAGE: &str = "unknown";

/// どのクラスタにも属さないスライスのパターンID
pub const UNKNOWN_COMPONENT: &str = "unknown";

lazy_static::lazy_static! {
    static ref SECTION_POS_RE: Regex = Regex::new(r"_p(\d+)_").unwrap();
}

/// ページ列の値からスラッグを作る（括弧以降は無視）
///
/// `"Home (v2)"` → `home`
pub fn parse_page_slug(page_field: &str) -> String {
    let name = page_field.split('(').next().unwrap_or_default().trim();
    let slug = slug_token(name);
    if slug.is_empty() {
        UNKNOWN_PAGE.to_string()
    } else {
        slug
    }
}

/// 名前に埋め込まれた `_p<数字>_` から表示順を取り出す（なければ0）
pub fn parse_section_pos(name_field: &str) -> u32 {
    SECTION_POS_RE
        .captures(name_field)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// ページスラッグ → セクション列
///
/// セクションは表示順の昇順、同順位は元の行番号順。
pub fn build_page_map(
    slices: &[SliceMeta],
    clusters: &[PatternCluster],
) -> BTreeMap<String, Vec<PageSection>> {
    let lookup = file_to_component(clusters);
    let mut pages: BTreeMap<String, Vec<PageSection>> = BTreeMap::new();

    for slice in slices {
        let component = lookup
            .get(&slice.file)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_COMPONENT.to_string());
        pages.entry(slice.page.clone()).or_default().push(PageSection {
            position: slice.position,
            file: slice.file.clone(),
            component,
            index: slice.index,
        });
    }

    for sections in pages.values_mut() {
        sections.sort_by_key(|s| (s.position, s.index));
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClusterMember;

    fn slice(file: &str, page: &str, position: u32, index: usize) -> SliceMeta {
        SliceMeta {
            file: file.to_string(),
            page: page.to_string(),
            position,
            index,
        }
    }

    #[test]
    fn test_parse_page_slug() {
        assert_eq!(parse_page_slug("Home (Landing)"), "home");
        assert_eq!(parse_page_slug("About Us"), "about-us");
        assert_eq!(parse_page_slug("  Menu & Drinks (v2) (old)"), "menu-drinks");
        assert_eq!(parse_page_slug(""), "unknown");
        assert_eq!(parse_page_slug("(draft)"), "unknown");
    }

    #[test]
    fn test_parse_section_pos() {
        assert_eq!(parse_section_pos("Home_p3_hero.jpg"), 3);
        assert_eq!(parse_section_pos("Home_p12_footer"), 12);
        assert_eq!(parse_section_pos("Home_hero"), 0);
        assert_eq!(parse_section_pos("Home_p3"), 0);
    }

    #[test]
    fn test_sections_sorted_by_position() {
        let slices = vec![
            slice("a.html", "home", 3, 1),
            slice("b.html", "home", 1, 2),
            slice("c.html", "home", 2, 3),
        ];
        let pages = build_page_map(&slices, &[]);
        let positions: Vec<u32> = pages["home"].iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_broken_by_index() {
        let slices = vec![
            slice("late.html", "home", 1, 9),
            slice("early.html", "home", 1, 2),
        ];
        let pages = build_page_map(&slices, &[]);
        assert_eq!(pages["home"][0].file, "early.html");
        assert_eq!(pages["home"][1].file, "late.html");
    }

    #[test]
    fn test_component_lookup_and_unknown() {
        let clusters = vec![PatternCluster {
            id: "pattern-001".to_string(),
            hash: "h".to_string(),
            representative: "a.html".to_string(),
            occurrences: 1,
            pages: vec!["home".to_string()],
            page_count: 1,
            members: vec![ClusterMember {
                file: "a.html".to_string(),
                page: "home".to_string(),
                position: 1,
            }],
        }];
        let slices = vec![slice("a.html", "home", 1, 1), slice("b.html", "about", 1, 2)];
        let pages = build_page_map(&slices, &clusters);
        assert_eq!(pages["home"][0].component, "pattern-001");
        assert_eq!(pages["about"][0].component, UNKNOWN_COMPONENT);
        assert_eq!(pages.keys().collect::<Vec<_>>(), vec!["about", "home"]);
    }
}
