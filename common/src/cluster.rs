//! 構造クラスタリング
//!
//! スケルトンのハッシュが一致するスライスを1つのパターンにまとめる。

use crate::skeleton::structural_hash;
use crate::types::{ClusterMember, PatternCluster, SliceMeta};
use std::collections::{BTreeSet, HashMap};

/// パターンID（`pattern-001`）
pub fn pattern_id(ordinal: usize) -> String {
    format!("pattern-{:03}", ordinal)
}

/// スライスをクラスタリングする
///
/// - `slices` の順で走査し、`fragments` に本文がないものは無視する
/// - 代表は各クラスタで最初に出現したスライス
/// - IDはメンバーの最小行番号の昇順で振る（ハッシュ値やマップ順に依存しない）
/// - メンバーは (page, position) 順
pub fn cluster_fragments(
    slices: &[SliceMeta],
    fragments: &HashMap<String, String>,
) -> Vec<PatternCluster> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&SliceMeta>> = HashMap::new();

    for slice in slices {
        let Some(html) = fragments.get(&slice.file) else {
            continue;
        };
        let hash = structural_hash(html);
        groups
            .entry(hash.clone())
            .or_insert_with(|| {
                order.push(hash);
                Vec::new()
            })
            .push(slice);
    }

    let mut grouped: Vec<(String, Vec<&SliceMeta>)> = order
        .into_iter()
        .filter_map(|hash| groups.remove(&hash).map(|members| (hash, members)))
        .collect();
    grouped.sort_by_key(|(_, members)| {
        members
            .iter()
            .map(|m| m.index)
            .min()
            .unwrap_or(usize::MAX)
    });

    grouped
        .into_iter()
        .enumerate()
        .map(|(i, (hash, members))| {
            let pages: Vec<String> = members
                .iter()
                .map(|m| m.page.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let mut sorted: Vec<&SliceMeta> = members.clone();
            sorted.sort_by(|a, b| (&a.page, a.position).cmp(&(&b.page, b.position)));

            PatternCluster {
                id: pattern_id(i + 1),
                hash,
                representative: members[0].file.clone(),
                occurrences: members.len(),
                page_count: pages.len(),
                pages,
                members: sorted
                    .into_iter()
                    .map(|m| ClusterMember {
                        file: m.file.clone(),
                        page: m.page.clone(),
                        position: m.position,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// ファイル名 → パターンID の対応表
pub fn file_to_component(clusters: &[PatternCluster]) -> HashMap<String, String> {
    clusters
        .iter()
        .flat_map(|c| c.members.iter().map(move |m| (m.file.clone(), c.id.clone())))
        .collect()
}

/// 総スライス数とユニークパターン数、削減率（%）
pub fn reduction_stats(clusters: &[PatternCluster]) -> (usize, usize, f64) {
    let total: usize = clusters.iter().map(|c| c.occurrences).sum();
    let unique = clusters.len();
    let reduction = if total > 0 {
        (total - unique) as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    (total, unique, reduction)
}
