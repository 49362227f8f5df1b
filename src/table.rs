//! 入力表（CSV / Excel）の読み込み

use crate::error::{KitError, Result};
use calamine::{open_workbook_auto, Reader};
use mockup_kit_common::Row;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TABLE_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "ods"];

fn is_table_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| TABLE_EXTENSIONS.contains(&ext.as_str()))
}

/// フォルダ直下にある唯一の表ファイルを探す
///
/// 見つからない・複数ある場合はエラー（`--table` での指定を促す）。
pub fn discover_table(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(KitError::FolderNotFound(dir.display().to_string()));
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_table_file(p))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(KitError::InputTable(format!(
            "{} に表ファイル（CSV/Excel）がありません。--table で指定してください",
            dir.display()
        ))),
        1 => Ok(candidates.remove(0)),
        _ => {
            let names = candidates
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(KitError::InputTable(format!(
                "{} に複数の表ファイルがあります: {}。--table で指定してください",
                dir.display(),
                names
            )))
        }
    }
}

/// 表を読み込む（1行目は見出し）
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    if !path.is_file() {
        return Err(KitError::FileNotFound(path.display().to_string()));
    }

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv(path)
    } else {
        load_workbook(path)
    }
}

fn load_csv(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// 最初のシートを読む
fn load_workbook(path: &Path) -> Result<Vec<Row>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| KitError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| KitError::Spreadsheet(format!("シートがありません: {}", path.display())))?
        .map_err(|e| KitError::Spreadsheet(e.to_string()))?;

    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|c| c.to_string()).collect();

    Ok(lines
        .map(|cells| {
            headers
                .iter()
                .cloned()
                .zip(cells.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect())
}
