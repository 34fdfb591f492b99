//! Master Loader Module
//!
//! マスターファイル（階層JSON・フラットJSON・表形式）を読み込み、
//! 形式に関係なくフラットなマスターを返す。

use serde_json::Value;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::api::{MasterFormat, SheetSelector};
use crate::error::{MunicodeError, Result};
use crate::parser::{read_workbook, Sheet};
use crate::types::{FlatMaster, HierarchicalMaster};

/// 階層構造を示すフィールド名
const NESTED_FIELDS: [&str; 2] = ["cities", "municipalities"];

/// マスターファイルを読み込み、フラットなマスターを返す
///
/// # 戻り値
///
/// * `Err(MunicodeError::NotFound)` - パスが存在しない場合
/// * `Err(MunicodeError::UnsupportedFormat)` - 拡張子が未対応の場合
/// * `Err(MunicodeError::Json / Workbook / Parse)` - 内容が解析できない場合
pub fn load_flat_master(path: impl AsRef<Path>) -> Result<FlatMaster> {
    let path = path.as_ref();
    let format = MasterFormat::from_path(path)?;
    if !path.exists() {
        return Err(MunicodeError::NotFound {
            path: path.to_path_buf(),
        });
    }

    match format {
        MasterFormat::Json => {
            let content = fs::read_to_string(path)?;
            flat_master_from_json(&content)
        }
        MasterFormat::Workbook => {
            let sheets = read_workbook(path, &SheetSelector::Index(0))?;
            let flat = sheets
                .first()
                .map(flat_master_from_sheet)
                .unwrap_or_default();
            info!(entries = flat.len(), "市区町村コードマスター読み込み完了 (表形式)");
            Ok(flat)
        }
    }
}

/// JSON文字列からフラットなマスターを生成する
///
/// ドキュメント順で先頭のキーの値が `cities`（または `municipalities`）
/// フィールドを持つ場合は階層構造として平坦化し、それ以外はフラット構造として扱います。
/// 空のドキュメントは形式を判定できないためエラーになります。
pub fn flat_master_from_json(content: &str) -> Result<FlatMaster> {
    let value: Value = serde_json::from_str(content)?;

    let first = match &value {
        Value::Object(map) => map.values().next().ok_or_else(|| {
            MunicodeError::Parse("master document is empty; cannot detect its shape".to_string())
        })?,
        _ => {
            return Err(MunicodeError::Parse(
                "master document must be a JSON object".to_string(),
            ))
        }
    };

    if is_hierarchical_entry(first) {
        let hierarchical: HierarchicalMaster = serde_json::from_value(value)?;
        let flat = hierarchical.flatten();
        info!(entries = flat.len(), "市区町村コードマスター読み込み完了 (JSON/階層)");
        Ok(flat)
    } else {
        let flat: FlatMaster = serde_json::from_value(value)?;
        info!(entries = flat.len(), "市区町村コードマスター読み込み完了 (JSON/フラット)");
        Ok(flat)
    }
}

fn is_hierarchical_entry(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|entry| NESTED_FIELDS.iter().any(|f| entry.contains_key(*f)))
}

/// 2列形式のシートからフラットなマスターを生成する
///
/// ヘッダー行をスキップし、0列目を団体コード、1列目を都道府県名及び市町村名として
/// 読み込みます。どちらかが空の行はスキップされ、同じ名称は後勝ちです。
pub fn flat_master_from_sheet(sheet: &Sheet) -> FlatMaster {
    let mut flat = FlatMaster::new();
    for row in sheet.rows.iter().skip(1).filter(|r| r.len() >= 2) {
        let code = row[0].trim();
        let name = row[1].trim();
        if !code.is_empty() && !name.is_empty() {
            flat.insert(name, code);
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_json() {
        let flat = flat_master_from_json(r#"{"北海道札幌市": "011002", "群馬県": "100005"}"#).unwrap();

        assert_eq!(flat.len(), 2);
        assert_eq!(flat.resolve("北海道札幌市"), Some("011002"));
        assert_eq!(flat.resolve("群馬県"), Some("100005"));
    }

    #[test]
    fn test_hierarchical_json_is_flattened() {
        let json = r#"{
            "01": {
                "name": "北海道",
                "code": "01",
                "cities": {
                    "1002": { "code": "011002", "name": "北海道札幌市", "cityName": "札幌市" },
                    "2025": { "code": "012025", "name": "北海道函館市", "cityName": "函館市" }
                }
            },
            "13": {
                "name": "東京都",
                "code": "13",
                "cities": {
                    "1016": { "code": "131016", "name": "東京都千代田区", "cityName": "千代田区" }
                }
            }
        }"#;

        let flat = flat_master_from_json(json).unwrap();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat.resolve("北海道函館市"), Some("012025"));
        assert_eq!(flat.resolve("東京都千代田区"), Some("131016"));
    }

    #[test]
    fn test_municipalities_field_is_detected_as_hierarchical() {
        let json = r#"{
            "13": {
                "name": "東京都",
                "code": "13",
                "municipalities": {
                    "1016": { "code": "131016", "name": "東京都千代田区" }
                }
            }
        }"#;

        let flat = flat_master_from_json(json).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.resolve("東京都千代田区"), Some("131016"));
    }

    #[test]
    fn test_hierarchical_json_without_prefecture_fields() {
        // 都道府県の name / code は平坦化に使われない
        let json = r#"{"13":{"cities":{"1016":{"code":"131016","name":"東京都千代田区"}}}}"#;

        let flat = flat_master_from_json(json).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.resolve("東京都千代田区"), Some("131016"));
    }

    #[test]
    fn test_shape_is_detected_from_first_key_in_document_order() {
        // "01" は市区町村を持たないが、先頭の "13" で階層構造と判定される
        let json = r#"{
            "13": { "cities": { "1016": { "code": "131016", "name": "東京都千代田区" } } },
            "01": { "name": "北海道", "code": "01" }
        }"#;

        let flat = flat_master_from_json(json).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.resolve("東京都千代田区"), Some("131016"));
    }

    #[test]
    fn test_empty_document_is_parse_error() {
        let err = flat_master_from_json("{}").unwrap_err();
        assert!(matches!(err, MunicodeError::Parse(_)));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_non_object_document_is_parse_error() {
        let err = flat_master_from_json(r#"["011002"]"#).unwrap_err();
        assert!(matches!(err, MunicodeError::Parse(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = flat_master_from_json(r#"{"北海道札幌市": "#).unwrap_err();
        assert!(matches!(err, MunicodeError::Json(_)));
    }

    #[test]
    fn test_flat_json_with_non_string_code_is_parse_error() {
        let err = flat_master_from_json(r#"{"北海道札幌市": 11002}"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_sheet_two_column_layout() {
        let rows = vec![
            vec!["団体コード".to_string(), "都道府県名及び市町村名".to_string()],
            vec!["011002".to_string(), " 北海道札幌市 ".to_string()],
            vec!["".to_string(), "北海道函館市".to_string()],
            vec!["131016".to_string()],
            vec!["999999".to_string(), "北海道札幌市".to_string()],
        ];

        let flat = flat_master_from_sheet(&Sheet::new("Sheet1", rows));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.resolve("北海道札幌市"), Some("999999"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_flat_master("definitely/missing/city-to-code.json").unwrap_err();
        assert!(matches!(err, MunicodeError::NotFound { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let err = load_flat_master("master.csv").unwrap_err();
        assert!(matches!(err, MunicodeError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city-to-code.json");
        fs::write(&path, r#"{"群馬県前橋市": "102016"}"#).unwrap();

        let flat = load_flat_master(&path).unwrap();
        assert_eq!(flat.resolve("群馬県前橋市"), Some("102016"));
    }
}
