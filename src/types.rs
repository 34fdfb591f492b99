//! Types Module
//!
//! 市区町村コードマスターのデータ型を定義するモジュール。
//! 階層構造（都道府県 → 市区町村）とフラット構造（名称 → 団体コード）の
//! 2つの形と、その間の変換のみを扱い、I/Oは行わない。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 市区町村レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityRecord {
    /// 6桁の団体コード（都道府県コード2桁 + 市区町村コード4桁）
    pub code: String,

    /// 都道府県名及び市町村名（検索キー）
    #[serde(rename = "name")]
    pub full_name: String,

    /// 市町村名のみ（都道府県名を除く）
    #[serde(rename = "cityName", default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
}

/// 都道府県
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefecture {
    /// 都道府県名（読み込み時は省略可）
    #[serde(default)]
    pub name: String,

    /// 2桁の都道府県コード（読み込み時は省略可）
    #[serde(default)]
    pub code: String,

    /// 4桁の市区町村コード → 市区町村レコード
    #[serde(rename = "cities", alias = "municipalities", default)]
    pub municipalities: BTreeMap<String, MunicipalityRecord>,
}

impl Prefecture {
    /// 市区町村を持たない都道府県を生成
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            municipalities: BTreeMap::new(),
        }
    }
}

/// 階層構造のマスター（2桁の都道府県コード → 都道府県）
///
/// `code-to-city.json` として永続化されます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchicalMaster {
    pub prefectures: BTreeMap<String, Prefecture>,
}

impl HierarchicalMaster {
    /// 都道府県数
    pub fn prefecture_count(&self) -> usize {
        self.prefectures.len()
    }

    /// 全都道府県の市区町村数の合計
    pub fn municipality_count(&self) -> usize {
        self.prefectures
            .values()
            .map(|p| p.municipalities.len())
            .sum()
    }

    /// 全市区町村を都道府県コード順・市区町村コード順に走査する
    pub fn municipalities(&self) -> impl Iterator<Item = &MunicipalityRecord> {
        self.prefectures
            .values()
            .flat_map(|p| p.municipalities.values())
    }

    /// フラットな逆引きマップ（名称 → 団体コード）に変換する
    ///
    /// 名称が空の市区町村は除外されます。同じ名称が複数ある場合は
    /// 走査順で後のものが優先されます。
    pub fn flatten(&self) -> FlatMaster {
        self.municipalities()
            .filter(|m| !m.full_name.is_empty())
            .map(|m| (m.full_name.clone(), m.code.clone()))
            .collect()
    }
}

/// フラットなマスター（都道府県名及び市町村名 → 6桁の団体コード）
///
/// `city-to-code.json` として永続化され、GeoJSONの分割と
/// データ可用性チェックの両方で使用されます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatMaster {
    pub entries: BTreeMap<String, String>,
}

impl FlatMaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 名称から団体コードを引く
    pub fn resolve(&self, full_name: &str) -> Option<&str> {
        self.entries.get(full_name).map(String::as_str)
    }

    /// エントリを追加する（既存の名称は上書き）
    pub fn insert(&mut self, full_name: impl Into<String>, code: impl Into<String>) {
        self.entries.insert(full_name.into(), code.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(名称, 団体コード)` を名称順に走査する
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `(名称, 団体コード)` を団体コード順（同一コードは名称順）に並べて返す
    pub fn entries_by_code(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl FromIterator<(String, String)> for FlatMaster {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
