//! Partition Module
//!
//! FeatureCollectionの各Featureを、名称プロパティから引いた団体コードごとに
//! グループ化する。コードが引けないFeatureは `unknown` グループに入る。

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::geojson::{Feature, FeatureCollection};
use crate::output::{ensure_dir, write_json};
use crate::types::FlatMaster;

/// 都道府県名及び市町村名を保持するプロパティ名（デフォルト）
pub const DEFAULT_NAME_PROPERTY: &str = "都道府県名及び市町村名";

/// 不明グループの出力名
pub const UNKNOWN_LABEL: &str = "不明";

const UNKNOWN_KEY: &str = "unknown";

/// グループのキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// 6桁の団体コード
    Code(String),
    /// コードが解決できなかったFeature
    Unknown,
}

impl GroupKey {
    /// 出力FeatureCollectionの `name`
    pub fn label(&self) -> &str {
        match self {
            GroupKey::Code(code) => code,
            GroupKey::Unknown => UNKNOWN_LABEL,
        }
    }

    /// 出力ファイル名（`<code>.json` または `unknown.json`）
    pub fn file_name(&self) -> String {
        format!("{}.json", self)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Code(code) => f.write_str(code),
            GroupKey::Unknown => f.write_str(UNKNOWN_KEY),
        }
    }
}

/// 1グループ分のFeatureCollection
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureGroup {
    pub key: GroupKey,
    pub collection: FeatureCollection,
}

impl FeatureGroup {
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

/// 書き出したグループ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenGroup {
    pub key: GroupKey,
    pub path: PathBuf,
    pub features: usize,
}

/// 分割結果
///
/// グループは最初に出現した順に並び、各グループ内のFeatureは入力順を保ちます。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    groups: Vec<FeatureGroup>,
}

impl Partition {
    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    pub fn get(&self, key: &GroupKey) -> Option<&FeatureGroup> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// グループ数
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 全グループのFeature数の合計
    pub fn feature_count(&self) -> usize {
        self.groups.iter().map(FeatureGroup::len).sum()
    }

    /// 不明グループのFeature数
    pub fn unknown_count(&self) -> usize {
        self.get(&GroupKey::Unknown).map_or(0, FeatureGroup::len)
    }

    /// 各グループを `<dir>/<code>.json`（不明は `unknown.json`）として書き出す
    ///
    /// ディレクトリが存在しない場合は作成します。
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<WrittenGroup>> {
        let dir = dir.as_ref();
        ensure_dir(dir)?;

        let total = self.groups.len();
        let mut written = Vec::with_capacity(total);
        for (i, group) in self.groups.iter().enumerate() {
            let path = dir.join(group.key.file_name());
            write_json(&path, &group.collection)?;
            debug!(
                progress = %format!("{}/{}", i + 1, total),
                group = %group.key,
                features = group.len(),
                path = %path.display(),
                "グループを書き出しました"
            );
            written.push(WrittenGroup {
                key: group.key.clone(),
                path,
                features: group.len(),
            });
        }
        Ok(written)
    }
}

/// Featureを団体コードで分割する処理
///
/// # 使用例
///
/// ```rust
/// use municode::{FeatureCollection, FlatMaster, GroupKey, Partitioner};
///
/// let mut master = FlatMaster::new();
/// master.insert("北海道札幌市", "011002");
///
/// let collection: FeatureCollection = serde_json::from_str(r#"{
///     "type": "FeatureCollection",
///     "features": [
///         { "type": "Feature", "properties": { "都道府県名及び市町村名": "北海道札幌市" }, "geometry": null }
///     ]
/// }"#).unwrap();
///
/// let partition = Partitioner::new().partition(collection, &master);
/// assert!(partition.get(&GroupKey::Code("011002".to_string())).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Partitioner {
    name_property: String,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Partitioner {
    /// `都道府県名及び市町村名` プロパティを使用する分割処理を生成する
    pub fn new() -> Self {
        Self {
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }

    /// 名称を読み取るプロパティ名を指定する
    pub fn with_name_property(mut self, name_property: impl Into<String>) -> Self {
        self.name_property = name_property.into();
        self
    }

    pub fn name_property(&self) -> &str {
        &self.name_property
    }

    /// Featureのグループキーを決定する
    ///
    /// 名称が空、またはマスター上のコードが空の場合は不明として扱います。
    pub fn resolve(&self, feature: &Feature, master: &FlatMaster) -> GroupKey {
        feature
            .string_property(&self.name_property)
            .filter(|name| !name.is_empty())
            .and_then(|name| master.resolve(name))
            .filter(|code| !code.is_empty())
            .map_or(GroupKey::Unknown, |code| GroupKey::Code(code.to_string()))
    }

    /// FeatureCollectionを分割する
    ///
    /// Featureは欠落も重複もせず、全グループのFeature数の合計は入力と一致します。
    /// 入力が空の場合は空の結果を返します。
    pub fn partition(&self, collection: FeatureCollection, master: &FlatMaster) -> Partition {
        let kind = collection.kind;
        let mut groups: Vec<FeatureGroup> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();

        for feature in collection.features {
            let key = self.resolve(&feature, master);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(FeatureGroup {
                    collection: FeatureCollection {
                        kind: kind.clone(),
                        name: Some(key.label().to_string()),
                        features: Vec::new(),
                    },
                    key,
                });
                groups.len() - 1
            });
            groups[slot].collection.features.push(feature);
        }

        let partition = Partition { groups };
        let unknown = partition.unknown_count();
        if unknown > 0 {
            warn!(unknown, "市区町村コードが見つからないフィーチャーがあります");
        }
        partition
    }
}

/// デフォルト設定でFeatureCollectionを分割する
pub fn partition(collection: FeatureCollection, master: &FlatMaster) -> Partition {
    Partitioner::new().partition(collection, master)
}
