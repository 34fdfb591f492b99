//! GeoJSON Module
//!
//! 分割処理で扱うFeatureCollectionの最小限のモデル。
//! ジオメトリは解釈せず、そのまま保持します。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{MunicodeError, Result};

/// GeoJSONのFeature
///
/// `type`, `properties`, `geometry` 以外のメンバー（`id`など）も
/// 変更せずに保持されます。`properties` と `geometry` は、
/// 省略されていれば `None`、`null` なら `Some(Value::Null)` になり、
/// 書き出し時もその区別が保たれます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,

    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    /// 文字列のプロパティを取得する（存在しない、または文字列でない場合は `None`）
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.as_ref()?.get(key)?.as_str()
    }
}

/// キーが存在すれば `null` も含めて `Some` にする
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// GeoJSONのFeatureCollection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// ファイルからFeatureCollectionを読み込む
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MunicodeError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
