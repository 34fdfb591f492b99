//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

use crate::error::{MunicodeError, Result};

/// シート選択方式
///
/// 表形式ファイルから読み込むシートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを順に読み込む（デフォルト）
    ///
    /// マスターの構築ではこちらを使用します。
    #[default]
    All,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択（マスターの読み込みで使用）
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("R6.1.1現在の団体".to_string())`
    Name(String),
}

/// マスターファイルの形式
///
/// 拡張子（大文字小文字を区別しない）から判定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterFormat {
    /// JSON（階層構造またはフラット構造）
    Json,

    /// 表形式（`.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.ods`）
    Workbook,
}

impl MasterFormat {
    const WORKBOOK_EXTENSIONS: [&'static str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

    /// パスの拡張子から形式を判定する
    ///
    /// # 戻り値
    ///
    /// * `Ok(MasterFormat)` - 対応している拡張子の場合
    /// * `Err(MunicodeError::UnsupportedFormat)` - 未対応の拡張子、または拡張子がない場合
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if extension == "json" {
            Ok(MasterFormat::Json)
        } else if Self::WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Ok(MasterFormat::Workbook)
        } else {
            Err(MunicodeError::UnsupportedFormat { extension })
        }
    }
}
