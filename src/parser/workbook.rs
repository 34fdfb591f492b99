//! Workbook Module
//!
//! calamineを使用した表形式ファイルの読み込み。
//! シート全体を文字列の行データとしてメモリに読み込みます。

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::api::SheetSelector;
use crate::error::{MunicodeError, Result};

/// 1シート分の行データ
///
/// 各セルは文字列化済み（トリム前）で、行末の空セルは取り除かれています。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    /// シート名
    pub name: String,

    /// 行データ（0行目はヘッダー行）
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
/// 形式（XLS/XLSX/XLSB/ODS）は拡張子から自動判定されます。
pub(crate) struct WorkbookParser {
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(MunicodeError::Workbook)` - 形式が不正、または破損している場合
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト
    /// * `Err(MunicodeError::Parse)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>> {
        let all_sheet_names = self.sheet_names();

        match selector {
            SheetSelector::All => Ok(all_sheet_names),

            SheetSelector::Index(index) => all_sheet_names
                .get(*index)
                .map(|name| vec![name.clone()])
                .ok_or_else(|| {
                    MunicodeError::Parse(format!(
                        "Sheet index {} is out of range (total: {})",
                        index,
                        all_sheet_names.len()
                    ))
                }),

            SheetSelector::Name(name) => {
                if !all_sheet_names.contains(name) {
                    return Err(MunicodeError::Parse(format!("Sheet '{}' not found", name)));
                }
                Ok(vec![name.clone()])
            }
        }
    }

    /// シートを読み込み、行データに変換する
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<Sheet> {
        let range = self.workbook.worksheet_range(sheet_name)?;

        let rows = range
            .rows()
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
                trim_trailing_empty(&mut cells);
                cells
            })
            .collect();

        Ok(Sheet::new(sheet_name, rows))
    }

    /// 選択されたシートをブック内の順序で読み込む
    pub fn read_sheets(&mut self, selector: &SheetSelector) -> Result<Vec<Sheet>> {
        self.select_sheets(selector)?
            .iter()
            .map(|name| self.read_sheet(name))
            .collect()
    }
}

/// 表形式ファイルを開き、選択されたシートを読み込む
pub fn read_workbook(path: impl AsRef<Path>, selector: &SheetSelector) -> Result<Vec<Sheet>> {
    WorkbookParser::open(path.as_ref())?.read_sheets(selector)
}

/// セルの値を文字列に変換
///
/// 整数値の浮動小数点数は小数部なしで出力されます（`10006.0` → `"10006"`）。
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn trim_trailing_empty(cells: &mut Vec<String>) {
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
}


// ワークブックを開く処理は統合テスト（tests/）で実装します。
// 実際のXLSXファイルが必要なため、rust_xlsxwriterで生成したファイルを使用します。
