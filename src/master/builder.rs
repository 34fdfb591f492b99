//! Master Builder Module
//!
//! 表形式の団体コードデータから階層構造のマスターを構築し、
//! そこからフラットな逆引きマップを導出する。
//!
//! 構築はシート・行を順に畳み込む純粋な処理で、途中状態は
//! `MasterBuilder`の値の中だけに閉じています。

use std::collections::btree_map::Entry;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::parser::Sheet;
use crate::prefecture::prefecture_name;
use crate::types::{FlatMaster, HierarchicalMaster, MunicipalityRecord, Prefecture};

/// 団体コードとして必要な最小の文字数
const CODE_LEN: usize = 6;

/// デバッグ出力する先頭行数
const PREVIEW_ROWS: usize = 5;

/// 1行分の団体コードデータ
///
/// 列構成: 0列目 団体コード、1列目 都道府県名、2列目 市区町村名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRow {
    /// 2桁の都道府県コード
    pub prefecture_code: String,
    /// 4桁の市区町村コード
    pub municipality_code: String,
    /// 都道府県名（トリム済み、空の場合あり）
    pub prefecture_name: String,
    /// 市区町村名（トリム済み、空の場合あり）
    pub local_name: String,
}

impl MasterRow {
    /// 行を解析する
    ///
    /// 2列未満の行、都道府県名と市区町村名の連結が空の行、
    /// 団体コードが6文字未満の行は `None` を返します。
    /// 7文字目以降は無視されます（拒否はしない）。
    pub fn parse(row: &[String]) -> Option<Self> {
        if row.len() < 2 {
            return None;
        }

        let code = row[0].trim();
        let prefecture_name = row[1].trim();
        let local_name = row.get(2).map(|c| c.trim()).unwrap_or_default();

        let code_len = code.chars().count();
        if (prefecture_name.is_empty() && local_name.is_empty()) || code_len < CODE_LEN {
            return None;
        }
        if code_len > CODE_LEN {
            warn!(code, "団体コードが6桁を超えています（7桁目以降は無視）");
        }

        Some(Self {
            prefecture_code: code.chars().take(2).collect(),
            municipality_code: code.chars().skip(2).take(4).collect(),
            prefecture_name: prefecture_name.to_string(),
            local_name: local_name.to_string(),
        })
    }

    /// 6桁の団体コード
    pub fn code(&self) -> String {
        format!("{}{}", self.prefecture_code, self.municipality_code)
    }

    /// 都道府県名及び市町村名
    pub fn full_name(&self) -> String {
        format!("{}{}", self.prefecture_name, self.local_name)
    }
}

/// シートごとの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    /// シート名
    pub name: String,
    /// ヘッダー行を含む行数
    pub rows: usize,
    /// マスターに取り込まれた行数
    pub accepted: usize,
}

/// 構築全体の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub sheets: Vec<SheetSummary>,
    /// 取り込まれた行数の合計（上書きされた行も含む）
    pub accepted_rows: usize,
    pub prefectures: usize,
    pub municipalities: usize,
    pub flat_entries: usize,
}

/// 構築結果
#[derive(Debug, Clone)]
pub struct BuiltMaster {
    pub hierarchical: HierarchicalMaster,
    pub flat: FlatMaster,
    pub summary: BuildSummary,
}

/// マスターの構築状態
///
/// シート・行を受け取るたびに自身を消費して新しい状態を返します。
/// 同じ複合キー（都道府県コード + 市区町村コード）のレコード、および
/// 同じ名称のレコードは後勝ちで上書きされます。
#[derive(Debug, Default)]
pub struct MasterBuilder {
    master: HierarchicalMaster,
    /// 名称 → (都道府県コード, 市区町村コード)
    names: HashMap<String, (String, String)>,
    sheets: Vec<SheetSummary>,
}

impl MasterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1シート分の行を取り込む（0行目のヘッダー行はスキップ）
    pub fn with_sheet(mut self, sheet: &Sheet) -> Self {
        for (i, row) in sheet.rows.iter().take(PREVIEW_ROWS).enumerate() {
            debug!(sheet = %sheet.name, row = i, cells = ?&row[..row.len().min(4)], "行プレビュー");
        }

        let mut accepted = 0;
        for row in sheet.rows.iter().skip(1) {
            if let Some(entry) = MasterRow::parse(row) {
                self = self.with_row(entry);
                accepted += 1;
            }
        }

        debug!(sheet = %sheet.name, rows = sheet.rows.len(), accepted, "シート処理完了");
        self.sheets.push(SheetSummary {
            name: sheet.name.clone(),
            rows: sheet.rows.len(),
            accepted,
        });
        self
    }

    /// 解析済みの1行を取り込む
    pub fn with_row(mut self, row: MasterRow) -> Self {
        let code = row.code();
        let full_name = row.full_name();
        let key = (row.prefecture_code.clone(), row.municipality_code.clone());

        if let Some(previous) = self.names.insert(full_name.clone(), key.clone()) {
            if previous != key {
                self.remove_record(&previous);
            }
        }

        let prefecture = match self.master.prefectures.entry(row.prefecture_code.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let name = if row.prefecture_name.is_empty() {
                    prefecture_name(&row.prefecture_code)
                        .unwrap_or_default()
                        .to_string()
                } else {
                    row.prefecture_name.clone()
                };
                entry.insert(Prefecture::new(name, row.prefecture_code.clone()))
            }
        };

        let replaced = prefecture.municipalities.insert(
            row.municipality_code,
            MunicipalityRecord {
                code,
                full_name: full_name.clone(),
                local_name: Some(row.local_name),
            },
        );
        if let Some(old) = replaced.filter(|old| old.full_name != full_name) {
            self.names.remove(&old.full_name);
        }
        self
    }

    fn remove_record(&mut self, (prefecture_code, municipality_code): &(String, String)) {
        if let Some(prefecture) = self.master.prefectures.get_mut(prefecture_code) {
            prefecture.municipalities.remove(municipality_code);
        }
    }

    /// 構築を終了し、階層構造とフラット構造を返す
    pub fn finish(self) -> BuiltMaster {
        let flat = self.master.flatten();
        let summary = BuildSummary {
            accepted_rows: self.sheets.iter().map(|s| s.accepted).sum(),
            prefectures: self.master.prefecture_count(),
            municipalities: self.master.municipality_count(),
            flat_entries: flat.len(),
            sheets: self.sheets,
        };

        BuiltMaster {
            hierarchical: self.master,
            flat,
            summary,
        }
    }
}

/// シート列からマスターを構築する
///
/// シート順、行順に処理され、後の行が前の行を上書きします。
pub fn build(sheets: &[Sheet]) -> BuiltMaster {
    sheets
        .iter()
        .fold(MasterBuilder::new(), MasterBuilder::with_sheet)
        .finish()
}
