//! Master Module
//!
//! 市区町村コードマスターの構築（表形式 → 階層JSON + フラットJSON）と読み込み。

mod builder;
mod loader;

pub use builder::{build, BuildSummary, BuiltMaster, MasterBuilder, MasterRow, SheetSummary};
pub use loader::{flat_master_from_json, flat_master_from_sheet, load_flat_master};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::SheetSelector;
use crate::error::{MunicodeError, Result};
use crate::output::write_json;
use crate::parser::read_workbook;

/// 階層構造マスターのデフォルトファイル名
pub const HIERARCHICAL_MASTER_FILE: &str = "code-to-city.json";

/// フラットマスター（逆引き）のファイル名
pub const FLAT_MASTER_FILE: &str = "city-to-code.json";

/// 書き出した2つのマスターファイルのパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPaths {
    pub hierarchical: PathBuf,
    pub flat: PathBuf,
}

impl MasterPaths {
    /// 階層構造マスターのパスから、同じディレクトリのフラットマスターのパスを導出する
    pub fn beside(hierarchical: impl Into<PathBuf>) -> Self {
        let hierarchical = hierarchical.into();
        let flat = hierarchical.with_file_name(FLAT_MASTER_FILE);
        Self { hierarchical, flat }
    }
}

/// 表形式ファイルの全シートからマスターを構築する
pub fn build_from_workbook(path: impl AsRef<Path>) -> Result<BuiltMaster> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MunicodeError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let sheets = read_workbook(path, &SheetSelector::All)?;
    info!(
        sheets = ?sheets.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        "利用可能なシート"
    );
    Ok(build(&sheets))
}

/// 階層構造マスターとフラットマスターを書き出す
///
/// フラットマスターは階層構造マスターと同じディレクトリに
/// `city-to-code.json` として書き出されます。
pub fn write_masters(built: &BuiltMaster, hierarchical_path: impl Into<PathBuf>) -> Result<MasterPaths> {
    let paths = MasterPaths::beside(hierarchical_path);
    write_json(&paths.hierarchical, &built.hierarchical)?;
    write_json(&paths.flat, &built.flat)?;
    Ok(paths)
}
