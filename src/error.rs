//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// municodeクレート全体で使用するエラー型
///
/// コードマスターの構築・読み込み、GeoJSONの分割、避難所データの
/// 可用性チェック中に発生するすべてのエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `NotFound`: 参照されたパスが存在しない（読み込み前に明示的に検査）
/// - `UnsupportedFormat`: ローダーが認識しない拡張子
/// - `Json` / `Workbook` / `Parse`: 内容が期待される構造として解析できない
/// - `Argument`: コマンドライン引数の誤り（位置引数の不足など）
#[derive(Error, Debug)]
pub enum MunicodeError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 入力ファイルまたはディレクトリが存在しない
    #[error("File not found: {}", path.display())]
    NotFound {
        /// 見つからなかったパス
        path: PathBuf,
    },

    /// 未対応のファイル形式
    ///
    /// 対応形式は `.json`, `.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.ods` です。
    #[error("Unsupported file format: '{extension}' (supported: .json, .xls, .xlsx, .xlsm, .xlsb, .ods)")]
    UnsupportedFormat {
        /// 検出された拡張子（拡張子がない場合は空文字列）
        extension: String,
    },

    /// JSONの解析エラー
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),

    /// 構造の不一致（空のマスター、オブジェクトでないルートなど）
    #[error("Parse error: {0}")]
    Parse(String),

    /// コマンドライン引数のエラー
    #[error("Argument error: {0}")]
    Argument(String),
}

impl MunicodeError {
    /// 解析エラー系（`Json`, `Workbook`, `Parse`）かどうかを判定
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            MunicodeError::Json(_) | MunicodeError::Workbook(_) | MunicodeError::Parse(_)
        )
    }
}

/// クレート内で使用する`Result`型のエイリアス
pub type Result<T> = std::result::Result<T, MunicodeError>;
