//! Parser Module
//!
//! calamineを使用した表形式ファイル（Excel/ODS）の読み込み。

mod workbook;

pub use workbook::{read_workbook, Sheet};
