//! Output Module
//!
//! JSONファイルの書き出し。すべての成果物は2スペースインデントのUTF-8 JSONで、
//! 同じディレクトリの一時ファイルに書き込んでからリネームします。

use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;

/// 値をJSONとして書き出す
///
/// 書き込み途中で失敗した場合、出力先のファイルは変更されません。
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// ディレクトリを（親ディレクトリも含めて）作成する
pub fn ensure_dir(dir: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}
