//! CLI Module
//!
//! 3つのバイナリ（`municode-build`, `municode-split`, `municode-audit`）で
//! 共通に使う処理。ログの初期化、引数の解析、前提条件の検査、終了コードの決定を行います。

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{MunicodeError, Result};

/// `RUST_LOG` が未設定の場合のフィルター
pub const DEFAULT_LOG_FILTER: &str = "info";

/// 標準エラー出力へのログ出力を初期化する
///
/// 既にグローバルなサブスクライバーが設定されている場合は何もしません。
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// コマンドライン引数を解析する
///
/// 引数の誤りは終了コード1で終了します。`--help` と `--version` は0で終了します。
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            eprintln!("{}", argument_error(&e));
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    }
}

/// clapの引数エラーを `MunicodeError::Argument` に変換する
pub fn argument_error(e: &clap::Error) -> MunicodeError {
    let rendered = e.render().to_string();
    let message = rendered.strip_prefix("error: ").unwrap_or(&rendered);
    MunicodeError::Argument(message.trim_end().to_string())
}

/// パスが存在することを確認する
pub fn require_exists(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        Ok(())
    } else {
        Err(MunicodeError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// 処理を実行し、結果を終了コードに変換する
///
/// エラーは原因の連鎖とともに標準エラー出力へ表示され、終了コードは1になります。
pub fn run<F>(f: F) -> ExitCode
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match f() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("エラー: {e:#}");
            ExitCode::FAILURE
        }
    }
}
