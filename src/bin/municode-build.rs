//! municode-build: 表形式の団体コード一覧から市区町村コードマスターを作成する
//!
//! ```text
//! $ municode-build 000925835.xls docs/api/v0/code-to-city.json
//! ```
//!
//! 階層構造マスターを指定したパスに、フラットマスター（`city-to-code.json`）を
//! 同じディレクトリに書き出します。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use municode::{build_from_workbook, cli, write_masters, HIERARCHICAL_MASTER_FILE};

#[derive(Parser, Debug)]
#[command(name = "municode-build", version, about = "Build the municipality code master from a spreadsheet")]
struct Args {
    /// 入力ファイル（.xls, .xlsx, .xlsm, .xlsb, .ods）
    input: PathBuf,

    /// 階層構造マスターの出力先
    #[arg(default_value = HIERARCHICAL_MASTER_FILE)]
    output: PathBuf,
}

fn main() -> ExitCode {
    cli::init_tracing();
    let args: Args = cli::parse_args();

    cli::run(|| {
        cli::require_exists(&args.input)?;

        let built = build_from_workbook(&args.input)
            .with_context(|| format!("{} の読み込みに失敗しました", args.input.display()))?;

        for sheet in &built.summary.sheets {
            println!(
                "シート「{}」: {}行中 {}件を取り込みました",
                sheet.name, sheet.rows, sheet.accepted
            );
        }

        let paths = write_masters(&built, &args.output).context("マスターの書き出しに失敗しました")?;

        let summary = &built.summary;
        println!("変換完了: {}", paths.hierarchical.display());
        println!("都道府県数: {}", summary.prefectures);
        println!("市区町村数: {}", summary.municipalities);
        println!("逆引きマッピング: {} ({}件)", paths.flat.display(), summary.flat_entries);
        Ok(())
    })
}
