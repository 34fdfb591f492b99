//! municode-audit: 市区町村ごとの避難所データの有無を調べる
//!
//! データディレクトリ（デフォルト `docs/api/v0`）の `city-to-code.json` を基準に、
//! `evacuation/<code>.json` と `emergency/<code>.json` の存在を確認し、
//! `data-availability.json` にレポートを書き出します。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use municode::{audit, cli, load_flat_master, write_json, AuditPaths, DEFAULT_DATA_DIR};

/// 表示する「両方なし」の件数
const SAMPLE_SIZE: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "municode-audit", version, about = "Audit shelter dataset coverage per municipality")]
struct Args {
    /// データディレクトリ
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// レポートの出力先（デフォルト: <data-dir>/data-availability.json）
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    cli::init_tracing();
    let args: Args = cli::parse_args();

    cli::run(|| {
        let mut paths = AuditPaths::under(&args.data_dir);
        if let Some(output) = args.output {
            paths.output = output;
        }

        cli::require_exists(&paths.master)?;
        for dir in [&paths.evacuation_dir, &paths.emergency_dir] {
            if !dir.is_dir() {
                warn!(dir = %dir.display(), "データディレクトリがありません。すべて「なし」として扱います");
            }
        }

        let master = load_flat_master(&paths.master)
            .with_context(|| format!("マスター {} の読み込みに失敗しました", paths.master.display()))?;

        let report = audit(&master, &paths.evacuation_dir, &paths.emergency_dir);
        write_json(&paths.output, &report)
            .with_context(|| format!("{} への書き出しに失敗しました", paths.output.display()))?;

        println!("データ可用性チェック結果");
        println!("{}", report.summary_table());

        let sample = report.both_missing_sample(SAMPLE_SIZE);
        if !sample.is_empty() {
            println!();
            println!("両方のデータがない市区町村（先頭{}件）:", sample.len());
            for m in sample {
                println!("  {} {}", m.code, m.name);
            }
        }

        println!();
        println!("レポート: {}", paths.output.display());
        Ok(())
    })
}
