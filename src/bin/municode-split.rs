//! municode-split: GeoJSONを団体コードごとのファイルに分割する
//!
//! ```text
//! $ municode-split mergeFromCity_1.geojson docs/api/v0/city-to-code.json docs/api/v0/evacuation
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use municode::{cli, load_flat_master, FeatureCollection, GroupKey, Partitioner, DEFAULT_NAME_PROPERTY};

#[derive(Parser, Debug)]
#[command(name = "municode-split", version, about = "Split a GeoJSON FeatureCollection by municipality code")]
struct Args {
    /// 入力GeoJSON
    input: PathBuf,

    /// 市区町村コードマスター（.json または表形式ファイル）
    master: PathBuf,

    /// 出力ディレクトリ
    #[arg(default_value = "./output")]
    output_dir: PathBuf,

    /// 市区町村の正式名称を持つプロパティ名
    #[arg(long, default_value = DEFAULT_NAME_PROPERTY)]
    name_property: String,
}

fn main() -> ExitCode {
    cli::init_tracing();
    let args: Args = cli::parse_args();

    cli::run(|| {
        cli::require_exists(&args.input)?;
        cli::require_exists(&args.master)?;

        let master = load_flat_master(&args.master)
            .with_context(|| format!("マスター {} の読み込みに失敗しました", args.master.display()))?;
        println!("マスター: {}件", master.len());

        let collection = FeatureCollection::from_path(&args.input)
            .with_context(|| format!("{} の読み込みに失敗しました", args.input.display()))?;
        println!("Feature数: {}", collection.features.len());

        let partition = Partitioner::new()
            .with_name_property(args.name_property.as_str())
            .partition(collection, &master);

        let written = partition
            .write_to_dir(&args.output_dir)
            .with_context(|| format!("{} への書き出しに失敗しました", args.output_dir.display()))?;

        let total = written.len();
        for (i, group) in written.iter().enumerate() {
            println!(
                "[{}/{}] {}: {}件 → {}",
                i + 1,
                total,
                group.key.label(),
                group.features,
                group.path.display()
            );
        }

        let unknown = partition.unknown_count();
        if unknown > 0 {
            eprintln!(
                "警告: {}件のFeatureで団体コードを特定できませんでした ({})",
                unknown,
                GroupKey::Unknown.file_name()
            );
        }

        println!(
            "分割完了: {}グループ, {}件",
            partition.len(),
            partition.feature_count()
        );
        Ok(())
    })
}
