//! municode - 全国地方公共団体コードの変換・分割・可用性チェック
//!
//! 総務省の全国地方公共団体コード一覧（Excel）から市区町村コードマスターを作成し、
//! そのマスターを使ってGeoJSONのFeatureを団体コードごとに分割し、
//! 市区町村ごとの避難所データの有無を集計するためのクレートです。
//!
//! # マスターの作成
//!
//! ```rust,no_run
//! use municode::{build_from_workbook, write_masters};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let built = build_from_workbook("000925835.xls")?;
//!
//!     // code-to-city.json と同じディレクトリに city-to-code.json も書き出す
//!     let paths = write_masters(&built, "docs/api/v0/code-to-city.json")?;
//!     println!("{} / {}", paths.hierarchical.display(), paths.flat.display());
//!     Ok(())
//! }
//! ```
//!
//! # GeoJSONの分割
//!
//! ```rust,no_run
//! use municode::{load_flat_master, FeatureCollection, Partitioner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // .json（階層・フラット）と表形式ファイルのどちらも読み込める
//!     let master = load_flat_master("docs/api/v0/city-to-code.json")?;
//!     let collection = FeatureCollection::from_path("mergeFromCity_1.geojson")?;
//!
//!     let partition = Partitioner::new().partition(collection, &master);
//!     partition.write_to_dir("docs/api/v0/evacuation")?;
//!     Ok(())
//! }
//! ```
//!
//! # 可用性チェック
//!
//! ```rust,no_run
//! use municode::{audit, load_flat_master, write_json, AuditPaths};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let paths = AuditPaths::default();
//!     let master = load_flat_master(&paths.master)?;
//!
//!     let report = audit(&master, &paths.evacuation_dir, &paths.emergency_dir);
//!     write_json(&paths.output, &report)?;
//!     println!("{}", report.summary_table());
//!     Ok(())
//! }
//! ```

mod api;
mod audit;
mod error;
mod geojson;
mod master;
mod output;
mod parser;
mod partition;
mod prefecture;
mod types;

pub mod cli;

// 公開API
pub use api::{MasterFormat, SheetSelector};
pub use audit::{
    audit, AuditPaths, AvailabilityReport, AvailabilitySummary, UnavailableLists,
    UnavailableMunicipality, DEFAULT_DATA_DIR, REPORT_FILE,
};
pub use error::{MunicodeError, Result};
pub use geojson::{Feature, FeatureCollection};
pub use master::{
    build, build_from_workbook, flat_master_from_json, flat_master_from_sheet, load_flat_master,
    write_masters, BuildSummary, BuiltMaster, MasterBuilder, MasterPaths, MasterRow, SheetSummary,
    FLAT_MASTER_FILE, HIERARCHICAL_MASTER_FILE,
};
pub use output::{ensure_dir, write_json};
pub use parser::{read_workbook, Sheet};
pub use partition::{
    partition, FeatureGroup, GroupKey, Partition, Partitioner, WrittenGroup, DEFAULT_NAME_PROPERTY,
    UNKNOWN_LABEL,
};
pub use prefecture::{is_prefecture_only, prefecture_name, PREFECTURES};
pub use types::{FlatMaster, HierarchicalMaster, MunicipalityRecord, Prefecture};
