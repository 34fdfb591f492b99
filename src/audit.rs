//! Audit Module
//!
//! 市区町村ごとの避難所データ（指定避難所・緊急避難場所）の有無を調べ、
//! 集計レポートを作成する。ファイルは存在確認のみで、中身は読まない。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::master::FLAT_MASTER_FILE;
use crate::prefecture::is_prefecture_only;
use crate::types::FlatMaster;

/// データディレクトリのデフォルト
pub const DEFAULT_DATA_DIR: &str = "docs/api/v0";

/// レポートのファイル名
pub const REPORT_FILE: &str = "data-availability.json";

/// 可用性チェックで使用するパス一式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPaths {
    /// フラットマスター（`city-to-code.json`）
    pub master: PathBuf,
    /// 指定避難所データのディレクトリ
    pub evacuation_dir: PathBuf,
    /// 緊急避難場所データのディレクトリ
    pub emergency_dir: PathBuf,
    /// レポートの出力先
    pub output: PathBuf,
}

impl AuditPaths {
    /// データディレクトリ配下の規定のレイアウト
    pub fn under(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            master: data_dir.join(FLAT_MASTER_FILE),
            evacuation_dir: data_dir.join("evacuation"),
            emergency_dir: data_dir.join("emergency"),
            output: data_dir.join(REPORT_FILE),
        }
    }
}

impl Default for AuditPaths {
    fn default() -> Self {
        Self::under(DEFAULT_DATA_DIR)
    }
}

/// データが欠けている市区町村
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableMunicipality {
    pub code: String,
    pub name: String,
    /// 指定避難所データの有無
    pub evacuation: bool,
    /// 緊急避難場所データの有無
    pub emergency: bool,
}

/// データが欠けている市区町村の一覧（3つのリストは互いに素）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableLists {
    /// 両方なし
    pub both: Vec<UnavailableMunicipality>,
    /// 指定避難所データのみなし
    pub evacuation_only: Vec<UnavailableMunicipality>,
    /// 緊急避難場所データのみなし
    pub emergency_only: Vec<UnavailableMunicipality>,
}

/// 集計値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    /// 対象の市区町村数（都道府県のみのエントリを除く）
    pub total: usize,
    /// いずれかのデータがある市区町村数
    pub available: usize,
    /// どちらのデータもない市区町村数（`total - available`）
    pub unavailable: usize,
    pub both_missing: usize,
    pub evacuation_missing: usize,
    pub emergency_missing: usize,
    /// 指定避難所データがある市区町村数
    pub evacuation_total: usize,
    /// 緊急避難場所データがある市区町村数
    pub emergency_total: usize,
}

/// 可用性レポート
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub unavailable: UnavailableLists,
    pub summary: AvailabilitySummary,
}

impl AvailabilityReport {
    /// 集計値を表形式の文字列にする（ラベルは表示幅で揃える）
    pub fn summary_table(&self) -> String {
        let s = &self.summary;
        let rows = [
            ("総自治体数", s.total),
            ("データあり", s.available),
            ("データなし", s.unavailable),
            ("指定避難所データあり", s.evacuation_total),
            ("緊急避難所データあり", s.emergency_total),
            ("両方なし", s.both_missing),
            ("指定避難所のみなし", s.evacuation_missing),
            ("緊急避難所のみなし", s.emergency_missing),
        ];

        let label_width = rows.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
        rows.iter()
            .map(|(label, count)| {
                let padding = " ".repeat(label_width - label.width());
                format!("{label}{padding}  {count:>6}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 両方のデータがない市区町村の先頭 `n` 件
    pub fn both_missing_sample(&self, n: usize) -> &[UnavailableMunicipality] {
        let both = &self.unavailable.both;
        &both[..n.min(both.len())]
    }
}

/// 全市区町村の避難所データの有無を調べる
///
/// 都道府県のみの名称（例: 「群馬県」）は集計から除外されます。
/// 各市区町村について `<dir>/<code>.json` の存在を2つのディレクトリで独立に確認し、
/// 団体コード順にレポートへ記録します。
pub fn audit(
    master: &FlatMaster,
    evacuation_dir: impl AsRef<Path>,
    emergency_dir: impl AsRef<Path>,
) -> AvailabilityReport {
    let evacuation_dir = evacuation_dir.as_ref();
    let emergency_dir = emergency_dir.as_ref();

    let mut lists = UnavailableLists::default();
    let mut summary = AvailabilitySummary::default();

    for (name, code) in master.entries_by_code() {
        if is_prefecture_only(name) {
            debug!(name, code, "都道府県のみのエントリをスキップ");
            continue;
        }

        summary.total += 1;

        let file_name = format!("{code}.json");
        let evacuation = evacuation_dir.join(&file_name).exists();
        let emergency = emergency_dir.join(&file_name).exists();

        if evacuation {
            summary.evacuation_total += 1;
        }
        if emergency {
            summary.emergency_total += 1;
        }
        if evacuation || emergency {
            summary.available += 1;
        }

        let list = match (evacuation, emergency) {
            (false, false) => &mut lists.both,
            (false, true) => &mut lists.evacuation_only,
            (true, false) => &mut lists.emergency_only,
            (true, true) => continue,
        };
        list.push(UnavailableMunicipality {
            code: code.to_string(),
            name: name.to_string(),
            evacuation,
            emergency,
        });
    }

    summary.unavailable = summary.total - summary.available;
    summary.both_missing = lists.both.len();
    summary.evacuation_missing = lists.evacuation_only.len();
    summary.emergency_missing = lists.emergency_only.len();

    AvailabilityReport {
        unavailable: lists,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        evacuation: PathBuf,
        emergency: PathBuf,
    }

    fn fixture(evacuation_codes: &[&str], emergency_codes: &[&str]) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let evacuation = root.path().join("evacuation");
        let emergency = root.path().join("emergency");
        fs::create_dir_all(&evacuation).unwrap();
        fs::create_dir_all(&emergency).unwrap();
        for code in evacuation_codes {
            fs::write(evacuation.join(format!("{code}.json")), "{}").unwrap();
        }
        for code in emergency_codes {
            fs::write(emergency.join(format!("{code}.json")), "{}").unwrap();
        }
        Fixture {
            _root: root,
            evacuation,
            emergency,
        }
    }

    fn master(entries: &[(&str, &str)]) -> FlatMaster {
        entries
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_string()))
            .collect()
    }

    #[test]
    fn test_single_municipality_missing_emergency() {
        let fx = fixture(&["010006"], &[]);
        let report = audit(
            &master(&[("Test Pref TestCity", "010006")]),
            &fx.evacuation,
            &fx.emergency,
        );

        let s = report.summary;
        assert_eq!(s.total, 1);
        assert_eq!(s.available, 1);
        assert_eq!(s.unavailable, 0);
        assert_eq!(s.evacuation_missing, 0);
        assert_eq!(s.emergency_missing, 1);
        assert_eq!(s.both_missing, 0);
        assert_eq!(
            report.unavailable.emergency_only,
            vec![UnavailableMunicipality {
                code: "010006".to_string(),
                name: "Test Pref TestCity".to_string(),
                evacuation: true,
                emergency: false,
            }]
        );
    }

    #[test]
    fn test_prefecture_only_entry_is_excluded() {
        let fx = fixture(&["100005"], &["100005"]);
        let report = audit(
            &master(&[("群馬県", "100005"), ("北海道", "010006")]),
            &fx.evacuation,
            &fx.emergency,
        );

        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.available, 0);
        assert!(report.unavailable.both.is_empty());
    }

    #[test]
    fn test_classification_buckets() {
        let fx = fixture(&["011002", "012025"], &["011002", "131016"]);
        let report = audit(
            &master(&[
                ("北海道札幌市", "011002"),
                ("北海道函館市", "012025"),
                ("東京都千代田区", "131016"),
                ("沖縄県那覇市", "472018"),
                ("群馬県", "100005"),
            ]),
            &fx.evacuation,
            &fx.emergency,
        );

        let s = report.summary;
        assert_eq!(s.total, 4);
        assert_eq!(s.available, 3);
        assert_eq!(s.unavailable, 1);
        assert_eq!(s.evacuation_total, 2);
        assert_eq!(s.emergency_total, 2);
        assert_eq!(s.both_missing, 1);
        assert_eq!(s.evacuation_missing, 1);
        assert_eq!(s.emergency_missing, 1);

        assert_eq!(report.unavailable.both[0].code, "472018");
        assert_eq!(report.unavailable.evacuation_only[0].code, "131016");
        assert_eq!(report.unavailable.emergency_only[0].code, "012025");
    }

    #[test]
    fn test_lists_are_in_code_order() {
        let fx = fixture(&[], &[]);
        let report = audit(
            &master(&[
                ("沖縄県那覇市", "472018"),
                ("北海道札幌市", "011002"),
                ("東京都千代田区", "131016"),
            ]),
            &fx.evacuation,
            &fx.emergency,
        );

        let codes: Vec<&str> = report
            .unavailable
            .both
            .iter()
            .map(|m| m.code.as_str())
            .collect();
        assert_eq!(codes, vec!["011002", "131016", "472018"]);
    }

    #[test]
    fn test_missing_directories_count_as_absent() {
        let root = tempfile::tempdir().unwrap();
        let report = audit(
            &master(&[("北海道札幌市", "011002")]),
            root.path().join("evacuation"),
            root.path().join("emergency"),
        );
        assert_eq!(report.summary.both_missing, 1);
    }

    #[test]
    fn test_report_wire_format() {
        let fx = fixture(&[], &["011002"]);
        let report = audit(&master(&[("北海道札幌市", "011002")]), &fx.evacuation, &fx.emergency);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["summary"]["evacuationMissing"], 1);
        assert_eq!(json["summary"]["evacuationTotal"], 0);
        assert_eq!(json["summary"]["emergencyTotal"], 1);
        assert_eq!(json["unavailable"]["evacuationOnly"][0]["code"], "011002");
        assert_eq!(json["unavailable"]["evacuationOnly"][0]["emergency"], true);
        assert!(json["unavailable"]["both"].as_array().unwrap().is_empty());
        assert!(json["unavailable"]["emergencyOnly"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_summary_table_is_aligned() {
        let fx = fixture(&["011002"], &[]);
        let report = audit(&master(&[("北海道札幌市", "011002")]), &fx.evacuation, &fx.emergency);
        let table = report.summary_table();

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("総自治体数"));
        assert!(lines[0].ends_with("     1"));
        let widths: Vec<usize> = lines.iter().map(|l| l.width()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_both_missing_sample() {
        let fx = fixture(&[], &[]);
        let entries: Vec<(String, String)> = (1..=7)
            .map(|i| (format!("北海道テスト市{i}"), format!("01000{i}")))
            .collect();
        let master: FlatMaster = entries.into_iter().collect();
        let report = audit(&master, &fx.evacuation, &fx.emergency);

        let sample = report.both_missing_sample(5);
        assert_eq!(sample.len(), 5);
        assert_eq!(sample[0].code, "010001");
        assert_eq!(report.both_missing_sample(50).len(), 7);
    }

    #[test]
    fn test_audit_paths_layout() {
        let paths = AuditPaths::default();
        assert_eq!(paths.master, PathBuf::from("docs/api/v0/city-to-code.json"));
        assert_eq!(paths.evacuation_dir, PathBuf::from("docs/api/v0/evacuation"));
        assert_eq!(paths.emergency_dir, PathBuf::from("docs/api/v0/emergency"));
        assert_eq!(paths.output, PathBuf::from("docs/api/v0/data-availability.json"));
    }

    // プロパティベーステスト
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_lists_are_disjoint_and_counts_add_up(
                presence in prop::collection::vec((any::<bool>(), any::<bool>()), 0..40)
            ) {
                let evacuation: Vec<String> = presence
                    .iter()
                    .enumerate()
                    .filter(|(_, (e, _))| *e)
                    .map(|(i, _)| format!("01{i:04}"))
                    .collect();
                let emergency: Vec<String> = presence
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, m))| *m)
                    .map(|(i, _)| format!("01{i:04}"))
                    .collect();
                let evacuation: Vec<&str> = evacuation.iter().map(String::as_str).collect();
                let emergency: Vec<&str> = emergency.iter().map(String::as_str).collect();
                let fx = fixture(&evacuation, &emergency);

                let mut master: FlatMaster = (0..presence.len())
                    .map(|i| (format!("北海道テスト町{i}"), format!("01{i:04}")))
                    .collect();
                master.insert("北海道", "019999");

                let report = audit(&master, &fx.evacuation, &fx.emergency);
                let s = report.summary;

                prop_assert_eq!(s.total, presence.len());
                prop_assert_eq!(s.available + s.unavailable, s.total);
                prop_assert_eq!(s.unavailable, s.both_missing);
                prop_assert_eq!(s.evacuation_total, evacuation.len());
                prop_assert_eq!(s.emergency_total, emergency.len());

                let lists = &report.unavailable;
                let mut codes: Vec<&str> = lists
                    .both
                    .iter()
                    .chain(&lists.evacuation_only)
                    .chain(&lists.emergency_only)
                    .map(|m| m.code.as_str())
                    .collect();
                let listed = codes.len();
                codes.sort_unstable();
                codes.dedup();
                prop_assert_eq!(codes.len(), listed);

                let complete = presence.iter().filter(|(e, m)| *e && *m).count();
                prop_assert_eq!(listed + complete, s.total);
            }
        }
    }
}
