//! Prefecture Module
//!
//! 都道府県名の固定テーブルと、都道府県のみのエントリを判定する述語を提供する。

/// 47都道府県名（都道府県コード順: 01 北海道 ... 47 沖縄県）
pub const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

const HOKKAIDO: &str = "北海道";

const PREFECTURE_SUFFIXES: [char; 4] = ['都', '道', '府', '県'];

/// 2桁の都道府県コードから都道府県名を取得する
///
/// `"01"` → `Some("北海道")`、範囲外や数字でないコードは `None`。
pub fn prefecture_name(code: &str) -> Option<&'static str> {
    if code.len() != 2 {
        return None;
    }
    let index: usize = code.parse().ok()?;
    index.checked_sub(1).and_then(|i| PREFECTURES.get(i)).copied()
}

/// 名称が都道府県のみ（市区町村名を含まない）かどうかを判定する
///
/// 「北海道」、または「都・道・府・県」で終わる名称が該当します。
/// 例: 「群馬県」は該当、「群馬県前橋市」は該当しない。
pub fn is_prefecture_only(name: &str) -> bool {
    name == HOKKAIDO || name.ends_with(PREFECTURE_SUFFIXES)
}
