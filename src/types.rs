//! Core Types Module
//!
//! セル値とシートグリッドのデータ型を定義するモジュール。

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// セルの生の値
///
/// `Empty`は「値なし」、`Text`/`Int`/`Float`はテキストと数値、
/// それ以外はその他のスカラー値を表します。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 値なし
    Empty,
    /// 文字列
    Text(String),
    /// 整数
    Int(i64),
    /// 浮動小数点数
    Float(f64),
    /// 真偽値
    Bool(bool),
    /// 日付・日時
    DateTime(NaiveDateTime),
    /// 経過時間
    Duration(Duration),
    /// エラー値（`#DIV/0!`など）
    Error(String),
}

impl CellValue {
    /// 値が存在しないかどうか
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    dt.as_duration()
                        .map(CellValue::Duration)
                        .unwrap_or(CellValue::Float(dt.as_f64()))
                } else {
                    dt.as_datetime()
                        .map(CellValue::DateTime)
                        .unwrap_or(CellValue::Float(dt.as_f64()))
                }
            }
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// ODSなどが返すISO 8601文字列を日時として解釈する
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 1シート分のセルグリッド
///
/// `bounds`はソースが報告する (行数, 列数) で、過大評価されている場合があります。
/// `(0, 0)`のときだけ、走査せずに空シートと判断されます。
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    /// シート名
    pub name: String,

    /// 使用範囲の大きさ (行数, 列数)
    pub bounds: (usize, usize),

    /// 行ごとのセル値
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    /// 行データからグリッドを生成する（boundsは行データから算出）
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            bounds: (rows.len(), cols),
            rows,
        }
    }

    /// 使用範囲が空かどうか
    pub fn has_empty_bounds(&self) -> bool {
        self.bounds.0 == 0 || self.bounds.1 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Int(0).is_empty());
        assert!(!CellValue::Bool(false).is_empty());
    }

    #[test]
    fn test_from_calamine_data() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(
            CellValue::from(&Data::String("abc".to_string())),
            CellValue::Text("abc".to_string())
        );
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(CellValue::from(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            CellValue::from(&Data::Error(CellErrorType::Div0)),
            CellValue::Error("#DIV/0!".to_string())
        );
    }

    #[test]
    fn test_from_iso_datetime_string() {
        let value = CellValue::from(&Data::DateTimeIso("2024-03-05T10:30:00".to_string()));
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();
        assert_eq!(value, CellValue::DateTime(expected));

        let date_only = CellValue::from(&Data::DateTimeIso("2024-03-05".to_string()));
        assert!(matches!(date_only, CellValue::DateTime(_)));

        let garbage = CellValue::from(&Data::DateTimeIso("not a date".to_string()));
        assert_eq!(garbage, CellValue::Text("not a date".to_string()));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None::<&str>), CellValue::Empty);
        assert_eq!(CellValue::from(Some("x")), CellValue::Text("x".to_string()));
    }

    #[test]
    fn test_sheet_grid_new_computes_bounds() {
        let grid = SheetGrid::new(
            "Sheet1",
            vec![vec!["a".into(), "b".into()], vec!["c".into()]],
        );
        assert_eq!(grid.bounds, (2, 2));
        assert!(!grid.has_empty_bounds());

        let empty = SheetGrid::new("Empty", Vec::new());
        assert_eq!(empty.bounds, (0, 0));
        assert!(empty.has_empty_bounds());
    }
}
