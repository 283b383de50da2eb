//! Formatter Module
//!
//! セル値をテーブルに埋め込むテキストへ変換するモジュール。

use chrono::NaiveDateTime;
use std::fmt::Write;

use crate::api::DateFormat;
use crate::types::CellValue;

/// `DateFormat::Iso8601`の出力形式（時刻が0時でも省略しない）
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// セルフォーマッター
///
/// `CellValue`をテキスト表現に変換し、必要に応じてテーブル構文を壊す文字をエスケープします。
#[derive(Debug, Clone)]
pub(crate) struct CellFormatter {
    /// 日付の出力形式
    date_format: DateFormat,

    /// `|`と改行をエスケープするか
    escape: bool,
}

impl CellFormatter {
    pub fn new(date_format: DateFormat, escape: bool) -> Self {
        Self {
            date_format,
            escape,
        }
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    pub fn escape(&self) -> bool {
        self.escape
    }

    /// セル値をテキストに変換する
    ///
    /// 値なしは空文字列になります。エスケープが有効な場合、`\`は`\\`に、`|`は`\|`に、
    /// 改行は`<br>`に置換されるため、結果が表の行や列を分割することはありません。
    #[cfg(test)]
    pub fn format(&self, value: &CellValue) -> String {
        self.escape_text(&self.raw_text(value))
    }

    /// 設定に従ってテキストをエスケープする
    pub fn escape_text(&self, text: &str) -> String {
        if self.escape {
            escape_table_cell(text)
        } else {
            text.to_string()
        }
    }

    /// エスケープ前のテキスト表現
    pub fn raw_text(&self, value: &CellValue) -> String {
        match value {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            CellValue::DateTime(dt) => self.format_datetime(dt),
            CellValue::Duration(d) => {
                let total = d.num_seconds();
                let sign = if total < 0 { "-" } else { "" };
                let total = total.unsigned_abs();
                format!(
                    "{}{:02}:{:02}:{:02}",
                    sign,
                    total / 3600,
                    (total % 3600) / 60,
                    total % 60
                )
            }
            CellValue::Error(e) => e.clone(),
        }
    }

    fn format_datetime(&self, dt: &NaiveDateTime) -> String {
        match &self.date_format {
            DateFormat::Iso8601 => dt.format(ISO_DATETIME_FORMAT).to_string(),
            DateFormat::Custom(format_str) => {
                // 不正な書式指定子はDisplay時にエラーになるため、ISO 8601にフォールバック
                let mut formatted = String::new();
                match write!(formatted, "{}", dt.format(format_str)) {
                    Ok(()) => formatted,
                    Err(_) => dt.format(ISO_DATETIME_FORMAT).to_string(),
                }
            }
        }
    }
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self::new(DateFormat::Iso8601, true)
    }
}

/// テーブルセル内で構文として解釈される文字をエスケープする
///
/// `\`を先に二重化するため、セル内の`\|`が区切りとして解釈されることはありません。
fn escape_table_cell(s: &str) -> String {
    if !s.contains(['\\', '|', '\n', '\r']) {
        return s.to_string();
    }
    s.replace('\\', "\\\\")
        .replace("\r\n", "<br>")
        .replace(['\r', '\n'], "<br>")
        .replace('|', "\\|")
}
