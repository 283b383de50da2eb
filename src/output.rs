//! Output Module
//!
//! 変換結果の型と、保存先ファイル名の生成ヘルパーを提供するモジュール。
//!
//! 変換がどの経路を通ったか（テーブル、空シート、読み込み失敗）に関係なく、
//! 結果は常に`ConversionOutput`として返されます。

use serde::Serialize;
use std::path::{Path, PathBuf};

/// ファイル名に使用できない文字
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// サニタイズ後に空になった場合のファイル名
pub const DEFAULT_TITLE: &str = "converted_document";

/// シートごとの変換結果の種類
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SheetStatus {
    /// テーブルとして出力された
    Table {
        /// ヘッダーを含む行数
        rows: usize,
        /// 列数
        columns: usize,
    },

    /// データがなく、空シート通知が出力された
    Empty,

    /// 読み込みに失敗し、エラーフラグメントが出力された
    Failed {
        /// 失敗の理由
        reason: String,
    },
}

/// 1シート分の変換結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOutcome {
    /// シート名
    pub name: String,

    /// 変換結果の種類
    pub status: SheetStatus,

    /// このシートのMarkdownフラグメント
    #[serde(skip)]
    pub markdown: String,
}

impl SheetOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, SheetStatus::Failed { .. })
    }
}

/// ワークブック全体の変換結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutput {
    /// 入力ファイルのパス（ファイルから変換した場合）
    pub source: Option<PathBuf>,

    /// 選択順のシートごとの結果
    pub sheets: Vec<SheetOutcome>,

    /// 全シートを区切り線でつないだMarkdown
    #[serde(skip)]
    pub markdown: String,
}

impl ConversionOutput {
    /// 読み込みに失敗したシート
    pub fn failed_sheets(&self) -> impl Iterator<Item = &SheetOutcome> {
        self.sheets.iter().filter(|sheet| sheet.is_failed())
    }

    /// すべてのシートが読み込めたかどうか
    pub fn is_fully_successful(&self) -> bool {
        self.failed_sheets().next().is_none()
    }

    /// 保存用のタイトル（入力ファイル名から拡張子を除いたもの）
    pub fn title(&self) -> String {
        self.source
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| sanitize_filename(&stem.to_string_lossy()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}

/// ファイル名に使えない文字を`_`に置換する
///
/// 前後の`.`と空白を取り除き、空になった場合は`converted_document`を返します。
///
/// ```rust
/// use sheetmd::sanitize_filename;
///
/// assert_eq!(sanitize_filename("report: 2024/Q1?"), "report_ 2024_Q1_");
/// assert_eq!(sanitize_filename(" .. "), "converted_document");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == '.' || c == ' ');
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 入力ファイルと同じディレクトリに`{ファイル名}.md`のパスを生成する
pub fn default_output_path(input: &Path) -> PathBuf {
    let title = input
        .file_stem()
        .map(|stem| sanitize_filename(&stem.to_string_lossy()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    input.with_file_name(format!("{}.md", title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: SheetStatus) -> SheetOutcome {
        SheetOutcome {
            name: name.to_string(),
            status,
            markdown: String::new(),
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("  ..report..  "), "report");
        assert_eq!(sanitize_filename("売上データ"), "売上データ");
        assert_eq!(sanitize_filename(""), DEFAULT_TITLE);
        assert_eq!(sanitize_filename("..."), DEFAULT_TITLE);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/book.xlsx")),
            PathBuf::from("/data/book.md")
        );
        assert_eq!(
            default_output_path(Path::new("q1|q2.xls")),
            PathBuf::from("q1_q2.md")
        );
    }

    #[test]
    fn test_failed_sheets() {
        let output = ConversionOutput {
            source: None,
            sheets: vec![
                outcome("A", SheetStatus::Table { rows: 2, columns: 1 }),
                outcome(
                    "B",
                    SheetStatus::Failed {
                        reason: "boom".to_string(),
                    },
                ),
                outcome("C", SheetStatus::Empty),
            ],
            markdown: String::new(),
        };

        let failed: Vec<&str> = output.failed_sheets().map(|s| s.name.as_str()).collect();
        assert_eq!(failed, vec!["B"]);
        assert!(!output.is_fully_successful());
    }

    #[test]
    fn test_title() {
        let mut output = ConversionOutput {
            source: None,
            sheets: Vec::new(),
            markdown: String::new(),
        };
        assert_eq!(output.title(), DEFAULT_TITLE);

        output.source = Some(PathBuf::from("dir/月次*報告.xlsx"));
        assert_eq!(output.title(), "月次_報告");
    }

    #[test]
    fn test_summary_json() {
        let output = ConversionOutput {
            source: Some(PathBuf::from("book.xlsx")),
            sheets: vec![
                outcome("A", SheetStatus::Table { rows: 3, columns: 2 }),
                outcome(
                    "B",
                    SheetStatus::Failed {
                        reason: "Worksheet not found".to_string(),
                    },
                ),
            ],
            markdown: "ignored".to_string(),
        };

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["source"], "book.xlsx");
        assert_eq!(json["sheets"][0]["status"]["kind"], "table");
        assert_eq!(json["sheets"][0]["status"]["columns"], 2);
        assert_eq!(json["sheets"][1]["status"]["kind"], "failed");
        assert_eq!(json["sheets"][1]["status"]["reason"], "Worksheet not found");
        assert!(json.get("markdown").is_none());
    }
}
