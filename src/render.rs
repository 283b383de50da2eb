//! Table Render Module
//!
//! 1シート分のセル行をMarkdownパイプテーブルのフラグメントに変換するモジュール。
//!
//! 出力形式:
//!
//! ```markdown
//! # Sheet1
//!
//! | Header1 | Header2 |
//! | --- | --- |
//! | Data1 | Data2 |
//! ```
//!
//! 空白行（すべてのセルが値なし、またはトリム後に空文字列）は除去され、
//! 長さの異なる行は空文字列で右詰めされて列数が揃えられます。
//! 最初の非空白行がヘッダー行になります。

use std::fmt::Display;

use crate::api::DateFormat;
use crate::formatter::CellFormatter;
use crate::types::{CellValue, SheetGrid};

/// 空シートの通知文
pub const EMPTY_SHEET_NOTICE: &str = "此 Sheet 为空";

/// シート間の区切り
pub const SHEET_SEPARATOR: &str = "\n\n---\n\n";

/// 描画済みテーブルの大きさ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableShape {
    /// ヘッダーを含む行数
    pub rows: usize,
    /// 列数
    pub columns: usize,
}

/// シートのセル行をMarkdownテーブルに変換するレンダラー
///
/// 状態を持たない純粋な変換で、同じ入力に対して常に同じ出力を返します。
/// 複数スレッドから同時に呼び出しても安全です。
///
/// # 使用例
///
/// ```rust
/// use sheetmd::{CellValue, TableRenderer};
///
/// let renderer = TableRenderer::new();
/// let rows = vec![
///     vec![CellValue::from("a"), CellValue::from("b")],
///     vec![CellValue::from("c")],
/// ];
/// let markdown = renderer.render("Sheet1", &rows);
/// assert_eq!(markdown, "# Sheet1\n\n| a | b |\n| --- | --- |\n| c |  |\n");
/// ```
#[derive(Debug, Clone)]
pub struct TableRenderer {
    formatter: CellFormatter,
    empty_notice: String,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// デフォルト設定（ISO 8601日付、セルエスケープ有効）のレンダラーを生成する
    pub fn new() -> Self {
        Self {
            formatter: CellFormatter::default(),
            empty_notice: EMPTY_SHEET_NOTICE.to_string(),
        }
    }

    pub(crate) fn from_parts(
        date_format: DateFormat,
        escape: bool,
        empty_notice: impl Into<String>,
    ) -> Self {
        Self {
            formatter: CellFormatter::new(date_format, escape),
            empty_notice: empty_notice.into(),
        }
    }

    /// 空シートの通知文を差し替える
    pub fn with_empty_notice(mut self, notice: impl Into<String>) -> Self {
        self.empty_notice = notice.into();
        self
    }

    /// 日付の出力形式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        let escape = self.formatter.escape();
        self.formatter = CellFormatter::new(format, escape);
        self
    }

    /// `|`と改行のエスケープを有効・無効にする
    pub fn escape_cells(mut self, escape: bool) -> Self {
        let date_format = self.formatter.date_format().clone();
        self.formatter = CellFormatter::new(date_format, escape);
        self
    }

    /// セル行をMarkdownフラグメントに変換する
    ///
    /// # 引数
    ///
    /// * `sheet_name` - 見出しにそのまま使われるシート名
    /// * `rows` - 行の列（各行はセル値の列）
    ///
    /// # 戻り値
    ///
    /// `# {sheet_name}`見出しに続けて、テーブルまたは空シート通知を含む文字列
    pub fn render<I, R>(&self, sheet_name: &str, rows: I) -> String
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[CellValue]>,
    {
        self.render_with_shape(sheet_name, rows).0
    }

    /// `SheetGrid`を変換する
    ///
    /// ソースが報告した使用範囲が空の場合は、行を走査せずに空シート通知を返します。
    pub fn render_grid(&self, grid: &SheetGrid) -> String {
        self.render_grid_with_shape(grid).0
    }

    pub(crate) fn render_grid_with_shape(&self, grid: &SheetGrid) -> (String, Option<TableShape>) {
        if grid.has_empty_bounds() {
            return (self.render_empty(&grid.name), None);
        }
        self.render_with_shape(&grid.name, &grid.rows)
    }

    pub(crate) fn render_with_shape<I, R>(
        &self,
        sheet_name: &str,
        rows: I,
    ) -> (String, Option<TableShape>)
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[CellValue]>,
    {
        let table = self.normalize(rows);
        if table.is_empty() {
            return (self.render_empty(sheet_name), None);
        }

        let columns = table[0].len();
        let mut markdown = heading(sheet_name);

        let mut lines = table.iter();
        if let Some(header) = lines.next() {
            push_row(&mut markdown, header);
            markdown.push_str("| ");
            markdown.push_str(&vec!["---"; columns].join(" | "));
            markdown.push_str(" |\n");
        }
        for row in lines {
            push_row(&mut markdown, row);
        }

        let shape = TableShape {
            rows: table.len(),
            columns,
        };
        (markdown, Some(shape))
    }

    /// 空白行を除去し、各行を同じ列数の文字列行にそろえる
    ///
    /// 戻り値のすべての行は、残った行の最大セル数と同じ長さを持ちます。
    /// 行の順序は入力のまま保たれます。
    pub fn normalize<I, R>(&self, rows: I) -> Vec<Vec<String>>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[CellValue]>,
    {
        let mut table: Vec<Vec<String>> = rows
            .into_iter()
            .filter_map(|row| {
                let raw: Vec<String> = row
                    .as_ref()
                    .iter()
                    .map(|cell| self.formatter.raw_text(cell))
                    .collect();
                // 空白判定はエスケープ前のテキストで行う
                if raw.iter().all(|text| text.trim().is_empty()) {
                    return None;
                }
                Some(raw.iter().map(|text| self.formatter.escape_text(text)).collect())
            })
            .collect();

        let max_cols = table.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut table {
            row.resize(max_cols, String::new());
        }
        table
    }

    /// 見出しと空シート通知だけのフラグメント
    pub fn render_empty(&self, sheet_name: &str) -> String {
        format!("{}{}\n", heading(sheet_name), self.empty_notice)
    }

    /// シートを読み込めなかった場合のフラグメント
    pub fn render_error(&self, sheet_name: &str, reason: impl Display) -> String {
        format!(
            "{}**错误**: 无法转换此 Sheet - {}\n\n",
            heading(sheet_name),
            reason
        )
    }
}

/// シートごとのフラグメントを区切り線でつなぐ
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SHEET_SEPARATOR)
}

fn heading(sheet_name: &str) -> String {
    format!("# {}\n\n", sheet_name)
}

fn push_row(markdown: &mut String, cells: &[String]) {
    markdown.push_str("| ");
    markdown.push_str(&cells.join(" | "));
    markdown.push_str(" |\n");
}
