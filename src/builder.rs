//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use crate::api::{DateFormat, SheetSelector};
use crate::error::SheetMdError;
use crate::output::{ConversionOutput, SheetOutcome, SheetStatus};
use crate::parser::WorkbookParser;
use crate::render::{join_fragments, TableRenderer, EMPTY_SHEET_NOTICE};
use crate::security::SecurityConfig;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use log::{debug, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 日付形式
    pub date_format: DateFormat,

    /// `|`と改行をエスケープするか
    pub escape_cells: bool,

    /// 空シートの通知文
    pub empty_notice: String,

    /// シートを並列に変換するか
    pub parallel: bool,

    /// 入力サイズの制限
    pub security: SecurityConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            date_format: DateFormat::Iso8601,
            escape_cells: true,
            empty_notice: EMPTY_SHEET_NOTICE.to_string(),
            parallel: true,
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmd::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), sheetmd::SheetMdError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Names(vec!["売上".to_string(), "在庫".to_string()]))
///     .escape_cells(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: すべてのシート
    /// - 日付形式: ISO 8601
    /// - セルエスケープ: 有効
    /// - 空シート通知: `此 Sheet 为空`
    /// - 並列変換: 有効
    /// - 入力サイズ上限: 2GB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 変換対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 日付の出力形式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// `|`と改行のエスケープを有効・無効にする
    ///
    /// 無効にすると、セルのテキストがそのまま出力されます。
    pub fn escape_cells(mut self, escape: bool) -> Self {
        self.config.escape_cells = escape;
        self
    }

    /// 空シートの通知文を指定する
    pub fn with_empty_notice(mut self, notice: impl Into<String>) -> Self {
        self.config.empty_notice = notice.into();
        self
    }

    /// シートを並列に変換するかを指定する
    ///
    /// 出力の順序は並列・逐次のどちらでも選択順です。
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `SheetMdError::Config(String)`
    ///   * カスタム日付形式が空、または不正な書式指定子を含む
    ///   * 入力サイズ上限が0
    pub fn build(self) -> Result<Converter, SheetMdError> {
        // 1. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            let invalid = format_str.is_empty()
                || StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error));
            if invalid {
                return Err(SheetMdError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
            // テスト用の日付でフォーマット試行
            let test_date = NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| SheetMdError::Config("Failed to create test date".to_string()))?;
            let mut formatted = String::new();
            if std::fmt::write(&mut formatted, format_args!("{}", test_date.format(format_str)))
                .is_err()
            {
                return Err(SheetMdError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 2. 入力サイズ上限の検証
        if self.config.security.max_input_file_size == 0 {
            return Err(SheetMdError::Config(
                "Maximum input size must be greater than 0".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// 選択されたシートを1枚ずつ`TableRenderer`で変換し、区切り線でつないだMarkdownを返します。
/// 1枚のシートが読み込めなくても、そのシートだけがエラーフラグメントになり、
/// 他のシートの変換は続行されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmd::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), sheetmd::SheetMdError> {
/// let converter = ConverterBuilder::new().build()?;
/// let input = File::open("example.xlsx")?;
/// let output = File::create("example.md")?;
/// converter.convert(input, output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
    renderer: TableRenderer,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        let renderer = TableRenderer::from_parts(
            config.date_format.clone(),
            config.escape_cells,
            config.empty_notice.clone(),
        );
        Self { config, renderer }
    }

    /// 変換に使用するレンダラー
    pub fn renderer(&self) -> &TableRenderer {
        &self.renderer
    }

    /// ワークブックのシート名を順に列挙する
    pub fn list_sheets<R: Read>(&self, input: R) -> Result<Vec<String>, SheetMdError> {
        let parser = WorkbookParser::open(input, &self.config.security)?;
        Ok(parser.sheet_names())
    }

    /// ワークブックを変換し、シートごとの結果を含む`ConversionOutput`を返す
    ///
    /// # 処理フロー
    ///
    /// 1. 入力をメモリに読み込み、サイズ制限を検証
    /// 2. ワークブックを開き、シートを選択
    /// 3. 各シートを変換（並列または逐次）
    /// 4. 選択順にフラグメントを連結
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionOutput)` - 一部のシートが読み込めなかった場合も`Ok`
    /// * `Err(SheetMdError)` - ワークブック自体が開けない、シート選択が不正な場合
    pub fn convert_to_output<R: Read>(
        &self,
        mut input: R,
    ) -> Result<ConversionOutput, SheetMdError> {
        // 1. 入力データをメモリに読み込む（並列処理のため）
        let mut buffer = Vec::new();
        let bytes_read = input.read_to_end(&mut buffer)?;
        self.config.security.check_input_size(bytes_read)?;

        // 2. ワークブックを開いてシート選択
        let parser = WorkbookParser::from_bytes(buffer.clone())?;
        let sheet_names = parser.select_sheets(&self.config.sheet_selector)?;

        // 3. 各シートの変換
        let sheets: Vec<SheetOutcome> = if self.config.parallel && sheet_names.len() > 1 {
            // ワーカーごとにメモリ上のデータからワークブックを開き直す
            sheet_names
                .par_iter()
                .map(|sheet_name| match WorkbookParser::from_bytes(buffer.clone()) {
                    Ok(mut parser) => self.convert_sheet(&mut parser, sheet_name),
                    Err(e) => self.failed_sheet(sheet_name, &e),
                })
                .collect()
        } else {
            let mut parser = parser;
            sheet_names
                .iter()
                .map(|sheet_name| self.convert_sheet(&mut parser, sheet_name))
                .collect()
        };

        // 4. 選択順に連結（par_iter().collect()は順序を保つ）
        let fragments: Vec<&str> = sheets.iter().map(|s| s.markdown.as_str()).collect();
        let markdown = join_fragments(&fragments);

        debug!(
            "converted {} sheets ({} failed)",
            sheets.len(),
            sheets.iter().filter(|s| s.is_failed()).count()
        );

        Ok(ConversionOutput {
            source: None,
            sheets,
            markdown,
        })
    }

    /// ファイルパスを指定して変換する
    ///
    /// 結果の`source`に入力パスが記録され、`ConversionOutput::title()`で保存名に使えます。
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConversionOutput, SheetMdError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut output = self.convert_to_output(file)?;
        output.source = Some(path.to_path_buf());
        Ok(output)
    }

    /// ワークブックを変換し、MarkdownをUTF-8で書き出す
    ///
    /// ワークブック全体のエラーの場合は何も書き込みません。
    pub fn convert<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<(), SheetMdError> {
        let result = self.convert_to_output(input)?;
        output.write_all(result.markdown.as_bytes())?;
        output.flush()?;
        Ok(())
    }

    /// ワークブックをMarkdown文字列に変換
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, SheetMdError> {
        Ok(self.convert_to_output(input)?.markdown)
    }

    /// 1シートを変換（読み込み失敗はエラーフラグメントに変換）
    fn convert_sheet(&self, parser: &mut WorkbookParser, sheet_name: &str) -> SheetOutcome {
        match parser.read_sheet(sheet_name) {
            Ok(grid) => {
                let (markdown, shape) = self.renderer.render_grid_with_shape(&grid);
                let status = match shape {
                    Some(shape) => SheetStatus::Table {
                        rows: shape.rows,
                        columns: shape.columns,
                    },
                    None => SheetStatus::Empty,
                };
                SheetOutcome {
                    name: sheet_name.to_string(),
                    status,
                    markdown,
                }
            }
            Err(e) => self.failed_sheet(sheet_name, &e),
        }
    }

    fn failed_sheet(&self, sheet_name: &str, error: &SheetMdError) -> SheetOutcome {
        let reason = match error {
            SheetMdError::SheetRead { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        warn!("sheet '{}' could not be converted: {}", sheet_name, reason);
        SheetOutcome {
            name: sheet_name.to_string(),
            markdown: self.renderer.render_error(sheet_name, &reason),
            status: SheetStatus::Failed { reason },
        }
    }
}
