//! sheetmd - Spreadsheet sheets to GitHub-flavored Markdown tables
//!
//! ワークブックの各シートを、見出し付きのMarkdownパイプテーブルに変換するクレートです。
//! 空白行は除去され、長さの異なる行は空セルで右詰めされます。
//! 複数シートは`\n\n---\n\n`でつながれます。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use sheetmd::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     let input = File::open("example.xlsx")?;
//!     let output = File::create("example.md")?;
//!     converter.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # シートごとの結果
//!
//! 読み込めなかったシートはエラーフラグメントとして出力され、他のシートの変換は続行されます。
//! `convert_file`はシートごとの結果を`ConversionOutput`として返します。
//!
//! ```rust,no_run
//! use sheetmd::{ConverterBuilder, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Names(vec!["Sheet1".into(), "Sheet3".into()]))
//!         .build()?;
//!
//!     let output = converter.convert_file("example.xlsx")?;
//!     for sheet in output.failed_sheets() {
//!         eprintln!("failed: {}", sheet.name);
//!     }
//!     std::fs::write(format!("{}.md", output.title()), &output.markdown)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # レンダラー単体の利用
//!
//! ```rust
//! use sheetmd::{CellValue, TableRenderer};
//!
//! let rows = vec![
//!     vec![CellValue::from("name"), CellValue::from("qty")],
//!     vec![CellValue::Empty, CellValue::Empty],
//!     vec![CellValue::from("apple"), CellValue::Int(3)],
//! ];
//! let markdown = TableRenderer::new().render("在庫", &rows);
//! assert_eq!(markdown, "# 在庫\n\n| name | qty |\n| --- | --- |\n| apple | 3 |\n");
//! ```

mod api;
mod builder;
mod error;
mod formatter;
mod output;
mod parser;
mod render;
mod security;
mod types;

// 公開API
pub use api::{DateFormat, SheetSelector};
pub use builder::{Converter, ConverterBuilder};
pub use error::SheetMdError;
pub use output::{
    default_output_path, sanitize_filename, ConversionOutput, SheetOutcome, SheetStatus,
};
pub use render::{join_fragments, TableRenderer, EMPTY_SHEET_NOTICE, SHEET_SEPARATOR};
pub use types::{CellValue, SheetGrid};
