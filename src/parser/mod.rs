//! Parser Module
//!
//! calamineを使用したワークブック読み込みの実装。
//! 形式（xlsx / xlsm / xlsb / xls / ods）はcalamineが自動判別します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
