//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetmdクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `Parse`: ワークブックを開けなかったエラー（calamine由来）
/// - `SheetRead`: 個別シートの読み込みに失敗したエラー（バッチ全体は中断しない）
/// - `Config`: 設定の検証に失敗したエラー
/// - `NoSheetsSelected`: 変換対象のシートが1つも選択されていない
/// - `SecurityViolation`: 入力サイズ制限に違反した
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmd::SheetMdError;
/// use std::fs::File;
///
/// fn read_workbook(path: &str) -> Result<(), SheetMdError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetMdError {
    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブック全体の解析エラー
    ///
    /// ファイル形式が不正、破損している、ロックされているなど、
    /// ファイル単位で帰属する失敗です。
    #[error("Failed to open workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// シート単位の読み込みエラー
    ///
    /// シートが存在しない、シートデータが破損しているなどの場合に発生します。
    /// `Converter`はこのエラーをシートごとのエラーフラグメントに変換し、
    /// 他のシートの変換は継続します。
    #[error("Failed to read sheet '{sheet}': {reason}")]
    SheetRead {
        /// 読み込みに失敗したシート名
        sheet: String,
        /// 失敗の理由
        reason: String,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時の検証失敗や、範囲外のシートインデックス指定で発生します。
    ///
    /// ```rust,no_run
    /// use sheetmd::{ConverterBuilder, DateFormat, SheetMdError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom(String::new()))
    ///     .build();
    ///
    /// if let Err(SheetMdError::Config(msg)) = result {
    ///     println!("設定エラー: {}", msg);
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 変換対象のシートが選択されていない
    #[error("No sheets selected: select at least one sheet")]
    NoSheetsSelected,

    /// 入力サイズ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: SheetMdError = io_err.into();

        match error {
            SheetMdError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let error: SheetMdError = calamine::Error::Msg("Corrupted file").into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to open workbook"));
        assert!(error_msg.contains("Corrupted file"));
    }

    #[test]
    fn test_sheet_read_error_display() {
        let error = SheetMdError::SheetRead {
            sheet: "売上".to_string(),
            reason: "Worksheet not found".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Failed to read sheet '売上': Worksheet not found"
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = SheetMdError::Config("Invalid date format: 'xyz'".to_string());
        let error_msg = error.to_string();

        assert!(error_msg.starts_with("Configuration error"));
        assert!(error_msg.contains("Invalid date format: 'xyz'"));
    }

    #[test]
    fn test_no_sheets_selected_display() {
        assert!(SheetMdError::NoSheetsSelected
            .to_string()
            .contains("select at least one sheet"));
    }

    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), SheetMdError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(SheetMdError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }
}
