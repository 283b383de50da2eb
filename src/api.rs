//! Public API Types
//!
//! 変換設定として公開する列挙型。

/// 日付の出力形式
///
/// 日付・日時セルをMarkdownに変換する際の出力形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式
    ///
    /// 時刻成分の有無にかかわらず日時（`2025-11-20 00:00:00`）を出力します。
    Iso8601,

    /// chronoの`strftime`形式の文字列で出力する
    ///
    /// 書式は`ConverterBuilder::build()`で検証され、空文字列や未知の指定子（`%!`など）は
    /// `SheetMdError::Config`になります。
    ///
    /// ```rust,no_run
    /// use sheetmd::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), sheetmd::SheetMdError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d/%m/%Y %H:%M".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// シート選択方式
///
/// 名前で指定したシートがワークブックに存在しない場合、選択自体は成功し、
/// そのシートだけがエラーフラグメントとして出力されます。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを変換（デフォルト）
    All,

    /// インデックス指定（0始まり）
    Index(usize),

    /// シート名指定
    Name(String),

    /// 複数のインデックス指定（指定順に出力）
    Indices(Vec<usize>),

    /// 複数のシート名指定（指定順に出力）
    Names(Vec<String>),
}
