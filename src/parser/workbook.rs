//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックレベルの操作（シート名の列挙、
//! シート選択、シート読み込み）を提供します。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use log::debug;
use std::io::{Cursor, Read};

use crate::api::SheetSelector;
use crate::error::SheetMdError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, SheetGrid};

/// ワークブックパーサー
///
/// 入力はすべてメモリに読み込んでから開きます。並列処理時は同じバイト列から
/// ワーカーごとにパーサーを開き直します。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// リーダーからワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックを開けた場合
    /// * `Err(SheetMdError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(SheetMdError::Parse)` - ファイルが破損している、または未対応形式の場合
    pub fn open<R: Read>(mut reader: R, security: &SecurityConfig) -> Result<Self, SheetMdError> {
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;
        security.check_input_size(bytes_read)?;
        Self::from_bytes(buffer)
    }

    /// メモリ上のバイト列からワークブックを開く
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SheetMdError> {
        let size = bytes.len();
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        debug!(
            "opened workbook ({} bytes, {} sheets)",
            size,
            workbook.sheet_names().len()
        );
        Ok(Self { workbook })
    }

    /// すべてのシート名をワークブック内の順序で取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// 名前指定の場合、存在しないシート名もそのまま返します。
    /// 存在しないシートは読み込み時にシート単位のエラーになります。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト（指定順）
    /// * `Err(SheetMdError::Config)` - インデックスが範囲外の場合
    /// * `Err(SheetMdError::NoSheetsSelected)` - 選択結果が空の場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>, SheetMdError> {
        let all_sheet_names = self.sheet_names();

        let by_index = |index: usize| -> Result<String, SheetMdError> {
            all_sheet_names.get(index).cloned().ok_or_else(|| {
                SheetMdError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                ))
            })
        };

        let selected = match selector {
            SheetSelector::All => all_sheet_names.clone(),
            SheetSelector::Index(index) => vec![by_index(*index)?],
            SheetSelector::Name(name) => vec![name.clone()],
            SheetSelector::Indices(indices) => indices
                .iter()
                .map(|&index| by_index(index))
                .collect::<Result<Vec<_>, _>>()?,
            SheetSelector::Names(names) => names.clone(),
        };

        if selected.is_empty() {
            return Err(SheetMdError::NoSheetsSelected);
        }

        debug!("selected sheets: {:?}", selected);
        Ok(selected)
    }

    /// シートを読み込んで`SheetGrid`に変換
    ///
    /// 読み込まれるのはcalamineが報告する使用範囲です。範囲より上の空行は含まれませんが、
    /// 左側の空列はA列から空セルとして補われます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(SheetGrid)` - シートのセルグリッド
    /// * `Err(SheetMdError::SheetRead)` - シートが存在しない、または読み込めない場合
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<SheetGrid, SheetMdError> {
        if !self.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(SheetMdError::SheetRead {
                sheet: sheet_name.to_string(),
                reason: "Worksheet not found".to_string(),
            });
        }

        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| SheetMdError::SheetRead {
                sheet: sheet_name.to_string(),
                reason: e.to_string(),
            })?;

        let grid = grid_from_range(sheet_name, &range);
        debug!(
            "read sheet '{}': {} rows x {} cols",
            sheet_name, grid.bounds.0, grid.bounds.1
        );
        Ok(grid)
    }
}

/// calamineの`Range`を`SheetGrid`に変換
///
/// 使用範囲がA列より右から始まる場合、その左の列は空セルとして各行の先頭に補います。
fn grid_from_range(sheet_name: &str, range: &Range<Data>) -> SheetGrid {
    let leading_cols = range.start().map_or(0, |(_, col)| col as usize);
    let (height, width) = range.get_size();

    let rows = range
        .rows()
        .map(|row| {
            let mut cells = vec![CellValue::Empty; leading_cols];
            cells.extend(row.iter().map(CellValue::from));
            cells
        })
        .collect();

    let bounds = if height == 0 || width == 0 {
        (0, 0)
    } else {
        (height, leading_cols + width)
    };

    SheetGrid {
        name: sheet_name.to_string(),
        bounds,
        rows,
    }
}
