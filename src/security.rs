//! Security Module
//!
//! 入力データをcalamineに渡す前の制限チェックを提供するモジュール。

use crate::error::SheetMdError;

/// 入力ファイルの最大サイズのデフォルト値（2GB）
pub(crate) const DEFAULT_MAX_INPUT_FILE_SIZE: u64 = 2_147_483_648;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: DEFAULT_MAX_INPUT_FILE_SIZE,
        }
    }
}

impl SecurityConfig {
    /// 読み込んだバイト数が上限以内かを検証する
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以内の場合
    /// * `Err(SheetMdError::SecurityViolation)` - 上限を超えた場合
    pub fn check_input_size(&self, bytes_read: usize) -> Result<(), SheetMdError> {
        if bytes_read as u64 > self.max_input_file_size {
            return Err(SheetMdError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, self.max_input_file_size
            )));
        }
        Ok(())
    }
}
