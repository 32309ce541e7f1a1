//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// fetch失敗・接続断など（リトライしない）
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// バックエンドが success:false を返した
    #[error("Backend error: {0}")]
    Backend(String),

    /// 編集パスの途中が存在しない
    #[error("Invalid edit path '{path}' at segment '{segment}'")]
    EditPath { path: String, segment: String },

    #[error("Unknown message tag: {0}")]
    UnknownTag(String),

    #[error("Malformed message: {0}")]
    Malformed(String),

    /// ホスト側PDF取得のタイムアウト
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Cancelled")]
    Cancelled,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_network() {
        let error = Error::Network("connection refused".to_string());
        assert_eq!(format!("{}", error), "Network error: connection refused");
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_edit_path() {
        let error = Error::EditPath {
            path: "0.grandezas.5.unidade".to_string(),
            segment: "5".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("0.grandezas.5.unidade"));
        assert!(display.contains("'5'"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_display_timeout() {
        assert_eq!(format!("{}", Error::Timeout(10)), "Timed out after 10 seconds");
    }
}
