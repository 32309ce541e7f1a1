use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatCliError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("ファイルを読み込めません: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDFではありません: {0}")]
    NotPdf(String),

    #[error("PDFが見つかりません: {0}")]
    NoPdfsFound(String),

    #[error("ユーザーIDが不正です: {0}")]
    InvalidUserId(String),

    #[error("結果ファイルが不正: {0}")]
    InvalidResults(String),

    #[error("バックエンドエラー: {0}")]
    Backend(#[from] metron_common::Error),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatCliError>;
