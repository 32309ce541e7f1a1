//! バックエンドのエンドポイント定義とクライアント抽象
//!
//! 実装はWASM(fetch)とCLI(reqwest)の2つ。ワークフローはこのトレイトにのみ依存する。

use crate::error::Result;
use crate::types::{ChatReply, StatusReport, TaskHandle, UploadReply};

pub const UPLOAD_ASYNC_PATH: &str = "/upload-async";
pub const UPLOAD_STATUS_PATH: &str = "/upload-status";
pub const CHAT_PATH: &str = "/chat-mensagem";
pub const INSERT_PATH: &str = "/inserir-banco";
pub const SQL_PATH: &str = "/gerar-sql";
pub const CLEAR_CACHE_PATH: &str = "/limpar-cache";

/// multipartのフィールド名
pub const FIELD_PDFS: &str = "pdfs";
pub const FIELD_COMMAND: &str = "comando";
pub const FIELD_PDF_URL: &str = "pdf_url";

/// `/upload-status/{task_id}`
pub fn status_path(task: &TaskHandle) -> String {
    format!("{}/{}", UPLOAD_STATUS_PATH, task.as_str())
}

/// ベースURLとパスを結合（末尾スラッシュの重複を避ける）
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path.to_string();
    }
    format!("{}{}", base, path)
}

/// ワークフローが使うバックエンド呼び出し
///
/// `Upload` はプラットフォームごとのmultipartペイロード
/// （WASMでは `FormData`、CLIではファイルパスの一覧）。
#[allow(async_fn_in_trait)]
pub trait Backend {
    type Upload;

    async fn send_chat(&self, message: &str) -> Result<ChatReply>;

    async fn upload(&self, upload: &Self::Upload) -> Result<UploadReply>;

    async fn fetch_status(&self, task: &TaskHandle) -> Result<StatusReport>;
}
