//! reqwest によるバックエンドクライアント

use metron_common::api::{
    join_url, status_path, Backend, CHAT_PATH, CLEAR_CACHE_PATH, FIELD_COMMAND, FIELD_PDFS,
    FIELD_PDF_URL, INSERT_PATH, SQL_PATH, UPLOAD_ASYNC_PATH,
};
use metron_common::types::{
    ChatReply, ChatRequest, InsertReply, InsertRequest, SqlRequest, StatusReport, TaskHandle,
    UploadReply,
};
use crate::error::ChatCliError;
use metron_common::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// 読み込み済みのアップロードファイル
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// `/upload-async` に送る内容
#[derive(Debug, Clone, Default)]
pub struct UploadSpec {
    pub files: Vec<UploadFile>,
    pub command: Option<String>,
    pub pdf_url: Option<String>,
}

impl UploadSpec {
    /// ファイルを先に読み込む（読めなければ通信前に失敗）
    pub async fn load(
        paths: &[PathBuf],
        command: Option<String>,
        pdf_url: Option<String>,
    ) -> crate::error::Result<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| ChatCliError::FileRead {
                    path: path.display().to_string(),
                    source,
                })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "documento.pdf".to_string());
            files.push(UploadFile { name, bytes });
        }
        Ok(Self {
            files,
            command,
            pdf_url,
        })
    }
}

fn network(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> crate::error::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn form(&self, upload: &UploadSpec) -> Result<Form> {
        let mut form = Form::new();

        for file in &upload.files {
            tracing::debug!(file = %file.name, bytes = file.bytes.len(), "multipart part");
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str("application/pdf")
                .map_err(|e| Error::Malformed(e.to_string()))?;
            form = form.part(FIELD_PDFS, part);
        }

        if let Some(url) = upload.pdf_url.as_ref().filter(|u| !u.is_empty()) {
            form = form.text(FIELD_PDF_URL, url.clone());
        }
        if let Some(command) = upload.command.as_ref().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            form = form.text(FIELD_COMMAND, command.to_string());
        }

        Ok(form)
    }

    /// `/inserir-banco`
    pub async fn insert(&self, records: &[Value], user_id: i64) -> Result<InsertReply> {
        let request = InsertRequest {
            instrumentos: records,
            user_id,
        };
        let response = self
            .client
            .post(self.url(INSERT_PATH))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    /// `/gerar-sql`。SQLファイルの中身を返す
    pub async fn generate_sql(&self, records: &[Value]) -> Result<Vec<u8>> {
        let request = SqlRequest {
            instrumentos: records,
        };
        let response = self
            .client
            .post(self.url(SQL_PATH))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        let response = ensure_ok(response)?;
        let bytes = response.bytes().await.map_err(network)?;
        Ok(bytes.to_vec())
    }

    /// `/limpar-cache`
    pub async fn clear_cache(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url(CLEAR_CACHE_PATH))
            .send()
            .await
            .map_err(network)?;
        ensure_ok(response)?;
        Ok(())
    }
}

fn ensure_ok(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::HttpStatus(status.as_u16()))
    }
}

/// エラー応答でもJSON本文（`{success:false, message}`）があればそれを返す
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(network)?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(Error::HttpStatus(status.as_u16())),
        Err(e) => Err(Error::Json(e)),
    }
}

impl Backend for HttpBackend {
    type Upload = UploadSpec;

    async fn send_chat(&self, message: &str) -> Result<ChatReply> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        let response = self
            .client
            .post(self.url(CHAT_PATH))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    async fn upload(&self, upload: &UploadSpec) -> Result<UploadReply> {
        let form = self.form(upload)?;
        let response = self
            .client
            .post(self.url(UPLOAD_ASYNC_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }

    async fn fetch_status(&self, task: &TaskHandle) -> Result<StatusReport> {
        let response = self
            .client
            .get(self.url(&status_path(task)))
            .send()
            .await
            .map_err(network)?;
        read_json(response).await
    }
}
