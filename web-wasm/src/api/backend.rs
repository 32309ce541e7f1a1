//! fetch によるバックエンド呼び出し
//!
//! エンドポイントはiframeと同じオリジンの相対パス。
//! JSONは `serde_json` で読む（キー順を保つため `serde-wasm-bindgen` は使わない）。

use js_sys::{Array, Uint8Array};
use metron_common::api::{
    self, Backend, CHAT_PATH, CLEAR_CACHE_PATH, FIELD_COMMAND, FIELD_PDFS, FIELD_PDF_URL,
    INSERT_PATH, SQL_PATH, UPLOAD_ASYNC_PATH,
};
use metron_common::types::{
    ChatReply, ChatRequest, InsertReply, InsertRequest, SqlRequest, StatusReport, TaskHandle,
    UploadReply,
};
use metron_common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, FormData, Request, RequestInit, RequestMode, Response};

/// ページから渡されたPDFに付けるファイル名
const CONTEXT_PDF_NAME: &str = "documento_contexto.pdf";

/// `/upload-async` に送る内容
#[derive(Clone, Default)]
pub struct UploadForm {
    pub files: Vec<File>,
    /// ホストページから受け取ったPDFのバイト列
    pub context_pdf: Option<Vec<u8>>,
    pub pdf_url: Option<String>,
    pub command: Option<String>,
}

impl UploadForm {
    fn to_form_data(&self) -> std::result::Result<FormData, JsValue> {
        let form = FormData::new()?;

        for file in &self.files {
            form.append_with_blob_and_filename(FIELD_PDFS, file, &file.name())?;
        }

        if let Some(bytes) = &self.context_pdf {
            let parts = Array::of1(&Uint8Array::from(bytes.as_slice()));
            let options = BlobPropertyBag::new();
            options.set_type("application/pdf");
            let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
            form.append_with_blob_and_filename(FIELD_PDFS, &blob, CONTEXT_PDF_NAME)?;
        }

        if let Some(url) = &self.pdf_url {
            form.append_with_str(FIELD_PDF_URL, url)?;
        }

        if let Some(command) = self.command.as_deref().filter(|c| !c.trim().is_empty()) {
            form.append_with_str(FIELD_COMMAND, command)?;
        }

        Ok(form)
    }
}

/// JsValue のエラーを通信エラーに変換
fn js_err(e: JsValue) -> Error {
    Error::Network(format!("{:?}", e))
}

/// fetch ベースのバックエンド
#[derive(Debug, Clone, Default)]
pub struct HttpBackend {
    base_url: String,
}

impl HttpBackend {
    /// `base_url` が空ならiframeと同じオリジン
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            api::join_url(&self.base_url, path)
        }
    }

    async fn fetch(&self, request: &Request) -> Result<Response> {
        let window = web_sys::window().ok_or_else(|| Error::Network("window unavailable".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(request))
            .await
            .map_err(js_err)?;
        resp_value.dyn_into::<Response>().map_err(js_err)
    }

    fn build_request(&self, method: &str, path: &str, body: Option<&JsValue>) -> Result<Request> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            opts.set_body(body);
        }
        Request::new_with_str_and_init(&self.url(path), &opts).map_err(js_err)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let body = serde_json::to_string(body)?;
        let request = self.build_request("POST", path, Some(&JsValue::from_str(&body)))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
        self.fetch(&request).await
    }

    /// `/inserir-banco`
    pub async fn insert(&self, records: &[Value], user_id: i64) -> Result<InsertReply> {
        let resp = self
            .post_json(
                INSERT_PATH,
                &InsertRequest {
                    instrumentos: records,
                    user_id,
                },
            )
            .await?;
        // 失敗時もバックエンドは {success:false, message} を返す
        read_json(&resp).await
    }

    /// `/gerar-sql`。SQLファイルのバイト列を返す
    pub async fn generate_sql(&self, records: &[Value]) -> Result<Vec<u8>> {
        let resp = self
            .post_json(SQL_PATH, &SqlRequest { instrumentos: records })
            .await?;
        ensure_ok(&resp)?;
        let buffer = JsFuture::from(resp.array_buffer().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }

    /// `/limpar-cache`
    pub async fn clear_cache(&self) -> Result<()> {
        let request = self.build_request("POST", CLEAR_CACHE_PATH, None)?;
        let resp = self.fetch(&request).await?;
        ensure_ok(&resp)
    }
}

fn ensure_ok(resp: &Response) -> Result<()> {
    if resp.ok() {
        Ok(())
    } else {
        Err(Error::HttpStatus(resp.status()))
    }
}

async fn read_text(resp: &Response) -> Result<String> {
    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| Error::Malformed("response body is not text".into()))
}

/// 本文をJSONとして読む。読めなければHTTPステータスを優先して返す
async fn read_json<T: DeserializeOwned>(resp: &Response) -> Result<T> {
    let text = read_text(resp).await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) if !resp.ok() => Err(Error::HttpStatus(resp.status())),
        Err(e) => Err(e.into()),
    }
}

impl Backend for HttpBackend {
    type Upload = UploadForm;

    async fn send_chat(&self, message: &str) -> Result<ChatReply> {
        let resp = self
            .post_json(
                CHAT_PATH,
                &ChatRequest {
                    message: message.to_string(),
                },
            )
            .await?;
        read_json(&resp).await
    }

    async fn upload(&self, upload: &UploadForm) -> Result<UploadReply> {
        let form = upload.to_form_data().map_err(js_err)?;
        let request = self.build_request("POST", UPLOAD_ASYNC_PATH, Some(&form.into()))?;
        let resp = self.fetch(&request).await?;
        read_json(&resp).await
    }

    async fn fetch_status(&self, task: &TaskHandle) -> Result<StatusReport> {
        let request = self.build_request("GET", &api::status_path(task), None)?;
        let resp = self.fetch(&request).await?;
        read_json(&resp).await
    }
}
