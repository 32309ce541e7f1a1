//! 親ページ（ローダー）との postMessage 連携

use futures::channel::oneshot;
use futures::future::{select, Either};
use gloo::console;
use gloo::events::EventListener;
use gloo::timers::future::sleep;
use js_sys::{ArrayBuffer, Object, Reflect, Uint8Array};
use metron_common::bridge::{BridgeMessage, Direction};
use metron_common::message::text;
use metron_common::{Error, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MessageEvent, Window};

/// `request-pdf-content` の応答待ち時間
pub const PDF_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const BLOB_TAG: &str = "context-pdf-blob";

/// 親フレームに埋め込まれているか
pub fn is_embedded() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.parent() {
        Ok(Some(parent)) => !Object::is(&parent, &window),
        _ => false,
    }
}

fn parent_window() -> Option<Window> {
    let window = web_sys::window()?;
    window
        .parent()
        .ok()
        .flatten()
        .filter(|parent| !Object::is(parent, &window))
}

/// 親ページへ送信。埋め込まれていなければ何もしない
pub fn post_to_host(message: &BridgeMessage) {
    let Some(parent) = parent_window() else {
        console::warn!(format!("[Metron] sem página pai, '{}' descartado", message.tag()));
        return;
    };

    let result = encode(message).and_then(|value| {
        parent
            .post_message(&value, "*")
            .map_err(|e| Error::Network(format!("{:?}", e)))
    });
    if let Err(e) = result {
        console::error!(format!("[Metron] falha ao enviar '{}': {}", message.tag(), e));
    }
}

fn encode(message: &BridgeMessage) -> Result<JsValue> {
    let value = message.to_json()?;
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| Error::Malformed(e.to_string()))
}

/// 受信データをデコード（親→iframe 方向のみ受け付ける）
pub fn decode(data: &JsValue) -> Result<BridgeMessage> {
    let tag = Reflect::get(data, &JsValue::from_str("type"))
        .ok()
        .and_then(|t| t.as_string());

    if tag.as_deref() == Some(BLOB_TAG) {
        let buffer = Reflect::get(data, &JsValue::from_str("buffer"))
            .ok()
            .and_then(|b| b.dyn_into::<ArrayBuffer>().ok())
            .ok_or_else(|| Error::Malformed(format!("{}: missing buffer", BLOB_TAG)))?;
        let url = Reflect::get(data, &JsValue::from_str("url"))
            .ok()
            .and_then(|u| u.as_string());
        return Ok(BridgeMessage::ContextPdfBlob {
            buffer: Uint8Array::new(&buffer).to_vec(),
            url,
        });
    }

    let value: serde_json::Value = serde_wasm_bindgen::from_value(data.clone())
        .map_err(|e| Error::Malformed(e.to_string()))?;
    BridgeMessage::from_json_directed(value, Direction::ToWidget)
}

/// 親ページからのメッセージか
fn from_parent(event: &MessageEvent) -> bool {
    match (event.source(), parent_window()) {
        (Some(source), Some(parent)) => Object::is(&source, &parent),
        _ => false,
    }
}

/// 親ページからのメッセージを購読する。戻り値を破棄すると購読解除
pub fn listen<F>(handler: F) -> Option<EventListener>
where
    F: Fn(BridgeMessage) + 'static,
{
    let window = web_sys::window()?;
    Some(EventListener::new(&window, "message", move |event| {
        let Some(event) = event.dyn_ref::<MessageEvent>() else {
            return;
        };
        if !from_parent(event) {
            return;
        }
        match decode(&event.data()) {
            Ok(message) => handler(message),
            Err(e) => console::warn!(format!("[Metron] mensagem ignorada: {}", e)),
        }
    }))
}

/// ホストページからPDFを取得できなかった理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfRequestError {
    Timeout,
    Host(String),
    NotFound,
}

impl PdfRequestError {
    pub fn user_message(&self) -> String {
        match self {
            PdfRequestError::Timeout => text::PDF_TIMEOUT.to_string(),
            PdfRequestError::Host(error) => format!("{}{}", text::PDF_HOST_ERROR_PREFIX, error),
            PdfRequestError::NotFound => text::PDF_NOT_FOUND.to_string(),
        }
    }
}

/// ホストページにPDFの中身を要求し、応答（最大10秒）を待つ
///
/// 待ち終わったら購読を外すので、遅れて届いた応答は無視される。
pub async fn request_pdf_content() -> std::result::Result<Vec<u8>, PdfRequestError> {
    let (tx, rx) = oneshot::channel::<BridgeMessage>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let listener = listen(move |message| {
        let is_reply = matches!(
            message,
            BridgeMessage::ContextPdfBlob { .. }
                | BridgeMessage::ContextPdfError { .. }
                | BridgeMessage::ContextPdfNotFound
        );
        if is_reply {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(message);
            }
        }
    });

    post_to_host(&BridgeMessage::RequestPdfContent);

    let outcome = match select(rx, Box::pin(sleep(PDF_REQUEST_TIMEOUT))).await {
        Either::Left((Ok(BridgeMessage::ContextPdfBlob { buffer, .. }), _)) => Ok(buffer),
        Either::Left((Ok(BridgeMessage::ContextPdfError { error }), _)) => {
            Err(PdfRequestError::Host(error))
        }
        Either::Left((Ok(_), _)) => Err(PdfRequestError::NotFound),
        Either::Left((Err(_), _)) | Either::Right(_) => Err(PdfRequestError::Timeout),
    };

    drop(listener);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_request_errors_are_distinct() {
        let messages = [
            PdfRequestError::Timeout.user_message(),
            PdfRequestError::Host("404".into()).user_message(),
            PdfRequestError::NotFound.user_message(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
        assert!(messages[1].ends_with("404"), "ホスト側のエラー内容を含める");
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn blob_message(buffer: Option<&JsValue>, url: Option<&str>) -> JsValue {
        let message = Object::new();
        Reflect::set(&message, &"type".into(), &BLOB_TAG.into()).unwrap();
        if let Some(buffer) = buffer {
            Reflect::set(&message, &"buffer".into(), buffer).unwrap();
        }
        if let Some(url) = url {
            Reflect::set(&message, &"url".into(), &url.into()).unwrap();
        }
        message.into()
    }

    #[wasm_bindgen_test]
    fn wasm_decode_pdf_blob_copies_buffer() {
        let buffer: JsValue = Uint8Array::from(&b"%PDF"[..]).buffer().into();
        let message = blob_message(Some(&buffer), Some("/docs/cert.pdf"));

        assert_eq!(
            decode(&message).unwrap(),
            BridgeMessage::ContextPdfBlob {
                buffer: b"%PDF".to_vec(),
                url: Some("/docs/cert.pdf".to_string()),
            }
        );
    }

    #[wasm_bindgen_test]
    fn wasm_decode_pdf_blob_without_buffer_is_malformed() {
        let message = blob_message(None, None);
        assert!(matches!(decode(&message), Err(Error::Malformed(_))));
    }

    #[wasm_bindgen_test]
    fn wasm_decode_user_context_number_id() {
        let data = js_sys::JSON::parse(r#"{"type":"set_user_ctx","user_id":15}"#).unwrap();
        assert_eq!(
            decode(&data).unwrap(),
            BridgeMessage::SetUserCtx { user_id: "15".to_string() }
        );
    }

    #[wasm_bindgen_test]
    fn wasm_decode_rejects_messages_meant_for_host() {
        let data = js_sys::JSON::parse(r#"{"type":"navigate","url":"/calibracoes"}"#).unwrap();
        assert!(decode(&data).is_err(), "ホスト宛てのメッセージは受け付けない");

        assert!(decode(&JsValue::from_str("request-pdf-content")).is_err());
    }
}
