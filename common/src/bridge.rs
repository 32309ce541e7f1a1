//! iframe ⇔ ホストページ間の postMessage プロトコル
//!
//! メッセージは `{ "type": <tag>, ...payload }` 形式の閉じたタグ付きenum。
//! ペイロードの無いタグは旧形式の文字列（`"close-widget"` など）も受け付ける。
//! 未知のタグは無視せずエラーにする。

use crate::checklist::ChecklistPayload;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 送信方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// iframe → ホスト
    ToHost,
    /// ホスト → iframe
    ToWidget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    #[serde(rename = "request-pdf-url")]
    RequestPdfUrl,

    #[serde(rename = "request-pdf-content")]
    RequestPdfContent,

    #[serde(rename = "context-pdf-url")]
    ContextPdfUrl { url: String },

    /// `buffer` はTransferableのArrayBufferとして別経路で運ぶ
    #[serde(rename = "context-pdf-blob")]
    ContextPdfBlob {
        #[serde(skip)]
        buffer: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    #[serde(rename = "context-pdf-error")]
    ContextPdfError {
        #[serde(default)]
        error: String,
    },

    #[serde(rename = "context-pdf-not-found")]
    ContextPdfNotFound,

    #[serde(rename = "navigate")]
    Navigate { url: String },

    #[serde(rename = "fill_checklist")]
    FillChecklist { data: ChecklistPayload },

    #[serde(rename = "close-widget")]
    CloseWidget,

    #[serde(rename = "set_user_ctx")]
    SetUserCtx {
        #[serde(deserialize_with = "string_or_number")]
        user_id: String,
    },
}

const TAGS: &[&str] = &[
    "request-pdf-url",
    "request-pdf-content",
    "context-pdf-url",
    "context-pdf-blob",
    "context-pdf-error",
    "context-pdf-not-found",
    "navigate",
    "fill_checklist",
    "close-widget",
    "set_user_ctx",
];

impl BridgeMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            BridgeMessage::RequestPdfUrl => "request-pdf-url",
            BridgeMessage::RequestPdfContent => "request-pdf-content",
            BridgeMessage::ContextPdfUrl { .. } => "context-pdf-url",
            BridgeMessage::ContextPdfBlob { .. } => "context-pdf-blob",
            BridgeMessage::ContextPdfError { .. } => "context-pdf-error",
            BridgeMessage::ContextPdfNotFound => "context-pdf-not-found",
            BridgeMessage::Navigate { .. } => "navigate",
            BridgeMessage::FillChecklist { .. } => "fill_checklist",
            BridgeMessage::CloseWidget => "close-widget",
            BridgeMessage::SetUserCtx { .. } => "set_user_ctx",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            BridgeMessage::RequestPdfUrl
            | BridgeMessage::RequestPdfContent
            | BridgeMessage::Navigate { .. }
            | BridgeMessage::FillChecklist { .. }
            | BridgeMessage::CloseWidget => Direction::ToHost,
            BridgeMessage::ContextPdfUrl { .. }
            | BridgeMessage::ContextPdfBlob { .. }
            | BridgeMessage::ContextPdfError { .. }
            | BridgeMessage::ContextPdfNotFound
            | BridgeMessage::SetUserCtx { .. } => Direction::ToWidget,
        }
    }

    /// 受信データのタグだけを読む（バッファ付きメッセージの振り分け用）
    pub fn peek_tag(value: &Value) -> Option<&str> {
        match value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("type").and_then(Value::as_str),
            _ => None,
        }
    }

    /// JSON値からデコード
    pub fn from_json(value: Value) -> Result<Self> {
        let tag = Self::peek_tag(&value)
            .ok_or_else(|| Error::Malformed("missing \"type\"".to_string()))?
            .to_string();

        if !TAGS.contains(&tag.as_str()) {
            return Err(Error::UnknownTag(tag));
        }

        let value = match value {
            Value::String(_) => serde_json::json!({ "type": tag }),
            other => other,
        };

        serde_json::from_value(value).map_err(|e| Error::Malformed(format!("{}: {}", tag, e)))
    }

    /// 期待する方向のメッセージだけを受け付ける
    pub fn from_json_directed(value: Value, expected: Direction) -> Result<Self> {
        let message = Self::from_json(value)?;
        if message.direction() != expected {
            return Err(Error::Malformed(format!(
                "{} is not accepted in this frame",
                message.tag()
            )));
        }
        Ok(message)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
