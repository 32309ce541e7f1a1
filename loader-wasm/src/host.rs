//! iframe からのメッセージ処理

use crate::frame::Widget;
use crate::scan;
use gloo::console;
use gloo::dialogs::alert;
use gloo::events::EventListener;
use gloo::net::http::Request;
use js_sys::{Array, Object, Reflect, Uint8Array};
use metron_common::bridge::{BridgeMessage, Direction};
use metron_common::checklist::{plan_fill, ChecklistPayload};
use metron_common::{Error, Result};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventInit, HtmlInputElement, MessageEvent};

const CHECKLIST_FILLED: &str = "✅ Checklist preenchido automaticamente pelo Metron!";

/// チェックボックス変更後に発火させるイベント
const CHECKBOX_EVENTS: [&str; 3] = ["change", "input", "click"];

fn encode(message: &BridgeMessage) -> Result<JsValue> {
    message
        .to_json()?
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| Error::Malformed(e.to_string()))
}

fn decode(data: &JsValue) -> Result<BridgeMessage> {
    let value: serde_json::Value = match data.as_string() {
        // 旧形式: 文字列だけのメッセージ
        Some(tag) => serde_json::Value::String(tag),
        None => serde_wasm_bindgen::from_value(data.clone())
            .map_err(|e| Error::Malformed(e.to_string()))?,
    };
    BridgeMessage::from_json_directed(value, Direction::ToHost)
}

/// チャットへ送信
pub fn send(widget: &Widget, message: &BridgeMessage) {
    let result = encode(message).and_then(|value| {
        widget
            .post(&value, None)
            .map_err(|e| Error::Network(format!("{:?}", e)))
    });
    if let Err(e) = result {
        console::warn!(format!("[Metron] falha ao enviar '{}': {}", message.tag(), e));
    }
}

/// PDF本体を ArrayBuffer の所有権ごと渡す
fn send_blob(widget: &Widget, bytes: &[u8], url: &str) -> std::result::Result<(), JsValue> {
    let buffer = Uint8Array::from(bytes).buffer();

    let message = Object::new();
    Reflect::set(&message, &"type".into(), &"context-pdf-blob".into())?;
    Reflect::set(&message, &"buffer".into(), &buffer)?;
    Reflect::set(&message, &"url".into(), &url.into())?;

    widget.post(&message, Some(&Array::of1(&buffer)))
}

/// ページ内のPDFを探し、見つかればURLを通知
pub fn push_pdf_url(widget: &Widget) {
    if !widget.is_loaded() {
        return;
    }
    if let Some(url) = scan::find_pdf_url(&widget.window, &widget.document) {
        console::log!(format!("[Metron] PDF detectado: {}", url));
        send(widget, &BridgeMessage::ContextPdfUrl { url });
    }
}

async fn fetch_pdf(url: &str) -> std::result::Result<Vec<u8>, String> {
    let response = Request::get(url).send().await.map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response.binary().await.map_err(|e| e.to_string())
}

/// PDF本体を取得して渡す。失敗時は error、見つからなければ not-found を返す
async fn push_pdf_content(widget: Rc<Widget>) {
    let Some(url) = scan::find_pdf_url(&widget.window, &widget.document) else {
        console::log!("[Metron] nenhum PDF na página");
        send(&widget, &BridgeMessage::ContextPdfNotFound);
        return;
    };

    match fetch_pdf(&url).await {
        Ok(bytes) => {
            console::log!(format!("[Metron] PDF enviado ({} bytes): {}", bytes.len(), url));
            if let Err(e) = send_blob(&widget, &bytes, &url) {
                console::error!(format!("[Metron] falha ao transferir PDF: {:?}", e));
            }
        }
        Err(error) => {
            console::error!(format!("[Metron] falha ao baixar PDF: {}", error));
            send(&widget, &BridgeMessage::ContextPdfError { error });
        }
    }
}

fn dispatch_bubbling(input: &HtmlInputElement, name: &str) -> std::result::Result<(), JsValue> {
    let init = EventInit::new();
    init.set_bubbles(true);
    let event = Event::new_with_event_init_dict(name, &init)?;
    input.dispatch_event(&event)?;
    Ok(())
}

/// `href` が校正画面なら `root` 配下のチェックボックスに書き込み、書けた件数を返す
///
/// 校正画面以外では何も触らず None。見つからない項目は飛ばす。
fn apply_checklist(root: &Element, href: &str, payload: &ChecklistPayload) -> Option<usize> {
    let writes = plan_fill(href, payload)?;

    let mut filled = 0;
    for write in &writes {
        let input = root
            .query_selector(&write.selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let Some(input) = input else {
            console::warn!(format!("[Metron] campo não encontrado: {}", write.selector));
            continue;
        };

        input.set_checked(write.checked);
        for name in CHECKBOX_EVENTS {
            if let Err(e) = dispatch_bubbling(&input, name) {
                console::error!(format!("[Metron] evento '{}' falhou: {:?}", name, e));
            }
        }
        filled += 1;
    }

    console::log!(format!("[Metron] checklist: {}/{} campos", filled, writes.len()));
    Some(filled)
}

/// 校正画面のチェックリストに書き込む。校正画面以外では何もしない
pub fn fill_checklist(widget: &Widget, payload: &ChecklistPayload) -> usize {
    let href = widget.window.location().href().unwrap_or_default();
    let Some(root) = widget.document.document_element() else {
        return 0;
    };
    match apply_checklist(&root, &href, payload) {
        Some(filled) => {
            alert(CHECKLIST_FILLED);
            filled
        }
        None => {
            console::warn!("[Metron] checklist ignorado: não é uma página de calibração");
            0
        }
    }
}

fn handle(widget: &Rc<Widget>, message: BridgeMessage) {
    match message {
        BridgeMessage::CloseWidget => widget.close(),
        BridgeMessage::Navigate { url } => {
            if let Err(e) = widget.window.location().set_href(&url) {
                console::error!(format!("[Metron] falha ao navegar: {:?}", e));
            }
        }
        BridgeMessage::RequestPdfUrl => push_pdf_url(widget),
        BridgeMessage::RequestPdfContent => spawn_local(push_pdf_content(widget.clone())),
        BridgeMessage::FillChecklist { data } => {
            fill_checklist(widget, &data);
        }
        // ToHost 以外は decode で弾かれる
        other => console::debug!(format!("[Metron] '{}' ignorado", other.tag())),
    }
}

/// チャットのオリジンからのメッセージだけを処理する
pub fn listen(widget: &Rc<Widget>) -> EventListener {
    let origin = widget.config.chat_origin();
    let weak = Rc::downgrade(widget);

    EventListener::new(&widget.window, "message", move |event| {
        let Some(event) = event.dyn_ref::<MessageEvent>() else {
            return;
        };
        if event.origin() != origin {
            return;
        }
        let Some(widget) = weak.upgrade() else {
            return;
        };
        match decode(&event.data()) {
            Ok(message) => handle(&widget, message),
            Err(e) => console::warn!(format!("[Metron] mensagem ignorada: {}", e)),
        }
    })
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use std::cell::Cell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const CALIBRATION_HREF: &str = "https://gocal.example/calibracoes/12/edit";

    /// `checklist[1]`〜`checklist[3]` を持つフォーム（2 だけチェック済み）
    fn checklist_form() -> Element {
        let document = web_sys::window().unwrap().document().unwrap();
        let form = document.create_element("form").unwrap();
        form.set_inner_html(
            r#"<input type="checkbox" name="checklist[1]">
               <input type="checkbox" name="checklist[2]" checked>
               <input type="checkbox" name="checklist[3]">"#,
        );
        document.body().unwrap().append_child(&form).unwrap();
        form
    }

    fn is_checked(form: &Element, key: u32) -> bool {
        form.query_selector(&metron_common::checklist::checkbox_selector(key))
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap()
            .checked()
    }

    fn payload(entries: &[(u32, bool)]) -> ChecklistPayload {
        let mut payload = ChecklistPayload::new();
        for &(key, checked) in entries {
            payload.insert(key, checked);
        }
        payload
    }

    // ============================================
    // チェックリスト
    // ============================================

    #[wasm_bindgen_test]
    fn wasm_checklist_sets_state_and_bubbles_events() {
        let form = checklist_form();
        let events = Rc::new(Cell::new(0));
        let listeners: Vec<EventListener> = CHECKBOX_EVENTS
            .iter()
            .map(|name| {
                let events = events.clone();
                EventListener::new(&form, *name, move |_| events.set(events.get() + 1))
            })
            .collect();

        let filled = apply_checklist(
            &form,
            CALIBRATION_HREF,
            &payload(&[(1, true), (2, false)]),
        );

        assert_eq!(filled, Some(2));
        assert!(is_checked(&form, 1), "checklist[1] はチェックされるべき");
        assert!(!is_checked(&form, 2), "checklist[2] は外れるべき");
        assert!(!is_checked(&form, 3), "指定外は変えない");
        assert_eq!(events.get(), 2 * CHECKBOX_EVENTS.len(), "各項目で change/input/click が親に届く");

        drop(listeners);
        form.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_checklist_skips_missing_fields() {
        let form = checklist_form();

        let filled = apply_checklist(
            &form,
            CALIBRATION_HREF,
            &payload(&[(3, true), (99, true)]),
        );

        assert_eq!(filled, Some(1), "存在しない checklist[99] は数えない");
        assert!(is_checked(&form, 3));
        form.remove();
    }

    #[wasm_bindgen_test]
    fn wasm_checklist_ignored_outside_calibration_page() {
        let form = checklist_form();

        let filled = apply_checklist(
            &form,
            "https://gocal.example/relatorios",
            &payload(&[(1, true), (2, false)]),
        );

        assert_eq!(filled, None);
        assert!(!is_checked(&form, 1), "校正画面以外では変更しない");
        assert!(is_checked(&form, 2));
        form.remove();
    }

    // ============================================
    // デコード
    // ============================================

    #[wasm_bindgen_test]
    fn wasm_decode_accepts_legacy_string() {
        let message = decode(&JsValue::from_str("close-widget")).unwrap();
        assert_eq!(message, BridgeMessage::CloseWidget);
    }

    #[wasm_bindgen_test]
    fn wasm_decode_fill_checklist_object() {
        let data = js_sys::JSON::parse(r#"{"type":"fill_checklist","data":{"1":true,"2":"false"}}"#)
            .unwrap();
        let BridgeMessage::FillChecklist { data } = decode(&data).unwrap() else {
            panic!("fill_checklist としてデコードされるべき");
        };
        assert_eq!(data.get(1), Some(true));
        assert_eq!(data.get(2), Some(false));
    }

    #[wasm_bindgen_test]
    fn wasm_decode_rejects_messages_meant_for_chat() {
        let data = js_sys::JSON::parse(r#"{"type":"set_user_ctx","user_id":7}"#).unwrap();
        assert!(decode(&data).is_err(), "チャット宛てのメッセージは受け付けない");
    }
}
