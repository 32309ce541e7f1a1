//! Metron widget loader (WASM)
//!
//! ホストページに読み込まれ、フローティングボタンとチャット iframe を挿入する。
//! iframe からの要求（閉じる・遷移・PDF取得・チェックリスト入力）を処理する。

mod config;
mod frame;
mod host;
mod scan;
mod style;

use config::LoaderConfig;
use frame::Widget;
use gloo::console;
use gloo::events::EventListener;
use gloo::timers::future::sleep;
use metron_common::bridge::BridgeMessage;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// 起動直後の検出までの待ち時間（iframe 読み込み後も同じ）
const FIRST_SCAN_DELAY: Duration = Duration::from_secs(1);
/// 遅れて表示されるPDFのための再検出
const RESCAN_INTERVAL: Duration = Duration::from_secs(2);
const RESCAN_ATTEMPTS: u32 = 5;

/// iframe 読み込み完了時: ユーザー情報を渡し、少し待ってPDFを検出
fn on_frame_loaded(widget: &Rc<Widget>) {
    if let Some(user_id) = widget.config.user_id.clone() {
        host::send(widget, &BridgeMessage::SetUserCtx { user_id });
    }

    let widget = widget.clone();
    spawn_local(async move {
        sleep(FIRST_SCAN_DELAY).await;
        host::push_pdf_url(&widget);
    });
}

fn schedule_scans(widget: &Rc<Widget>) {
    let first = widget.clone();
    spawn_local(async move {
        sleep(FIRST_SCAN_DELAY).await;
        host::push_pdf_url(&first);
    });

    let periodic = widget.clone();
    spawn_local(async move {
        for _ in 0..RESCAN_ATTEMPTS {
            sleep(RESCAN_INTERVAL).await;
            host::push_pdf_url(&periodic);
        }
        console::log!(format!("[Metron] Polling finalizado ({} tentativas).", RESCAN_ATTEMPTS));
    });
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = LoaderConfig::from_page(&window, &document);
    console::log!(format!("[Metron] widget carregado: {}", config.chat_url));

    let widget = Widget::mount(window, document, config)?;

    if let Some(button) = widget.button() {
        let weak = Rc::downgrade(&widget);
        EventListener::new(&button, "click", move |_| {
            let Some(widget) = weak.upgrade() else {
                return;
            };
            let reopened = widget.is_loaded() && !widget.is_open();
            if let Err(e) = widget.toggle(on_frame_loaded) {
                console::error!(format!("[Metron] falha ao abrir: {:?}", e));
                return;
            }
            if reopened {
                host::push_pdf_url(&widget);
            }
        })
        .forget();
    }

    host::listen(&widget).forget();
    schedule_scans(&widget);

    // ページが生きている間は保持する
    std::mem::forget(widget);
    Ok(())
}
