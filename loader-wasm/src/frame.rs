//! フローティングボタンとチャットフレーム

use crate::config::LoaderConfig;
use crate::style::{STYLE, STYLE_ID};
use gloo::console;
use gloo::events::EventListener;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlIFrameElement, Window};

pub const CONTAINER_ID: &str = "metron-widget-container";
pub const BUTTON_ID: &str = "metron-toggle-btn";
pub const FRAME_ID: &str = "metron-chat-frame";
pub const IFRAME_ID: &str = "metron-iframe";

const OPEN_CLASS: &str = "open";

/// ホストページ側のウィジェット
///
/// iframe は最初に開いたときに作る。
pub struct Widget {
    pub config: LoaderConfig,
    pub window: Window,
    pub document: Document,
    frame: HtmlElement,
    iframe: RefCell<Option<HtmlIFrameElement>>,
    loaded: Cell<bool>,
}

impl Widget {
    /// スタイル・ボタン・フレーム枠をページに挿入
    pub fn mount(window: Window, document: Document, config: LoaderConfig) -> Result<Rc<Self>, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        if document.get_element_by_id(STYLE_ID).is_none() {
            let style = document.create_element("style")?;
            style.set_id(STYLE_ID);
            style.set_text_content(Some(STYLE));
            match document.head() {
                Some(head) => head.append_child(&style)?,
                None => body.append_child(&style)?,
            };
        }

        let container = document.create_element("div")?;
        container.set_id(CONTAINER_ID);

        let button = document.create_element("button")?;
        button.set_id(BUTTON_ID);
        button.set_attribute("type", "button")?;
        button.set_attribute("title", "Metron")?;
        button.set_text_content(Some("🤖"));

        let frame: HtmlElement = document.create_element("div")?.dyn_into()?;
        frame.set_id(FRAME_ID);

        container.append_child(&button)?;
        body.append_child(&container)?;
        body.append_child(&frame)?;

        Ok(Rc::new(Self {
            config,
            window,
            document,
            frame,
            iframe: RefCell::new(None),
            loaded: Cell::new(false),
        }))
    }

    pub fn button(&self) -> Option<web_sys::Element> {
        self.document.get_element_by_id(BUTTON_ID)
    }

    pub fn is_open(&self) -> bool {
        self.frame.class_list().contains(OPEN_CLASS)
    }

    pub fn close(&self) {
        if let Err(e) = self.frame.class_list().remove_1(OPEN_CLASS) {
            console::error!(format!("[Metron] falha ao fechar: {:?}", e));
        }
    }

    /// iframe が読み込み済みか
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// 開閉を切り替える。初回は iframe を作成し、読み込み完了で `on_load` を呼ぶ
    pub fn toggle<F>(self: &Rc<Self>, on_load: F) -> Result<(), JsValue>
    where
        F: Fn(&Rc<Self>) + 'static,
    {
        if self.is_open() {
            self.close();
            return Ok(());
        }

        if self.iframe.borrow().is_none() {
            let iframe = self.create_iframe(on_load)?;
            *self.iframe.borrow_mut() = Some(iframe);
        }
        self.frame.class_list().add_1(OPEN_CLASS)
    }

    fn create_iframe<F>(self: &Rc<Self>, on_load: F) -> Result<HtmlIFrameElement, JsValue>
    where
        F: Fn(&Rc<Self>) + 'static,
    {
        let iframe: HtmlIFrameElement = self.document.create_element("iframe")?.dyn_into()?;
        iframe.set_id(IFRAME_ID);
        iframe.set_src(&self.config.frame_url());
        iframe.set_attribute("allow", "clipboard-write")?;

        let widget = Rc::downgrade(self);
        EventListener::new(&iframe, "load", move |_| {
            if let Some(widget) = widget.upgrade() {
                widget.loaded.set(true);
                console::log!("[Metron] iframe carregado");
                on_load(&widget);
            }
        })
        .forget();

        self.frame.append_child(&iframe)?;
        console::log!(format!("[Metron] iframe criado: {}", self.config.frame_url()));
        Ok(iframe)
    }

    /// iframe の window へ送信（送信先オリジンはチャットのオリジンに限定）
    pub fn post(&self, message: &JsValue, transfer: Option<&js_sys::Array>) -> Result<(), JsValue> {
        let target = self
            .iframe
            .borrow()
            .as_ref()
            .and_then(|iframe| iframe.content_window())
            .ok_or_else(|| JsValue::from_str("chat iframe not ready"))?;

        let origin = self.config.chat_origin();
        match transfer {
            Some(transfer) => target.post_message_with_transfer(message, &origin, transfer),
            None => target.post_message(message, &origin),
        }
    }
}
