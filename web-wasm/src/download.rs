//! ファイルのダウンロード（Blob URL + `<a download>`）

use gloo::timers::callback::Timeout;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const REVOKE_DELAY_MS: u32 = 1_000;

/// `instrumentos_<ミリ秒>.<ext>`
pub fn timestamped_name(ext: &str) -> String {
    format!("instrumentos_{}.{}", js_sys::Date::now() as u64, ext)
}

pub fn save_bytes(bytes: &[u8], mime_type: &str, file_name: &str) -> Result<(), JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let url = Url::create_object_url_with_blob(&blob)?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    // クリック直後に解放するとダウンロードが始まらないブラウザがある
    Timeout::new(REVOKE_DELAY_MS, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();
    Ok(())
}

pub fn save_text(text: &str, mime_type: &str, file_name: &str) -> Result<(), JsValue> {
    save_bytes(text.as_bytes(), mime_type, file_name)
}
