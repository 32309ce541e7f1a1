//! ローダー設定（チャットURL・ユーザーID）

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlInputElement, Url, Window};

/// `data-chat-url` が無いときの既定値
pub const DEFAULT_CHAT_URL: &str = "http://localhost:5001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub chat_url: String,
    pub user_id: Option<String>,
}

impl LoaderConfig {
    pub fn new(chat_url: impl Into<String>, user_id: Option<String>) -> Self {
        let chat_url = chat_url.into().trim().trim_end_matches('/').to_string();
        Self {
            chat_url: if chat_url.is_empty() {
                DEFAULT_CHAT_URL.to_string()
            } else {
                chat_url
            },
            user_id: user_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }

    /// ホストページから読み取る
    ///
    /// チャットURLは `<script data-chat-url="...">`、ユーザーIDは
    /// グローバル変数 `current_user_id` か `#user_id` 入力欄の値。
    pub fn from_page(window: &Window, document: &Document) -> Self {
        let chat_url = document
            .query_selector("script[data-chat-url]")
            .ok()
            .flatten()
            .and_then(|script| script.get_attribute("data-chat-url"))
            .unwrap_or_default();

        Self::new(chat_url, page_user_id(window, document))
    }

    /// iframe に読み込むURL
    pub fn frame_url(&self) -> String {
        match &self.user_id {
            Some(id) => format!("{}/?user_id={}", self.chat_url, id),
            None => format!("{}/", self.chat_url),
        }
    }

    /// postMessage の送信先・受信元として許可するオリジン
    pub fn chat_origin(&self) -> String {
        origin_of(&self.chat_url)
    }
}

fn page_user_id(window: &Window, document: &Document) -> Option<String> {
    let global = Reflect::get(window, &JsValue::from_str("current_user_id"))
        .ok()
        .and_then(|value| {
            value
                .as_string()
                .or_else(|| value.as_f64().map(|n| format!("{}", n as i64)))
        });
    if global.is_some() {
        return global;
    }

    document
        .get_element_by_id("user_id")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// ブラウザの `URL` でオリジンを求める
///
/// `MessageEvent.origin` と同じ正規化（小文字化・既定ポート省略）になる。
/// 解析できないURLはそのまま返す（どのオリジンとも一致しない）。
pub fn origin_of(url: &str) -> String {
    match Url::new(url) {
        Ok(parsed) => parsed.origin(),
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // LoaderConfig
    // ============================================

    #[test]
    fn test_default_chat_url_when_blank() {
        let config = LoaderConfig::new("  ", None);
        assert_eq!(config.chat_url, DEFAULT_CHAT_URL);
        assert_eq!(config.frame_url(), "http://localhost:5001/");
    }

    #[test]
    fn test_frame_url_with_user_id() {
        let config = LoaderConfig::new("https://chat.example.com/", Some(" 42 ".into()));
        assert_eq!(config.frame_url(), "https://chat.example.com/?user_id=42");
    }

    #[test]
    fn test_blank_user_id_is_none() {
        let config = LoaderConfig::new("https://chat.example.com", Some("".into()));
        assert_eq!(config.user_id, None, "空のIDは未設定扱い");
    }

    #[test]
    fn test_frame_url_without_user_id() {
        let config = LoaderConfig::new("http://10.0.0.5:5001/", None);
        assert_eq!(config.chat_url, "http://10.0.0.5:5001", "末尾のスラッシュは除く");
        assert_eq!(config.frame_url(), "http://10.0.0.5:5001/");
    }
}

// ============================================
// origin_of（ブラウザの URL を使うため wasm でのみ実行）
// ============================================

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_origin_of_strips_path_and_query() {
        assert_eq!(origin_of("https://chat.example.com/widget?x=1"), "https://chat.example.com");
        assert_eq!(origin_of("http://localhost:5001"), "http://localhost:5001");
        assert_eq!(origin_of("http://localhost:5001/#top"), "http://localhost:5001");
    }

    #[wasm_bindgen_test]
    fn wasm_origin_of_normalizes_like_message_event() {
        assert_eq!(origin_of("HTTPS://Chat.Example.com:443/x"), "https://chat.example.com");
        assert_eq!(origin_of("http://user:pw@chat.example.com:8080/"), "http://chat.example.com:8080");
    }

    #[wasm_bindgen_test]
    fn wasm_chat_origin_matches_frame_origin() {
        let config = LoaderConfig::new("http://10.0.0.5:5001/", Some("7".into()));
        assert_eq!(config.chat_origin(), "http://10.0.0.5:5001");
        assert!(config.frame_url().starts_with(&config.chat_origin()));
    }
}
