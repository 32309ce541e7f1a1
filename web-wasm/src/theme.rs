//! ライト/ダークテーマ（localStorage の `theme` キー）

use gloo::storage::{LocalStorage, Storage};

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// 切替ボタンの表示（ライト時は🌙）
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    /// 保存済みのテーマ。無ければライト
    pub fn load() -> Self {
        // 値はJSONではなく素の文字列で保存する
        match LocalStorage::raw().get_item(THEME_KEY).ok().flatten().as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn save(&self) {
        // 保存できなくても表示は切り替える
        let _ = LocalStorage::raw().set_item(THEME_KEY, self.as_str());
    }

    /// `<body data-theme=...>` に反映
    pub fn apply(&self) {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());
        if let Some(body) = body {
            let _ = body.set_attribute("data-theme", self.as_str());
        }
    }
}
