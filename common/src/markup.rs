//! テキスト応答の整形
//!
//! 動的テキストはすべてエスケープしてから、許可した記法
//! （`**太字**` と改行）だけをタグに変換する。

use regex::Regex;
use std::fmt;

/// エスケープ済みで、許可タグ（`<strong>`, `<br>`）のみを含むHTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

lazy_static::lazy_static! {
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
}

/// `**太字**` と改行のみを解釈
pub fn format_text_response(text: &str) -> SafeMarkup {
    let escaped = escape_html(&text.replace("\r\n", "\n"));
    let bolded = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    SafeMarkup(bolded.replace('\n', "<br>"))
}

/// タグを外してエスケープを戻す（CLI表示用）
pub fn to_plain_text(markup: &SafeMarkup) -> String {
    markup
        .as_str()
        .replace("<br>", "\n")
        .replace("<strong>", "")
        .replace("</strong>", "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
