//! アップロードファイルの表示用情報

/// ファイル名から英数字以外を除いたDOM ID（`file-<英数字>`）
///
/// ポーリング応答のファイル名から同じIDを再計算して表示を更新する。
pub fn file_dom_id(file_name: &str) -> String {
    let sanitized: String = file_name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("file-{}", sanitized)
}

/// "12.3 KB"
pub fn size_label(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// 送信前のファイル（名前とサイズのみ。中身はプラットフォーム側が保持）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn dom_id(&self) -> String {
        file_dom_id(&self.name)
    }

    pub fn size_label(&self) -> String {
        size_label(self.size)
    }
}

pub fn is_pdf_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}
