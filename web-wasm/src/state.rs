//! 画面の状態（シグナル）と送信フローの出力先

use crate::bridge;
use leptos::prelude::*;
use metron_common::bridge::BridgeMessage;
use metron_common::files::FileInfo;
use metron_common::message::ChatMessage;
use metron_common::types::FileStatus;
use metron_common::workflow::Surface;
use metron_common::ResultStore;
use serde_json::Value;
use std::collections::BTreeMap;

/// チャット欄の1件（描画キー付き）
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub id: u64,
    pub message: ChatMessage,
}

/// 選択中のファイル
#[derive(Clone)]
pub struct SelectedFile {
    pub info: FileInfo,
    pub file: web_sys::File,
}

impl SelectedFile {
    pub fn new(file: web_sys::File) -> Self {
        Self {
            info: FileInfo::new(file.name(), file.size() as u64),
            file,
        }
    }
}

/// ウィジェット全体の状態
///
/// すべてシグナルなので Copy で各コンポーネントに渡せる。
#[derive(Clone, Copy)]
pub struct WidgetState {
    pub messages: RwSignal<Vec<ChatEntry>>,
    next_id: StoredValue<u64>,
    pub files: RwSignal<Vec<SelectedFile>, LocalStorage>,
    /// DOM id → 状態
    pub file_status: RwSignal<BTreeMap<String, FileStatus>>,
    pub progress: RwSignal<Option<f32>>,
    pub store: RwSignal<ResultStore>,
    pub actions_visible: RwSignal<bool>,
    pub is_busy: RwSignal<bool>,
    /// 編集ツリーの代わりにリスト表示
    pub show_listing: RwSignal<bool>,
    pub last_command: RwSignal<String>,
    pub context_pdf_url: RwSignal<Option<String>>,
    pub attach_context: RwSignal<bool>,
    pub user_id: RwSignal<Option<String>>,
}

impl WidgetState {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            messages: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            files: RwSignal::new_local(Vec::new()),
            file_status: RwSignal::new(BTreeMap::new()),
            progress: RwSignal::new(None),
            store: RwSignal::new(ResultStore::new()),
            actions_visible: RwSignal::new(false),
            is_busy: RwSignal::new(false),
            show_listing: RwSignal::new(false),
            last_command: RwSignal::new(String::new()),
            context_pdf_url: RwSignal::new(None),
            attach_context: RwSignal::new(false),
            user_id: RwSignal::new(user_id),
        }
    }

    pub fn push(&self, message: ChatMessage) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.messages.update(|m| m.push(ChatEntry { id, message }));
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(ChatMessage::bot_text(text));
    }

    pub fn remove_loading_messages(&self) {
        self.messages.update(|m| m.retain(|e| !e.message.is_loading()));
    }

    /// 選択ファイルを置き換え、状態表示を初期化
    pub fn set_files(&self, files: Vec<SelectedFile>) {
        let status = files
            .iter()
            .map(|f| (f.info.dom_id(), FileStatus::Queued))
            .collect();
        self.files.set(files);
        self.file_status.set(status);
        self.progress.set(None);
    }
}

impl Surface for WidgetState {
    fn push_message(&mut self, message: ChatMessage) {
        self.push(message);
    }

    fn remove_loading(&mut self) {
        self.remove_loading_messages();
    }

    fn update_file(&mut self, dom_id: &str, status: FileStatus) -> bool {
        let known = self.file_status.with_untracked(|s| s.contains_key(dom_id));
        if known {
            self.file_status.update(|s| {
                s.insert(dom_id.to_string(), status);
            });
        }
        known
    }

    fn update_progress(&mut self, progress: Option<f32>) {
        self.progress.set(progress);
    }

    fn post_to_host(&mut self, message: BridgeMessage) {
        bridge::post_to_host(&message);
    }

    fn set_results(&mut self, records: Vec<Value>) -> u64 {
        self.show_listing.set(false);
        let mut generation = 0;
        self.store.update(|store| generation = store.replace(records));
        generation
    }

    fn clear_results(&mut self) {
        self.store.update(ResultStore::clear);
    }

    fn set_actions_visible(&mut self, visible: bool) {
        self.actions_visible.set(visible);
    }

    fn reset_uploads(&mut self) {
        self.set_files(Vec::new());
        self.attach_context.set(false);
    }
}
