//! 端末への表示（進捗バーとメッセージ）

use indicatif::{ProgressBar, ProgressStyle};
use metron_common::bridge::BridgeMessage;
use metron_common::files::file_dom_id;
use metron_common::message::{BotBody, ChatMessage};
use metron_common::{FileStatus, ResultStore, Surface, TaskHandle};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

struct TrackedFile {
    name: String,
    status: FileStatus,
}

fn status_icon(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Queued => "⏳",
        FileStatus::Processing => "🔄",
        FileStatus::Done => "✔",
        FileStatus::Error => "✖",
    }
}

/// 送信フローの端末出力先
///
/// 結果セットは保持しておき、終了後に `-o` で書き出せる。
pub struct TerminalSurface {
    store: ResultStore,
    files: BTreeMap<String, TrackedFile>,
    progress: Option<ProgressBar>,
    actions_visible: bool,
    quiet: bool,
}

impl TerminalSurface {
    pub fn new(files: &[PathBuf]) -> Self {
        let files = files
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| {
                let name = name.to_string_lossy().to_string();
                (
                    file_dom_id(&name),
                    TrackedFile {
                        name,
                        status: FileStatus::Queued,
                    },
                )
            })
            .collect();

        Self {
            store: ResultStore::new(),
            files,
            progress: None,
            actions_visible: false,
            quiet: false,
        }
    }

    /// メッセージを表示しない（テスト・パイプ用）
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn actions_visible(&self) -> bool {
        self.actions_visible
    }

    pub fn file_status(&self, name: &str) -> Option<FileStatus> {
        self.files.get(&file_dom_id(name)).map(|f| f.status)
    }

    fn print(&self, line: &str) {
        if self.quiet {
            return;
        }
        match &self.progress {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    fn render(&self, message: &ChatMessage) -> Option<String> {
        match message {
            ChatMessage::User(_) | ChatMessage::Loading => None,
            ChatMessage::Bot(BotBody::Editor { .. }) => self.store.to_pretty_json().ok(),
            other => Some(other.to_plain()),
        }
    }
}

impl Surface for TerminalSurface {
    fn push_message(&mut self, message: ChatMessage) {
        if let Some(text) = self.render(&message) {
            self.print(&text);
        }
    }

    fn remove_loading(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
    }

    fn update_file(&mut self, dom_id: &str, status: FileStatus) -> bool {
        let Some(file) = self.files.get_mut(dom_id) else {
            return false;
        };
        if file.status == status {
            return true;
        }
        file.status = status;
        let line = format!("  {} {}: {}", status_icon(status), file.name, status.as_str());
        self.print(&line);
        true
    }

    fn update_progress(&mut self, progress: Option<f32>) {
        if let (Some(bar), Some(progress)) = (&self.progress, progress) {
            bar.set_position((progress.clamp(0.0, 1.0) * 100.0).round() as u64);
        }
    }

    fn post_to_host(&mut self, message: BridgeMessage) {
        match &message {
            BridgeMessage::Navigate { url } => self.print(&format!("↪ {}", url)),
            BridgeMessage::FillChecklist { data } => {
                let items: Vec<String> = data
                    .iter()
                    .map(|(key, checked)| format!("{}={}", key, if checked { "✔" } else { "✖" }))
                    .collect();
                self.print(&format!("📋 checklist: {}", items.join(", ")));
            }
            other => tracing::debug!(tag = other.tag(), "ホストページが無いため破棄"),
        }
    }

    fn set_results(&mut self, records: Vec<Value>) -> u64 {
        self.store.replace(records)
    }

    fn clear_results(&mut self) {
        self.store.clear();
    }

    fn set_actions_visible(&mut self, visible: bool) {
        self.actions_visible = visible;
    }

    fn reset_uploads(&mut self) {
        self.files.clear();
    }

    fn task_started(&mut self, task: &TaskHandle) {
        tracing::info!(task_id = %task, "抽出タスク開始");
        if self.quiet {
            return;
        }

        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} Processando... [{bar:30.cyan/blue}] {pos}%")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        self.progress = Some(bar);
    }
}
