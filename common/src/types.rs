//! バックエンドAPIの型定義
//!
//! ウィジェット(WASM)とCLIで共有される型:
//! - UploadReply / StatusReport: 非同期抽出タスク
//! - ChatReply: テキストチャット
//! - InsertRequest / SqlRequest: 抽出結果の送信

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// バックエンドが発行するタスクID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ファイル単位のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    #[serde(alias = "pending")]
    Queued,
    Processing,
    Done,
    Error,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Queued => "queued",
            FileStatus::Processing => "processing",
            FileStatus::Done => "done",
            FileStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Done | FileStatus::Error)
    }
}

/// タスク全体のステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Starting,
    Running,
    Completed,
    Error,
    NotFound,
    #[serde(other)]
    Other,
}

impl TaskStatus {
    /// ポーリングを止めるステータスか
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error | TaskStatus::NotFound)
    }
}

/// `/upload-status/{task_id}` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: TaskStatus,

    #[serde(default)]
    pub files: BTreeMap<String, FileStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// 完了ファイル数（バックエンドのキー名は "completed"）
    #[serde(default, rename = "completed", skip_serializing_if = "Option::is_none")]
    pub completed_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
}

impl StatusReport {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            files: BTreeMap::new(),
            total: None,
            completed_count: None,
            results: None,
        }
    }

    /// 0.0〜1.0 の進捗。件数が無ければファイル単位のステータスから推定
    pub fn progress(&self) -> Option<f32> {
        if let (Some(total), Some(done)) = (self.total, self.completed_count) {
            if total > 0 {
                return Some((done.min(total) as f32) / (total as f32));
            }
        }
        if self.files.is_empty() {
            return None;
        }
        let finished = self.files.values().filter(|s| s.is_terminal()).count();
        Some(finished as f32 / self.files.len() as f32)
    }
}

/// `/upload-async` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `/chat-mensagem` のリクエスト
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// `/chat-mensagem` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_checklist: Option<Value>,
}

/// `/inserir-banco` のリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct InsertRequest<'a> {
    pub instrumentos: &'a [Value],
    pub user_id: i64,
}

/// `/inserir-banco` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// `/gerar-sql` のリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct SqlRequest<'a> {
    pub instrumentos: &'a [Value],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_report_deserialize() {
        let json = r#"{
            "status": "running",
            "files": {"a.pdf": "pending", "b.pdf": "processing", "c.pdf": "done"},
            "total": 3,
            "completed": 1
        }"#;

        let report: StatusReport = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(report.status, TaskStatus::Running);
        assert_eq!(report.files["a.pdf"], FileStatus::Queued);
        assert_eq!(report.files["b.pdf"], FileStatus::Processing);
        assert_eq!(report.completed_count, Some(1));
        assert!(report.results.is_none());
    }

    #[test]
    fn test_status_report_unknown_status() {
        let report: StatusReport =
            serde_json::from_str(r#"{"status": "paused"}"#).expect("デシリアライズ失敗");
        assert_eq!(report.status, TaskStatus::Other);
        assert!(!report.status.is_terminal());
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_task_status_terminal() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Error.is_terminal());
        assert!(TaskStatus::NotFound.is_terminal());
        assert!(!TaskStatus::Starting.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
    }

    #[test]
    fn test_progress_from_counts() {
        let mut report = StatusReport::new(TaskStatus::Running);
        report.total = Some(4);
        report.completed_count = Some(1);
        assert_eq!(report.progress(), Some(0.25));
    }

    #[test]
    fn test_progress_from_files() {
        let mut report = StatusReport::new(TaskStatus::Running);
        report.files.insert("a.pdf".into(), FileStatus::Done);
        report.files.insert("b.pdf".into(), FileStatus::Processing);
        assert_eq!(report.progress(), Some(0.5));

        let empty = StatusReport::new(TaskStatus::Starting);
        assert_eq!(empty.progress(), None);
    }

    #[test]
    fn test_upload_reply_variants() {
        let ok: UploadReply =
            serde_json::from_str(r#"{"success": true, "task_id": "abc"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.task_id, Some(TaskHandle::new("abc")));

        let ng: UploadReply =
            serde_json::from_str(r#"{"success": false, "message": "Sem arquivos ou URL"}"#).unwrap();
        assert!(!ng.success);
        assert_eq!(ng.message.as_deref(), Some("Sem arquivos ou URL"));
    }

    #[test]
    fn test_chat_reply_optional_fields() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"success": true, "message": "Redirecionando...", "redirect_url": "/calibracoes/1/edit"}"#,
        )
        .unwrap();
        assert_eq!(reply.message, "Redirecionando...");
        assert_eq!(reply.redirect_url.as_deref(), Some("/calibracoes/1/edit"));
        assert!(reply.auto_checklist.is_none());
    }

    #[test]
    fn test_insert_request_serialize() {
        let records = vec![json!({"identificacao": "TAG1"})];
        let request = InsertRequest { instrumentos: &records, user_id: 7 };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"instrumentos":[{"identificacao":"TAG1"}],"user_id":7}"#);
    }
}
