//! 送信フロー（チャット / アップロード → ポーリング → 表示）
//!
//! 表示先は `Surface` として抽象化しているので、iframe のUIと
//! CLI の端末表示で同じ流れを共有できる。

use crate::api::Backend;
use crate::bridge::BridgeMessage;
use crate::checklist::ChecklistPayload;
use crate::error::Error;
use crate::files::file_dom_id;
use crate::message::{text, BotBody, ChatMessage};
use crate::poll::poll_until_terminal;
use crate::results::{ExtractionOutcome, ResultSummary};
use crate::types::{FileStatus, StatusReport, TaskHandle, TaskStatus};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// 1回の送信
#[derive(Debug, Clone)]
pub enum Submission<U> {
    /// テキストのみ
    Chat { message: String },
    /// ファイル（またはPDF URL）付き。コマンドは任意
    Upload { upload: U, message: Option<String> },
}

impl<U> Submission<U> {
    fn user_text(&self) -> Option<&str> {
        let text = match self {
            Submission::Chat { message } => message.as_str(),
            Submission::Upload { message, .. } => message.as_deref().unwrap_or_default(),
        };
        let text = text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// 送信フローの出力先
pub trait Surface {
    fn push_message(&mut self, message: ChatMessage);

    /// 「Processando...」を外す
    fn remove_loading(&mut self);

    /// ファイルごとの状態表示を更新。対象が無ければ false
    fn update_file(&mut self, dom_id: &str, status: FileStatus) -> bool;

    fn update_progress(&mut self, progress: Option<f32>);

    fn post_to_host(&mut self, message: BridgeMessage);

    /// 結果セットを置き換え、世代番号を返す
    fn set_results(&mut self, records: Vec<Value>) -> u64;

    fn clear_results(&mut self);

    fn set_actions_visible(&mut self, visible: bool);

    /// 選択ファイルと状態表示を初期化
    fn reset_uploads(&mut self);

    fn task_started(&mut self, _task: &TaskHandle) {}
}

/// 送信の結末
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Replied,
    UploadRejected,
    ChecklistForwarded,
    TextResponses(usize),
    Instruments { generation: u64, count: usize },
    FinishedWithoutResults,
    Failed,
    CommunicationError,
}

/// 送信を最後まで実行する
///
/// 途中でフューチャーが破棄された場合（新しい送信による中断）は何も表示しない。
pub async fn run_submission<B, S, Z, Fut>(
    backend: &B,
    surface: &mut S,
    submission: Submission<B::Upload>,
    interval: Duration,
    sleep: Z,
) -> SubmissionOutcome
where
    B: Backend,
    S: Surface,
    Z: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    if let Some(text) = submission.user_text() {
        surface.push_message(ChatMessage::User(text.to_string()));
    }
    surface.push_message(ChatMessage::Loading);

    let result = match submission {
        Submission::Chat { message } => run_chat(backend, surface, &message).await,
        Submission::Upload { upload, .. } => {
            run_upload(backend, surface, &upload, interval, sleep).await
        }
    };

    result.unwrap_or_else(|_| {
        surface.remove_loading();
        surface.push_message(ChatMessage::bot_text(text::COMMUNICATION_ERROR));
        SubmissionOutcome::CommunicationError
    })
}

async fn run_chat<B: Backend, S: Surface>(
    backend: &B,
    surface: &mut S,
    message: &str,
) -> Result<SubmissionOutcome, Error> {
    let reply = backend.send_chat(message).await?;
    surface.remove_loading();
    surface.push_message(ChatMessage::bot_markup(&reply.message));

    if let Some(url) = reply.redirect_url.filter(|u| !u.is_empty()) {
        surface.post_to_host(BridgeMessage::Navigate { url });
    }
    if let Some(raw) = reply.auto_checklist.as_ref() {
        match ChecklistPayload::from_value(raw) {
            Ok(data) => surface.post_to_host(BridgeMessage::FillChecklist { data }),
            Err(e) => tracing::warn!("auto_checklist を無視: {}", e),
        }
    }

    Ok(SubmissionOutcome::Replied)
}

async fn run_upload<B, S, Z, Fut>(
    backend: &B,
    surface: &mut S,
    upload: &B::Upload,
    interval: Duration,
    sleep: Z,
) -> Result<SubmissionOutcome, Error>
where
    B: Backend,
    S: Surface,
    Z: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    let reply = backend.upload(upload).await?;

    let task = match (reply.success, reply.task_id) {
        (true, Some(task)) => task,
        (_, _) => {
            surface.remove_loading();
            let reason = reply.message.unwrap_or_else(|| "resposta inválida".to_string());
            surface.push_message(ChatMessage::bot_text(format!(
                "{}{}",
                text::UPLOAD_ERROR_PREFIX,
                reason
            )));
            return Ok(SubmissionOutcome::UploadRejected);
        }
    };
    surface.task_started(&task);

    let report = poll_until_terminal(backend, &task, interval, sleep, |report| {
        apply_tick(surface, report)
    })
    .await?;

    surface.remove_loading();
    Ok(render_terminal(surface, report.last))
}

fn apply_tick<S: Surface>(surface: &mut S, report: &StatusReport) {
    for (name, status) in &report.files {
        // 表示対象のないファイルは無視
        surface.update_file(&file_dom_id(name), *status);
    }
    surface.update_progress(report.progress());
}

fn render_terminal<S: Surface>(surface: &mut S, report: StatusReport) -> SubmissionOutcome {
    let results = report.results.unwrap_or_default();

    if results.is_empty() {
        let (message, outcome) = match report.status {
            TaskStatus::Completed => (text::FINISHED_WITHOUT_RESULTS, SubmissionOutcome::FinishedWithoutResults),
            _ => (text::PROCESSING_FAILED, SubmissionOutcome::Failed),
        };
        surface.push_message(ChatMessage::bot_text(message));
        return outcome;
    }

    match ExtractionOutcome::classify(results) {
        ExtractionOutcome::Checklist(data) => {
            surface.post_to_host(BridgeMessage::FillChecklist { data });
            surface.push_message(ChatMessage::bot_text(text::CHECKLIST_FORWARDED));
            surface.reset_uploads();
            SubmissionOutcome::ChecklistForwarded
        }
        ExtractionOutcome::TextResponses(texts) => {
            surface.clear_results();
            surface.set_actions_visible(false);
            for text in &texts {
                surface.push_message(ChatMessage::bot_markup(text));
            }
            SubmissionOutcome::TextResponses(texts.len())
        }
        ExtractionOutcome::Instruments(records) => {
            let summary = ResultSummary::from_records(&records);
            let count = records.len();
            let generation = surface.set_results(records);
            surface.push_message(ChatMessage::Bot(BotBody::Summary(summary)));
            surface.push_message(ChatMessage::Bot(BotBody::Editor { generation }));
            surface.set_actions_visible(true);
            SubmissionOutcome::Instruments { generation, count }
        }
        ExtractionOutcome::Empty => {
            surface.push_message(ChatMessage::bot_text(text::FINISHED_WITHOUT_RESULTS));
            SubmissionOutcome::FinishedWithoutResults
        }
    }
}
