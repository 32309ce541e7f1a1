//! タスクステータスのポーリング
//!
//! 一定間隔で `/upload-status/{task_id}` を取得し、終端ステータス
//! （completed / error / not_found）で停止する。取得失敗でも停止する。
//! タイマーは呼び出し側から注入する（ブラウザは gloo、CLIは tokio）。

use crate::api::Backend;
use crate::error::Result;
use crate::types::{StatusReport, TaskHandle};
use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use std::time::Duration;

/// ポーリング間隔
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 終端に達したポーリングの結果
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub last: StatusReport,
    pub ticks: u32,
}

/// 終端ステータスまでポーリングする
///
/// 最初の取得は1間隔待ってから行う。`on_tick` は取得ごとに（終端の回も含めて）呼ばれる。
pub async fn poll_until_terminal<B, Z, Fut, T>(
    backend: &B,
    task: &TaskHandle,
    interval: Duration,
    mut sleep: Z,
    mut on_tick: T,
) -> Result<PollReport>
where
    B: Backend,
    Z: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
    T: FnMut(&StatusReport),
{
    let mut ticks = 0u32;
    loop {
        sleep(interval).await;
        let report = backend.fetch_status(task).await?;
        ticks += 1;
        on_tick(&report);

        if report.status.is_terminal() {
            return Ok(PollReport { last: report, ticks });
        }
    }
}

/// 送信ごとの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

/// 実行中の送信を1つだけ保持するスロット
///
/// 新しい送信を始めると、まだ動いている前の送信（ポーリング含む）を中断する。
#[derive(Debug, Default)]
pub struct PollSlot {
    next_id: u64,
    active: Option<(SubmissionId, AbortHandle)>,
}

impl PollSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 前の送信を中断し、新しい送信を中断可能な形で包む
    pub fn begin<F: Future>(&mut self, future: F) -> (SubmissionId, Abortable<F>) {
        self.cancel();
        self.next_id += 1;
        let id = SubmissionId(self.next_id);
        let (handle, registration) = AbortHandle::new_pair();
        self.active = Some((id, handle));
        (id, Abortable::new(future, registration))
    }

    /// 実行中の送信を中断。中断したものがあれば true
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// 完了した送信を外す（後続の送信が既に始まっていれば何もしない）
    pub fn finish(&mut self, id: SubmissionId) {
        if self.is_current(id) {
            self.active = None;
        }
    }

    pub fn is_current(&self, id: SubmissionId) -> bool {
        matches!(self.active, Some((active, _)) if active == id)
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{ChatReply, TaskStatus, UploadReply};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedBackend {
        replies: RefCell<VecDeque<Result<StatusReport>>>,
        calls: RefCell<u32>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<StatusReport>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(0),
            }
        }
    }

    impl Backend for ScriptedBackend {
        type Upload = ();

        async fn send_chat(&self, _message: &str) -> Result<ChatReply> {
            unreachable!()
        }

        async fn upload(&self, _upload: &()) -> Result<UploadReply> {
            unreachable!()
        }

        async fn fetch_status(&self, _task: &TaskHandle) -> Result<StatusReport> {
            *self.calls.borrow_mut() += 1;
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Network("script exhausted".into())))
        }
    }

    fn no_sleep(_: Duration) -> futures::future::Ready<()> {
        futures::future::ready(())
    }

    #[test]
    fn test_poll_stops_at_completed() {
        let backend = ScriptedBackend::new(vec![
            Ok(StatusReport::new(TaskStatus::Starting)),
            Ok(StatusReport::new(TaskStatus::Running)),
            Ok(StatusReport::new(TaskStatus::Completed)),
            Ok(StatusReport::new(TaskStatus::Running)),
        ]);

        let mut seen = Vec::new();
        let report = block_on(poll_until_terminal(
            &backend,
            &TaskHandle::new("abc"),
            POLL_INTERVAL,
            no_sleep,
            |r| seen.push(r.status.clone()),
        ))
        .unwrap();

        assert_eq!(report.ticks, 3);
        assert_eq!(report.last.status, TaskStatus::Completed);
        assert_eq!(*backend.calls.borrow(), 3);
        assert_eq!(seen, vec![TaskStatus::Starting, TaskStatus::Running, TaskStatus::Completed]);
    }

    #[test]
    fn test_poll_terminal_on_first_tick() {
        for status in [TaskStatus::Completed, TaskStatus::Error, TaskStatus::NotFound] {
            let backend = ScriptedBackend::new(vec![Ok(StatusReport::new(status.clone()))]);
            let report = block_on(poll_until_terminal(
                &backend,
                &TaskHandle::new("t"),
                POLL_INTERVAL,
                no_sleep,
                |_| {},
            ))
            .unwrap();
            assert_eq!(report.ticks, 1);
            assert_eq!(report.last.status, status);
        }
    }

    #[test]
    fn test_poll_stops_on_fetch_error() {
        let backend = ScriptedBackend::new(vec![
            Ok(StatusReport::new(TaskStatus::Running)),
            Err(Error::Network("offline".into())),
            Ok(StatusReport::new(TaskStatus::Completed)),
        ]);

        let result = block_on(poll_until_terminal(
            &backend,
            &TaskHandle::new("t"),
            POLL_INTERVAL,
            no_sleep,
            |_| {},
        ));
        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(*backend.calls.borrow(), 2);
    }

    #[test]
    fn test_poll_sleeps_before_each_fetch() {
        let backend = ScriptedBackend::new(vec![
            Ok(StatusReport::new(TaskStatus::Running)),
            Ok(StatusReport::new(TaskStatus::Completed)),
        ]);
        let sleeps = RefCell::new(Vec::new());

        block_on(poll_until_terminal(
            &backend,
            &TaskHandle::new("t"),
            Duration::from_millis(250),
            |d| {
                sleeps.borrow_mut().push(d);
                futures::future::ready(())
            },
            |_| {},
        ))
        .unwrap();

        assert_eq!(*sleeps.borrow(), vec![Duration::from_millis(250); 2]);
    }

    // =============================================
    // PollSlot
    // =============================================

    #[test]
    fn test_slot_new_submission_aborts_previous() {
        let mut slot = PollSlot::new();
        let (first_id, first) = slot.begin(futures::future::pending::<()>());
        let (second_id, second) = slot.begin(futures::future::ready(7));

        assert!(!slot.is_current(first_id));
        assert!(slot.is_current(second_id));
        assert!(block_on(first).is_err());
        assert_eq!(block_on(second), Ok(7));
    }

    #[test]
    fn test_slot_finish_only_current() {
        let mut slot = PollSlot::new();
        let (first_id, _first) = slot.begin(futures::future::ready(()));
        let (second_id, _second) = slot.begin(futures::future::ready(()));

        slot.finish(first_id);
        assert!(slot.is_busy());
        slot.finish(second_id);
        assert!(!slot.is_busy());
        assert!(!slot.cancel());
    }
}
