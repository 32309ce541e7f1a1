//! メインアプリケーションコンポーネント

use crate::api::{HttpBackend, UploadForm};
use crate::bridge;
use crate::components::{
    action_bar::{Action, ActionBar},
    chat_input::ChatInput,
    chat_messages::ChatMessages,
    file_list::FileList,
    header::Header,
    progress_bar::ProgressBar,
    upload_area::UploadArea,
};
use crate::download;
use crate::state::{SelectedFile, WidgetState};
use crate::style::STYLE;
use crate::theme::Theme;
use gloo::console;
use gloo::timers::future::sleep;
use leptos::prelude::*;
use metron_common::bridge::BridgeMessage;
use metron_common::edit::FieldPath;
use metron_common::message::{text, ChatMessage};
use metron_common::workflow::{run_submission, Submission};
use metron_common::{PollSlot, POLL_INTERVAL};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::UrlSearchParams;

const USER_ID_PROMPT: &str = "Digite o ID do usuário (user_id):";

/// iframe のURLの `?user_id=`
fn query_user_id() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search)
        .ok()?
        .get("user_id")
        .filter(|id| !id.trim().is_empty())
}

/// 親ページからのメッセージ
fn handle_host_message(state: WidgetState, message: BridgeMessage) {
    match message {
        BridgeMessage::ContextPdfUrl { url } => {
            console::log!(format!("[Metron] PDF da página: {}", url));
            state.context_pdf_url.set(Some(url));
        }
        BridgeMessage::SetUserCtx { user_id } => {
            console::log!(format!("[Metron] user_id recebido: {}", user_id));
            state.user_id.set(Some(user_id));
        }
        // 内容の応答は request_pdf_content 側で受け取る
        other => console::debug!(format!("[Metron] '{}' ignorado", other.tag())),
    }
}

/// 送信内容
struct Draft {
    text: String,
    files: Vec<web_sys::File>,
    context_url: Option<String>,
}

/// 送信を開始する（実行中の送信は中断）
fn start_submission(
    state: WidgetState,
    backend: HttpBackend,
    slot: Rc<RefCell<PollSlot>>,
    draft: Draft,
) {
    if slot.borrow().is_busy() {
        console::log!("[Metron] envio anterior cancelado");
        state.remove_loading_messages();
    }
    state.is_busy.set(true);
    state.progress.set(None);

    let mut surface = state;
    let job = async move {
        let Draft { text, files, context_url } = draft;

        let submission = if files.is_empty() && context_url.is_none() {
            Submission::Chat { message: text }
        } else {
            let mut form = UploadForm {
                files,
                command: Some(text.clone()),
                ..Default::default()
            };

            if let Some(url) = context_url {
                if bridge::is_embedded() {
                    state.push(ChatMessage::Loading);
                    let fetched = bridge::request_pdf_content().await;
                    state.remove_loading_messages();
                    match fetched {
                        Ok(bytes) => form.context_pdf = Some(bytes),
                        Err(e) => {
                            console::warn!(format!("[Metron] PDF da página indisponível: {:?}", e));
                            state.push_text(e.user_message());
                            return None;
                        }
                    }
                } else {
                    form.pdf_url = Some(url);
                }
            }

            Submission::Upload {
                upload: form,
                message: Some(text),
            }
        };

        Some(run_submission(&backend, &mut surface, submission, POLL_INTERVAL, sleep).await)
    };

    let (id, job) = slot.borrow_mut().begin(job);

    spawn_local(async move {
        let outcome = job.await;

        let was_current = slot.borrow().is_current(id);
        slot.borrow_mut().finish(id);
        if was_current {
            state.is_busy.set(false);
        }

        match outcome {
            Ok(Some(outcome)) => console::log!(format!("[Metron] envio concluído: {:?}", outcome)),
            Ok(None) => {}
            Err(_) => console::log!("[Metron] envio substituído por um mais recente"),
        }
    });
}

/// 操作ボタン
fn run_action(state: WidgetState, backend: HttpBackend, action: Action) {
    if state.store.with_untracked(|s| s.is_empty()) {
        state.push_text(text::NO_DATA);
        return;
    }

    match action {
        Action::ToggleListing => state.show_listing.update(|s| *s = !*s),
        Action::DownloadJson => {
            let saved = state
                .store
                .with_untracked(|s| s.to_pretty_json())
                .map_err(|e| e.to_string())
                .and_then(|json| {
                    download::save_text(&json, "application/json", &download::timestamped_name("json"))
                        .map_err(|e| format!("{:?}", e))
                });
            match saved {
                Ok(()) => state.push_text(text::JSON_DOWNLOADED),
                Err(e) => state.push_text(format!("❌ Erro: {}", e)),
            }
        }
        Action::GenerateSql => {
            let records = state.store.with_untracked(|s| s.records().to_vec());
            state.push(ChatMessage::Loading);
            spawn_local(async move {
                let result = backend.generate_sql(&records).await;
                state.remove_loading_messages();
                let saved = result.map_err(|e| e.to_string()).and_then(|bytes| {
                    download::save_bytes(&bytes, "application/sql", &download::timestamped_name("sql"))
                        .map_err(|e| format!("{:?}", e))
                });
                match saved {
                    Ok(()) => state.push_text(text::SQL_DOWNLOADED),
                    Err(e) => state.push_text(format!("❌ Erro: {}", e)),
                }
            });
        }
        Action::Insert => {
            let Some(user_id) = resolve_user_id(state) else {
                return;
            };
            let records = state.store.with_untracked(|s| s.records().to_vec());
            state.push(ChatMessage::Loading);
            spawn_local(async move {
                let result = backend.insert(&records, user_id).await;
                state.remove_loading_messages();
                match result {
                    Ok(reply) if reply.success => state.push_text(format!("✅ {}", reply.message)),
                    Ok(reply) => state.push_text(format!("❌ {}", reply.message)),
                    Err(e) => state.push_text(format!("❌ Erro: {}", e)),
                }
            });
        }
    }
}

/// 受け取った user_id、無ければ入力を求める
fn resolve_user_id(state: WidgetState) -> Option<i64> {
    if let Some(id) = state.user_id.get_untracked().and_then(|id| id.trim().parse().ok()) {
        return Some(id);
    }

    let answer = web_sys::window()?
        .prompt_with_message(USER_ID_PROMPT)
        .ok()
        .flatten()?;
    if answer.trim().is_empty() {
        return None;
    }
    match answer.trim().parse() {
        Ok(id) => {
            state.user_id.set(Some(answer.trim().to_string()));
            Some(id)
        }
        Err(_) => {
            state.push_text(format!("❌ ID de usuário inválido: {}", answer.trim()));
            None
        }
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let state = WidgetState::new(query_user_id());
    let theme = RwSignal::new(Theme::load());
    theme.get_untracked().apply();

    let backend = HttpBackend::new("");
    let slot = Rc::new(RefCell::new(PollSlot::new()));

    // 親ページとの連携
    if let Some(listener) = bridge::listen(move |message| handle_host_message(state, message)) {
        listener.forget();
    }
    if bridge::is_embedded() {
        bridge::post_to_host(&BridgeMessage::RequestPdfUrl);
    }

    // ファイル追加ハンドラ
    let on_files_added = move |files: Vec<SelectedFile>| {
        let count = files.len();
        state.set_files(files);
        state.push_text(text::files_loaded(count));
    };

    // ファイル削除ハンドラ
    let on_remove = {
        let backend = backend.clone();
        move |idx: usize| {
            let mut remaining = 0;
            state.files.update(|files| {
                if idx < files.len() {
                    files.remove(idx);
                }
                remaining = files.len();
            });
            if remaining > 0 {
                return;
            }

            state.set_files(Vec::new());
            state.store.update(|s| s.clear());
            state.actions_visible.set(false);
            state.push_text(text::SESSION_CLEARED);

            let backend = backend.clone();
            spawn_local(async move {
                if let Err(e) = backend.clear_cache().await {
                    console::warn!(format!("[Metron] falha ao limpar cache: {}", e));
                }
            });
        }
    };

    // 送信ハンドラ
    let on_send = {
        let backend = backend.clone();
        move |text: String| {
            let text = text.trim().to_string();
            let files: Vec<web_sys::File> = state
                .files
                .with_untracked(|f| f.iter().map(|s| s.file.clone()).collect());
            let context_url = if state.attach_context.get_untracked() {
                state.context_pdf_url.get_untracked()
            } else {
                None
            };

            if text.is_empty() && files.is_empty() && context_url.is_none() {
                return;
            }

            state.last_command.set(text.clone());
            start_submission(
                state,
                backend.clone(),
                slot.clone(),
                Draft {
                    text,
                    files,
                    context_url,
                },
            );
        }
    };

    // 編集ハンドラ
    let on_edit = move |path: FieldPath, raw: String| {
        let mut result = None;
        state.store.update(|s| result = Some(s.apply_edit(&path, &raw)));
        match result {
            Some(Ok(value)) => console::log!(format!("[Metron] {} = {}", path, value)),
            Some(Err(e)) => console::error!(format!("[Metron] edição ignorada: {}", e)),
            None => {}
        }
    };

    let on_save = move |_| {
        if state.store.with_untracked(|s| s.is_empty()) {
            state.push_text(text::NO_DATA);
        } else {
            state.push_text(text::EDITS_SAVED);
        }
    };

    let on_action = {
        let backend = backend.clone();
        move |action: Action| run_action(state, backend.clone(), action)
    };

    let on_close = move |_| bridge::post_to_host(&BridgeMessage::CloseWidget);

    view! {
        <style>{STYLE}</style>
        <div class="container">
            <Header theme=theme on_close=on_close />

            <div class="layout">
                <aside class="sidebar">
                    <UploadArea is_busy=state.is_busy on_files_added=on_files_added />
                    <FileList
                        files=state.files
                        file_status=state.file_status
                        is_busy=state.is_busy
                        on_remove=on_remove
                    />
                    <Show when=move || state.is_busy.get() && state.progress.with(Option::is_some)>
                        <ProgressBar progress=state.progress />
                    </Show>
                </aside>

                <main class="chat">
                    <ChatMessages
                        messages=state.messages
                        store=state.store
                        show_listing=state.show_listing
                        last_command=state.last_command
                        on_edit=on_edit
                        on_save=on_save
                    />
                    <ActionBar
                        visible=state.actions_visible
                        is_busy=state.is_busy
                        show_listing=state.show_listing
                        on_action=on_action
                    />
                    <ChatInput
                        is_busy=state.is_busy
                        context_pdf_url=state.context_pdf_url
                        attach_context=state.attach_context
                        on_send=on_send
                        on_files_added=on_files_added
                    />
                </main>
            </div>
        </div>
    }
}
