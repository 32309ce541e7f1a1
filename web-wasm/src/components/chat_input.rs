//! 入力欄（テキスト・ページPDFの添付・ドロップ）

use crate::components::upload_area::pdf_files;
use crate::state::SelectedFile;
use leptos::prelude::*;
use web_sys::{DragEvent, KeyboardEvent};

const PLACEHOLDER: &str = "Digite uma mensagem ou um comando para os PDFs...";
const PLACEHOLDER_WITH_PDF: &str = "PDF da página detectado. Digite um comando (ex.: extrair dados)...";

#[component]
pub fn ChatInput<S, A>(
    is_busy: RwSignal<bool>,
    context_pdf_url: RwSignal<Option<String>>,
    attach_context: RwSignal<bool>,
    on_send: S,
    on_files_added: A,
) -> impl IntoView
where
    S: Fn(String) + 'static + Clone,
    A: Fn(Vec<SelectedFile>) + 'static + Clone,
{
    let (draft, set_draft) = signal(String::new());
    let (is_dragover, set_is_dragover) = signal(false);

    let send = {
        let on_send = on_send.clone();
        move || {
            let text = draft.get_untracked();
            set_draft.set(String::new());
            on_send(text);
        }
    };

    let on_keydown = {
        let send = send.clone();
        move |ev: KeyboardEvent| {
            if ev.key() == "Enter" && !ev.shift_key() {
                ev.prevent_default();
                send();
            }
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
        if is_busy.get_untracked() {
            return;
        }
        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            let selected = pdf_files(&files);
            if !selected.is_empty() {
                on_files_added(selected);
            }
        }
    };

    let placeholder = move || {
        if context_pdf_url.with(Option::is_some) {
            PLACEHOLDER_WITH_PDF
        } else {
            PLACEHOLDER
        }
    };

    view! {
        <div class="chat-input-area">
            <Show when=move || context_pdf_url.with(Option::is_some)>
                <button
                    class="context-pdf-btn"
                    class:active=move || attach_context.get()
                    title=move || context_pdf_url.get().unwrap_or_default()
                    on:click=move |_| attach_context.update(|a| *a = !*a)
                >
                    {move || if attach_context.get() { "📎 PDF da página anexado" } else { "📄 Usar PDF da página" }}
                </button>
            </Show>
            <div class="chat-input-row">
                <textarea
                    class="chat-input"
                    class:dragover=move || is_dragover.get()
                    rows=1
                    placeholder=placeholder
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:keydown=on_keydown
                    on:dragover=move |ev: DragEvent| {
                        ev.prevent_default();
                        set_is_dragover.set(true);
                    }
                    on:dragleave=move |_: DragEvent| set_is_dragover.set(false)
                    on:drop=on_drop
                ></textarea>
                <button
                    class="send-btn"
                    on:click=move |_| send()
                >
                    "➤"
                </button>
            </div>
        </div>
    }
}
