//! チャット欄

use crate::components::field_tree::ResultEditor;
use crate::state::ChatEntry;
use leptos::html::Div;
use leptos::prelude::*;
use metron_common::edit::FieldPath;
use metron_common::message::{BotBody, ChatMessage};
use metron_common::results::ResultSummary;
use metron_common::ResultStore;

fn render_summary(summary: ResultSummary) -> impl IntoView {
    let lines = summary
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            view! {
                <div>{format!("{}. ", i + 1)}<b>{line.ident.clone()}</b>{format!(" - {}", line.name)}</div>
            }
        })
        .collect_view();

    view! {
        <div>
            <strong>"✅ Processamento concluído!"</strong>
            {format!(" ({} arquivos)", summary.count)}
        </div>
        <br />
        {lines}
    }
}

#[component]
pub fn ChatMessages<F, S>(
    messages: RwSignal<Vec<ChatEntry>>,
    store: RwSignal<ResultStore>,
    show_listing: RwSignal<bool>,
    last_command: RwSignal<String>,
    on_edit: F,
    on_save: S,
) -> impl IntoView
where
    F: Fn(FieldPath, String) + Send + Sync + 'static + Clone,
    S: Fn(()) + Send + Sync + 'static + Clone,
{
    let container = NodeRef::<Div>::new();

    // 新しいメッセージで最下部へスクロール
    Effect::new(move |_| {
        messages.track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let render = move |entry: ChatEntry| {
        let (class, body) = match entry.message {
            ChatMessage::User(text) => ("message user", view! { {text} }.into_any()),
            ChatMessage::Loading => (
                "message bot loading",
                view! {
                    <span class="spinner"></span>
                    " Processando..."
                }
                .into_any(),
            ),
            ChatMessage::Bot(body) => {
                let body = match body {
                    BotBody::Text(text) => view! { {text} }.into_any(),
                    BotBody::Markup(markup) => {
                        // エスケープ済みで <strong>/<br> のみ
                        view! { <div inner_html=markup.into_string()></div> }.into_any()
                    }
                    BotBody::Summary(summary) => render_summary(summary).into_any(),
                    BotBody::Editor { generation } => view! {
                        <ResultEditor
                            generation=generation
                            store=store
                            show_listing=show_listing
                            last_command=last_command
                            on_edit=on_edit.clone()
                            on_save=on_save.clone()
                        />
                    }
                    .into_any(),
                };
                ("message bot", body)
            }
        };

        view! {
            <div class=class>
                <div class="message-content">{body}</div>
            </div>
        }
    };

    view! {
        <div class="chat-messages" node_ref=container>
            <div class="message bot">
                <div class="message-content">
                    "Olá! Envie certificados de calibração em PDF ou digite um comando."
                </div>
            </div>
            <For each=move || messages.get() key=|entry| entry.id children=render />
        </div>
    }
}
