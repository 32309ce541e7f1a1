//! 抽出結果の編集ツリー
//!
//! 表示モデル（`TreeNode`）は共通ライブラリで組み立て済み。ここでは描画と
//! 入力イベントの受け渡しだけを行う。

use crate::components::listing_view::{ListingView, WarningsBlock};
use leptos::prelude::*;
use metron_common::edit::FieldPath;
use metron_common::listing::{build_listing, ListMode};
use metron_common::message::text;
use metron_common::tree::{instrument_cards, InputKind, InstrumentCard, TreeNode};
use metron_common::ResultStore;

/// 結果エディタ
///
/// `generation` が現在の結果セットと違えば（後の送信で置き換え済み）編集不可の表示にする。
#[component]
pub fn ResultEditor<F, S>(
    generation: u64,
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
    // 編集では世代が変わらないので、入力のたびに再描画されない
    let current = Memo::new(move |_| store.with(|s| s.generation()));

    move || {
        if current.get() != generation {
            return view! { <div class="message-note">{text::SUPERSEDED}</div> }.into_any();
        }

        if show_listing.get() {
            let mode = ListMode::from_command(&last_command.get_untracked());
            let listing = store.with_untracked(|s| build_listing(s.records(), mode));
            return view! { <ListingView listing=listing /> }.into_any();
        }

        let (cards, warnings) = store.with_untracked(|s| instrument_cards(s.records()));
        let on_edit = on_edit.clone();
        let on_save = on_save.clone();

        view! {
            <div class="json-editor-container">
                <div class="editor-header">
                    <div>
                        <strong class="editor-title">"📝 Editor de Dados"</strong>
                        <span class="editor-hint">"Clique nos valores para editar"</span>
                    </div>
                </div>
                <div class="instrument-cards">
                    {cards
                        .into_iter()
                        .map(|card| render_card(card, on_edit.clone()))
                        .collect_view()}
                </div>
                <WarningsBlock warnings=warnings />
                <div class="editor-footer">
                    <button class="btn btn-save" on:click=move |_| on_save(())>
                        "Salvar Edições"
                    </button>
                </div>
            </div>
        }
        .into_any()
    }
}

fn render_card<F>(card: InstrumentCard, on_edit: F) -> impl IntoView
where
    F: Fn(FieldPath, String) + 'static + Clone,
{
    let (open, set_open) = signal(true);

    view! {
        <div class="instrument-card">
            <div class="card-header" on:click=move |_| set_open.update(|o| *o = !*o)>
                <div>
                    <strong class="card-title">{card.icon} " " {card.title}</strong>
                    <div class="card-subtitle">{card.subtitle}</div>
                </div>
                <span class="card-toggle">{move || if open.get() { "▼" } else { "▶" }}</span>
            </div>
            <div class="card-body" class:hidden-card=move || !open.get()>
                <div class="json-object">
                    {card
                        .fields
                        .into_iter()
                        .map(|node| render_node(node, on_edit.clone()))
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}

fn render_node<F>(node: TreeNode, on_edit: F) -> AnyView
where
    F: Fn(FieldPath, String) + 'static + Clone,
{
    let summary = node.summary();

    match node {
        TreeNode::Leaf { key, path, display, kind } => {
            let class = match kind {
                InputKind::Number => "json-input json-number",
                InputKind::Text => "json-input json-string",
            };
            let data_path = path.to_string();

            view! {
                <div class="json-line">
                    <span class="json-spacer"></span>
                    <span class="json-key">{format!("\"{}\":", key)}</span>
                    <input
                        type=kind.as_str()
                        class=class
                        value=display
                        data-path=data_path
                        on:change=move |ev| on_edit(path.clone(), event_target_value(&ev))
                    />
                </div>
            }
            .into_any()
        }
        TreeNode::List { key, children, .. } | TreeNode::Map { key, children, .. } => {
            let (open, set_open) = signal(true);
            let key_label = (!key.is_empty()).then(|| {
                view! { <span class="json-key">{format!("\"{}\":", key)}</span> }
            });

            view! {
                <div class="json-line">
                    <button class="collapse-btn" on:click=move |_| set_open.update(|o| *o = !*o)>
                        {move || if open.get() { "▼" } else { "▶" }}
                    </button>
                    {key_label}
                    <span class="json-summary">{format!(" {}", summary)}</span>
                </div>
                <div class="json-object" class:collapsed=move || !open.get()>
                    {children
                        .into_iter()
                        .map(|child| render_node(child, on_edit.clone()))
                        .collect_view()}
                </div>
            }
            .into_any()
        }
    }
}
