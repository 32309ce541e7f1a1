//! 結果に対する操作ボタン

use leptos::prelude::*;

/// 操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert,
    GenerateSql,
    DownloadJson,
    ToggleListing,
}

#[component]
pub fn ActionBar<F>(
    visible: RwSignal<bool>,
    is_busy: RwSignal<bool>,
    show_listing: RwSignal<bool>,
    on_action: F,
) -> impl IntoView
where
    F: Fn(Action) + Send + Sync + 'static + Clone,
{
    let button = move |action: Action, class: &'static str, label: &'static str| {
        let on_action = on_action.clone();
        view! {
            <button
                class=format!("action-btn {}", class)
                disabled=move || is_busy.get()
                on:click=move |_| on_action(action)
            >
                {label}
            </button>
        }
    };

    let toggle = button.clone();

    view! {
        <div class="action-bar" class:show=move || visible.get()>
            {button(Action::Insert, "btn-primary", "💾 Inserir no Banco")}
            {button(Action::GenerateSql, "btn-secondary", "🗄️ Gerar SQL")}
            {button(Action::DownloadJson, "btn-secondary", "⬇️ Baixar JSON")}
            <span class="action-toggle">
                {move || {
                    let label = if show_listing.get() { "📝 Ver como JSON" } else { "📋 Ver como Lista" };
                    toggle(Action::ToggleListing, "btn-secondary", label)
                }}
            </span>
        </div>
    }
}
