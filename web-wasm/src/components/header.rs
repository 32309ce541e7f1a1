//! ヘッダーコンポーネント

use crate::theme::Theme;
use leptos::prelude::*;

#[component]
pub fn Header<F>(theme: RwSignal<Theme>, on_close: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    let toggle_theme = move |_| {
        let next = theme.get_untracked().toggled();
        next.apply();
        next.save();
        theme.set(next);
    };

    view! {
        <header class="header">
            <div class="header-title">
                <h1>"Metron"</h1>
                <span class="header-subtitle">"Assistente de calibração"</span>
            </div>
            <div class="header-actions">
                <button class="icon-btn" title="Alternar tema" on:click=toggle_theme>
                    {move || theme.get().toggle_icon()}
                </button>
                <button
                    class="icon-btn"
                    title="Fechar"
                    on:click={
                        let on_close = on_close.clone();
                        move |_| on_close(())
                    }
                >
                    "×"
                </button>
            </div>
        </header>
    }
}
