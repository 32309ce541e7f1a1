//! プログレスバーコンポーネント

use leptos::prelude::*;

#[component]
pub fn ProgressBar(progress: RwSignal<Option<f32>>) -> impl IntoView {
    let percent = move || progress.get().unwrap_or(0.0).clamp(0.0, 1.0) * 100.0;

    view! {
        <div class="progress-container">
            <div class="progress-bar">
                <div
                    class="progress-fill"
                    class:indeterminate=move || progress.get().is_none()
                    style=move || format!("width: {}%", percent())
                />
            </div>
            <p class="progress-text">
                {move || match progress.get() {
                    Some(_) => format!("Processando... {:.0}%", percent()),
                    None => "Processando...".to_string(),
                }}
            </p>
        </div>
    }
}
