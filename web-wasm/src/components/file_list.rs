//! 選択ファイルの一覧（ファイルごとの処理状態つき）

use crate::state::SelectedFile;
use leptos::prelude::*;
use metron_common::types::FileStatus;
use std::collections::BTreeMap;

fn status_icon(status: Option<FileStatus>) -> &'static str {
    match status {
        Some(FileStatus::Done) => "✅",
        Some(FileStatus::Error) => "⚠️",
        Some(FileStatus::Processing) => "⏳",
        _ => "",
    }
}

#[component]
pub fn FileList<F>(
    files: RwSignal<Vec<SelectedFile>, LocalStorage>,
    file_status: RwSignal<BTreeMap<String, FileStatus>>,
    is_busy: RwSignal<bool>,
    on_remove: F,
) -> impl IntoView
where
    F: Fn(usize) + Send + Sync + 'static + Clone,
{
    view! {
        <Show when=move || !files.with(Vec::is_empty)>
            <div class="files-list">
                <h3>"Arquivos"</h3>
                {
                    let on_remove = on_remove.clone();
                    move || {
                        files
                            .get()
                            .into_iter()
                            .enumerate()
                            .map(|(idx, file)| {
                                let dom_id = file.info.dom_id();
                                let status_id = dom_id.clone();
                                let status = move || file_status.with(|s| s.get(&status_id).copied());
                                let bar_status = status.clone();
                                let on_remove = on_remove.clone();

                                view! {
                                    <div class="file-item" id=dom_id.clone()>
                                        <div class="file-icon">"📄"</div>
                                        <div class="file-info">
                                            <div class="file-name" title=file.info.name.clone()>
                                                {file.info.name.clone()}
                                            </div>
                                            <div class="file-size">{file.info.size_label()}</div>
                                        </div>
                                        <div class="status-icon">{move || status_icon(status())}</div>
                                        <Show when=move || !is_busy.get()>
                                            <button
                                                class="file-remove"
                                                title="Remover"
                                                on:click={
                                                    let on_remove = on_remove.clone();
                                                    move |_| on_remove(idx)
                                                }
                                            >
                                                "×"
                                            </button>
                                        </Show>
                                        <div class="file-progress">
                                            <div class=move || {
                                                format!(
                                                    "file-progress-bar {}",
                                                    bar_status().map(|s| s.as_str()).unwrap_or("queued"),
                                                )
                                            } />
                                        </div>
                                    </div>
                                }
                            })
                            .collect_view()
                    }
                }
            </div>
        </Show>
    }
}
