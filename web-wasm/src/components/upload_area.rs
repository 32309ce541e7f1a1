//! アップロードエリアコンポーネント

use crate::state::SelectedFile;
use leptos::html::Input;
use leptos::prelude::*;
use metron_common::files::is_pdf_file_name;
use web_sys::{DragEvent, FileList};

/// FileList からPDFだけを取り出す
pub fn pdf_files(files: &FileList) -> Vec<SelectedFile> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .filter(|file| file.type_() == "application/pdf" || is_pdf_file_name(&file.name()))
        .map(SelectedFile::new)
        .collect()
}

#[component]
pub fn UploadArea<F>(is_busy: RwSignal<bool>, on_files_added: F) -> impl IntoView
where
    F: Fn(Vec<SelectedFile>) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<Input>::new();

    let handle_files = move |files: FileList, on_files_added: F| {
        let selected = pdf_files(&files);
        if !selected.is_empty() {
            on_files_added(selected);
        }
    };

    let on_drop = {
        let on_files_added = on_files_added.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if is_busy.get_untracked() {
                return;
            }

            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                handle_files(files, on_files_added.clone());
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !is_busy.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if is_busy.get_untracked() {
            return;
        }
        // ファイル選択ダイアログを開く
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = {
        let on_files_added = on_files_added.clone();
        move |_| {
            let Some(input) = input_ref.get() else {
                return;
            };
            if let Some(files) = input.files() {
                handle_files(files, on_files_added.clone());
            }
            // 同じファイルを選び直せるように
            input.set_value("");
        }
    };

    view! {
        <div
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if is_busy.get() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                node_ref=input_ref
                type="file"
                accept=".pdf,application/pdf"
                multiple=true
                style="display: none"
                on:click=|ev| ev.stop_propagation()
                on:change=on_change
            />
            <div class="upload-icon">"📄"</div>
            <p>"Arraste certificados PDF ou clique para selecionar"</p>
            <p class="text-muted">"Formato aceito: PDF"</p>
        </div>
    }
}
