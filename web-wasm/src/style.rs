//! ウィジェットのスタイル

pub const STYLE: &str = r#"
:root, body[data-theme="light"] {
    --bg-primary: #ffffff;
    --bg-secondary: #f5f7fa;
    --text-primary: #1f2933;
    --text-secondary: #616e7c;
    --border-color: #e4e7eb;
    --accent-primary: #2563eb;
    --success: #4caf50;
    --danger: #e74c3c;
}
body[data-theme="dark"] {
    --bg-primary: #1e1e1e;
    --bg-secondary: #2a2a2a;
    --text-primary: #e4e7eb;
    --text-secondary: #9aa5b1;
    --border-color: #3e4c59;
    --accent-primary: #60a5fa;
}
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg-primary); color: var(--text-primary); }
.container { display: flex; flex-direction: column; height: 100vh; }
.header { display: flex; justify-content: space-between; align-items: center; padding: 10px 16px; border-bottom: 1px solid var(--border-color); }
.header h1 { margin: 0; font-size: 18px; }
.header-subtitle { font-size: 12px; color: var(--text-secondary); }
.icon-btn { background: none; border: none; font-size: 18px; cursor: pointer; color: var(--text-primary); }
.layout { display: flex; flex: 1; min-height: 0; }
.sidebar { width: 240px; padding: 12px; border-right: 1px solid var(--border-color); overflow-y: auto; background: var(--bg-secondary); }
.chat { flex: 1; display: flex; flex-direction: column; min-width: 0; }
.upload-area { border: 2px dashed var(--border-color); border-radius: 8px; padding: 16px; text-align: center; cursor: pointer; }
.upload-area.dragover { border-color: var(--accent-primary); }
.upload-area.disabled { opacity: 0.5; cursor: not-allowed; }
.upload-icon { font-size: 28px; }
.text-muted { color: var(--text-secondary); font-size: 12px; }
.files-list h3 { font-size: 13px; margin: 12px 0 6px; }
.file-item { position: relative; overflow: hidden; display: flex; align-items: center; gap: 6px; padding: 6px; margin-bottom: 6px; border-radius: 6px; background: var(--bg-primary); }
.file-info { flex: 1; min-width: 0; }
.file-name { font-size: 12px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.file-size { font-size: 11px; color: var(--text-secondary); }
.file-remove { background: none; border: none; cursor: pointer; color: var(--text-secondary); }
.file-progress { position: absolute; bottom: 0; left: 0; width: 100%; height: 4px; background: rgba(0,0,0,0.05); }
.file-progress-bar { height: 100%; width: 0; transition: width 0.5s; }
.file-progress-bar.processing { width: 60%; background: var(--accent-primary); }
.file-progress-bar.done { width: 100%; background: var(--success); }
.file-progress-bar.error { width: 100%; background: var(--danger); }
.progress-container { margin-top: 12px; }
.progress-bar { height: 6px; border-radius: 3px; background: var(--border-color); overflow: hidden; }
.progress-fill { height: 100%; background: var(--accent-primary); transition: width 0.5s; }
.progress-text { font-size: 12px; color: var(--text-secondary); }
.chat-messages { flex: 1; overflow-y: auto; padding: 16px; }
.message { display: flex; margin-bottom: 12px; }
.message.user { justify-content: flex-end; }
.message-content { max-width: 85%; padding: 10px 14px; border-radius: 12px; background: var(--bg-secondary); font-size: 14px; line-height: 1.45; }
.message.user .message-content { background: var(--accent-primary); color: #fff; }
.message-note { color: var(--text-secondary); font-style: italic; }
.spinner { display: inline-block; width: 12px; height: 12px; border: 2px solid var(--border-color); border-top-color: var(--accent-primary); border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.json-editor-container { min-width: 320px; }
.editor-header { margin-bottom: 12px; padding-bottom: 12px; border-bottom: 1px solid var(--border-color); }
.editor-title { color: var(--accent-primary); }
.editor-hint { margin-left: 12px; font-size: 12px; color: var(--text-secondary); }
.editor-footer { margin-top: 16px; padding-top: 12px; border-top: 1px solid var(--border-color); display: flex; justify-content: flex-end; }
.btn-save { padding: 8px 16px; background: var(--success); color: #fff; border: none; border-radius: 6px; cursor: pointer; }
.instrument-card { border: 1px solid var(--border-color); border-radius: 8px; margin-bottom: 16px; background: var(--bg-primary); overflow: hidden; }
.card-header { padding: 12px 16px; border-bottom: 1px solid var(--border-color); display: flex; justify-content: space-between; align-items: center; cursor: pointer; }
.card-subtitle { font-size: 11px; color: var(--text-secondary); }
.card-body { padding: 15px; }
.hidden-card, .json-object.collapsed { display: none; }
.json-object { padding-left: 16px; }
.json-line { display: flex; align-items: center; gap: 6px; margin: 3px 0; }
.json-spacer { width: 20px; }
.json-key { color: var(--accent-primary); font-family: monospace; font-size: 12px; }
.json-input { flex: 1; padding: 3px 6px; border: 1px solid var(--border-color); border-radius: 4px; background: var(--bg-primary); color: var(--text-primary); font-family: monospace; font-size: 12px; }
.collapse-btn { background: none; border: none; cursor: pointer; color: var(--text-secondary); width: 20px; }
.listing-card { border-left: 3px solid var(--accent-primary); padding: 8px 12px; margin: 8px 0; }
.listing-card.missing-date { border-left-color: var(--danger); }
.listing-card-title { font-weight: 600; margin-bottom: 4px; }
.listing-label { color: var(--text-secondary); }
.listing-quantity { margin: 6px 0 0 12px; font-size: 13px; }
.badge-warning { margin-left: 8px; font-size: 11px; color: var(--danger); }
.tag-grid { display: flex; flex-wrap: wrap; gap: 6px; margin-top: 8px; }
.tag-chip { padding: 2px 8px; border-radius: 10px; background: var(--bg-primary); border: 1px solid var(--border-color); font-family: monospace; }
.warnings { margin-top: 12px; color: var(--danger); font-size: 13px; }
.action-bar { display: none; flex-wrap: wrap; gap: 8px; padding: 8px 16px; border-top: 1px solid var(--border-color); }
.action-bar.show { display: flex; }
.action-btn { padding: 6px 12px; border-radius: 6px; border: 1px solid var(--border-color); background: var(--bg-secondary); color: var(--text-primary); cursor: pointer; font-size: 13px; }
.action-btn.btn-primary { background: var(--accent-primary); color: #fff; border: none; }
.chat-input-area { padding: 12px 16px; border-top: 1px solid var(--border-color); }
.context-pdf-btn { margin-bottom: 8px; padding: 4px 10px; border-radius: 12px; border: 1px dashed var(--accent-primary); background: none; color: var(--accent-primary); cursor: pointer; font-size: 12px; }
.context-pdf-btn.active { background: var(--accent-primary); color: #fff; border-style: solid; }
.chat-input-row { display: flex; gap: 8px; }
.chat-input { flex: 1; resize: none; max-height: 120px; padding: 8px 12px; border-radius: 8px; border: 1px solid var(--border-color); background: var(--bg-primary); color: var(--text-primary); font: inherit; }
.chat-input.dragover { border-color: var(--accent-primary); }
.send-btn { width: 40px; border: none; border-radius: 8px; background: var(--accent-primary); color: #fff; cursor: pointer; }
"#;
