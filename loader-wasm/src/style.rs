//! ホストページに注入するスタイル

pub const STYLE_ID: &str = "metron-widget-style";

pub const STYLE: &str = r#"
#metron-widget-container { position: fixed; bottom: 80px; right: 20px; z-index: 99999; font-family: system-ui, sans-serif; }
#metron-toggle-btn {
    width: 48px; height: 48px; border-radius: 50%; border: none; cursor: pointer;
    background: linear-gradient(135deg, #00A8E8, #0077B6); color: #fff; font-size: 24px;
    box-shadow: 0 4px 12px rgba(0, 119, 182, 0.4); transition: transform 0.2s;
}
#metron-toggle-btn:hover { transform: scale(1.08); }
#metron-chat-frame {
    position: fixed; bottom: 150px; right: 20px; width: 600px; height: 650px; max-height: 75vh;
    border-radius: 16px; overflow: hidden; box-shadow: 0 8px 32px rgba(0, 0, 0, 0.25); background: #fff;
    opacity: 0; pointer-events: none; transform: translateY(20px); transition: opacity 0.25s, transform 0.25s;
}
#metron-chat-frame.open { opacity: 1; pointer-events: auto; transform: translateY(0); }
#metron-iframe { width: 100%; height: 100%; border: none; }
@media (max-width: 480px) {
    #metron-chat-frame { width: calc(100vw - 20px); right: 10px; bottom: 140px; height: 70vh; }
    #metron-widget-container { right: 10px; }
}
"#;
