//! チャット欄に表示するメッセージ

use crate::markup::{format_text_response, to_plain_text, SafeMarkup};
use crate::results::ResultSummary;

/// 利用者向けの定型文
pub mod text {
    pub const COMMUNICATION_ERROR: &str = "Desculpe, ocorreu um erro na comunicação.";
    pub const UPLOAD_ERROR_PREFIX: &str = "❌ Erro no envio: ";
    pub const PROCESSING_FAILED: &str = "❌ O processamento falhou. Verifique os arquivos e tente novamente.";
    pub const FINISHED_WITHOUT_RESULTS: &str = "⚠️ Processamento finalizado. Verifique erros na lista lateral.";
    pub const CHECKLIST_FORWARDED: &str = "✅ Checklist verificado! Preenchendo o formulário da página...";
    pub const NO_DATA: &str = "⚠️ Nenhum dado extraído!";
    pub const EDITS_SAVED: &str = "✅ Edições salvas! Os dados atualizados serão usados ao inserir no banco.";
    pub const SESSION_CLEARED: &str = "Todos os arquivos foram removidos. Sessão limpa.";
    pub const SQL_DOWNLOADED: &str = "✅ SQL gerado e baixado com sucesso!";
    pub const JSON_DOWNLOADED: &str = "✅ JSON baixado com sucesso!";
    pub const PDF_TIMEOUT: &str = "⏱️ A página não respondeu a tempo ao pedido do PDF. Tente novamente.";
    pub const PDF_NOT_FOUND: &str = "🔍 Nenhum PDF foi encontrado nesta página.";
    pub const PDF_HOST_ERROR_PREFIX: &str = "❌ Não foi possível baixar o PDF da página: ";
    pub const SUPERSEDED: &str = "Resultado substituído por um envio mais recente.";

    pub fn files_loaded(count: usize) -> String {
        format!("✅ {} arquivo(s) carregado(s)! O que você gostaria de fazer?", count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotBody {
    /// エスケープして表示
    Text(String),
    /// 許可タグのみのHTML
    Markup(SafeMarkup),
    Summary(ResultSummary),
    /// 編集ツリー（指定世代の結果セットを表示）
    Editor { generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User(String),
    Bot(BotBody),
    /// 「Processando...」
    Loading,
}

impl ChatMessage {
    pub fn bot_text(text: impl Into<String>) -> Self {
        ChatMessage::Bot(BotBody::Text(text.into()))
    }

    /// バックエンドの応答（`**太字**` と改行を含み得る）
    pub fn bot_markup(text: &str) -> Self {
        ChatMessage::Bot(BotBody::Markup(format_text_response(text)))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ChatMessage::Loading)
    }

    /// 端末表示用のプレーンテキスト
    pub fn to_plain(&self) -> String {
        match self {
            ChatMessage::User(text) => format!("> {}", text),
            ChatMessage::Loading => "Processando...".to_string(),
            ChatMessage::Bot(body) => match body {
                BotBody::Text(text) => text.clone(),
                BotBody::Markup(markup) => to_plain_text(markup),
                BotBody::Summary(summary) => summary.to_text(),
                BotBody::Editor { generation } => format!("[editor #{}]", generation),
            },
        }
    }
}
