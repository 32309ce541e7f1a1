//! 抽出結果の保持と分類
//!
//! 現在の結果セットは常に1つ。新しいタスクの完了で丸ごと置き換え、
//! エディタからの編集は `apply_edit` でのみ反映する。

use crate::checklist::ChecklistPayload;
use crate::edit::{apply_edit, FieldPath};
use crate::error::Result;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    records: Vec<Value>,
    generation: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 結果セットを置き換え、新しい世代番号を返す
    pub fn replace(&mut self, records: Vec<Value>) -> u64 {
        self.records = records;
        self.generation += 1;
        self.generation
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// エディタの入力を反映
    pub fn apply_edit(&mut self, path: &FieldPath, raw: &str) -> Result<Value> {
        let mut root = Value::Array(std::mem::take(&mut self.records));
        let result = apply_edit(&mut root, path, raw);
        if let Value::Array(records) = root {
            self.records = records;
        }
        result
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}

/// 完了したタスクの結果の形
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Empty,
    Checklist(ChecklistPayload),
    TextResponses(Vec<String>),
    Instruments(Vec<Value>),
}

const CHECKLIST_KEYS: &[&str] = &["checklist_data", "auto_checklist"];

impl ExtractionOutcome {
    pub fn classify(results: Vec<Value>) -> Self {
        if results.is_empty() {
            return ExtractionOutcome::Empty;
        }

        let checklist = results.iter().find_map(|record| {
            CHECKLIST_KEYS
                .iter()
                .find_map(|key| record.get(*key))
                .and_then(|value| ChecklistPayload::from_value(value).ok())
        });
        if let Some(payload) = checklist {
            return ExtractionOutcome::Checklist(payload);
        }

        let is_text = results[0]
            .get("is_text_response")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if is_text {
            let texts = results
                .iter()
                .map(|r| r.get("descricao").and_then(Value::as_str).unwrap_or_default().to_string())
                .collect();
            return ExtractionOutcome::TextResponses(texts);
        }

        ExtractionOutcome::Instruments(results)
    }
}

/// 要約の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub ident: String,
    pub name: String,
}

/// 「処理完了 (N件)」と各レコードの識別子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub count: usize,
    pub lines: Vec<SummaryLine>,
}

impl ResultSummary {
    pub fn from_records(records: &[Value]) -> Self {
        let lines = records
            .iter()
            .map(|r| SummaryLine {
                ident: first_str(r, &["identificacao", "numero_certificado"]).unwrap_or_else(|| "S/N".to_string()),
                name: first_str(r, &["nome"]).unwrap_or_else(|| "Instrumento".to_string()),
            })
            .collect();

        Self {
            count: records.len(),
            lines,
        }
    }

    pub fn headline(&self) -> String {
        format!("✅ Processamento concluído! ({} arquivos)", self.count)
    }

    /// "1. TAG1 - Paquímetro"
    pub fn line_text(&self, index: usize) -> Option<String> {
        let line = self.lines.get(index)?;
        Some(format!("{}. {} - {}", index + 1, line.ident, line.name))
    }

    pub fn to_text(&self) -> String {
        let mut out = self.headline();
        for i in 0..self.lines.len() {
            if let Some(line) = self.line_text(i) {
                out.push('\n');
                out.push_str(&line);
            }
        }
        out
    }
}

fn first_str(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
