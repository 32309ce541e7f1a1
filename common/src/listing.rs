//! 読み取り専用のリスト表示
//!
//! コマンド文から表示モードを決め、未記入（"n/i"）の項目を除いたカードを作る。

use crate::fields::{informed_text, is_informed};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// TAGのみのグリッド
    TagsOnly,
    /// 主要5項目
    Quick,
    /// 全項目＋グランデーザ
    Full,
}

impl ListMode {
    pub fn from_command(command: &str) -> Self {
        let command = command.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| command.contains(w));

        let wants_tags = has(&["tag", "identificação", "identificacao", "código", "codigo"]);
        if wants_tags && has(&["apenas", "só", "somente"]) {
            return ListMode::TagsOnly;
        }
        if has(&["lista", "listar"]) {
            return ListMode::Quick;
        }
        ListMode::Full
    }
}

const QUICK_FIELDS: &[(&str, &str)] = &[
    ("TAG", "identificacao"),
    ("Nome", "nome"),
    ("Fabricante", "fabricante"),
    ("Modelo", "modelo"),
    ("Data Calib.", "data_calibracao"),
];

const FULL_FIELDS: &[(&str, &str)] = &[
    ("Identificação", "identificacao"),
    ("Nome", "nome"),
    ("Fabricante", "fabricante"),
    ("Modelo", "modelo"),
    ("Nº Série", "numero_serie"),
    ("Responsável", "responsavel"),
    ("Departamento", "departamento"),
    ("Data Calibração", "data_calibracao"),
    ("Data Emissão", "data_emissao"),
];

const QUANTITY_FIELDS: &[(&str, &str)] = &[
    ("Faixa Nominal", "faixa_nominal"),
    ("Unidade", "unidade"),
    ("Resolução", "resolucao"),
    ("Tolerância", "tolerancia_processo"),
    ("Critério", "criterio_aceitacao"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub title: String,
    /// data_calibracao が未記入
    pub missing_date: bool,
    pub rows: Vec<ListingRow>,
    pub quantities: Vec<Vec<ListingRow>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub mode: ListMode,
    pub count: usize,
    pub tags: Vec<String>,
    pub cards: Vec<ListingCard>,
    pub warnings: Vec<String>,
}

pub fn build_listing(records: &[Value], mode: ListMode) -> Listing {
    let mut listing = Listing {
        mode,
        count: records.len(),
        tags: Vec::new(),
        cards: Vec::new(),
        warnings: Vec::new(),
    };

    if mode == ListMode::TagsOnly {
        listing.tags = records
            .iter()
            .map(|r| informed_text(r, "identificacao").unwrap_or_else(|| "n/i".to_string()))
            .collect();
        return listing;
    }

    for (i, record) in records.iter().enumerate() {
        match build_card(i, record, mode) {
            Ok(card) => listing.cards.push(card),
            Err(reason) => listing.warnings.push(format!("Instrumento {}: {}", i + 1, reason)),
        }
    }

    listing
}

fn build_card(index: usize, record: &Value, mode: ListMode) -> Result<ListingCard, String> {
    if !record.is_object() {
        return Err("registro inválido".to_string());
    }

    let fields = match mode {
        ListMode::Quick => QUICK_FIELDS,
        _ => FULL_FIELDS,
    };

    let quantities = if mode == ListMode::Full {
        match record.get("grandezas") {
            Some(Value::Array(items)) => items.iter().map(|g| rows(g, QUANTITY_FIELDS)).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err("grandezas não é uma lista".to_string()),
        }
    } else {
        Vec::new()
    };

    Ok(ListingCard {
        title: source_title(index, record),
        missing_date: !record.get("data_calibracao").map(is_informed).unwrap_or(false),
        rows: rows(record, fields),
        quantities,
    })
}

fn rows(record: &Value, fields: &[(&'static str, &str)]) -> Vec<ListingRow> {
    fields
        .iter()
        .filter_map(|&(label, key)| {
            informed_text(record, key).map(|value| ListingRow { label, value })
        })
        .collect()
}

/// `arquivo_origem` のファイル名（拡張子.pdfなし）。無ければ "Instrumento n"
fn source_title(index: usize, record: &Value) -> String {
    let source = match record.get("arquivo_origem") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Array(items)) => items.first().and_then(Value::as_str),
        _ => None,
    };

    source
        .map(|s| s.rsplit(['/', '\\']).next().unwrap_or(s).replace(".pdf", ""))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("Instrumento {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_from_command() {
        assert_eq!(ListMode::from_command("mostre apenas as TAGs"), ListMode::TagsOnly);
        assert_eq!(ListMode::from_command("só o código"), ListMode::TagsOnly);
        assert_eq!(ListMode::from_command("listar instrumentos"), ListMode::Quick);
        assert_eq!(ListMode::from_command("tags"), ListMode::Full);
        assert_eq!(ListMode::from_command(""), ListMode::Full);
    }

    #[test]
    fn test_tags_only() {
        let listing = build_listing(&[json!({"identificacao": "A1"}), json!({"identificacao": "n/i"})], ListMode::TagsOnly);
        assert_eq!(listing.tags, vec!["A1", "n/i"]);
        assert!(listing.cards.is_empty());
    }

    #[test]
    fn test_quick_skips_not_informed() {
        let listing = build_listing(
            &[json!({"identificacao": "A1", "nome": "n/i", "modelo": "X", "data_calibracao": "2024-09-11"})],
            ListMode::Quick,
        );
        let card = &listing.cards[0];
        let labels: Vec<&str> = card.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["TAG", "Modelo", "Data Calib."]);
        assert!(!card.missing_date);
    }

    #[test]
    fn test_full_with_quantities() {
        let listing = build_listing(
            &[json!({
                "arquivo_origem": "C:\\certs\\032369-2024.pdf",
                "numero_serie": "SN1",
                "grandezas": [{"faixa_nominal": "0-150", "unidade": "mm", "resolucao": "n/i"}]
            })],
            ListMode::Full,
        );
        let card = &listing.cards[0];
        assert_eq!(card.title, "032369-2024");
        assert!(card.missing_date);
        assert_eq!(card.rows, vec![ListingRow { label: "Nº Série", value: "SN1".to_string() }]);
        assert_eq!(card.quantities.len(), 1);
        assert_eq!(card.quantities[0].len(), 2);
    }

    #[test]
    fn test_source_title_from_list_and_fallback() {
        let listing = build_listing(
            &[json!({"arquivo_origem": ["/tmp/a.pdf", "/tmp/b.pdf"]}), json!({"arquivo_origem": []})],
            ListMode::Quick,
        );
        assert_eq!(listing.cards[0].title, "a");
        assert_eq!(listing.cards[1].title, "Instrumento 2");
    }

    #[test]
    fn test_malformed_records_become_warnings() {
        let listing = build_listing(
            &[json!({"identificacao": "A"}), json!(3), json!({"grandezas": "x"})],
            ListMode::Full,
        );
        assert_eq!(listing.cards.len(), 1);
        assert_eq!(
            listing.warnings,
            vec![
                "Instrumento 2: registro inválido".to_string(),
                "Instrumento 3: grandezas não é uma lista".to_string(),
            ]
        );
        assert_eq!(listing.count, 3);
    }
}
