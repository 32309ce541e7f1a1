//! 計器レコードのフィールド定義
//!
//! 表示順の優先リスト、"n/i"（未記入）の判定、識別子系フィールドの型ヒント。

use serde_json::{Map, Value};

/// 先頭に並べるフィールド（この順）
pub const TOP_FIELDS: &[&str] = &[
    "arquivo_origem",
    "identificacao",
    "nome",
    "fabricante",
    "modelo",
    "numero_serie",
    "descricao",
    "data_calibracao",
    "validade",
    "periodicidade",
    "departamento",
    "responsavel",
];

/// 末尾に並べるフィールド（この順）
pub const BOTTOM_FIELDS: &[&str] = &[
    "grandezas",
    "padroes_utilizados",
    "observacoes",
    "detalhes_calibracao",
    "outros_dados",
];

/// 未記入を表す値
pub const NOT_INFORMED: &str = "n/i";

/// 文字列として扱う識別子系フィールド
const IDENTIFIER_FIELDS: &[&str] = &[
    "identificacao",
    "numero_serie",
    "numero_certificado",
    "codigo",
    "tag",
];

/// 入力値の型変換ヒント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHint {
    /// true/false/null/数値へ変換する
    Auto,
    /// 常に文字列
    Text,
}

pub fn field_hint(key: &str) -> FieldHint {
    if IDENTIFIER_FIELDS.contains(&key) {
        FieldHint::Text
    } else {
        FieldHint::Auto
    }
}

fn rank(key: &str) -> (u8, usize) {
    if let Some(i) = TOP_FIELDS.iter().position(|f| *f == key) {
        return (0, i);
    }
    if let Some(i) = BOTTOM_FIELDS.iter().position(|f| *f == key) {
        return (2, i);
    }
    (1, 0)
}

/// 優先順位で並べ替えたエントリ（リスト外のキーは元の順序を保つ）
pub fn ordered_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by_key(|(k, _)| rank(k));
    entries
}

/// 表示する価値のある値か（null・空文字・"n/i" は未記入扱い）
pub fn is_informed(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && !s.eq_ignore_ascii_case(NOT_INFORMED)
        }
        _ => true,
    }
}

/// 未記入でなければ表示文字列を返す
pub fn informed_text(record: &Value, key: &str) -> Option<String> {
    let value = record.get(key)?;
    if !is_informed(value) {
        return None;
    }
    Some(display_text(value))
}

/// スカラー値の表示文字列（文字列は引用符なし、null は "null"）
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(value: &Value) -> Vec<String> {
        ordered_entries(value.as_object().unwrap())
            .into_iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    #[test]
    fn test_ordered_entries_top_middle_bottom() {
        let record = json!({
            "observacoes": "x",
            "status": "Aprovado",
            "modelo": "M1",
            "grandezas": [],
            "tipo_familia": "Paquímetro",
            "identificacao": "TAG1",
        });

        assert_eq!(
            keys(&record),
            vec!["identificacao", "modelo", "status", "tipo_familia", "grandezas", "observacoes"]
        );
    }

    #[test]
    fn test_ordered_entries_keeps_unlisted_order() {
        let record = json!({"zeta": 1, "alpha": 2, "mid": 3});
        assert_eq!(keys(&record), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_ordered_entries_partition_property() {
        let record = json!({
            "outros_dados": {}, "c": 1, "nome": "n", "padroes_utilizados": [],
            "b": 2, "arquivo_origem": "a.pdf", "a": 3, "responsavel": "r",
        });
        let ranks: Vec<u8> = keys(&record).iter().map(|k| rank(k).0).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_is_informed() {
        assert!(!is_informed(&json!(null)));
        assert!(!is_informed(&json!("")));
        assert!(!is_informed(&json!("n/i")));
        assert!(!is_informed(&json!(" N/I ")));
        assert!(is_informed(&json!("TAG1")));
        assert!(is_informed(&json!(0)));
    }

    #[test]
    fn test_informed_text() {
        let record = json!({"nome": "Paquímetro", "modelo": "n/i", "resolucao": 0.01});
        assert_eq!(informed_text(&record, "nome"), Some("Paquímetro".to_string()));
        assert_eq!(informed_text(&record, "modelo"), None);
        assert_eq!(informed_text(&record, "fabricante"), None);
        assert_eq!(informed_text(&record, "resolucao"), Some("0.01".to_string()));
    }

    #[test]
    fn test_field_hint() {
        assert_eq!(field_hint("numero_serie"), FieldHint::Text);
        assert_eq!(field_hint("resolucao"), FieldHint::Auto);
    }
}
