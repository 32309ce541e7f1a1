//! 編集ツリーの表示モデル
//!
//! 任意のJSON値を、折りたたみノードと入力欄（葉）のツリーに変換する。
//! 描画側（Leptos）はこのモデルを辿るだけで、順序やパスの計算をしない。

use crate::edit::FieldPath;
use crate::fields::{display_text, ordered_entries};
use serde_json::Value;

/// 入力欄の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Text,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Number => "number",
            InputKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf {
        key: String,
        path: FieldPath,
        display: String,
        kind: InputKind,
    },
    List {
        key: String,
        path: FieldPath,
        children: Vec<TreeNode>,
    },
    Map {
        key: String,
        path: FieldPath,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    /// `parent` の下に `key` として置かれた `value` のノード
    pub fn build(value: &Value, key: &str, parent: &FieldPath) -> Self {
        let path = if key.is_empty() { parent.clone() } else { parent.child(key) };

        match value {
            Value::Array(items) => TreeNode::List {
                key: key.to_string(),
                children: items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| TreeNode::build(item, &i.to_string(), &path))
                    .collect(),
                path,
            },
            Value::Object(map) => TreeNode::Map {
                key: key.to_string(),
                children: ordered_entries(map)
                    .into_iter()
                    .map(|(k, v)| TreeNode::build(v, k, &path))
                    .collect(),
                path,
            },
            scalar => TreeNode::Leaf {
                key: key.to_string(),
                display: display_text(scalar),
                kind: if scalar.is_number() { InputKind::Number } else { InputKind::Text },
                path,
            },
        }
    }

    pub fn key(&self) -> &str {
        match self {
            TreeNode::Leaf { key, .. } | TreeNode::List { key, .. } | TreeNode::Map { key, .. } => key,
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            TreeNode::Leaf { path, .. } | TreeNode::List { path, .. } | TreeNode::Map { path, .. } => path,
        }
    }

    /// 折りたたみ見出し（例: `[ 3 items ]`, `{ }`）
    pub fn summary(&self) -> String {
        match self {
            TreeNode::List { children, .. } => format!("[ {} items ]", children.len()),
            TreeNode::Map { .. } => "{ }".to_string(),
            TreeNode::Leaf { display, .. } => display.clone(),
        }
    }
}

/// 計器1件分のカード
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentCard {
    pub index: usize,
    pub title: String,
    pub subtitle: String,
    pub icon: &'static str,
    pub fields: Vec<TreeNode>,
}

impl InstrumentCard {
    /// レコードがオブジェクトでなければ Err（警告として集める）
    pub fn build(index: usize, record: &Value) -> Result<Self, String> {
        let map = record
            .as_object()
            .ok_or_else(|| format!("Instrumento {}: registro inválido", index + 1))?;

        let title = non_empty_str(record, "identificacao")
            .or_else(|| non_empty_str(record, "nome"))
            .unwrap_or_else(|| format!("Instrumento #{}", index + 1));

        let subtitle = match record.get("arquivo_origem") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        };

        let is_caliper = record
            .get("nome")
            .and_then(Value::as_str)
            .map(|n| n.to_lowercase().contains("paquimetro"))
            .unwrap_or(false);

        let root = FieldPath::root().child(index);
        let fields = ordered_entries(map)
            .into_iter()
            .map(|(k, v)| TreeNode::build(v, k, &root))
            .collect();

        Ok(Self {
            index,
            title,
            subtitle,
            icon: if is_caliper { "📏" } else { "🔬" },
            fields,
        })
    }
}

fn non_empty_str(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// 全レコードのカードと、描画できなかったレコードの警告
pub fn instrument_cards(records: &[Value]) -> (Vec<InstrumentCard>, Vec<String>) {
    let mut cards = Vec::new();
    let mut warnings = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match InstrumentCard::build(i, record) {
            Ok(card) => cards.push(card),
            Err(warning) => warnings.push(warning),
        }
    }

    (cards, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_leaf_kinds() {
        let node = TreeNode::build(&json!(0.02), "resolucao", &FieldPath::parse("0"));
        assert_eq!(
            node,
            TreeNode::Leaf {
                key: "resolucao".to_string(),
                path: FieldPath::parse("0.resolucao"),
                display: "0.02".to_string(),
                kind: InputKind::Number,
            }
        );

        let node = TreeNode::build(&json!(null), "modelo", &FieldPath::parse("0"));
        assert_eq!(node.summary(), "null");
        assert!(matches!(node, TreeNode::Leaf { kind: InputKind::Text, .. }));
    }

    #[test]
    fn test_build_list_paths() {
        let value = json!([{"unidade": "mm"}, {"unidade": "kg"}]);
        let node = TreeNode::build(&value, "grandezas", &FieldPath::parse("0"));

        assert_eq!(node.summary(), "[ 2 items ]");
        let TreeNode::List { children, .. } = &node else {
            panic!("リストではない");
        };
        let TreeNode::Map { children: inner, .. } = &children[1] else {
            panic!("オブジェクトではない");
        };
        assert_eq!(inner[0].path().to_string(), "0.grandezas.1.unidade");
    }

    #[test]
    fn test_map_children_ordered() {
        let value = json!({"outros_dados": "x", "faixa": "0-150", "identificacao": "T"});
        let TreeNode::Map { children, .. } = TreeNode::build(&value, "", &FieldPath::root()) else {
            panic!("オブジェクトではない");
        };
        let keys: Vec<&str> = children.iter().map(TreeNode::key).collect();
        assert_eq!(keys, vec!["identificacao", "faixa", "outros_dados"]);
    }

    #[test]
    fn test_instrument_card_title_fallbacks() {
        let card = InstrumentCard::build(0, &json!({"identificacao": "TAG1", "nome": "Paquimetro digital"})).unwrap();
        assert_eq!(card.title, "TAG1");
        assert_eq!(card.icon, "📏");

        let card = InstrumentCard::build(1, &json!({"nome": "Balança"})).unwrap();
        assert_eq!(card.title, "Balança");
        assert_eq!(card.icon, "🔬");

        let card = InstrumentCard::build(2, &json!({"identificacao": ""})).unwrap();
        assert_eq!(card.title, "Instrumento #3");
    }

    #[test]
    fn test_instrument_card_subtitle_from_list() {
        let card = InstrumentCard::build(0, &json!({"arquivo_origem": ["a.pdf", "b.pdf"]})).unwrap();
        assert_eq!(card.subtitle, "a.pdf, b.pdf");
    }

    #[test]
    fn test_instrument_cards_collect_warnings() {
        let records = vec![json!({"identificacao": "A"}), json!("lixo"), json!({"identificacao": "C"})];
        let (cards, warnings) = instrument_cards(&records);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].index, 2);
        assert_eq!(warnings, vec!["Instrumento 2: registro inválido".to_string()]);
    }

    #[test]
    fn test_card_field_paths_rooted_at_index() {
        let card = InstrumentCard::build(4, &json!({"nome": "x", "grandezas": [{"unidade": "mm"}]})).unwrap();
        assert_eq!(card.fields[0].path().to_string(), "4.nome");
        assert_eq!(card.fields.len(), 2);
        assert_eq!(card.fields[1].path().to_string(), "4.grandezas");
        assert_eq!(card.fields[1].summary(), "[ 1 items ]");
    }
}
