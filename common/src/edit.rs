//! 編集パスと値の書き戻し
//!
//! 各入力欄はドット区切りのパス（例: `0.grandezas.1.unidade`）を持ち、
//! 変更時にこのパスで結果データの該当箇所を書き換える。

use crate::error::{Error, Result};
use crate::fields::{field_hint, FieldHint};
use serde_json::{Number, Value};
use std::fmt;

/// 配列ルートの前に付くことがある古いルート名
const LEGACY_ROOT: &str = "instrumentos";

/// キー/インデックスの列
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(encoded: &str) -> Self {
        Self(
            encoded
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn child(&self, segment: impl fmt::Display) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// 入力文字列の型変換
///
/// - "true" / "false" / "null" → 真偽値 / null
/// - "" → 空文字
/// - 数値として解釈でき、同じ文字列に戻るもの → 数値（"42" は数値、"007" は文字列）
/// - それ以外 → 文字列
pub fn coerce_input(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        "" => Value::String(String::new()),
        _ => canonical_number(trimmed).unwrap_or_else(|| Value::String(raw.to_string())),
    }
}

/// ヒント付き変換。Text ヒントなら常に文字列のまま
pub fn coerce_with_hint(raw: &str, hint: FieldHint) -> Value {
    match hint {
        FieldHint::Auto => coerce_input(raw),
        FieldHint::Text => Value::String(raw.to_string()),
    }
}

fn canonical_number(text: &str) -> Option<Value> {
    let n: f64 = text.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    // -0 は "0" に正規化されるため一致しない
    if n == 0.0 && text.starts_with('-') {
        return None;
    }
    // この範囲外は指数表記（"1e-7", "1e+21"）になり、入力と一致しない
    let magnitude = n.abs();
    if magnitude != 0.0 && !(1.0e-6..1.0e21).contains(&magnitude) {
        return None;
    }
    if n.to_string() != text {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Some(Value::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number)
}

/// パスの値を読む
pub fn value_at<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in normalized_segments(root, path) {
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get(segment.as_str())?,
            _ => return None,
        };
    }
    Some(current)
}

fn normalized_segments<'p>(root: &Value, path: &'p FieldPath) -> &'p [String] {
    let segments = path.segments();
    match segments.first() {
        Some(first) if first == LEGACY_ROOT && root.is_array() => &segments[1..],
        _ => segments,
    }
}

/// 編集を適用し、格納した値を返す
///
/// 途中のパスが存在しない場合は何も変更せずエラーを返す。
pub fn apply_edit(root: &mut Value, path: &FieldPath, raw: &str) -> Result<Value> {
    let encoded = path.to_string();
    let segments = normalized_segments(root, path).to_vec();

    let Some((target, parents)) = segments.split_last() else {
        return Err(Error::EditPath {
            path: encoded,
            segment: String::new(),
        });
    };

    let invalid = |segment: &str| Error::EditPath {
        path: encoded.clone(),
        segment: segment.to_string(),
    };

    let mut current = &mut *root;
    for segment in parents {
        current = match current {
            Value::Array(items) => {
                let index: usize = segment.parse().map_err(|_| invalid(segment))?;
                items.get_mut(index).ok_or_else(|| invalid(segment))?
            }
            Value::Object(map) => map.get_mut(segment.as_str()).ok_or_else(|| invalid(segment))?,
            _ => return Err(invalid(segment)),
        };
    }

    let value = coerce_with_hint(raw, field_hint(target));

    match current {
        Value::Array(items) => {
            let index: usize = target.parse().map_err(|_| invalid(target))?;
            let slot = items.get_mut(index).ok_or_else(|| invalid(target))?;
            *slot = value.clone();
        }
        Value::Object(map) => {
            map.insert(target.clone(), value.clone());
        }
        _ => return Err(invalid(target)),
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =============================================
    // 型変換
    // =============================================

    #[test]
    fn test_coerce_literals() {
        assert_eq!(coerce_input("true"), json!(true));
        assert_eq!(coerce_input(" false "), json!(false));
        assert_eq!(coerce_input("null"), json!(null));
        assert_eq!(coerce_input("   "), json!(""));
    }

    #[test]
    fn test_coerce_numbers_round_trip_only() {
        assert_eq!(coerce_input("42"), json!(42));
        assert_eq!(coerce_input("-3"), json!(-3));
        assert_eq!(coerce_input("0.5"), json!(0.5));
        assert_eq!(coerce_input("007"), json!("007"));
        assert_eq!(coerce_input("1.0"), json!("1.0"));
        assert_eq!(coerce_input("1e3"), json!("1e3"));
        assert_eq!(coerce_input("-0"), json!("-0"));
        assert_eq!(coerce_input("NaN"), json!("NaN"));
        assert_eq!(coerce_input("inf"), json!("inf"));
    }

    #[test]
    fn test_coerce_numbers_outside_plain_notation_stay_text() {
        assert_eq!(coerce_input("0.0000001"), json!("0.0000001"), "1e-7 は文字列のまま");
        assert_eq!(
            coerce_input("1000000000000000000000"),
            json!("1000000000000000000000"),
            "1e21 は文字列のまま"
        );
        assert_eq!(coerce_input("0.000001"), json!(0.000001));
        assert_eq!(coerce_input("0"), json!(0));
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_input("abc"), json!("abc"));
        assert_eq!(coerce_input("0-150 mm"), json!("0-150 mm"));
    }

    #[test]
    fn test_coerce_with_text_hint() {
        assert_eq!(coerce_with_hint("123", FieldHint::Text), json!("123"));
        assert_eq!(coerce_with_hint("true", FieldHint::Text), json!("true"));
    }

    // =============================================
    // パス
    // =============================================

    #[test]
    fn test_field_path_parse_and_display() {
        let path = FieldPath::parse("0.grandezas..1.unidade");
        assert_eq!(path.segments(), &["0", "grandezas", "1", "unidade"]);
        assert_eq!(path.to_string(), "0.grandezas.1.unidade");
        assert_eq!(path.last(), Some("unidade"));
        assert_eq!(FieldPath::root().child(0).child("nome").to_string(), "0.nome");
    }

    // =============================================
    // 書き戻し
    // =============================================

    #[test]
    fn test_apply_edit_round_trip() {
        let mut data = json!([{"identificacao": "TAG1", "resolucao": "0.01", "ativo": false}]);

        let cases = [("0.resolucao", "42", json!(42)), ("0.ativo", "true", json!(true)), ("0.resolucao", "abc", json!("abc"))];
        for (path, raw, expected) in cases {
            let path = FieldPath::parse(path);
            let stored = apply_edit(&mut data, &path, raw).unwrap();
            assert_eq!(stored, expected);
            assert_eq!(value_at(&data, &path), Some(&expected));
        }
    }

    #[test]
    fn test_apply_edit_nested_array() {
        let mut data = json!([{"grandezas": [{"unidade": "mm"}, {"unidade": "kg"}]}]);
        apply_edit(&mut data, &FieldPath::parse("0.grandezas.1.unidade"), "g").unwrap();
        assert_eq!(data[0]["grandezas"][1]["unidade"], json!("g"));
    }

    #[test]
    fn test_apply_edit_array_leaf() {
        let mut data = json!([{"arquivo_origem": ["a.pdf", "b.pdf"]}]);
        apply_edit(&mut data, &FieldPath::parse("0.arquivo_origem.1"), "c.pdf").unwrap();
        assert_eq!(data[0]["arquivo_origem"], json!(["a.pdf", "c.pdf"]));
    }

    #[test]
    fn test_apply_edit_strips_legacy_root() {
        let mut data = json!([{"nome": "Paquímetro"}]);
        apply_edit(&mut data, &FieldPath::parse("instrumentos.0.nome"), "Micrômetro").unwrap();
        assert_eq!(data[0]["nome"], json!("Micrômetro"));
    }

    #[test]
    fn test_apply_edit_identifier_stays_text() {
        let mut data = json!([{"numero_serie": "A1"}]);
        apply_edit(&mut data, &FieldPath::parse("0.numero_serie"), "123").unwrap();
        assert_eq!(data[0]["numero_serie"], json!("123"));
    }

    #[test]
    fn test_apply_edit_missing_segment_no_mutation() {
        let mut data = json!([{"grandezas": [{"unidade": "mm"}]}]);
        let before = data.clone();

        let err = apply_edit(&mut data, &FieldPath::parse("0.grandezas.3.unidade"), "g").unwrap_err();
        assert!(matches!(err, Error::EditPath { ref segment, .. } if segment == "3"));

        assert!(apply_edit(&mut data, &FieldPath::parse("5.nome"), "x").is_err());
        assert!(apply_edit(&mut data, &FieldPath::parse("0.inexistente.nome"), "x").is_err());
        assert!(apply_edit(&mut data, &FieldPath::parse(""), "x").is_err());
        assert_eq!(data, before);
    }

    #[test]
    fn test_value_at_missing() {
        let data = json!([{"nome": "x"}]);
        assert_eq!(value_at(&data, &FieldPath::parse("0.modelo")), None);
        assert_eq!(value_at(&data, &FieldPath::parse("x.nome")), None);
    }
}
