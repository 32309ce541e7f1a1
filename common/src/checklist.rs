//! チェックリスト自動入力
//!
//! バックエンドが返す `{ "1": true, "2": false }` をホストページの
//! `input[name="checklist[1]"]` へ反映する計画を立てる。実際のDOM操作はローダー側。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 小さな整数キー → 真偽値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChecklistPayload(BTreeMap<u32, bool>);

/// 1件分の書き込み
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxWrite {
    pub selector: String,
    pub checked: bool,
}

impl ChecklistPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: u32, checked: bool) {
        self.0.insert(key, checked);
    }

    pub fn get(&self, key: u32) -> Option<bool> {
        self.0.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// JSONオブジェクトから生成。値は bool のほか "true"/"1"/"sim" なども許容
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::Malformed("checklist must be an object".to_string()))?;

        let mut payload = Self::new();
        for (key, raw) in map {
            let index: u32 = key
                .trim()
                .parse()
                .map_err(|_| Error::Malformed(format!("checklist key '{}' is not a number", key)))?;
            let checked = get_bool(raw)
                .ok_or_else(|| Error::Malformed(format!("checklist[{}] is not a boolean", key)))?;
            payload.insert(index, checked);
        }
        Ok(payload)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.to_string(), Value::Bool(*v)))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for ChecklistPayload {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn get_bool(value: &Value) -> Option<bool> {
    if let Some(b) = value.as_bool() {
        return Some(b);
    }
    if let Some(n) = value.as_i64() {
        return Some(n != 0);
    }
    if let Some(s) = value.as_str() {
        return match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "sim" => Some(true),
            "false" | "0" | "no" | "nao" | "não" => Some(false),
            _ => None,
        };
    }
    None
}

lazy_static::lazy_static! {
    static ref CALIBRATION_PAGE_RE: Regex = Regex::new(r"calibracao|edit|create").unwrap();
}

/// 校正編集画面のURLか（自動入力はこのページでのみ行う）
pub fn is_calibration_page(url: &str) -> bool {
    CALIBRATION_PAGE_RE.is_match(url)
}

/// `input[name="checklist[<key>]"]`
pub fn checkbox_selector(key: u32) -> String {
    format!("input[name=\"checklist[{}]\"]", key)
}

/// 書き込み計画。校正ページ以外では None（何も変更しない）
pub fn plan_fill(page_url: &str, payload: &ChecklistPayload) -> Option<Vec<CheckboxWrite>> {
    if !is_calibration_page(page_url) {
        return None;
    }

    Some(
        payload
            .iter()
            .map(|(key, checked)| CheckboxWrite {
                selector: checkbox_selector(key),
                checked,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_booleans() {
        let payload = ChecklistPayload::from_value(&json!({"1": true, "2": false})).unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get(1), Some(true));
        assert_eq!(payload.get(2), Some(false));
    }

    #[test]
    fn test_from_value_lenient_values() {
        let payload = ChecklistPayload::from_value(&json!({"3": "sim", "4": 0, "5": "false"})).unwrap();
        assert_eq!(payload.get(3), Some(true));
        assert_eq!(payload.get(4), Some(false));
        assert_eq!(payload.get(5), Some(false));
    }

    #[test]
    fn test_from_value_rejects_bad_keys() {
        assert!(ChecklistPayload::from_value(&json!({"abc": true})).is_err());
        assert!(ChecklistPayload::from_value(&json!({"1": "talvez"})).is_err());
        assert!(ChecklistPayload::from_value(&json!([true, false])).is_err());
    }

    #[test]
    fn test_to_value() {
        let mut payload = ChecklistPayload::new();
        payload.insert(2, false);
        payload.insert(1, true);
        assert_eq!(payload.to_value(), json!({"1": true, "2": false}));
    }

    #[test]
    fn test_is_calibration_page() {
        assert!(is_calibration_page("https://gocal.example/calibracoes/12/edit"));
        assert!(is_calibration_page("https://gocal.example/calibracao/nova"));
        assert!(is_calibration_page("https://gocal.example/instrumentos/create"));
        assert!(!is_calibration_page("https://gocal.example/dashboard"));
    }

    #[test]
    fn test_plan_fill_on_calibration_page() {
        let payload = ChecklistPayload::from_value(&json!({"1": true, "2": false})).unwrap();
        let plan = plan_fill("https://gocal.example/calibracoes/12/edit", &payload).unwrap();

        assert_eq!(
            plan,
            vec![
                CheckboxWrite { selector: "input[name=\"checklist[1]\"]".to_string(), checked: true },
                CheckboxWrite { selector: "input[name=\"checklist[2]\"]".to_string(), checked: false },
            ]
        );
    }

    #[test]
    fn test_plan_fill_elsewhere_is_noop() {
        let payload = ChecklistPayload::from_value(&json!({"1": true, "2": false})).unwrap();
        assert!(plan_fill("https://gocal.example/relatorios", &payload).is_none());
    }
}
