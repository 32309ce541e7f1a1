//! 抽出結果JSONファイルの読み書き

use crate::error::{ChatCliError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// 配列、または単一オブジェクトを1件として読む
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(ChatCliError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Array(records) if !records.is_empty() => Ok(records),
        Value::Object(record) => Ok(vec![Value::Object(record)]),
        _ => Err(ChatCliError::InvalidResults(path.display().to_string())),
    }
}

pub fn save_records(path: &Path, records: &[Value]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// `instrumentos_<日時>.<ext>`
pub fn timestamped_path(ext: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("instrumentos_{}.{}", stamp, ext))
}
