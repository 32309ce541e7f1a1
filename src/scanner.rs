//! アップロード対象PDFの収集

use crate::error::{ChatCliError, Result};
use metron_common::files::is_pdf_file_name;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_pdf(path: &Path) -> bool {
    path.file_name()
        .map(|name| is_pdf_file_name(&name.to_string_lossy()))
        .unwrap_or(false)
}

/// フォルダ直下のPDF（名前順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(ChatCliError::FolderNotFound(folder.display().to_string()));
    }

    let mut pdfs: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_pdf(path))
        .collect();

    pdfs.sort();
    Ok(pdfs)
}

/// 引数のファイル・フォルダからPDFを集める
///
/// ファイルを直接指定した場合はPDFでなければエラー。
/// 同じファイルは一度だけ（指定順を保つ）。
pub fn collect_pdfs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();

    for input in inputs {
        if input.is_dir() {
            pdfs.extend(scan_folder(input)?);
        } else if input.is_file() {
            if !is_pdf(input) {
                return Err(ChatCliError::NotPdf(input.display().to_string()));
            }
            pdfs.push(input.clone());
        } else {
            return Err(ChatCliError::FileNotFound(input.display().to_string()));
        }
    }

    // 最初に現れた位置を残す
    let mut seen = HashSet::new();
    pdfs.retain(|path| seen.insert(path.clone()));
    Ok(pdfs)
}
