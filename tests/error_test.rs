//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use metron_chat::backend::UploadSpec;
use metron_chat::error::ChatCliError;
use metron_chat::{records, scanner};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(ChatCliError::FolderNotFound(_))));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.expect("スキャン失敗").is_empty());
}

/// PDF以外は対象外、拡張子の大文字小文字は区別しない
#[test]
fn test_scan_folder_pdfs_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("b.PDF"), b"%PDF-1.4").unwrap();
    std::fs::write(dir.path().join("a.pdf"), b"%PDF-1.4").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("c.pdf"), b"%PDF-1.4").unwrap();

    let pdfs = scanner::scan_folder(dir.path()).unwrap();
    let names: Vec<String> = pdfs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.pdf", "b.PDF"], "直下のPDFのみ名前順");
}

/// ファイル直接指定でPDF以外はエラー
#[test]
fn test_collect_rejects_non_pdf_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "hello").unwrap();

    let result = scanner::collect_pdfs(&[txt]);
    assert!(matches!(result, Err(ChatCliError::NotPdf(_))));
}

/// 存在しないパスはエラー
#[test]
fn test_collect_missing_file() {
    let result = scanner::collect_pdfs(&[PathBuf::from("/nonexistent/cert.pdf")]);
    assert!(matches!(result, Err(ChatCliError::FileNotFound(_))));
}

/// ファイルとフォルダの混在
#[test]
fn test_collect_mixed_inputs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let single = dir.path().join("single.pdf");
    std::fs::write(&single, b"%PDF-1.4").unwrap();
    let folder = dir.path().join("lote");
    std::fs::create_dir(&folder).unwrap();
    std::fs::write(folder.join("x.pdf"), b"%PDF-1.4").unwrap();

    let pdfs = scanner::collect_pdfs(&[single.clone(), folder]).unwrap();
    assert_eq!(pdfs.len(), 2);
    assert_eq!(pdfs[0], single);
}

/// 直接指定したファイルとそのフォルダが重なる場合
#[test]
fn test_collect_file_and_its_folder_once() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    std::fs::write(&a, b"%PDF-1.4").unwrap();
    std::fs::write(&b, b"%PDF-1.4").unwrap();

    let pdfs = scanner::collect_pdfs(&[b.clone(), dir.path().to_path_buf()]).unwrap();
    assert_eq!(pdfs, vec![b, a], "重複は除き、最初の指定順を保つ");
}

/// 読めないファイルは通信エラーではなく読み込みエラー
#[tokio::test]
async fn test_upload_load_unreadable_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("apagado.pdf");

    let result = UploadSpec::load(&[missing], None, None).await;
    match result {
        Err(ChatCliError::FileRead { path, .. }) => assert!(path.ends_with("apagado.pdf")),
        other => panic!("FileRead になるべき: {:?}", other.map(|u| u.files.len())),
    }
}

/// 読み込んだファイルは名前と中身を保持
#[tokio::test]
async fn test_upload_load_reads_bytes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pdf = dir.path().join("cert.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();

    let upload = UploadSpec::load(&[pdf], Some("extrair".into()), None).await.unwrap();
    assert_eq!(upload.files.len(), 1);
    assert_eq!(upload.files[0].name, "cert.pdf");
    assert_eq!(upload.files[0].bytes, b"%PDF-1.4".to_vec());
    assert_eq!(upload.command.as_deref(), Some("extrair"));
}

/// 結果ファイル: 空配列・スカラーは不正
#[test]
fn test_load_records_invalid() {
    let dir = tempdir().expect("Failed to create temp dir");
    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, "[]").unwrap();
    let scalar = dir.path().join("scalar.json");
    std::fs::write(&scalar, "42").unwrap();

    assert!(matches!(records::load_records(&empty), Err(ChatCliError::InvalidResults(_))));
    assert!(matches!(records::load_records(&scalar), Err(ChatCliError::InvalidResults(_))));
    assert!(matches!(
        records::load_records(&dir.path().join("missing.json")),
        Err(ChatCliError::FileNotFound(_))
    ));
}

/// 結果ファイル: 単一オブジェクトは1件、キー順は保持
#[test]
fn test_load_records_single_object_keeps_key_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("one.json");
    std::fs::write(&path, r#"{"nome":"Paquímetro","identificacao":"TAG1"}"#).unwrap();

    let loaded = records::load_records(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    let keys: Vec<&String> = loaded[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["nome", "identificacao"]);

    let out = dir.path().join("out").join("saved.json");
    records::save_records(&out, &loaded).unwrap();
    assert_eq!(records::load_records(&out).unwrap(), loaded);
}

/// ChatCliErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ChatCliError::Config("テスト設定エラー".to_string()),
        ChatCliError::FileNotFound("cert.pdf".to_string()),
        ChatCliError::FolderNotFound("/path/to/folder".to_string()),
        ChatCliError::NoPdfsFound("フォルダ".to_string()),
        ChatCliError::InvalidUserId("abc".to_string()),
        ChatCliError::Backend(metron_common::Error::HttpStatus(500)),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空");
    }
}
