//! ホストページに埋め込まれたPDFの検出ルール
//!
//! ローダーは `iframe` / `embed` / `object` の src(data) と type を集めて渡すだけ。

use regex::Regex;

/// 検出候補（DOM要素1つ分）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfCandidate {
    pub src: String,
    pub mime_type: String,
}

impl PdfCandidate {
    pub fn new(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        let src = self.src.as_str();
        let is_pdf_mime = self.mime_type == "application/pdf";
        if is_pdf_mime {
            return true;
        }
        if src.is_empty() {
            return false;
        }

        let path = src.split('?').next().unwrap_or(src).to_lowercase();
        path.ends_with(".pdf") || src.contains("visualizar-pdf")
    }
}

lazy_static::lazy_static! {
    static ref APPROVAL_PATH_RE: Regex = Regex::new(r"/calibracoes/(\d+)/aprovar").unwrap();
}

/// 承認画面のパスからPDF表示URLを推定
pub fn infer_from_location(origin: &str, path: &str) -> Option<String> {
    let caps = APPROVAL_PATH_RE.captures(path)?;
    let id = caps.get(1)?.as_str();
    Some(format!(
        "{}/calibracoes/visualizar-pdf/{}",
        origin.trim_end_matches('/'),
        id
    ))
}

/// 候補の先頭一致、無ければURL推定
pub fn detect_pdf_url(candidates: &[PdfCandidate], origin: &str, path: &str) -> Option<String> {
    candidates
        .iter()
        .find(|c| c.is_pdf())
        .map(|c| c.src.clone())
        .or_else(|| infer_from_location(origin, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_extension_with_query() {
        assert!(PdfCandidate::new("https://host/files/Cert.PDF?token=1", "").is_pdf());
        assert!(!PdfCandidate::new("https://host/files/cert.pdf.html", "").is_pdf());
    }

    #[test]
    fn test_is_pdf_mime_and_blob() {
        assert!(PdfCandidate::new("", "application/pdf").is_pdf());
        assert!(PdfCandidate::new("blob:https://host/1234", "application/pdf").is_pdf());
        assert!(!PdfCandidate::new("blob:https://host/1234", "").is_pdf());
    }

    #[test]
    fn test_is_pdf_visualizer_route() {
        assert!(PdfCandidate::new("https://host/calibracoes/visualizar-pdf/9", "").is_pdf());
        assert!(!PdfCandidate::new("https://host/calibracoes/9", "text/html").is_pdf());
    }

    #[test]
    fn test_infer_from_location() {
        assert_eq!(
            infer_from_location("https://gocal.example", "/calibracoes/321/aprovar"),
            Some("https://gocal.example/calibracoes/visualizar-pdf/321".to_string())
        );
        assert_eq!(infer_from_location("https://gocal.example", "/calibracoes/321"), None);
    }

    #[test]
    fn test_detect_prefers_first_candidate() {
        let candidates = vec![
            PdfCandidate::new("https://host/ads.html", "text/html"),
            PdfCandidate::new("https://host/a.pdf", ""),
            PdfCandidate::new("https://host/b.pdf", ""),
        ];
        assert_eq!(
            detect_pdf_url(&candidates, "https://host", "/calibracoes/1/aprovar"),
            Some("https://host/a.pdf".to_string())
        );
    }

    #[test]
    fn test_detect_falls_back_to_location() {
        assert_eq!(
            detect_pdf_url(&[], "https://host", "/calibracoes/7/aprovar"),
            Some("https://host/calibracoes/visualizar-pdf/7".to_string())
        );
        assert_eq!(detect_pdf_url(&[], "https://host", "/dashboard"), None);
    }
}
