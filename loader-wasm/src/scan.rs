//! ページ内PDFの検出（DOM走査部分）

use metron_common::pdf_detect::{detect_pdf_url, PdfCandidate};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlEmbedElement, HtmlIFrameElement, HtmlObjectElement, Window};

const CANDIDATE_SELECTOR: &str = "iframe, embed, object";

/// 要素1つ分の候補。src は解決済みの絶対URL
fn candidate(element: &Element) -> Option<PdfCandidate> {
    if element.id() == crate::frame::IFRAME_ID {
        return None;
    }

    if let Some(iframe) = element.dyn_ref::<HtmlIFrameElement>() {
        let mime = element.get_attribute("type").unwrap_or_default();
        return Some(PdfCandidate::new(iframe.src(), mime));
    }
    if let Some(embed) = element.dyn_ref::<HtmlEmbedElement>() {
        return Some(PdfCandidate::new(embed.src(), embed.type_()));
    }
    if let Some(object) = element.dyn_ref::<HtmlObjectElement>() {
        return Some(PdfCandidate::new(object.data(), object.type_()));
    }
    None
}

pub fn collect_candidates(document: &Document) -> Vec<PdfCandidate> {
    let Ok(nodes) = document.query_selector_all(CANDIDATE_SELECTOR) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|el| candidate(&el))
        .collect()
}

/// ページに表示中のPDFのURL
pub fn find_pdf_url(window: &Window, document: &Document) -> Option<String> {
    let location = window.location();
    let origin = location.origin().unwrap_or_default();
    let path = location.pathname().unwrap_or_default();
    detect_pdf_url(&collect_candidates(document), &origin, &path)
}
