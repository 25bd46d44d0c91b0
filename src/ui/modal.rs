//! Certificate image viewer

use crate::document::{get_attribute, has_class, set_attribute, set_class, Document};
use crate::helpers::safe_url;

/// Attribute on a certificate card's View button carrying the image URL
pub const CERT_VIEW_ATTR: &str = "data-cert-view";

const OPEN_CLASS: &str = "open";
const NO_SCROLL_CLASS: &str = "no-scroll";

/// Image URLs offered by View buttons inside the element with this id
pub fn cert_view_sources(doc: &Document, container_id: &str) -> Vec<String> {
    doc.open_tags_within(container_id)
        .iter()
        .filter_map(|tag| get_attribute(tag, CERT_VIEW_ATTR))
        .filter(|src| !src.trim().is_empty())
        .collect()
}

/// Whether the modal is currently shown
pub fn is_modal_open(doc: &Document, modal_id: &str) -> bool {
    doc.find(modal_id)
        .map(|span| has_class(&doc.html()[span.open], OPEN_CLASS))
        .unwrap_or(false)
}

/// Show `src` in the modal.
///
/// Does nothing and returns false when the modal or its image element is
/// missing, or `src` is blank.
pub fn open_cert_modal(doc: &mut Document, modal_id: &str, image_id: &str, src: &str) -> bool {
    let src = src.trim();
    if src.is_empty() || !doc.contains(modal_id) || !doc.contains(image_id) {
        return false;
    }
    set_modal_state(doc, modal_id, image_id, safe_url(src), true);
    true
}

/// Hide the modal and clear its image. Returns false when it is missing.
pub fn close_cert_modal(doc: &mut Document, modal_id: &str, image_id: &str) -> bool {
    if !doc.contains(modal_id) || !doc.contains(image_id) {
        return false;
    }
    set_modal_state(doc, modal_id, image_id, "", false);
    true
}

fn set_modal_state(doc: &mut Document, modal_id: &str, image_id: &str, src: &str, open: bool) {
    doc.update_open_tag(image_id, |tag| set_attribute(tag, "src", src));
    doc.update_open_tag(modal_id, |tag| {
        let tag = set_class(tag, OPEN_CLASS, open);
        set_attribute(&tag, "aria-hidden", if open { "false" } else { "true" })
    });
    if let Some(body) = doc.tag_attribute("body", "class").or_else(|| open.then(String::new)) {
        let mut classes: Vec<&str> = body.split_whitespace().filter(|c| *c != NO_SCROLL_CLASS).collect();
        if open {
            classes.push(NO_SCROLL_CLASS);
        }
        doc.set_tag_attribute("body", "class", &classes.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body class="page"><div id="certGrid"><button class="btn" data-cert-view="/img/a.png">View</button><button data-cert-view="">View</button></div><div id="certModal" class="modal" aria-hidden="true"><img id="certImg" src="" alt=""></div></body></html>"#;

    #[test]
    fn test_open_and_close() {
        let mut doc = Document::new(PAGE);
        let sources = cert_view_sources(&doc, "certGrid");
        assert_eq!(sources, vec!["/img/a.png"]);

        assert!(open_cert_modal(&mut doc, "certModal", "certImg", &sources[0]));
        assert!(is_modal_open(&doc, "certModal"));
        let html = doc.html();
        assert!(html.contains(r#"<img id="certImg" src="/img/a.png" alt="">"#));
        assert!(html.contains(r#"<div id="certModal" class="modal open" aria-hidden="false">"#));
        assert!(html.contains(r#"<body class="page no-scroll">"#));

        assert!(close_cert_modal(&mut doc, "certModal", "certImg"));
        assert!(!is_modal_open(&doc, "certModal"));
        assert_eq!(doc.html(), PAGE);
    }

    #[test]
    fn test_unsafe_source_neutralized() {
        let mut doc = Document::new(PAGE);
        assert!(open_cert_modal(&mut doc, "certModal", "certImg", "javascript:alert(1)"));
        assert!(doc.html().contains(r##"<img id="certImg" src="#" alt="">"##));
    }

    #[test]
    fn test_missing_modal_is_noop() {
        let page = r#"<html><body><img id="certImg" src=""></body></html>"#;
        let mut doc = Document::new(page);
        assert!(!open_cert_modal(&mut doc, "certModal", "certImg", "/img/a.png"));
        assert!(!close_cert_modal(&mut doc, "certModal", "certImg"));
        assert_eq!(doc.html(), page);

        let mut doc = Document::new(PAGE);
        assert!(!open_cert_modal(&mut doc, "certModal", "certImg", "  "));
        assert_eq!(doc.html(), PAGE);
    }
}
