//! Navigation menu and footer behaviors

use crate::document::{get_attribute, has_class, set_class, Document};
use crate::helpers::{href_path, normalize_path};

/// Class marking an open mobile menu
const OPEN_CLASS: &str = "open";
/// Class marking the link to the current page
const ACTIVE_CLASS: &str = "active";

/// Open or close the nav menu. Returns the new open state, or `None`
/// when the page has no such element.
pub fn toggle_nav(doc: &mut Document, nav_id: &str) -> Option<bool> {
    let open = !doc
        .find(nav_id)
        .map(|span| has_class(&doc.html()[span.open], OPEN_CLASS))?;
    doc.update_open_tag(nav_id, |tag| set_class(tag, OPEN_CLASS, open));
    Some(open)
}

/// Mark every nav link pointing at `page_path` as active.
///
/// Returns the number of links marked.
pub fn mark_active_links(doc: &mut Document, nav_id: &str, page_path: &str, site_url: &str) -> usize {
    let current = normalize_path(page_path);
    doc.rewrite_tags_within(nav_id, "a", |tag| {
        let href = get_attribute(tag, "href")?;
        let path = href_path(&href, site_url)?;
        (path == current && !has_class(tag, ACTIVE_CLASS)).then(|| set_class(tag, ACTIVE_CLASS, true))
    })
}

/// Fill the footer year mount
pub fn set_footer_year(doc: &mut Document, id: &str, year: i32) -> bool {
    doc.set_text(id, &year.to_string())
}
