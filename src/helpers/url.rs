//! URL helper functions

use percent_encoding::percent_decode_str;

/// Normalize a page path for comparison: trailing slashes removed,
/// `index.html` dropped, empty becomes `/`
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let path = path
        .strip_suffix("index.html")
        .unwrap_or(path)
        .trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Path component of an `href`, resolved against the site origin.
///
/// Returns `None` for links to other origins and non-http schemes.
pub fn href_path(href: &str, site_url: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with('#') || href.is_empty() {
        return None;
    }

    let path = if let Some(rest) = href
        .strip_prefix("http://")
        .or_else(|| href.strip_prefix("https://"))
    {
        let origin = site_url
            .trim_start_matches("http://")
            .trim_start_matches("https://")
            .trim_end_matches('/');
        let (host, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
        let site_host = origin.split('/').next().unwrap_or(origin);
        if !host.eq_ignore_ascii_case(site_host) {
            return None;
        }
        path.to_string()
    } else if href.contains(':') && !href.starts_with('/') {
        // mailto:, tel:, javascript: ...
        return None;
    } else {
        href.to_string()
    };

    let decoded = percent_decode_str(&path).decode_utf8_lossy().to_string();
    Some(normalize_path(&decoded))
}

/// Allow only http(s), mailto, relative and fragment URLs; anything else
/// (e.g. `javascript:`) becomes `#`
pub fn safe_url(url: &str) -> &str {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let scheme = lower.split(['/', '?', '#']).next().unwrap_or("");
    if !scheme.contains(':')
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
    {
        trimmed
    } else {
        "#"
    }
}
