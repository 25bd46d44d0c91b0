//! Opening-tag attribute helpers

use lazy_static::lazy_static;
use regex::Regex;

use crate::helpers::html_escape;

lazy_static! {
    static ref ATTR_RE: Regex = Regex::new(
        r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
    )
    .unwrap();
}

/// An attribute found in an opening tag, with the byte span it occupies
struct AttrMatch {
    name: String,
    value: Option<String>,
    start: usize,
    end: usize,
}

/// Iterate the attributes of an opening tag such as `<a class="x" href='/'>`
fn attributes(open: &str) -> Vec<AttrMatch> {
    // Skip `<tagname`
    let name_end = open
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_whitespace() || *c == '>' || *c == '/')
        .map(|(i, _)| i)
        .unwrap_or(open.len());

    ATTR_RE
        .captures_iter(&open[name_end..])
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|m| m.as_str().to_string());
            Some(AttrMatch {
                name: cap[1].to_ascii_lowercase(),
                value,
                start: name_end + whole.start(),
                end: name_end + whole.end(),
            })
        })
        .collect()
}

/// Read an attribute value from an opening tag.
///
/// Boolean attributes (no value) read as an empty string.
pub fn get_attribute(open: &str, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    attributes(open)
        .into_iter()
        .find(|a| a.name == name)
        .map(|a| a.value.unwrap_or_default())
}

/// Return the opening tag with `name` set to `value` (escaped)
pub fn set_attribute(open: &str, name: &str, value: &str) -> String {
    let rendered = format!(r#"{}="{}""#, name, html_escape(value));
    let lower = name.to_ascii_lowercase();

    if let Some(existing) = attributes(open).into_iter().find(|a| a.name == lower) {
        return format!("{}{}{}", &open[..existing.start], rendered, &open[existing.end..]);
    }

    let insert_at = if open.ends_with("/>") {
        open.len() - 2
    } else {
        open.len().saturating_sub(1)
    };
    let before = open[..insert_at].trim_end();
    format!("{} {}{}", before, rendered, &open[insert_at..])
}

/// Whether the tag's `class` attribute contains `class`
pub fn has_class(open: &str, class: &str) -> bool {
    get_attribute(open, "class")
        .map(|c| c.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Add or remove one class on an opening tag
pub fn set_class(open: &str, class: &str, enabled: bool) -> String {
    let current = get_attribute(open, "class").unwrap_or_default();
    let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    if enabled {
        classes.push(class);
    }
    set_attribute(open, "class", &classes.join(" "))
}
