//! HTML documents with id-addressed mount points
//!
//! A [`Document`] is a page's markup plus the ability to locate an element
//! by its `id` and replace everything between its opening and closing tags.
//! This is all a render target needs: content is overwritten wholesale,
//! never diffed, so there is no need for a full DOM.

mod tag;

pub use tag::{get_attribute, has_class, set_attribute, set_class};

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use crate::helpers::html_escape;

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

lazy_static! {
    static ref ANY_OPEN_TAG_RE: Regex = Regex::new(r"<[a-zA-Z][a-zA-Z0-9-]*\b[^>]*>").unwrap();
}

/// Location of an element inside the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    /// Lowercased tag name
    pub tag: String,
    /// Span of the opening tag
    pub open: Range<usize>,
    /// Span of the inner HTML
    pub inner: Range<usize>,
}

/// An HTML page that render calls write into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    html: String,
}

impl Document {
    /// Wrap existing markup
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The current markup
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume the document, returning its markup
    pub fn into_html(self) -> String {
        self.html
    }

    /// Locate the element whose `id` attribute equals `id`
    pub fn find(&self, id: &str) -> Option<ElementSpan> {
        let pattern = format!(
            r#"(?is)<([a-z][a-z0-9-]*)\b[^>]*?\sid\s*=\s*(?:"{id}"|'{id}')[^>]*>"#,
            id = regex::escape(id)
        );
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(&self.html)?;
        let whole = caps.get(0)?;
        let tag = caps[1].to_ascii_lowercase();
        let open = whole.start()..whole.end();

        if VOID_ELEMENTS.contains(&tag.as_str()) || whole.as_str().ends_with("/>") {
            return Some(ElementSpan {
                tag,
                open: open.clone(),
                inner: open.end..open.end,
            });
        }

        let close_start = self.matching_close(&tag, open.end)?;
        Some(ElementSpan {
            tag,
            inner: open.end..close_start,
            open,
        })
    }

    /// Find the start of the closing tag that balances an element opened
    /// just before `from`
    fn matching_close(&self, tag: &str, from: usize) -> Option<usize> {
        let re = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag))).ok()?;
        let mut depth = 1usize;

        for caps in re.captures_iter(&self.html[from..]) {
            let m = caps.get(0)?;
            if &caps[1] == "/" {
                depth -= 1;
                if depth == 0 {
                    return Some(from + m.start());
                }
            } else if !m.as_str().ends_with("/>") {
                depth += 1;
            }
        }

        tracing::debug!("Unclosed <{}> element", tag);
        None
    }

    /// Whether an element with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Inner HTML of the element with this id
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.find(id).map(|span| &self.html[span.inner])
    }

    /// Replace the inner HTML of an element. Returns false if it does not exist.
    pub fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.find(id) {
            Some(span) => {
                self.html.replace_range(span.inner, html);
                true
            }
            None => false,
        }
    }

    /// Replace the inner content of an element with escaped text
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.set_inner_html(id, &html_escape(text))
    }

    /// Rewrite the opening tag of the element with this id
    pub fn update_open_tag<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&str) -> String,
    {
        match self.find(id) {
            Some(span) => {
                let updated = f(&self.html[span.open.clone()]);
                self.html.replace_range(span.open, &updated);
                true
            }
            None => false,
        }
    }

    /// Span of the first opening tag with this name (e.g. `html`, `body`)
    fn first_tag(&self, name: &str) -> Option<Range<usize>> {
        let re = Regex::new(&format!(r"(?i)<{}\b[^>]*>", regex::escape(name))).ok()?;
        re.find(&self.html).map(|m| m.start()..m.end())
    }

    /// Read an attribute from the first tag with this name
    pub fn tag_attribute(&self, name: &str, attr: &str) -> Option<String> {
        let span = self.first_tag(name)?;
        get_attribute(&self.html[span], attr)
    }

    /// Set an attribute on the first tag with this name
    pub fn set_tag_attribute(&mut self, name: &str, attr: &str, value: &str) -> bool {
        match self.first_tag(name) {
            Some(span) => {
                let updated = set_attribute(&self.html[span.clone()], attr, value);
                self.html.replace_range(span, &updated);
                true
            }
            None => false,
        }
    }

    /// Rewrite every opening tag named `tag` inside the element with this id.
    ///
    /// `f` returns `Some(new_tag)` to replace a tag or `None` to keep it.
    /// Returns the number of tags rewritten.
    pub fn rewrite_tags_within<F>(&mut self, id: &str, tag: &str, mut f: F) -> usize
    where
        F: FnMut(&str) -> Option<String>,
    {
        let Some(span) = self.find(id) else {
            return 0;
        };
        let inner = &self.html[span.inner.clone()];

        let mut rewritten = String::with_capacity(inner.len());
        let mut last = 0;
        let mut count = 0;
        for m in ANY_OPEN_TAG_RE.find_iter(inner) {
            let name = tag_name(m.as_str());
            if !name.eq_ignore_ascii_case(tag) {
                continue;
            }
            if let Some(replacement) = f(m.as_str()) {
                rewritten.push_str(&inner[last..m.start()]);
                rewritten.push_str(&replacement);
                last = m.end();
                count += 1;
            }
        }
        rewritten.push_str(&inner[last..]);

        if count > 0 {
            self.html.replace_range(span.inner, &rewritten);
        }
        count
    }

    /// Every opening tag inside the element with this id
    pub fn open_tags_within(&self, id: &str) -> Vec<String> {
        let Some(span) = self.find(id) else {
            return Vec::new();
        };
        ANY_OPEN_TAG_RE
            .find_iter(&self.html[span.inner])
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Tag name of an opening tag string
fn tag_name(open: &str) -> &str {
    let rest = open.trim_start_matches('<');
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(rest.len());
    &rest[..end]
}
