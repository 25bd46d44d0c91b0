//! Placeholder cards shown while live data loads

use crate::content::ContentKind;

/// Viewport breakpoints (exclusive upper bound, card count), narrowest first
const BREAKPOINTS: [(u32, usize); 4] = [(480, 4), (768, 6), (1024, 8), (1440, 12)];

/// Card count for viewports at least as wide as the last breakpoint
const WIDE_COUNT: usize = 16;

/// How many skeleton cards fill a viewport of this width
pub fn skeleton_count(viewport_width: u32) -> usize {
    BREAKPOINTS
        .iter()
        .find(|(limit, _)| viewport_width < *limit)
        .map(|(_, count)| *count)
        .unwrap_or(WIDE_COUNT)
}

/// Markup for `count` skeleton cards of the given kind
pub fn skeleton_markup(kind: ContentKind, count: usize) -> String {
    let card = match kind {
        ContentKind::Projects => {
            r#"<div class="skeleton-card project-skeleton" aria-hidden="true"><div class="skeleton-line skeleton-title"></div><div class="skeleton-line"></div><div class="skeleton-line short"></div><div class="skeleton-tags"></div></div>"#
        }
        ContentKind::Certificates => {
            r#"<div class="skeleton-card cert-skeleton" aria-hidden="true"><div class="skeleton-thumb"></div><div class="skeleton-line skeleton-title"></div><div class="skeleton-line short"></div></div>"#
        }
    };

    let mut html = String::with_capacity(card.len() * count + 64);
    html.push_str(r#"<div class="skeleton-grid" aria-busy="true">"#);
    for _ in 0..count {
        html.push_str(card);
    }
    html.push_str("</div>");
    html
}
