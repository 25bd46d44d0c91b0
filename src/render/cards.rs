//! Card and section markup
//!
//! Every interpolated value goes through [`html_escape`]; URLs additionally
//! pass through [`safe_url`].

use crate::content::{field, ContentKind, Item};
use crate::helpers::{display_date, html_escape, safe_url};

use super::group::Section;

/// Markup for one project card
pub fn project_card(item: &Item) -> String {
    let title = html_escape(item.title_or(ContentKind::Projects.untitled()));
    let description = html_escape(field(&item.description));

    let link = item
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    let (href, target) = match link {
        Some(url) => (
            html_escape(safe_url(url)),
            r#" target="_blank" rel="noopener""#,
        ),
        None => ("#".to_string(), ""),
    };

    let thumb = item
        .image
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .map(|img| {
            format!(
                r#"<img class="project-thumb" src="{}" alt="{}" loading="lazy">"#,
                html_escape(safe_url(img)),
                title
            )
        })
        .unwrap_or_default();

    let tags: String = item
        .tech
        .iter()
        .map(|t| format!(r#"<span class="tag">{}</span>"#, html_escape(t)))
        .collect();

    format!(
        r#"<a class="project-card" href="{href}"{target}>{thumb}<h3>{title}</h3><p>{description}</p><div class="tags">{tags}</div></a>"#
    )
}

/// Markup for one certificate card
pub fn certificate_card(item: &Item) -> String {
    let title = html_escape(item.title_or(ContentKind::Certificates.untitled()));
    let image = item
        .image
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(|i| html_escape(safe_url(i)));

    let thumb = image
        .as_ref()
        .map(|src| {
            format!(
                r#"<div class="cert-thumb"><img src="{}" alt="{}" loading="lazy"></div>"#,
                src, title
            )
        })
        .unwrap_or_default();

    let mut meta = html_escape(field(&item.issuer));
    if let Some(date) = item.date.as_deref().filter(|d| !d.trim().is_empty()) {
        if !meta.is_empty() {
            meta.push_str(" · ");
        }
        meta.push_str(&html_escape(&display_date(date)));
    }

    let mut actions = String::new();
    if let Some(verify) = item.verify_url.as_deref().filter(|v| !v.trim().is_empty()) {
        actions.push_str(&format!(
            r#"<a class="btn verify" href="{}" target="_blank" rel="noopener">Verify</a>"#,
            html_escape(safe_url(verify))
        ));
    }
    if let Some(src) = &image {
        actions.push_str(&format!(
            r#"<button class="btn ghost view" data-cert-view="{}">View</button>"#,
            src
        ));
    }

    format!(
        r#"<article class="cert-card">{thumb}<div class="cert-body"><h3>{title}</h3><div class="cert-meta">{meta}</div><div class="cert-actions">{actions}</div></div></article>"#
    )
}

/// Markup for one card of the given kind
pub fn card(kind: ContentKind, item: &Item) -> String {
    match kind {
        ContentKind::Projects => project_card(item),
        ContentKind::Certificates => certificate_card(item),
    }
}

/// Markup for all sections: a heading and a grid of cards per category
pub fn render_sections(kind: ContentKind, sections: &[Section<'_>]) -> String {
    let grid_class = match kind {
        ContentKind::Projects => "project-grid",
        ContentKind::Certificates => "cert-grid",
    };

    let mut html = String::new();
    for section in sections {
        let cards: String = section.items.iter().map(|item| card(kind, item)).collect();
        html.push_str(&format!(
            r#"<section class="category-section" id="{kind}-{slug}" data-category="{key}"><h2 class="category-title">{name}</h2><div class="{grid_class}">{cards}</div></section>"#,
            kind = kind.name(),
            slug = html_escape(&slug::slugify(&section.key)),
            key = html_escape(&section.key),
            name = html_escape(&section.name),
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::group::group_by_category;
    use indexmap::IndexMap;

    #[test]
    fn test_project_card_escapes_everything() {
        let item = Item {
            title: Some("<script>alert('x')</script>".to_string()),
            description: Some("a & b".to_string()),
            url: Some(r#"https://x.dev/?a="b""#.to_string()),
            tech: vec!["<b>".to_string()],
            ..Default::default()
        };
        let html = project_card(&item);
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains(r#"href="https://x.dev/?a=&quot;b&quot;""#));
        assert!(html.contains(r#"<span class="tag">&lt;b&gt;</span>"#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_project_card_without_url() {
        let html = project_card(&Item::default());
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("target="));
        assert!(html.contains("<h3>Untitled Project</h3>"));
    }

    #[test]
    fn test_javascript_url_neutralized() {
        let item = Item {
            url: Some("javascript:alert(1)".to_string()),
            ..Item::new("A")
        };
        assert!(project_card(&item).contains(r##"href="#""##));
    }

    #[test]
    fn test_certificate_card() {
        let item = Item {
            issuer: Some("Coursera".to_string()),
            date: Some("2024-03-15".to_string()),
            image: Some("/img/c.png".to_string()),
            ..Item::new("Deep Learning")
        };
        let html = certificate_card(&item);
        assert!(html.contains(r#"<div class="cert-meta">Coursera · Mar 2024</div>"#));
        assert!(html.contains(r#"data-cert-view="/img/c.png""#));
        assert!(!html.contains("Verify"));

        let verified = Item {
            verify_url: Some("https://verify.test/1".to_string()),
            ..Item::new("X")
        };
        let html = certificate_card(&verified);
        assert!(html.contains("Verify"));
        assert!(!html.contains("cert-thumb"));
        assert!(!html.contains("data-cert-view"));
    }

    #[test]
    fn test_two_sections_in_declared_order() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[{"title":"A","category":"ml"},{"title":"B","category":"web"}]"#,
        )
        .unwrap();
        let table: IndexMap<String, String> = [("ml", "ML"), ("web", "Web")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let html = render_sections(ContentKind::Projects, &group_by_category(&items, &table));

        assert_eq!(html.matches("<section").count(), 2);
        assert_eq!(html.matches("project-card").count(), 2);
        let ml = html.find(r#"data-category="ml""#).unwrap();
        let web = html.find(r#"data-category="web""#).unwrap();
        assert!(ml < web);
        let a = html.find("<h3>A</h3>").unwrap();
        let b = html.find("<h3>B</h3>").unwrap();
        assert!(ml < a && a < web && web < b);
    }
}
