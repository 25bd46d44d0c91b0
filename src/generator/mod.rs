//! Generator module - bakes rendered content into the site's HTML pages

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::api::ApiClient;
use crate::config::resolve_api_base;
use crate::content::loader::ContentLoader;
use crate::content::{ContentKind, Item};
use crate::document::Document;
use crate::helpers::current_year;
use crate::render::{ContentRenderer, Page, RenderConfig, RenderOutcome, Source};
use crate::ui::{apply_theme, mark_active_links, mark_swipe_neighbors, set_footer_year, Theme};
use crate::Folio;

/// Attribute on `<html>` or `<body>` overriding the API base for one page
pub const API_BASE_ATTR: &str = "data-api-base";

/// What happened to one mount point during generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountReport {
    pub kind: ContentKind,
    pub outcome: RenderOutcome,
    /// Static data was rendered after the live render produced nothing
    pub used_static: bool,
}

/// Result of rendering one page
#[derive(Debug, Clone, Default)]
pub struct PageReport {
    pub path: String,
    pub mounts: Vec<MountReport>,
}

/// Summary of a full generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<PageReport>,
    pub assets: usize,
}

impl GenerateReport {
    /// Mounts filled from the live API
    pub fn live_count(&self) -> usize {
        self.mounts()
            .filter(|m| m.outcome.is_populated() && !m.used_static)
            .count()
    }

    /// Mounts filled from static data
    pub fn static_count(&self) -> usize {
        self.mounts().filter(|m| m.used_static).count()
    }

    fn mounts(&self) -> impl Iterator<Item = &MountReport> {
        self.pages.iter().flat_map(|p| p.mounts.iter())
    }
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    renderer: ContentRenderer,
    statics: HashMap<ContentKind, Vec<Item>>,
}

impl Generator {
    /// Create a new generator, loading the static fallback lists
    pub fn new(folio: &Folio) -> Result<Self> {
        let client = ApiClient::new(&folio.config.api)?;
        let renderer = ContentRenderer::new(RenderConfig::from_site(&folio.config), client);

        let loader = ContentLoader::new(folio);
        let mut statics = HashMap::new();
        for kind in ContentKind::ALL {
            if let Some(items) = loader.load(kind)? {
                statics.insert(kind, items);
            }
        }

        Ok(Self {
            folio: folio.clone(),
            renderer,
            statics,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateReport> {
        let source_dir = &self.folio.source_dir;
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)?;

        let mut report = GenerateReport::default();
        if !source_dir.exists() {
            tracing::warn!("Source directory {:?} does not exist", source_dir);
            return Ok(report);
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;

            // Skip special directories such as _data
            let hidden = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str())
                .map(|first| first.starts_with('_'))
                .unwrap_or(false);
            if hidden {
                continue;
            }

            let dest = public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            if is_html_file(path) {
                let html = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                let page_path = page_path(relative);
                let (rendered, page_report) = self.render_page(&html, &page_path).await;
                fs::write(&dest, rendered)?;
                tracing::debug!("Generated {}", page_path);
                report.pages.push(page_report);
            } else {
                fs::copy(path, &dest)?;
                report.assets += 1;
            }
        }

        Ok(report)
    }

    /// Render one page's markup
    pub async fn render_page(&self, html: &str, page_path: &str) -> (String, PageReport) {
        let config = &self.folio.config;
        let mut doc = Document::new(html);

        let base = match page_api_base(&doc) {
            Some(attr) => resolve_api_base(Some(&attr)),
            None => config.api.base_url(),
        };

        if doc.tag_attribute("html", "data-theme").is_none() {
            let theme = config.theme.default.parse().unwrap_or(Theme::Dark);
            apply_theme(&mut doc, theme);
        }
        set_footer_year(&mut doc, &config.mounts.year, current_year());
        mark_active_links(&mut doc, &config.mounts.nav, page_path, &config.url);
        mark_swipe_neighbors(&mut doc, &config.nav, page_path);

        let page = Page::new(doc);
        let (projects, certificates) = tokio::join!(
            self.render_mount(&page, ContentKind::Projects, &config.mounts.projects, base.clone()),
            self.render_mount(
                &page,
                ContentKind::Certificates,
                &config.mounts.certificates,
                base.clone()
            ),
        );

        let mounts = [projects, certificates].into_iter().flatten().collect();
        let report = PageReport {
            path: page_path.to_string(),
            mounts,
        };
        (page.html(), report)
    }

    /// Live render one mount, then fall back to static data or the
    /// original markup if it produced nothing. A disabled API only falls
    /// back for mounts left empty in the source page.
    async fn render_mount(
        &self,
        page: &Page,
        kind: ContentKind,
        target: &str,
        base: Option<String>,
    ) -> Option<MountReport> {
        let original = page.inner_html(target)?;
        let outcome = self
            .renderer
            .render(page, target, kind, Source::Remote(base))
            .await;

        // With the API off, hand-written markup passes through untouched
        let needs_fallback = match outcome {
            RenderOutcome::Disabled => original.trim().is_empty(),
            RenderOutcome::Empty | RenderOutcome::Failed(_) => true,
            _ => false,
        };
        if !needs_fallback {
            return Some(MountReport {
                kind,
                outcome,
                used_static: false,
            });
        }

        if let Some(items) = self.statics.get(&kind).filter(|items| !items.is_empty()) {
            let fallback = self
                .renderer
                .render(page, target, kind, Source::Static(items.clone()))
                .await;
            tracing::info!("Rendered static {} into #{}", kind, target);
            return Some(MountReport {
                kind,
                outcome: fallback,
                used_static: true,
            });
        }

        // Never leave a loading skeleton in a generated page
        if page.inner_html(target).as_deref() != Some(original.as_str()) {
            if let Some(generation) = page.begin(target) {
                page.commit(&generation, &original);
            }
        }

        Some(MountReport {
            kind,
            outcome,
            used_static: false,
        })
    }
}

/// API base override declared on the page itself
fn page_api_base(doc: &Document) -> Option<String> {
    doc.tag_attribute("html", API_BASE_ATTR)
        .or_else(|| doc.tag_attribute("body", API_BASE_ATTR))
}

/// URL path of a page from its path relative to the source directory
pub fn page_path(relative: &Path) -> String {
    let joined = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/");
    if joined == "index.html" {
        "/".to_string()
    } else if let Some(dir) = joined.strip_suffix("/index.html") {
        format!("/{}/", dir)
    } else {
        format!("/{}", joined)
    }
}

fn is_html_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    )
}
