//! Fetch-or-fallback content renderer

use indexmap::IndexMap;
use std::time::Duration;

use super::cards::render_sections;
use super::group::group_by_category;
use super::skeleton::{skeleton_count, skeleton_markup};
use super::target::{Generation, Page};
use crate::api::ApiClient;
use crate::config::SiteConfig;
use crate::content::{normalize, ContentKind, Item};

/// Renderer settings, built once from the site config
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Category key -> display name, in section order
    pub categories: IndexMap<String, String>,
    pub viewport_width: u32,
    pub skeleton: bool,
    pub preload_images: bool,
    pub preload_timeout: Duration,
}

impl RenderConfig {
    pub fn from_site(config: &SiteConfig) -> Self {
        Self {
            categories: config.category_table(),
            viewport_width: config.api.viewport_width,
            skeleton: config.api.skeleton,
            preload_images: config.api.preload_images,
            preload_timeout: Duration::from_millis(config.api.preload_timeout_ms),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_site(&SiteConfig::default())
    }
}

/// Where a render call gets its items
#[derive(Debug, Clone)]
pub enum Source {
    /// Fetch from `{base}/api/{kind}/`. `None` means live fetching is off.
    Remote(Option<String>),
    /// An in-memory list
    Static(Vec<Item>),
}

/// How a render call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The page has no such mount point
    NoTarget,
    /// No API base configured; markup untouched
    Disabled,
    /// Sections written
    Populated { sections: usize, items: usize },
    /// Source had nothing to show; prior content kept
    Empty,
    /// Fetch failed; prior content kept
    Failed(String),
    /// A newer render of the same target started first; result discarded
    Superseded,
}

impl RenderOutcome {
    /// True when the target now shows freshly rendered items
    pub fn is_populated(&self) -> bool {
        matches!(self, RenderOutcome::Populated { .. })
    }
}

/// Renders project and certificate lists into page mount points
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    config: RenderConfig,
    client: ApiClient,
}

impl ContentRenderer {
    pub fn new(config: RenderConfig, client: ApiClient) -> Self {
        Self { config, client }
    }

    /// Render `source` into the `target` mount of `page`.
    ///
    /// The target's markup is either left exactly as it was or replaced
    /// completely; the skeleton is the only intermediate state.
    pub async fn render(
        &self,
        page: &Page,
        target: &str,
        kind: ContentKind,
        source: Source,
    ) -> RenderOutcome {
        if !page.contains(target) {
            tracing::debug!("No #{} on page, skipping {}", target, kind);
            return RenderOutcome::NoTarget;
        }

        match source {
            Source::Remote(None) => {
                tracing::debug!("API disabled, keeping static #{}", target);
                RenderOutcome::Disabled
            }
            Source::Remote(Some(base)) => self.render_remote(page, target, kind, &base).await,
            Source::Static(items) => {
                let Some(generation) = page.begin(target) else {
                    return RenderOutcome::NoTarget;
                };
                self.commit_items(page, &generation, kind, &items)
            }
        }
    }

    async fn render_remote(
        &self,
        page: &Page,
        target: &str,
        kind: ContentKind,
        base: &str,
    ) -> RenderOutcome {
        let Some(generation) = page.begin(target) else {
            return RenderOutcome::NoTarget;
        };

        if self.config.skeleton {
            let count = skeleton_count(self.config.viewport_width);
            page.commit(&generation, &skeleton_markup(kind, count));
        }

        let value = match self.client.get_json_from(&kind.endpoints(base)).await {
            Ok(value) => value,
            Err(e) => {
                if !page.is_current(&generation) {
                    return RenderOutcome::Superseded;
                }
                tracing::warn!("{} API failed, keeping fallback: {}", kind, e);
                return RenderOutcome::Failed(e.to_string());
            }
        };

        let items = normalize(value);
        if !page.is_current(&generation) {
            tracing::debug!("Discarding superseded {} response for #{}", kind, target);
            return RenderOutcome::Superseded;
        }
        if items.is_empty() {
            tracing::info!("{} API returned nothing, keeping fallback", kind);
            return RenderOutcome::Empty;
        }

        if kind == ContentKind::Certificates && self.config.preload_images {
            let images: Vec<String> = items
                .iter()
                .filter_map(|i| i.image.as_deref())
                .map(|img| resolve_against(base, img))
                .collect();
            self.client
                .preload_images(&images, self.config.preload_timeout)
                .await;
        }

        self.commit_items(page, &generation, kind, &items)
    }

    fn commit_items(
        &self,
        page: &Page,
        generation: &Generation,
        kind: ContentKind,
        items: &[Item],
    ) -> RenderOutcome {
        if items.is_empty() {
            return RenderOutcome::Empty;
        }

        let sections = group_by_category(items, &self.config.categories);
        let html = render_sections(kind, &sections);
        if !page.commit(generation, &html) {
            tracing::debug!("Discarding superseded {} render for #{}", kind, generation.target());
            return RenderOutcome::Superseded;
        }

        tracing::debug!(
            "Rendered {} {} in {} sections into #{}",
            items.len(),
            kind,
            sections.len(),
            generation.target()
        );
        RenderOutcome::Populated {
            sections: sections.len(),
            items: items.len(),
        }
    }
}

/// Resolve a possibly relative image path against the API base
fn resolve_against(base: &str, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
