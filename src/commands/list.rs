//! List site content

use anyhow::Result;

use crate::api::ApiClient;
use crate::content::loader::ContentLoader;
use crate::content::{normalize, ContentKind, Item};
use crate::render::group_by_category;
use crate::Folio;

/// List content by type, from static data or (with `live`) from the API
pub async fn run(folio: &Folio, content_type: &str, live: bool) -> Result<()> {
    match content_type {
        "category" | "categories" => {
            println!("Categories (in display order):");
            for category in &folio.config.categories {
                println!("  {} - {}", category.key, category.name);
            }
            println!("  other - Other");
        }
        other => {
            let kind: ContentKind = other.parse().map_err(|_| {
                anyhow::anyhow!(
                    "Unknown type: {}. Available: projects, certificates, categories",
                    other
                )
            })?;
            let items = load(folio, kind, live).await?;
            print!("{}", format_listing(folio, kind, &items));
        }
    }

    Ok(())
}

async fn load(folio: &Folio, kind: ContentKind, live: bool) -> Result<Vec<Item>> {
    if !live {
        return Ok(ContentLoader::new(folio).load(kind)?.unwrap_or_default());
    }

    let Some(base) = folio.config.api.base_url() else {
        anyhow::bail!("Live listing needs api.base in _config.yml");
    };
    let client = ApiClient::new(&folio.config.api)?;
    let value = client.get_json_from(&kind.endpoints(&base)).await?;
    Ok(normalize(value))
}

/// Items grouped the way they are rendered
fn format_listing(folio: &Folio, kind: ContentKind, items: &[Item]) -> String {
    let mut out = format!("{} ({}):\n", capitalize(kind.name()), items.len());
    let table = folio.config.category_table();
    for section in group_by_category(items, &table) {
        out.push_str(&format!("  [{}]\n", section.name));
        for item in section.items {
            let title = item.title_or(kind.untitled());
            match item.url.as_deref().or(item.verify_url.as_deref()) {
                Some(url) => out.push_str(&format!("    {} <{}>\n", title, url)),
                None => out.push_str(&format!("    {}\n", title)),
            }
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
