//! Grouping items into category sections

use indexmap::IndexMap;

use crate::content::{Item, OTHER_CATEGORY};

/// Heading used for the catch-all bucket
const OTHER_NAME: &str = "Other";

/// One category's items, in their original order
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub key: String,
    pub name: String,
    pub items: Vec<&'a Item>,
}

/// Group items by category.
///
/// Sections follow the order of `categories` (key -> display name), with
/// `other` last. Items whose category is missing or not in the table go to
/// `other`. Empty categories are omitted, and every item lands in exactly
/// one section.
pub fn group_by_category<'a>(
    items: &'a [Item],
    categories: &IndexMap<String, String>,
) -> Vec<Section<'a>> {
    let mut buckets: IndexMap<&str, Vec<&'a Item>> = categories
        .keys()
        .filter(|k| k.as_str() != OTHER_CATEGORY)
        .map(|k| (k.as_str(), Vec::new()))
        .collect();
    let mut other = Vec::new();

    for item in items {
        let key = item.category_key();
        match buckets.get_mut(key.as_str()) {
            Some(bucket) => bucket.push(item),
            None => other.push(item),
        }
    }

    let mut sections: Vec<Section<'a>> = buckets
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(key, items)| Section {
            key: key.to_string(),
            name: categories
                .get(key)
                .cloned()
                .unwrap_or_else(|| key.to_string()),
            items,
        })
        .collect();

    if !other.is_empty() {
        sections.push(Section {
            key: OTHER_CATEGORY.to_string(),
            name: categories
                .get(OTHER_CATEGORY)
                .cloned()
                .unwrap_or_else(|| OTHER_NAME.to_string()),
            items: other,
        });
    }

    sections
}
