//! Project and certificate records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bucket for items without a known category
pub const OTHER_CATEGORY: &str = "other";

/// A single project or certificate record.
///
/// Every field except `title` may be missing; missing fields render as empty.
/// Decoding is lenient: aliases resolve by precedence, scalars of any kind
/// read as text and values of the wrong shape read as absent. Only
/// non-object records are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Item {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub verify_url: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tech: Vec<String>,
    pub date: Option<String>,
    pub issuer: Option<String>,
}

impl TryFrom<Value> for Item {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from_object(&map)),
            other => Err(format!("expected an object, found {}", other)),
        }
    }
}

impl Item {
    /// Read an item from a JSON object
    pub fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            title: text_field(map, &["title"]),
            description: text_field(map, &["description"]),
            url: text_field(map, &["url", "link", "repo"]),
            verify_url: text_field(map, &["verify_url"]),
            image: text_field(map, &["image", "thumbnail"]),
            category: text_field(map, &["category"]),
            tech: ["tech", "tags", "tech_stack"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find(|v| !v.is_null())
                .map(tech_list)
                .unwrap_or_default(),
            date: text_field(map, &["date"]),
            issuer: text_field(map, &["issuer"]),
        }
    }

    /// Create an item with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the category (builder style)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The title, or `fallback` when the record has none
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => fallback,
        }
    }

    /// Lowercased category key, `other` when missing or blank
    pub fn category_key(&self) -> String {
        self.category
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| OTHER_CATEGORY.to_string())
    }
}

/// A scalar as text; arrays, objects and null read as absent
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The first key, in order, holding a scalar
fn text_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| map.get(*key)).find_map(scalar_text)
}

/// A list, or a comma separated string, as tech tags
fn tech_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(entries) => entries.iter().filter_map(scalar_text).collect(),
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

/// Borrow an optional field as `&str`, empty when absent
pub fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let item: Item = serde_json::from_str(r#"{"title":"A"}"#).unwrap();
        assert_eq!(item.title.as_deref(), Some("A"));
        assert!(item.tech.is_empty());
        assert_eq!(field(&item.description), "");
        assert_eq!(item.category_key(), "other");
    }

    #[test]
    fn test_aliases() {
        let item: Item =
            serde_json::from_str(r#"{"title":"A","tags":["rust","wasm"],"link":"https://x"}"#)
                .unwrap();
        assert_eq!(item.tech, vec!["rust", "wasm"]);
        assert_eq!(item.url.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_tech_as_string_or_null() {
        let item: Item =
            serde_json::from_str(r#"{"title":"A","tech":"Python, Django ,"}"#).unwrap();
        assert_eq!(item.tech, vec!["Python", "Django"]);
        let item: Item = serde_json::from_str(r#"{"title":"A","tech":null}"#).unwrap();
        assert!(item.tech.is_empty());
    }

    #[test]
    fn test_field_and_alias_together() {
        let item: Item = serde_json::from_str(
            r#"{"title":"A","repo":"https://r","url":"https://u","tags":["a"],"tech":["b"]}"#,
        )
        .unwrap();
        assert_eq!(item.url.as_deref(), Some("https://u"));
        assert_eq!(item.tech, vec!["b"]);

        let item: Item =
            serde_json::from_str(r#"{"title":"A","link":"https://l","repo":"https://r"}"#).unwrap();
        assert_eq!(item.url.as_deref(), Some("https://l"));
    }

    #[test]
    fn test_scalars_read_as_text() {
        let item: Item =
            serde_json::from_str(r#"{"title":"Cert","date":2024,"category":7,"issuer":true}"#)
                .unwrap();
        assert_eq!(item.date.as_deref(), Some("2024"));
        assert_eq!(item.category_key(), "7");
        assert_eq!(item.issuer.as_deref(), Some("true"));
    }

    #[test]
    fn test_wrong_shapes_read_as_absent() {
        let item: Item = serde_json::from_str(
            r#"{"title":"A","tech":["rust",3,null,{"x":1}],"description":{"en":"x"},"image":[]}"#,
        )
        .unwrap();
        assert_eq!(item.tech, vec!["rust", "3"]);
        assert!(item.description.is_none());
        assert!(item.image.is_none());
        assert!(serde_json::from_str::<Item>("[1]").is_err());
    }

    #[test]
    fn test_title_fallback() {
        let item = Item::default();
        assert_eq!(item.title_or("Untitled Project"), "Untitled Project");
        let blank = Item::new("   ");
        assert_eq!(blank.title_or("Untitled"), "Untitled");
    }

    #[test]
    fn test_category_key_normalized() {
        assert_eq!(Item::new("A").with_category(" ML ").category_key(), "ml");
        assert_eq!(Item::new("A").with_category("").category_key(), "other");
    }
}
