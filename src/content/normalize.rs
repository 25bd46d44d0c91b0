//! Maps every accepted API response shape to one item list

use serde_json::Value;

use super::Item;

/// Keys that may wrap the item array in an object response
const WRAPPER_KEYS: [&str; 4] = ["items", "projects", "certificates", "results"];

/// Normalize an API response into a flat list of items.
///
/// Accepted shapes:
/// - `[item, ...]`
/// - `{"items": [...]}`, `{"projects": [...]}`, `{"certificates": [...]}`,
///   `{"results": [...]}`
/// - `{"sections": [{"projects": [...]}, ...]}`
///
/// Anything else yields an empty list. Entries that are not objects are
/// skipped.
pub fn normalize(value: Value) -> Vec<Item> {
    match value {
        Value::Array(entries) => parse_entries(entries),
        Value::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if let Some(Value::Array(entries)) = map.remove(key) {
                    return parse_entries(entries);
                }
            }

            if let Some(Value::Array(sections)) = map.remove("sections") {
                return sections
                    .into_iter()
                    .filter_map(|section| match section {
                        Value::Object(mut s) => match s.remove("projects").or_else(|| s.remove("items")) {
                            Some(Value::Array(entries)) => Some(parse_entries(entries)),
                            _ => None,
                        },
                        _ => None,
                    })
                    .flatten()
                    .collect();
            }

            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn parse_entries(entries: Vec<Value>) -> Vec<Item> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => Some(Item::from_object(&map)),
            other => {
                tracing::debug!("Skipping non-object entry: {}", other);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title_or("?")).collect()
    }

    #[test]
    fn test_plain_array() {
        let items = normalize(json!([{"title": "A"}, {"title": "B"}]));
        assert_eq!(titles(&items), vec!["A", "B"]);
    }

    #[test]
    fn test_wrapped_shapes() {
        assert_eq!(titles(&normalize(json!({"items": [{"title": "A"}]}))), vec!["A"]);
        assert_eq!(titles(&normalize(json!({"projects": [{"title": "B"}]}))), vec!["B"]);
        assert_eq!(titles(&normalize(json!({"results": [{"title": "C"}], "count": 1}))), vec!["C"]);
    }

    #[test]
    fn test_sections_are_flattened_in_order() {
        let value = json!({
            "sections": [
                {"name": "ml", "projects": [{"title": "A"}, {"title": "B"}]},
                {"name": "empty"},
                {"name": "web", "projects": [{"title": "C"}]}
            ]
        });
        assert_eq!(titles(&normalize(value)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unexpected_shapes_are_empty() {
        assert!(normalize(json!({})).is_empty());
        assert!(normalize(json!({"detail": "not found"})).is_empty());
        assert!(normalize(json!("nope")).is_empty());
        assert!(normalize(Value::Null).is_empty());
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let items = normalize(json!([1, "x", null, {"title": "A"}]));
        assert_eq!(titles(&items), vec!["A"]);
    }

    #[test]
    fn test_mixed_records_all_kept() {
        let items = normalize(json!([
            {"title": "Has both", "url": "https://u", "repo": "https://r"},
            {"title": "Has tags and tech", "tags": ["a"], "tech": ["b"]},
            {"title": "Dated", "date": 2024, "category": 1},
            {"title": "Plain"}
        ]));
        assert_eq!(titles(&items), vec!["Has both", "Has tags and tech", "Dated", "Plain"]);
        assert_eq!(items[2].date.as_deref(), Some("2024"));
    }
}
