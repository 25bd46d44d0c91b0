//! Content loader - loads the static fallback lists from the data directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{normalize, ContentKind, Item};
use crate::Folio;

/// Loads static item lists from `{source_dir}/{data_dir}`
pub struct ContentLoader<'a> {
    folio: &'a Folio,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self { folio }
    }

    /// Path of the data file for a content kind
    pub fn data_path(&self, kind: ContentKind) -> PathBuf {
        self.folio.data_dir.join(kind.data_file())
    }

    /// Load the static list for a kind.
    ///
    /// Returns `Ok(None)` when no data file exists, so callers can tell
    /// "no fallback configured" apart from "empty fallback".
    pub fn load(&self, kind: ContentKind) -> Result<Option<Vec<Item>>> {
        let path = self.data_path(kind);
        if !path.exists() {
            tracing::debug!("No static {} data at {:?}", kind, path);
            return Ok(None);
        }

        let items = load_items(&path)?;
        tracing::debug!("Loaded {} static {} from {:?}", items.len(), kind, path);
        Ok(Some(items))
    }
}

/// Read a YAML (or JSON) item list in any of the shapes the API accepts
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).with_context(|| format!("Invalid data file {:?}", path))?;
    let value = serde_json::to_value(yaml)?;
    Ok(normalize(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.yml");
        fs::write(
            &path,
            r#"
- title: Churn Model
  category: ml
  tech: [python, sklearn]
- title: Blog
  category: web
"#,
        )
        .unwrap();

        let items = load_items(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tech, vec!["python", "sklearn"]);
        assert_eq!(items[1].category_key(), "web");
    }

    #[test]
    fn test_load_unquoted_year() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("certificates.yml");
        fs::write(&path, "- title: CKA\n  date: 2024\n  link: https://v\n").unwrap();

        let items = load_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].date.as_deref(), Some("2024"));
        assert_eq!(items[0].url.as_deref(), Some("https://v"));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let loader = ContentLoader::new(&folio);
        assert!(loader.load(ContentKind::Projects).unwrap().is_none());
    }

    #[test]
    fn test_load_wrapped_shape() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(&folio.data_dir).unwrap();
        fs::write(
            folio.data_dir.join("certificates.yml"),
            "certificates:\n  - title: AWS\n    issuer: Amazon\n",
        )
        .unwrap();

        let loader = ContentLoader::new(&folio);
        let items = loader.load(ContentKind::Certificates).unwrap().unwrap();
        assert_eq!(items[0].issuer.as_deref(), Some("Amazon"));
    }
}
