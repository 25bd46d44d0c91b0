//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Value of `api.base` that turns live fetching off
pub const API_OFF: &str = "off";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub data_dir: String,

    // Content API
    #[serde(default)]
    pub api: ApiConfig,

    /// Category display order; `other` is always appended last
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,

    #[serde(default)]
    pub mounts: MountConfig,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    /// Page paths in navigation order, used for swipe navigation
    #[serde(default)]
    pub nav: Vec<String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            data_dir: "_data".to_string(),

            api: ApiConfig::default(),
            categories: default_categories(),
            mounts: MountConfig::default(),
            contact: ContactConfig::default(),
            theme: ThemeConfig::default(),
            nav: vec![
                "/".to_string(),
                "/projects/".to_string(),
                "/certificates/".to_string(),
                "/contact/".to_string(),
            ],
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Ordered category key -> display name table
    pub fn category_table(&self) -> IndexMap<String, String> {
        self.categories
            .iter()
            .map(|c| (c.key.clone(), c.name.clone()))
            .collect()
    }
}

/// Content API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API. `None` or `"off"` disables live fetching.
    pub base: Option<String>,
    /// Sent as `X-API-Key` when present
    pub key: Option<String>,
    pub timeout_secs: u64,
    /// Viewport width assumed when sizing the skeleton
    pub viewport_width: u32,
    pub skeleton: bool,
    pub preload_images: bool,
    pub preload_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: None,
            key: None,
            timeout_secs: 10,
            viewport_width: 1440,
            skeleton: true,
            preload_images: false,
            preload_timeout_ms: 3000,
        }
    }
}

impl ApiConfig {
    /// The effective base URL, without trailing slash
    pub fn base_url(&self) -> Option<String> {
        resolve_api_base(self.base.as_deref())
    }
}

/// Normalize an API base value; absent, blank and `"off"` all mean disabled
pub fn resolve_api_base(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(API_OFF) {
        return None;
    }
    Some(raw.trim_end_matches('/').to_string())
}

/// One entry of the category order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryConfig {
    pub key: String,
    pub name: String,
}

fn default_categories() -> Vec<CategoryConfig> {
    [
        ("ml", "Machine Learning"),
        ("web", "Web Development"),
        ("data", "Data Analysis"),
        ("tools", "Tools & Automation"),
    ]
    .iter()
    .map(|(key, name)| CategoryConfig {
        key: key.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Element ids of the mount points on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub projects: String,
    pub certificates: String,
    pub year: String,
    pub nav: String,
    /// Certificate viewer modal and the image inside it
    pub cert_modal: String,
    pub cert_image: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            projects: "projectGrid".to_string(),
            certificates: "certGrid".to_string(),
            year: "year".to_string(),
            nav: "nav".to_string(),
            cert_modal: "certModal".to_string(),
            cert_image: "certImg".to_string(),
        }
    }
}

/// How the contact form payload is encoded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactEncoding {
    #[default]
    Json,
    Multipart,
}

/// Contact backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContactConfig {
    /// Full endpoint URL; defaults to `{api.base}/api/contact/`
    pub endpoint: Option<String>,
    pub encoding: ContactEncoding,
}

/// Theme preference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub default: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: "dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Portfolio");
        assert_eq!(config.mounts.projects, "projectGrid");
        assert_eq!(config.mounts.cert_modal, "certModal");
        assert_eq!(config.api.viewport_width, 1440);
        assert!(config.api.base_url().is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
api:
  base: https://api.example.com/
  timeout_secs: 5
categories:
  - key: web
    name: Web
  - key: ml
    name: ML
contact:
  encoding: multipart
mounts:
  cert_modal: viewer
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.api.base_url().as_deref(), Some("https://api.example.com"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.viewport_width, 1440);
        let keys: Vec<_> = config.category_table().keys().cloned().collect();
        assert_eq!(keys, vec!["web", "ml"]);
        assert_eq!(config.contact.encoding, ContactEncoding::Multipart);
        assert_eq!(config.mounts.cert_modal, "viewer");
        assert_eq!(config.mounts.cert_image, "certImg");
    }

    #[test]
    fn test_api_off() {
        assert_eq!(resolve_api_base(Some("off")), None);
        assert_eq!(resolve_api_base(Some("OFF")), None);
        assert_eq!(resolve_api_base(Some("  ")), None);
        assert_eq!(resolve_api_base(None), None);
        assert_eq!(
            resolve_api_base(Some("http://x.test//")).as_deref(),
            Some("http://x.test")
        );
    }
}
