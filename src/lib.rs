//! folio-rs: a portfolio site builder
//!
//! Hand-written HTML pages carry mount points (`<div id="projectGrid">`,
//! `<div id="certGrid">`, ...). Generation fills them with project and
//! certificate cards fetched from a JSON API, falling back to static data
//! when the API is off, empty or unreachable, and resolves the small page
//! behaviors that do not need a browser (active nav link, theme attribute,
//! footer year). The dev server adds a contact-form handler and a
//! cookie-backed theme toggle.

pub mod api;
pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod document;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod server;
pub mod ui;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::path::Path;

/// The main application: a site directory and its configuration
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Source directory (pages and assets)
    pub source_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static fallback data directory
    pub data_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let data_dir = source_dir.join(&config.data_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            data_dir,
        }
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
