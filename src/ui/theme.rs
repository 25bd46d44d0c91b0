//! Light/dark theme preference

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::document::Document;

/// Preference key holding the theme name
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => anyhow::bail!("Unknown theme: {}", other),
        }
    }
}

/// Where a single preference string is persisted
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Preferences held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Theme toggle backed by a preference store
#[derive(Debug, Clone)]
pub struct ThemeToggle<S> {
    store: S,
    default: Theme,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    pub fn new(store: S, default: Theme) -> Self {
        Self { store, default }
    }

    /// The saved theme, or the default when nothing valid is saved
    pub fn current(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.default)
    }

    /// Switch to the other theme and persist it
    pub fn toggle(&mut self) -> Theme {
        let next = self.current().toggled();
        self.store.set(THEME_KEY, next.as_str());
        next
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Set `data-theme` on the page's `<html>` element
pub fn apply_theme(doc: &mut Document, theme: Theme) -> bool {
    doc.set_tag_attribute("html", "data-theme", theme.as_str())
}
