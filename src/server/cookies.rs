//! Cookie-backed preference store

use axum::http::{header, HeaderMap, HeaderValue};
use std::collections::HashMap;

use crate::ui::PreferenceStore;

/// One year, in seconds
const MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Preferences read from the request's `Cookie` header; values set during
/// the request become `Set-Cookie` headers on the response
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    values: HashMap<String, String>,
    changed: Vec<String>,
}

impl CookieStore {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let values = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Self {
            values,
            changed: Vec::new(),
        }
    }

    /// `Set-Cookie` values for everything changed
    pub fn set_cookie_headers(&self) -> Vec<HeaderValue> {
        self.changed
            .iter()
            .filter_map(|name| {
                let value = self.values.get(name)?;
                HeaderValue::from_str(&format!(
                    "{}={}; Path=/; Max-Age={}; SameSite=Lax",
                    name, value, MAX_AGE
                ))
                .ok()
            })
            .collect()
    }
}

impl PreferenceStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if !self.changed.iter().any(|k| k == key) {
            self.changed.push(key.to_string());
        }
    }
}
