//! Content kinds served by the API

use std::fmt;
use std::str::FromStr;

/// What a render target displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Projects,
    Certificates,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Projects, ContentKind::Certificates];

    /// Collection name, used for the API path and the data file
    pub fn name(self) -> &'static str {
        match self {
            ContentKind::Projects => "projects",
            ContentKind::Certificates => "certificates",
        }
    }

    /// Title shown for records that carry none
    pub fn untitled(self) -> &'static str {
        match self {
            ContentKind::Projects => "Untitled Project",
            ContentKind::Certificates => "Untitled Certificate",
        }
    }

    /// Candidate endpoint URLs, slash-terminated form first
    pub fn endpoints(self, base: &str) -> Vec<String> {
        let base = base.trim_end_matches('/');
        vec![
            format!("{}/api/{}/", base, self.name()),
            format!("{}/api/{}", base, self.name()),
        ]
    }

    /// File name of the static fallback list inside the data directory
    pub fn data_file(self) -> String {
        format!("{}.yml", self.name())
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" | "projects" => Ok(ContentKind::Projects),
            "certificate" | "certificates" | "cert" | "certs" => Ok(ContentKind::Certificates),
            _ => anyhow::bail!("Unknown content kind: {}", s),
        }
    }
}
