//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Default `_config.yml` for new sites
const CONFIG: &str = r#"# Site
title: Portfolio
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: source
public_dir: public
data_dir: _data

# Content API
## Set base to your API server, or "off" to use only the static data
api:
  base: off
  timeout_secs: 10
  viewport_width: 1440
  skeleton: true
  preload_images: false
  preload_timeout_ms: 3000

# Section order for projects and certificates
categories:
  - key: ml
    name: Machine Learning
  - key: web
    name: Web Development
  - key: data
    name: Data Analysis
  - key: tools
    name: Tools & Automation

# Element ids of the mount points
mounts:
  projects: projectGrid
  certificates: certGrid
  year: year
  nav: nav
  cert_modal: certModal
  cert_image: certImg

# Contact backend; defaults to {api.base}/api/contact/
contact:
  endpoint:
  encoding: json

theme:
  default: dark

# Page order for swipe navigation
nav:
  - /
  - /projects/
  - /certificates/
  - /contact/
"#;

const PROJECTS: &str = r#"- title: Hello Portfolio
  description: Replace this with your first project.
  category: web
  url: https://example.com
  tech: [rust, html]
"#;

const CERTIFICATES: &str = r#"- title: Sample Certificate
  issuer: Example Academy
  date: 2024-01-15
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir.join("source/_data"))?;
    fs::create_dir_all(target_dir.join("source/css"))?;
    for page in ["projects", "certificates", "contact"] {
        fs::create_dir_all(target_dir.join("source").join(page))?;
    }

    write_if_missing(&target_dir.join("_config.yml"), CONFIG)?;
    write_if_missing(&target_dir.join("source/_data/projects.yml"), PROJECTS)?;
    write_if_missing(&target_dir.join("source/_data/certificates.yml"), CERTIFICATES)?;
    write_if_missing(&target_dir.join("source/css/site.css"), "")?;

    let pages = [
        ("index.html", "Home", r#"<section id="stats"><span class="h-num" data-count="10">0</span> projects</section>"#),
        ("projects/index.html", "Projects", r#"<div id="projectGrid"></div>"#),
        ("certificates/index.html", "Certificates", CERT_GRID),
        ("contact/index.html", "Contact", CONTACT_FORM),
    ];
    for (file, title, body) in pages {
        write_if_missing(&target_dir.join("source").join(file), &page(title, body))?;
    }

    Ok(())
}

const CERT_GRID: &str = r#"<div id="certGrid"></div>
<div id="certModal" class="modal" aria-hidden="true">
  <button class="modal-close" aria-label="Close">&times;</button>
  <img id="certImg" src="" alt="Certificate">
</div>"#;

const CONTACT_FORM: &str = r#"<form id="contactForm" method="post" action="/contact">
  <input name="name" placeholder="Name">
  <input name="email" type="email" placeholder="Email">
  <input name="subject" placeholder="Subject">
  <textarea name="message" placeholder="Message"></textarea>
  <button type="submit">Send</button>
</form>
<div id="contactAlert"></div>"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/css/site.css">
</head>
<body>
<header>
<nav id="nav" class="nav">
  <a href="/">Home</a>
  <a href="/projects/">Projects</a>
  <a href="/certificates/">Certificates</a>
  <a href="/contact/">Contact</a>
</nav>
<a href="/theme/toggle" id="themeToggle">Toggle theme</a>
</header>
<main>
{body}
</main>
<footer>&copy; <span id="year"></span></footer>
</body>
</html>
"#
    )
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert!(config.api.base_url().is_none());
        assert_eq!(config.categories.len(), 4);
        assert!(dir.path().join("source/projects/index.html").exists());
        assert!(dir.path().join("source/_data/projects.yml").exists());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join("_config.yml")).unwrap();
        assert_eq!(content, "title: Mine\n");
    }
}
