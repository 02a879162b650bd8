//! Template rendering behind [`ResponseContext::render`](crate::context::ResponseContext::render).

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use minijinja::Environment;
use serde_json::Value;

use crate::middleware::static_files::resolve_under;

/// Resolves a template by name and renders it with `data`.
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    async fn render(&self, name: &str, data: &Value) -> anyhow::Result<String>;
}

/// Jinja-style templates loaded from a directory on every render.
///
/// A name without an extension gets `.html` appended, so
/// `render("users/show", ..)` reads `<dir>/users/show.html`.
pub struct Views {
    dir: PathBuf,
}

impl Views {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let mut path = resolve_under(&self.dir, name)?;
        if path.extension().is_none() {
            path.set_extension("html");
        }
        Some(path)
    }
}

#[async_trait]
impl TemplateEngine for Views {
    async fn render(&self, name: &str, data: &Value) -> anyhow::Result<String> {
        let path = self
            .locate(name)
            .ok_or_else(|| anyhow::anyhow!("invalid template name: {name}"))?;

        let source = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("template not found: {name}"))?;

        let env = Environment::new();
        let rendered = env
            .render_str(&source, data)
            .with_context(|| format!("failed to render {name}"))?;

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_appends_html_extension() {
        let views = Views::new("views");
        assert_eq!(views.locate("index").unwrap(), PathBuf::from("views/index.html"));
        assert_eq!(views.locate("feed.xml").unwrap(), PathBuf::from("views/feed.xml"));
    }

    #[test]
    fn locate_rejects_traversal() {
        let views = Views::new("views");
        assert!(views.locate("../secret").is_none());
    }
}
