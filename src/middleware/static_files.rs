use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::context::{Request, ResponseContext};
use crate::http::mime;
use crate::http::request::Method;
use crate::middleware::{Middleware, Next};

/// Maps a URL-style relative path under `root`.
///
/// Returns `None` for anything that would escape `root`: `..`, absolute
/// prefixes, drive letters.
pub(crate) fn resolve_under(root: &Path, rel: &str) -> Option<PathBuf> {
    let mut pb = root.to_path_buf();
    for comp in Path::new(rel.trim_start_matches('/')).components() {
        match comp {
            Component::Normal(s) => pb.push(s),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(pb)
}

/// Serves files from a directory.
///
/// Only GET and HEAD are considered. On a hit the file becomes the response
/// and the chain stops; on a miss the request continues down the chain.
/// Directories are served through their `index.html`.
#[derive(Debug, Clone)]
pub struct ServeStatic {
    root: PathBuf,
}

impl ServeStatic {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn lookup(&self, url_path: &str) -> Option<(PathBuf, Vec<u8>)> {
        let mut path = resolve_under(&self.root, url_path)?;

        let meta = tokio::fs::metadata(&path).await.ok()?;
        if meta.is_dir() {
            path.push("index.html");
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => Some((path, bytes)),
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "Static lookup missed");
                None
            }
        }
    }
}

#[async_trait]
impl Middleware for ServeStatic {
    async fn handle(
        &self,
        req: &mut Request<'_>,
        res: &mut ResponseContext,
        next: Next<'_>,
    ) -> anyhow::Result<()> {
        if !matches!(req.method(), Method::GET | Method::HEAD) {
            return next.run(req, res).await;
        }

        match self.lookup(req.path()).await {
            Some((path, bytes)) => {
                tracing::debug!(path = %path.display(), len = bytes.len(), "Serving static file");
                res.set_header("Content-Type", mime::from_path(&path))
                    .send_bytes(bytes);
                Ok(())
            }
            None => next.run(req, res).await,
        }
    }
}
