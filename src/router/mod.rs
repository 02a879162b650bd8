//! Route table: `(method, pattern) → handler`, matched in registration order.
//!
//! Patterns are split on `/` into literal and `:param` segments. Matching a
//! path walks the routes registered for its method and returns the first one
//! with the same number of segments whose literals all agree. There is no
//! notion of specificity: a `:param` route registered before a literal route
//! of the same shape shadows it.
//!
//! ```ignore
//! let mut router = Router::new();
//! router.get("/users/:id", handler_fn(|req, res| {
//!     let id = req.param("id").unwrap_or_default().to_string();
//!     res.send(id);
//!     Ok(())
//! }));
//! ```

pub mod pattern;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{Request, ResponseContext};
use crate::http::request::Method;

pub use pattern::{RoutePattern, Segment};

/// A request handler.
///
/// Plain closures taking `(&mut Request<'_>, &mut ResponseContext)` and
/// returning `anyhow::Result<()>` implement this automatically; handlers that
/// need to await implement it on a type.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: &mut Request<'_>, res: &mut ResponseContext) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> Handler for F
where
    F: Fn(&mut Request<'_>, &mut ResponseContext) -> anyhow::Result<()> + Send + Sync,
{
    async fn call(&self, req: &mut Request<'_>, res: &mut ResponseContext) -> anyhow::Result<()> {
        (self)(req, res)
    }
}

/// Pins a closure to the synchronous handler signature so its argument and
/// return types need no annotations.
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&mut Request<'_>, &mut ResponseContext) -> anyhow::Result<()> + Send + Sync,
{
    f
}

struct Route {
    pattern: RoutePattern,
    handler: Arc<dyn Handler>,
}

/// Result of a successful [`Router::find`].
pub struct RouteMatch<'a> {
    pub pattern: &'a RoutePattern,
    pub handler: &'a Arc<dyn Handler>,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (method, routes) in &self.routes {
            let patterns: Vec<&str> = routes.iter().map(|r| r.pattern.as_str()).collect();
            map.entry(method, &patterns);
        }
        map.finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `(method, pattern)`.
    ///
    /// Re-registering a pattern with the same segments replaces the handler
    /// and keeps the original position; `users/:id` and `/users/:id` are the
    /// same route. Unsupported methods are ignored.
    pub fn register<H>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        if !method.is_supported() {
            tracing::warn!(%method, pattern, "Ignoring route for unsupported method");
            return self;
        }

        let handler: Arc<dyn Handler> = Arc::new(handler);
        let parsed = RoutePattern::parse(pattern);
        let routes = self.routes.entry(method.clone()).or_default();

        match routes
            .iter_mut()
            .find(|r| r.pattern.segments() == parsed.segments())
        {
            Some(existing) => {
                tracing::debug!(%method, pattern, "Replacing route handler");
                existing.handler = handler;
            }
            None => {
                tracing::debug!(%method, pattern, "Registered route");
                routes.push(Route {
                    pattern: parsed,
                    handler,
                });
            }
        }
        self
    }

    pub fn get<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::PUT, pattern, handler)
    }

    pub fn delete<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::DELETE, pattern, handler)
    }

    pub fn patch<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::PATCH, pattern, handler)
    }

    pub fn head<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::HEAD, pattern, handler)
    }

    pub fn options<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.register(Method::OPTIONS, pattern, handler)
    }

    /// Finds the first route for `method` whose pattern matches `path`.
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let routes = self.routes.get(method)?;
        let segments: Vec<&str> = pattern::split_path(path).collect();

        routes.iter().find_map(|route| {
            route.pattern.matches(&segments).map(|params| RouteMatch {
                pattern: &route.pattern,
                handler: &route.handler,
                params,
            })
        })
    }

    /// Patterns registered for `method`, in match order.
    pub fn patterns(&self, method: &Method) -> Vec<&str> {
        self.routes
            .get(method)
            .map(|routes| routes.iter().map(|r| r.pattern.as_str()).collect())
            .unwrap_or_default()
    }

    /// Total number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
