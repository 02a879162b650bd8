//! Application setup: the one place routes and middleware are registered.
//!
//! An [`App`] is mutable only until it is turned into a [`Dispatcher`]
//! (directly, or by [`App::listen`]). After that the route table and the
//! chain are frozen, which is what lets every connection share them without
//! locking.

use std::sync::Arc;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::http::request::Method;
use crate::middleware::Middleware;
use crate::router::{Handler, Router};
use crate::server::listener;
use crate::templates::TemplateEngine;

#[derive(Default)]
pub struct App {
    router: Router,
    middleware: Vec<Box<dyn Middleware>>,
    templates: Option<Arc<dyn TemplateEngine>>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step to the middleware chain.
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Sets the engine used by `ResponseContext::render`.
    pub fn templates<T: TemplateEngine + 'static>(&mut self, engine: T) -> &mut Self {
        self.templates = Some(Arc::new(engine));
        self
    }

    pub fn route<H: Handler + 'static>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self {
        self.router.register(method, pattern, handler);
        self
    }

    pub fn get<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::DELETE, pattern, handler)
    }

    pub fn patch<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn head<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::HEAD, pattern, handler)
    }

    pub fn options<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.route(Method::OPTIONS, pattern, handler)
    }

    /// Freezes the application into a dispatcher.
    pub fn build(self) -> Dispatcher {
        tracing::debug!(
            routes = self.router.len(),
            middleware = self.middleware.len(),
            "Application built"
        );
        Dispatcher::new(self.router, self.middleware, self.templates)
    }

    /// Builds the dispatcher and serves it on `cfg.server.listen_addr`.
    pub async fn listen(self, cfg: &Config) -> anyhow::Result<()> {
        let dispatcher = Arc::new(self.build());
        listener::run(&cfg.server.listen_addr, dispatcher, cfg.limits.max_body_bytes).await
    }
}
