//! One request, end to end.
//!
//! The dispatcher builds the two per-request contexts, drives the middleware
//! chain (which ends in route dispatch), and finishes the response once the
//! whole chain has returned. It holds no per-request state of its own, so a
//! single instance is shared by every connection task.

use std::sync::Arc;
use std::time::Instant;

use crate::context::{Request, ResponseContext};
use crate::http::request::RawRequest;
use crate::http::response::Response;
use crate::middleware::{Middleware, Next};
use crate::router::Router;
use crate::templates::TemplateEngine;

pub const NOT_FOUND_BODY: &str = "Not Found";

pub struct Dispatcher {
    router: Router,
    middleware: Vec<Box<dyn Middleware>>,
    templates: Option<Arc<dyn TemplateEngine>>,
}

impl Dispatcher {
    pub fn new(
        router: Router,
        middleware: Vec<Box<dyn Middleware>>,
        templates: Option<Arc<dyn TemplateEngine>>,
    ) -> Self {
        Self {
            router,
            middleware,
            templates,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    /// Runs `raw` through the chain and returns the response to flush.
    ///
    /// An `Err` means a middleware or handler failed; what reaches the client
    /// in that case is up to the transport.
    pub async fn dispatch(&self, raw: &RawRequest) -> anyhow::Result<Response> {
        let started = Instant::now();

        let mut req = Request::new(raw);
        let mut res = ResponseContext::new(self.templates.clone());

        Next::new(&self.middleware, &self.router)
            .run(&mut req, &mut res)
            .await?;

        let response = res.finish();

        tracing::debug!(
            method = %raw.method,
            path = %raw.path,
            status = response.status.as_u16(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Request dispatched"
        );

        Ok(response)
    }
}

/// Terminal continuation of every chain: match the route and run its
/// handler, or answer 404.
pub(crate) async fn route(
    router: &Router,
    req: &mut Request<'_>,
    res: &mut ResponseContext,
) -> anyhow::Result<()> {
    match router.find(req.method(), req.path()) {
        Some(found) => {
            tracing::trace!(pattern = found.pattern.as_str(), "Route matched");
            req.params = found.params;
            found.handler.call(req, res).await
        }
        None => {
            res.status(404).send(NOT_FOUND_BODY);
            Ok(())
        }
    }
}
