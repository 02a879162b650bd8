#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use switchyard::http::request::{Method, RawRequest, RequestBuilder};
use switchyard::{handler_fn, Handler, Middleware, Next, Request, ResponseContext};

pub fn get(target: &str) -> RawRequest {
    RequestBuilder::new().method(Method::GET).path(target).build().unwrap()
}

pub fn post_json(target: &str, body: &str) -> RawRequest {
    RequestBuilder::new()
        .method(Method::POST)
        .path(target)
        .header("Content-Type", "application/json")
        .header("Content-Length", body.len().to_string())
        .body(body.as_bytes().to_vec())
        .build()
        .unwrap()
}

/// Handler that sends `body` and counts its invocations.
pub fn counting(body: &'static str, hits: Arc<AtomicUsize>) -> impl Handler {
    handler_fn(move |_req, res| {
        hits.fetch_add(1, Ordering::SeqCst);
        res.send(body);
        Ok(())
    })
}

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Sets a header and continues.
pub struct SetHeader(pub &'static str, pub &'static str);

#[async_trait]
impl Middleware for SetHeader {
    async fn handle(&self, req: &mut Request<'_>, res: &mut ResponseContext, next: Next<'_>) -> anyhow::Result<()> {
        res.set_header(self.0, self.1);
        next.run(req, res).await
    }
}

/// Answers 401 without continuing.
pub struct Deny;

#[async_trait]
impl Middleware for Deny {
    async fn handle(&self, _req: &mut Request<'_>, res: &mut ResponseContext, _next: Next<'_>) -> anyhow::Result<()> {
        res.status(401).send("no");
        Ok(())
    }
}

/// Records entry and exit around the rest of the chain, optionally sleeping first.
pub struct Trace {
    pub name: &'static str,
    pub log: Log,
    pub delay: Option<Duration>,
}

#[async_trait]
impl Middleware for Trace {
    async fn handle(&self, req: &mut Request<'_>, res: &mut ResponseContext, next: Next<'_>) -> anyhow::Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().unwrap().push(format!("{}:enter", self.name));
        next.run(req, res).await?;
        self.log.lock().unwrap().push(format!("{}:exit", self.name));
        Ok(())
    }
}

/// Fails the request.
pub struct Explode;

#[async_trait]
impl Middleware for Explode {
    async fn handle(&self, _req: &mut Request<'_>, _res: &mut ResponseContext, _next: Next<'_>) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("middleware exploded"))
    }
}
