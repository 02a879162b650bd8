use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::http::response::{insert_header, Response, ResponseBuilder, StatusCode};
use crate::templates::TemplateEngine;

/// The per-request response under construction.
///
/// Middleware and handlers mutate it in turn; the dispatcher calls
/// [`ResponseContext::finish`] once the whole chain has returned. `finish`
/// consumes the context, so nothing can touch it after the flush decision.
///
/// Terminal writes (`send`, `send_bytes`, `json`, `render`) replace the body
/// outright; the last one to run wins.
pub struct ResponseContext {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
    templates: Option<Arc<dyn TemplateEngine>>,
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for ResponseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseContext")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("templates", &self.templates.is_some())
            .finish()
    }
}

impl ResponseContext {
    pub fn new(templates: Option<Arc<dyn TemplateEngine>>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HashMap::new(),
            body: None,
            templates,
        }
    }

    /// Sets the status code. Does not flush.
    pub fn status(&mut self, code: u16) -> &mut Self {
        self.status = StatusCode::from_u16(code);
        self
    }

    /// Sets or overwrites a header. Names compare case-insensitively, so
    /// `content-type` replaces an earlier `Content-Type`.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        insert_header(&mut self.headers, key.into(), value.into());
        self
    }

    /// Sets the body to `text` verbatim. Content-Type is left alone.
    pub fn send(&mut self, text: impl Into<String>) -> &mut Self {
        self.body = Some(text.into().into_bytes());
        self
    }

    /// Sets a binary body. Content-Type is left alone.
    pub fn send_bytes(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.body = Some(bytes.into());
        self
    }

    /// Serializes `data` as the JSON body.
    ///
    /// A serialization error leaves the context untouched and is meant to be
    /// propagated with `?`; it fails the whole request.
    pub fn json<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<&mut Self, serde_json::Error> {
        let body = serde_json::to_vec(data)?;
        self.set_header("Content-Type", "application/json");
        self.body = Some(body);
        Ok(self)
    }

    /// Renders `template` with `data` through the configured template engine.
    ///
    /// Any failure (no engine, missing template, render error) becomes a 500
    /// with a plain-text body carrying the error message.
    pub async fn render(&mut self, template: &str, data: Value) -> &mut Self {
        let rendered = match self.templates.clone() {
            Some(engine) => engine.render(template, &data).await,
            None => Err(anyhow::anyhow!("no template engine configured")),
        };

        match rendered {
            Ok(html) => {
                self.set_header("Content-Type", "text/html");
                self.body = Some(html.into_bytes());
            }
            Err(e) => {
                tracing::warn!(template, error = %e, "Template rendering failed");
                self.status(500)
                    .set_header("Content-Type", "text/plain")
                    .send(format!("Template rendering failed: {e:#}"));
            }
        }
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Returns a header value, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The body written so far, if any terminal write has happened.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Closes the context and produces the response to flush.
    pub fn finish(self) -> Response {
        ResponseBuilder::new(self.status)
            .headers(self.headers)
            .body(self.body.unwrap_or_default())
            .build()
    }
}
