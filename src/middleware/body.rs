use async_trait::async_trait;
use serde_json::json;

use crate::context::{Body, Request, ResponseContext};
use crate::middleware::{Middleware, Next};

/// Parses the request body according to its `Content-Type`.
///
/// | Content-Type                         | Result        |
/// |--------------------------------------|---------------|
/// | `application/json`                   | `Body::Json`  |
/// | `application/x-www-form-urlencoded`  | `Body::Form`  |
/// | `text/*`                             | `Body::Text`  |
/// | anything else                        | `Body::Bytes` |
///
/// GET, HEAD and OPTIONS pass through untouched. A body that fails to parse
/// gets a 400 with a JSON error payload and the chain stops there.
#[derive(Debug, Default, Clone)]
pub struct BodyParser;

#[derive(Debug)]
enum ParseFailure {
    Json(serde_json::Error),
    Utf8(std::str::Utf8Error),
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFailure::Json(e) => write!(f, "invalid JSON body: {e}"),
            ParseFailure::Utf8(e) => write!(f, "invalid UTF-8 in text body: {e}"),
        }
    }
}

impl BodyParser {
    pub fn new() -> Self {
        Self
    }

    fn parse(content_type: &str, raw: &[u8]) -> Result<Body, ParseFailure> {
        if raw.is_empty() {
            return Ok(Body::Empty);
        }

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" => serde_json::from_slice(raw)
                .map(Body::Json)
                .map_err(ParseFailure::Json),
            "application/x-www-form-urlencoded" => Ok(Body::Form(
                url::form_urlencoded::parse(raw).into_owned().collect(),
            )),
            m if m.starts_with("text/") => std::str::from_utf8(raw)
                .map(|s| Body::Text(s.to_string()))
                .map_err(ParseFailure::Utf8),
            _ => Ok(Body::Bytes(raw.to_vec())),
        }
    }
}

#[async_trait]
impl Middleware for BodyParser {
    async fn handle(
        &self,
        req: &mut Request<'_>,
        res: &mut ResponseContext,
        next: Next<'_>,
    ) -> anyhow::Result<()> {
        if req.method().is_safe() {
            return next.run(req, res).await;
        }

        let content_type = req.header("Content-Type").unwrap_or("");
        match Self::parse(content_type, req.raw_body()) {
            Ok(body) => {
                req.body = body;
                next.run(req, res).await
            }
            Err(e) => {
                tracing::warn!(
                    method = %req.method(),
                    path = %req.path(),
                    error = %e,
                    "Rejecting unparseable request body"
                );
                res.status(400).json(&json!({
                    "error": "Bad Request",
                    "message": e.to_string(),
                }))?;
                Ok(())
            }
        }
    }
}
