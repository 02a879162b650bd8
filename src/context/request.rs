use std::collections::HashMap;

use serde_json::Value;

use crate::http::request::{Method, RawRequest};

/// Request payload as seen by handlers.
///
/// Starts out `Pending`; a body-parsing middleware replaces it. Without one,
/// handlers can still read [`Request::raw_body`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Pending,
    Empty,
    Json(Value),
    Form(HashMap<String, String>),
    Text(String),
    Bytes(Vec<u8>),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&HashMap<String, String>> {
        match self {
            Body::Form(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Per-request view over a [`RawRequest`].
///
/// Read access to method, path and headers goes straight to the transport's
/// request; `params` and `body` belong to this view and are filled in as the
/// request moves through the chain.
#[derive(Debug)]
pub struct Request<'r> {
    raw: &'r RawRequest,
    /// Path parameters, populated after a successful route match.
    pub params: HashMap<String, String>,
    pub body: Body,
}

impl<'r> Request<'r> {
    pub fn new(raw: &'r RawRequest) -> Self {
        Self {
            raw,
            params: HashMap::new(),
            body: Body::Pending,
        }
    }

    pub fn raw(&self) -> &'r RawRequest {
        self.raw
    }

    pub fn method(&self) -> &'r Method {
        &self.raw.method
    }

    pub fn path(&self) -> &'r str {
        &self.raw.path
    }

    pub fn header(&self, key: &str) -> Option<&'r str> {
        self.raw.header(key)
    }

    pub fn headers(&self) -> &'r HashMap<String, String> {
        &self.raw.headers
    }

    pub fn raw_body(&self) -> &'r [u8] {
        &self.raw.body
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Decodes the query string. Repeated keys keep the last value.
    pub fn query(&self) -> HashMap<String, String> {
        self.raw
            .query
            .as_deref()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default()
    }
}
