//! Switchyard - request dispatch for a small HTTP server
//!
//! Routes requests to registered handlers through an ordered middleware
//! chain, buffering each response until a single flush.

pub mod app;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;
pub mod templates;

pub use app::App;
pub use context::{Body, Request, ResponseContext};
pub use dispatcher::Dispatcher;
pub use http::request::Method;
pub use middleware::{Middleware, Next};
pub use router::{handler_fn, Handler, Router};
