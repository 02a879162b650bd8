//! Per-request state threaded through middleware and handlers.

pub mod request;
pub mod response;

pub use request::{Body, Request};
pub use response::ResponseContext;
