//! HTTP/1.1 transport.
//!
//! This is the plumbing around the dispatch core: it turns bytes into a
//! [`request::RawRequest`], hands it to the [`crate::dispatcher::Dispatcher`]
//! and writes the finished [`response::Response`] back exactly once.
//!
//! - **`connection`**: per-connection request/response state machine
//! - **`parser`**: parses incoming HTTP requests from byte buffers
//! - **`request`**: raw request representation and the method set
//! - **`response`**: finished response and status codes
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received (malformed → 400/413, close)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Dispatcher runs middleware + handler
//!        └──────┬───────────┘
//!               │ Response finished (fatal error → 500, close)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Flush status line, headers, body
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
