//! Middleware chain.
//!
//! A chain is the ordered list of steps registered on the [`App`](crate::App),
//! run strictly in that order for every request. Each step gets the request,
//! the response under construction, and a [`Next`] continuation:
//!
//! ```text
//!   step 0 ──next──▶ step 1 ──next──▶ … ──next──▶ route dispatch ─▶ handler
//!      │                │                              │
//!      └─ returns ◀─────┴──────── returns ◀────────────┘
//! ```
//!
//! A step that returns without calling [`Next::run`] ends the chain: no later
//! step and no handler runs, and the response as it stands is what gets
//! flushed. Errors are not caught here; they travel back up to the
//! dispatcher.

pub mod body;
pub mod static_files;

use async_trait::async_trait;

use crate::context::{Request, ResponseContext};
use crate::dispatcher;
use crate::router::Router;

pub use body::BodyParser;
pub use static_files::ServeStatic;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(
        &self,
        req: &mut Request<'_>,
        res: &mut ResponseContext,
        next: Next<'_>,
    ) -> anyhow::Result<()>;
}

/// The rest of the chain after the current step.
///
/// Holds the remaining steps and the route table that terminates the chain.
/// Consumed by [`Next::run`], so a step can continue at most once.
pub struct Next<'a> {
    chain: &'a [Box<dyn Middleware>],
    router: &'a Router,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Box<dyn Middleware>], router: &'a Router) -> Self {
        Self { chain, router }
    }

    /// Runs the remaining steps and then the matched handler, returning once
    /// all of them have.
    pub async fn run(self, req: &mut Request<'_>, res: &mut ResponseContext) -> anyhow::Result<()> {
        match self.chain.split_first() {
            Some((step, rest)) => {
                let next = Next {
                    chain: rest,
                    router: self.router,
                };
                step.handle(req, res, next).await
            }
            None => dispatcher::route(self.router, req, res).await,
        }
    }

    /// Number of steps still ahead of the route dispatch.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }
}
