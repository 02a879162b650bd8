use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::http::connection::Connection;

/// Binds `addr` and serves until the accept loop fails.
pub async fn run(addr: &str, dispatcher: Arc<Dispatcher>, max_body: usize) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, dispatcher, max_body).await
}

/// Accept loop over an already-bound listener. One task per connection.
pub async fn serve(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    max_body: usize,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, dispatcher, max_body);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
