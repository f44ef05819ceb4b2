use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::http::connection::Connection;
use crate::server::context::ServerContext;

pub async fn run(ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&ctx.config.listen_addr).await?;
    info!(
        "Listening on {}, serving {}",
        ctx.config.listen_addr,
        ctx.config.content_base.display()
    );

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
