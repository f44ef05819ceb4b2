use std::sync::Arc;

use fileserve::config::Config;
use fileserve::http::mime::{MimeRegistry, MimeTable};
use fileserve::server;
use fileserve::server::context::ServerContext;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if cfg.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let table = match MimeTable::load(&cfg.mime_types) {
        Ok(table) => {
            tracing::info!("Loaded {} media type entries from {}", table.len(), cfg.mime_types.display());
            table
        }
        Err(e) => {
            tracing::warn!("Cannot read {}: {}; serving everything as octet-stream", cfg.mime_types.display(), e);
            MimeTable::default()
        }
    };

    let ctx = Arc::new(ServerContext::new(cfg, MimeRegistry::new(table)));

    #[cfg(unix)]
    spawn_mime_reloader(Arc::clone(&ctx))?;

    tokio::select! {
        res = server::listener::run(ctx) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Reloads the media type table on SIGHUP.
#[cfg(unix)]
fn spawn_mime_reloader(ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            match ctx.mime.reload(&ctx.config.mime_types) {
                Ok(n) => tracing::info!("Reloaded {} media type entries", n),
                Err(e) => tracing::warn!("Media type reload failed, keeping previous table: {}", e),
            }
        }
    });
    Ok(())
}
