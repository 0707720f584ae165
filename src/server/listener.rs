use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{Instrument, error, info, info_span};

use crate::config::{Config, ServerConfig};
use crate::http::connection::Connection;
use crate::resources::Resources;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", cfg.server.listen_addr);

    match &cfg.files.directory {
        Some(dir) => info!(directory = %dir.display(), "serving files"),
        None => info!("no file directory configured, /files/ disabled"),
    }

    let resources = Arc::new(Resources::from_config(cfg));
    serve(listener, resources, &cfg.server).await
}

/// Pause before accepting again after `e`.
///
/// Errors tied to a single connection are retried at once; anything else
/// (fd exhaustion, out of buffers) waits so the loop does not spin.
pub(crate) fn accept_backoff(e: &io::Error) -> Duration {
    match e.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted => Duration::ZERO,
        _ => Duration::from_millis(100),
    }
}

/// Accepts connections forever, one task per connection.
///
/// With `max_connections` set, accepting pauses while that many
/// connections are in flight.
pub async fn serve(
    listener: TcpListener,
    resources: Arc<Resources>,
    server: &ServerConfig,
) -> anyhow::Result<()> {
    let limit = server.max_connections.map(|n| Arc::new(Semaphore::new(n)));

    loop {
        let permit = match &limit {
            Some(sem) => Some(sem.clone().acquire_owned().await?),
            None => None,
        };

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "accept failed");
                drop(permit);
                let delay = accept_backoff(&e);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let resources = resources.clone();
        let read_buffer_size = server.read_buffer_size;
        tokio::spawn(
            async move {
                let mut conn = Connection::with_buffer_size(socket, resources, read_buffer_size);
                if let Err(e) = conn.run().await {
                    error!("Connection error from {}: {}", peer, e);
                }
                drop(permit);
            }
            .instrument(info_span!("conn", %peer)),
        );
    }
}
