//! Connection acceptance (component A): binds the listener from [`ServerConfig`], spawns one
//! task per accepted socket, and feeds each frame read off it into a per-connection
//! [`Dispatcher`]. Mirrors the accept-loop shape of `smb-transport`'s client-side `split`
//! helper, just with the read/write halves driven from the opposite end.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::handle_table::DurableTable;

/// Binds `config.listen` and serves connections until the process is killed. Each connection
/// gets its own [`Dispatcher`] (hence its own [`crate::session::Connection`]) but shares one
/// process-wide [`DurableTable`], so a durable handle survives the TCP connection that opened
/// it.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.listen).await?;
    log::info!("listening on {}", config.listen);
    serve(listener, config).await
}

/// Runs the accept loop against an already-bound listener. Split out from [`run`] so tests
/// can bind `127.0.0.1:0`, read back the OS-assigned port, and only then point a client at
/// it — `run` itself never exposes the bound address.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> std::io::Result<()> {
    let config = Arc::new(config);
    let durable_handles = Arc::new(DurableTable::default());

    loop {
        let (stream, peer) = listener.accept().await?;
        stream.set_nodelay(true).ok();
        log::debug!("accepted connection from {peer}");

        let config = config.clone();
        let durable_handles = durable_handles.clone();
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, &config, durable_handles).await {
                log::warn!("connection from {peer} ended: {err}");
            }
        });
    }
}

async fn serve_connection(
    stream: tokio::net::TcpStream,
    config: &ServerConfig,
    durable_handles: Arc<DurableTable>,
) -> crate::error::Result<()> {
    let (mut reader, writer) = smb_transport::split(stream);
    let dispatcher = Arc::new(Dispatcher::new(config, durable_handles, writer));

    while let Some(frame) = reader.read_frame().await? {
        dispatcher.dispatch_frame(frame).await?;
    }
    Ok(())
}
