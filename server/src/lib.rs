//! Server-side wiring for the wisdom-fort proof-of-work quote service:
//! CLI/env configuration, the TCP accept loop, the per-connection
//! read/dispatch/write cycle, and coordinated graceful shutdown.
//!
//! Split from `main.rs` so the accept loop is reachable from integration
//! tests without spawning the compiled binary as a subprocess.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{debug, error, info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use wisdom_fort_core::StorageRegistry;
use wisdom_fort_relayer::{ChallengeRegistry, Dispatcher, QuoteSource, RpsCounter};
use wisdom_fort_wire::Response;

const MAX_FRAME_BYTES: usize = 1024;

/// Command-line arguments for the wisdom-fort proof-of-work quote server.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// TCP port the server listens on. Pass 0 to let the OS assign one.
    #[arg(long, env, default_value_t = 11_337)]
    pub port: u16,

    /// IP address to bind the listener to.
    #[arg(long, env, default_value_t = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)))]
    pub bind_ip: IpAddr,

    /// Requests-per-second ceiling for a caller with no token. Above this,
    /// an anonymous caller's `challenge` requests are refused.
    #[arg(long, env, default_value_t = 5)]
    pub rps_limit_unauth: u64,

    /// Multiplier applied to a token's observed RPS to derive its
    /// proof-of-work difficulty (8-bit wrapping multiplication).
    #[arg(long, env, default_value_t = 1)]
    pub diff_mult: u8,

    /// How long an issued challenge remains valid, in seconds.
    #[arg(long, env, default_value_t = 30)]
    pub challenge_ttl_seconds: u64,

    /// Path to the JSON array of quotes handed out on a solved challenge.
    #[arg(long, env, default_value = "quotes.json")]
    pub quotes_path: PathBuf,

    /// Tick interval of the background expiration sweep, in milliseconds.
    #[arg(long, env, default_value_t = 1_000)]
    pub challenge_expirer_tick_ms: u64,

    /// Per-connection read/write deadline, in milliseconds.
    #[arg(long, env, default_value_t = 5_000)]
    pub conn_io_timeout_ms: u64,
}

/// Builds the dispatcher and storage registry from `args` and serves
/// connections on `listener` until `cancel` fires. Returns once the accept
/// loop has stopped; the background expirer is stopped via the same token.
pub async fn serve(args: Args, listener: TcpListener, cancel: CancellationToken) {
    let mut registry = StorageRegistry::new();
    let rps_ns = registry.create_namespace_with_ttl(Duration::from_secs(1));
    let challenge_ns =
        registry.create_namespace_with_ttl(Duration::from_secs(args.challenge_ttl_seconds));
    let registry = Arc::new(registry);

    let quotes = QuoteSource::load(&args.quotes_path).unwrap_or_else(|e| {
        panic!(
            "failed to load quotes from {}: {}",
            args.quotes_path.display(),
            e
        )
    });

    let rps = RpsCounter::new(registry.clone(), rps_ns);
    let challenges =
        ChallengeRegistry::new(registry.clone(), challenge_ns, rps.clone(), args.diff_mult);
    let dispatcher = Arc::new(Dispatcher::new(
        rps,
        challenges,
        Arc::new(quotes),
        args.rps_limit_unauth,
    ));

    let _expirer = registry.spawn_expirer(
        Duration::from_millis(args.challenge_expirer_tick_ms),
        cancel.clone(),
    );

    let conn_io_timeout = Duration::from_millis(args.conn_io_timeout_ms);
    info!("listening on {:?}", listener.local_addr());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                warn!("shutdown signal received, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, peer_addr)) => {
                        let dispatcher = dispatcher.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(socket, peer_addr, dispatcher, conn_io_timeout).await {
                                debug!("connection from {peer_addr} ended with error: {e}");
                            }
                        });
                    }
                    Err(e) => error!("accept failed: {e}"),
                }
            }
        }
    }
}

async fn handle_connection(
    mut socket: TcpStream,
    peer_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    io_timeout: Duration,
) -> std::io::Result<()> {
    let mut buf = [0u8; MAX_FRAME_BYTES];
    let n = tokio::time::timeout(io_timeout, socket.read(&mut buf))
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out"))??;

    if n == 0 {
        return Ok(());
    }

    let peer_ip = peer_addr.ip().to_string();
    let (token, result) = dispatcher.handle(&peer_ip, &buf[..n]).await;
    let token_str = token.map(|t| t.to_string()).unwrap_or_default();

    let response = match result {
        Ok(payload) => Response::success(token_str, payload),
        Err(e) => {
            error!("{peer_ip}: {e} ({})", e.code().as_str());
            Response::error(token_str, e.to_string(), e.code().as_str())
        }
    };

    let bytes = response
        .to_json_bytes()
        .expect("response always serializes");

    tokio::time::timeout(io_timeout, socket.write_all(&bytes))
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "write timed out"))??;

    Ok(())
}

/// Resolves on `Ctrl-C` or, on unix, `SIGTERM`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("signal received, starting graceful shutdown");
}
