use std::net::SocketAddr;

use clap::Parser;
use env_logger::Env;
use log::info;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use wisdom_fort_server::{serve, shutdown_signal, Args};

fn main() {
    env_logger::Builder::from_env(Env::new().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    info!("args: {:?}", args);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    rt.block_on(async move {
        let addr = SocketAddr::new(args.bind_ip, args.port);
        let listener = TcpListener::bind(addr)
            .await
            .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.cancel();
        });

        serve(args, listener, cancel).await;
    });
}
