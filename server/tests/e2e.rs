//! End-to-end coverage over a real loopback socket: binds an ephemeral
//! port, runs the accept loop on a background task, and drives it with
//! raw TCP frames the way an actual client would.

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use wisdom_fort_server::{serve, Args};
use wisdom_fort_wire::pow;

async fn spawn_server(args_overrides: impl FnOnce(&mut Args)) -> (SocketAddr, CancellationToken) {
    let mut quotes_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        quotes_file,
        r#"[{{"author":"Test Author","quote":"a tested quote"}}]"#
    )
    .unwrap();
    // Leaked deliberately: the file must outlive the spawned server task,
    // which runs for the remainder of the test process.
    let quotes_path = quotes_file.path().to_path_buf();
    std::mem::forget(quotes_file);

    let mut args = Args {
        port: 0,
        bind_ip: "127.0.0.1".parse().unwrap(),
        rps_limit_unauth: 1000,
        diff_mult: 0,
        challenge_ttl_seconds: 30,
        quotes_path,
        challenge_expirer_tick_ms: 50,
        conn_io_timeout_ms: 2000,
    };
    args_overrides(&mut args);

    let listener = TcpListener::bind((args.bind_ip, args.port)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();

    let serve_cancel = cancel.clone();
    tokio::spawn(async move {
        serve(args, listener, serve_cancel).await;
    });

    (addr, cancel)
}

async fn roundtrip(addr: SocketAddr, body: &str) -> Value {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(body.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut buf))
        .await
        .unwrap()
        .unwrap();
    serde_json::from_slice(&buf).unwrap()
}

#[tokio::test]
async fn happy_path_round_trip_returns_a_quote() {
    let (addr, _cancel) = spawn_server(|_| {}).await;

    let challenge = roundtrip(addr, r#"{"action":"challenge"}"#).await;
    let token = challenge["token"].as_str().unwrap().to_string();
    let target = challenge["payload"]["target"].as_u64().unwrap() as u8;
    let nonce = pow::solve(&token, target);

    let body = format!(
        r#"{{"token":"{token}","action":"solution","payload":{{"solution":{nonce}}}}}"#
    );
    let solved = roundtrip(addr, &body).await;
    assert_eq!(solved["payload"]["quote"]["author"], "Test Author");
    assert!(solved.get("error").is_none());
}

#[tokio::test]
async fn solution_without_token_is_rejected() {
    let (addr, _cancel) = spawn_server(|_| {}).await;
    let resp = roundtrip(addr, r#"{"action":"solution","payload":{"solution":0}}"#).await;
    assert_eq!(resp["error_code"], "ErrMissingToken");
}

#[tokio::test]
async fn malformed_frame_is_rejected() {
    let (addr, _cancel) = spawn_server(|_| {}).await;
    let resp = roundtrip(addr, "not json at all").await;
    assert_eq!(resp["error_code"], "ErrInvalidMsgFormat");
}

#[tokio::test]
async fn unauthenticated_caller_over_rps_limit_is_throttled() {
    let (addr, _cancel) = spawn_server(|a| a.rps_limit_unauth = 1).await;

    let first = roundtrip(addr, r#"{"action":"challenge"}"#).await;
    assert!(first.get("error").is_none());

    let second = roundtrip(addr, r#"{"action":"challenge"}"#).await;
    assert_eq!(second["error_code"], "ErrTooManyRequests");
}

#[tokio::test]
async fn unauthenticated_caller_with_zero_rps_limit_is_always_rejected() {
    let (addr, _cancel) = spawn_server(|a| a.rps_limit_unauth = 0).await;

    let resp = roundtrip(addr, r#"{"action":"challenge"}"#).await;
    assert_eq!(resp["error_code"], "ErrTooManyRequests");
}

#[tokio::test]
async fn invalid_solution_is_rejected_and_challenge_stays_open() {
    let (addr, _cancel) = spawn_server(|_| {}).await;

    let challenge = roundtrip(addr, r#"{"action":"challenge"}"#).await;
    let token = challenge["token"].as_str().unwrap().to_string();

    let bad = format!(r#"{{"token":"{token}","action":"solution","payload":{{"solution":999999999}}}}"#);
    let resp = roundtrip(addr, &bad).await;
    assert_eq!(resp["error_code"], "ErrInvalidSolution");

    let target = challenge["payload"]["target"].as_u64().unwrap() as u8;
    let nonce = pow::solve(&token, target);
    let good = format!(r#"{{"token":"{token}","action":"solution","payload":{{"solution":{nonce}}}}}"#);
    let resp = roundtrip(addr, &good).await;
    assert!(resp.get("error").is_none());
}
