//! Demonstrates the basic request flow and the difficulty escalation a
//! single token sees under repeated requests, mirroring the original
//! `client/cmd/demo.go`.

use env_logger::Env;
use log::info;
use wisdom_fort_client::Client;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::new().default_filter_or("info")).init();

    let host = std::env::var("WISDOM_FORT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("WISDOM_FORT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(11_337);

    let client = Client::new(host, port);

    info!("demo: single challenge/solve/submit round trip");
    let challenge = client.get_challenge().await.expect("get challenge");
    info!("got challenge: {challenge:?}");
    let solution = client.solve_challenge(&challenge);
    info!("found solution: {solution}");
    let quote = client
        .submit_solution(&challenge.token, solution)
        .await
        .expect("submit solution");
    info!("got quote: {} -- {}", quote.text, quote.author);

    info!("demo: repeated requests from the same client, watch the difficulty climb");
    for i in 0..3 {
        let quote = client.get_quote().await.expect("get quote");
        info!("[{i}] got quote: {} -- {}", quote.text, quote.author);
    }
}
