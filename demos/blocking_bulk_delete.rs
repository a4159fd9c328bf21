//! Delete several objects in one request with the `BlockingSwisClient`.
//!
//! Run:
//! `cargo run --example blocking_bulk_delete -- swis://orion/Orion/Orion.Nodes/NodeID=41 ...`
//!
//! Credentials come from `SWIS_SERVER`, `SWIS_USERNAME` and `SWIS_PASSWORD`.

use swis_client::{BlockingSwisClient, Failure, SwisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server = std::env::var("SWIS_SERVER").unwrap_or_else(|_| "localhost".to_owned());
    let username = std::env::var("SWIS_USERNAME").unwrap_or_default();
    let password = std::env::var("SWIS_PASSWORD").unwrap_or_default();
    let uris: Vec<String> = std::env::args().skip(1).collect();

    let client = BlockingSwisClient::new(SwisConfig::new(server, username, password))?;
    let envelope = client.remove_bulk(&uris);

    match envelope.err {
        None => println!("deleted {} object(s) ({})", uris.len(), envelope.status),
        Some(Failure::Server(body)) => eprintln!("server refused ({}): {body}", envelope.status),
        Some(Failure::Transport(error)) => eprintln!("request failed: {error}"),
    }
    Ok(())
}
