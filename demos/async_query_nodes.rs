//! Query nodes by vendor with the async `SwisClient`.
//!
//! Run:
//! `cargo run --example async_query_nodes`
//!
//! Env vars:
//! - `SWIS_SERVER` (defaults to `localhost`)
//! - `SWIS_USERNAME` / `SWIS_PASSWORD`
//! - `SWIS_VENDOR` (defaults to `Cisco`)

use serde::Deserialize;
use swis_client::{Query, SwisClient, SwisConfig};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Node {
    #[serde(rename = "NodeID")]
    node_id: u32,
    caption: String,
    #[serde(rename = "IPAddress")]
    ip_address: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server = std::env::var("SWIS_SERVER").unwrap_or_else(|_| "localhost".to_owned());
    let username = std::env::var("SWIS_USERNAME").unwrap_or_default();
    let password = std::env::var("SWIS_PASSWORD").unwrap_or_default();
    let vendor = std::env::var("SWIS_VENDOR").unwrap_or_else(|_| "Cisco".to_owned());

    let client = SwisClient::new(SwisConfig::new(server, username, password))?;
    let query = Query::new(
        "SELECT NodeID, Caption, IPAddress FROM Orion.Nodes WHERE Vendor = @vendor",
    )
    .with_parameter("vendor", vendor);

    let nodes: Vec<Node> = client.query(&query).await.results_as()?.unwrap_or_default();
    for node in nodes {
        println!("{:>6}  {:<15}  {}", node.node_id, node.ip_address, node.caption);
    }
    Ok(())
}
