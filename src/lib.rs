//! Rust and Python-facing client library for the SolarWinds Information
//! Service (SWIS) REST API.
//!
//! Public API layers:
//! - [`SwisClient`]/[`BlockingSwisClient`]: query, invoke, CRUD and bulk
//!   delete against one Orion server.
//! - [`Operation`]/[`SwisRequest`]: request construction without I/O.
//! - [`normalize`]/[`Envelope`]: the uniform result shape every operation
//!   returns.
//! - [`ClientError`]: unified error type carried by failed envelopes.
//!
//! ```no_run
//! # async fn run() -> Result<(), swis_client::ClientError> {
//! use swis_client::{Query, SwisClient, SwisConfig};
//!
//! let client = SwisClient::new(SwisConfig::new("orion.local", "admin", "secret"))?;
//! let nodes = client
//!     .query(&Query::new("SELECT TOP 5 NodeID, Caption FROM Orion.Nodes"))
//!     .await
//!     .into_result()?;
//! println!("{nodes:?}");
//! # Ok(())
//! # }
//! ```

mod address;
mod blocking_client;
mod client;
mod config;
mod error;
mod request;
mod response;

/// Endpoint URL derivation.
pub use address::{API_ROOT, Endpoints, endpoints};
/// Generic blocking SWIS client.
pub use blocking_client::BlockingSwisClient;
/// Generic async SWIS client.
pub use client::SwisClient;
/// Connection settings.
pub use config::{Credentials, DEFAULT_PORT, DEFAULT_SERVER, SwisConfig};
/// Error type returned by all client operations.
pub use error::ClientError;
/// Request construction shared by both clients.
pub use request::{Operation, Query, RequestOptions, SwisRequest, request_options};
/// Response normalization.
pub use response::{Envelope, Failure, Status, decode_body, normalize};

#[cfg(feature = "python")]
mod python;
