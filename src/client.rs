use serde::Serialize;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::request::{Operation, Query, SwisRequest};
use crate::response::{Envelope, Status, decode_body, normalize};
use crate::{ClientError, SwisConfig};

/// Async SWIS client.
///
/// Every operation sends exactly one request and resolves to an [`Envelope`];
/// failures are reported inside the envelope rather than as an `Err`.
/// For a synchronous variant, use [`crate::BlockingSwisClient`].
#[derive(Clone, Debug)]
pub struct SwisClient {
    config: SwisConfig,
    http: reqwest::Client,
}

impl SwisClient {
    /// Creates a client for the server described by `config`.
    ///
    /// The configuration is not validated; only the HTTP transport itself is
    /// built here.
    pub fn new(config: SwisConfig) -> Result<Self, ClientError> {
        let http = build_http(config.accept_invalid_certs)?;
        Ok(Self { config, http })
    }

    /// Returns the configuration used for new requests.
    pub fn options(&self) -> &SwisConfig {
        &self.config
    }

    /// Replaces the whole configuration.
    ///
    /// Requests already in flight keep the configuration they were built
    /// with.
    pub fn set_options(&mut self, config: SwisConfig) -> Result<(), ClientError> {
        if config.accept_invalid_certs != self.config.accept_invalid_certs {
            self.http = build_http(config.accept_invalid_certs)?;
        }
        self.config = config;
        Ok(())
    }

    /// Runs a SWQL query.
    pub async fn query(&self, query: &Query) -> Envelope {
        self.run(Operation::Query(query)).await
    }

    /// Invokes a verb, e.g. `Orion.Nodes/Unmanage`, with positional arguments.
    pub async fn invoke(&self, verb: &str, args: &[Value]) -> Envelope {
        self.run(Operation::Invoke { verb, args }).await
    }

    /// Updates properties of the object at `uri`.
    pub async fn update(&self, patch: &impl Serialize, uri: &str) -> Envelope {
        match serde_json::to_value(patch) {
            Ok(patch) => self.run(Operation::Update { uri, patch: &patch }).await,
            Err(error) => normalize(Some(error.into()), None, None),
        }
    }

    /// Reads the object at `uri`.
    pub async fn read(&self, uri: &str) -> Envelope {
        self.run(Operation::Read { uri }).await
    }

    /// Creates an instance of `entity` (e.g. `Orion.Nodes`).
    pub async fn create(&self, data: &impl Serialize, entity: &str) -> Envelope {
        match serde_json::to_value(data) {
            Ok(data) => self.run(Operation::Create { entity, data: &data }).await,
            Err(error) => normalize(Some(error.into()), None, None),
        }
    }

    /// Deletes the object at `uri`.
    pub async fn remove(&self, uri: &str) -> Envelope {
        self.run(Operation::Remove { uri }).await
    }

    /// Deletes several objects in one request.
    pub async fn remove_bulk<S: AsRef<str>>(&self, uris: &[S]) -> Envelope {
        let uris: Vec<String> = uris.iter().map(|uri| uri.as_ref().to_owned()).collect();
        self.run(Operation::RemoveBulk { uris: &uris }).await
    }

    /// Sends an already built request and normalizes the outcome.
    pub async fn send(&self, request: SwisRequest) -> Envelope {
        let SwisRequest {
            method,
            url,
            options,
        } = request;

        let Ok(parsed) = Url::parse(&url) else {
            return normalize(Some(ClientError::InvalidUrl(url)), None, None);
        };

        let http = if options.accept_invalid_certs == self.config.accept_invalid_certs {
            self.http.clone()
        } else {
            match build_http(options.accept_invalid_certs) {
                Ok(http) => http,
                Err(error) => return normalize(Some(error), None, None),
            }
        };

        debug!(method = %method, url = %parsed, "Sending SWIS request");

        let sent = http
            .request(method, parsed)
            .header(reqwest::header::ACCEPT, "application/json")
            .basic_auth(&options.auth.username, Some(&options.auth.password))
            .json(&options.json)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "SWIS request failed");
                return normalize(Some(error.into()), None, None);
            }
        };

        let status = Status::from_http(response.status());
        match response.text().await {
            Ok(text) => {
                debug!(status = %status, "SWIS response received");
                normalize(None, Some(status), decode_body(&text))
            }
            Err(error) => {
                warn!(status = %status, error = %error, "Failed to read SWIS response body");
                normalize(Some(error.into()), Some(status), None)
            }
        }
    }

    async fn run(&self, operation: Operation<'_>) -> Envelope {
        let span = debug_span!("swis", operation = operation.name());
        match operation.build(&self.config) {
            Ok(request) => self.send(request).instrument(span).await,
            Err(error) => normalize(Some(error), None, None),
        }
    }
}

fn build_http(accept_invalid_certs: bool) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()?)
}
