//! Request construction shared by the async and blocking clients.
//!
//! Nothing here touches the network: an [`Operation`] plus a [`SwisConfig`]
//! yields a [`SwisRequest`] that either client can send.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::address::endpoints;
use crate::{ClientError, Credentials, SwisConfig};

/// A SWQL query and its named parameters.
///
/// Serializes to the body the `Query` endpoint expects:
/// `{"query": "...", "parameters": {...}}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub query: String,
    /// Values for `@name` placeholders, keyed by name without the `@`.
    ///
    /// Always sent as `parameters`, the member the `Query` endpoint reads,
    /// even though descriptors elsewhere often call it `param`; `param` is
    /// accepted when deserializing. Omitted from the body when empty.
    #[serde(default, alias = "param", skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl Query {
    pub fn new(swql: impl Into<String>) -> Self {
        Self {
            query: swql.into(),
            parameters: Map::new(),
        }
    }

    /// Adds a value for the `@name` placeholder in the query text.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// Per-call options: payload, credentials and TLS policy.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    /// JSON body sent with the request.
    pub json: Value,
    /// Basic credentials taken from the configuration at build time.
    pub auth: Credentials,
    /// Whether certificate verification is skipped.
    pub accept_invalid_certs: bool,
}

/// Assembles the options for one request. The shape is the same for every
/// operation; only `payload` varies.
pub fn request_options(config: &SwisConfig, payload: Value) -> RequestOptions {
    RequestOptions {
        json: payload,
        auth: config.auth.clone(),
        accept_invalid_certs: config.accept_invalid_certs,
    }
}

/// A fully built request, ready to be sent by a client.
#[derive(Clone, Debug, PartialEq)]
pub struct SwisRequest {
    pub method: Method,
    pub url: String,
    pub options: RequestOptions,
}

/// One client operation with its arguments.
#[derive(Clone, Copy, Debug)]
pub enum Operation<'a> {
    /// `POST Query` with the query descriptor.
    Query(&'a Query),
    /// `POST Invoke/<verb>` with positional arguments.
    Invoke { verb: &'a str, args: &'a [Value] },
    /// `POST <uri>` with a partial object.
    Update { uri: &'a str, patch: &'a Value },
    /// `GET <uri>`.
    Read { uri: &'a str },
    /// `POST Create/<entity>` with the new object's properties.
    Create { entity: &'a str, data: &'a Value },
    /// `DELETE <uri>`.
    Remove { uri: &'a str },
    /// `POST BulkDelete` with `{"uris": [...]}`.
    RemoveBulk { uris: &'a [String] },
}

impl Operation<'_> {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::Invoke { .. } => "invoke",
            Self::Update { .. } => "update",
            Self::Read { .. } => "read",
            Self::Create { .. } => "create",
            Self::Remove { .. } => "remove",
            Self::RemoveBulk { .. } => "remove_bulk",
        }
    }

    /// Builds the request for this operation against `config`.
    pub fn build(self, config: &SwisConfig) -> Result<SwisRequest, ClientError> {
        let urls = endpoints(config);
        let (method, url, payload) = match self {
            Self::Query(query) => (Method::POST, urls.query, serde_json::to_value(query)?),
            Self::Invoke { verb, args } => (
                Method::POST,
                format!("{}{verb}", urls.invoke),
                Value::Array(args.to_vec()),
            ),
            Self::Update { uri, patch } => {
                (Method::POST, format!("{}{uri}", urls.base), patch.clone())
            }
            Self::Read { uri } => (Method::GET, format!("{}{uri}", urls.base), json!({})),
            Self::Create { entity, data } => (
                Method::POST,
                format!("{}{entity}", urls.create),
                data.clone(),
            ),
            Self::Remove { uri } => (Method::DELETE, format!("{}{uri}", urls.base), json!({})),
            Self::RemoveBulk { uris } => (Method::POST, urls.bulk_delete, json!({ "uris": uris })),
        };

        Ok(SwisRequest {
            method,
            url,
            options: request_options(config, payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::{Operation, Query, request_options};
    use crate::{Credentials, SwisConfig};

    const ROOT: &str = "https://orion.local:17778/SolarWinds/InformationService/v3/Json/";

    fn config() -> SwisConfig {
        SwisConfig::new("orion.local", "admin", "secret")
    }

    #[test]
    fn options_carry_payload_credentials_and_tls_policy() {
        let options = request_options(&config(), json!({"x": 1}));
        assert_eq!(options.json, json!({"x": 1}));
        assert_eq!(options.auth, Credentials::new("admin", "secret"));
        assert!(options.accept_invalid_certs);

        let strict = config().with_accept_invalid_certs(false);
        assert!(!request_options(&strict, json!(null)).accept_invalid_certs);
    }

    #[test]
    fn query_posts_descriptor_with_parameters() {
        let query = Query::new("SELECT NodeID FROM Orion.Nodes WHERE Vendor = @vendor")
            .with_parameter("vendor", "Cisco");
        let request = Operation::Query(&query).build(&config()).expect("builds");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, format!("{ROOT}Query"));
        assert_eq!(
            request.options.json,
            json!({
                "query": "SELECT NodeID FROM Orion.Nodes WHERE Vendor = @vendor",
                "parameters": {"vendor": "Cisco"}
            })
        );
    }

    #[test]
    fn param_descriptor_is_sent_as_parameters() {
        let query: Query = serde_json::from_value(json!({
            "query": "SELECT Caption FROM Orion.Nodes WHERE NodeID = @id",
            "param": {"id": 3}
        }))
        .expect("valid descriptor");
        let request = Operation::Query(&query).build(&config()).expect("builds");

        assert_eq!(request.options.json["parameters"], json!({"id": 3}));
        assert!(request.options.json.get("param").is_none());
    }

    #[test]
    fn query_without_parameters_omits_the_field() {
        let query = Query::new("SELECT 1 AS x FROM Orion.Nodes");
        let request = Operation::Query(&query).build(&config()).expect("builds");
        assert_eq!(
            request.options.json,
            json!({"query": "SELECT 1 AS x FROM Orion.Nodes"})
        );
    }

    #[test]
    fn invoke_appends_verb_path_and_sends_positional_args() {
        let args = [json!("swis://orion/Orion/Orion.Nodes/NodeID=1"), json!(true)];
        let request = Operation::Invoke {
            verb: "Orion.Nodes/Unmanage",
            args: &args,
        }
        .build(&config())
        .expect("builds");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, format!("{ROOT}Invoke/Orion.Nodes/Unmanage"));
        assert_eq!(request.options.json, json!(args));
    }

    #[test]
    fn entity_uri_operations_use_the_base_prefix() {
        let uri = "swis://orion/Orion/Orion.Nodes/NodeID=5";
        let patch = json!({"Caption": "core-sw-01"});

        let update = Operation::Update { uri, patch: &patch }
            .build(&config())
            .expect("builds");
        assert_eq!(update.method, Method::POST);
        assert_eq!(update.url, format!("{ROOT}{uri}"));
        assert_eq!(update.options.json, patch);

        let read = Operation::Read { uri }.build(&config()).expect("builds");
        assert_eq!(read.method, Method::GET);
        assert_eq!(read.url, format!("{ROOT}{uri}"));
        assert_eq!(read.options.json, json!({}));

        let remove = Operation::Remove { uri }.build(&config()).expect("builds");
        assert_eq!(remove.method, Method::DELETE);
        assert_eq!(remove.url, format!("{ROOT}{uri}"));
        assert_eq!(remove.options.json, json!({}));
    }

    #[test]
    fn create_targets_the_named_entity() {
        let data = json!({"IPAddress": "10.0.0.1", "EngineID": 1});
        let request = Operation::Create {
            entity: "Orion.Nodes",
            data: &data,
        }
        .build(&config())
        .expect("builds");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, format!("{ROOT}Create/Orion.Nodes"));
        assert_eq!(request.options.json, data);
    }

    #[test]
    fn remove_bulk_wraps_uris() {
        let uris = vec!["swis://a".to_owned(), "swis://b".to_owned()];
        let request = Operation::RemoveBulk { uris: &uris }
            .build(&config())
            .expect("builds");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, format!("{ROOT}BulkDelete"));
        assert_eq!(
            request.options.json,
            json!({"uris": ["swis://a", "swis://b"]})
        );
    }

    #[test]
    fn requests_use_the_configuration_current_at_build_time() {
        let mut config = config();
        let before = Operation::Read { uri: "swis://x" }
            .build(&config)
            .expect("builds");
        config.server = "other.local".to_owned();
        config.auth = Credentials::new("ops", "pw2");
        let after = Operation::Read { uri: "swis://x" }
            .build(&config)
            .expect("builds");

        assert!(before.url.starts_with("https://orion.local:"));
        assert_eq!(before.options.auth.username, "admin");
        assert!(after.url.starts_with("https://other.local:"));
        assert_eq!(after.options.auth.username, "ops");
    }
}
