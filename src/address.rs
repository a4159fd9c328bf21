use crate::SwisConfig;

/// Path of the JSON API below the server root, including the trailing slash.
pub const API_ROOT: &str = "/SolarWinds/InformationService/v3/Json/";

/// Absolute endpoint URLs derived from a [`SwisConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Prefix for entity URIs (`read`, `update`, `remove`).
    pub base: String,
    /// SWQL query endpoint.
    pub query: String,
    /// Prefix for `Create/<entity>`.
    pub create: String,
    /// Prefix for `Invoke/<entity>/<verb>`.
    pub invoke: String,
    /// Bulk delete endpoint.
    pub bulk_delete: String,
}

/// Builds the endpoint URLs for `config`.
///
/// Nothing is cached or validated; the values are plain string concatenation
/// of `https://<server>:<port>` and [`API_ROOT`].
pub fn endpoints(config: &SwisConfig) -> Endpoints {
    let base = format!("https://{}:{}{API_ROOT}", config.server, config.port);
    Endpoints {
        query: format!("{base}Query"),
        create: format!("{base}Create/"),
        invoke: format!("{base}Invoke/"),
        bulk_delete: format!("{base}BulkDelete"),
        base,
    }
}
