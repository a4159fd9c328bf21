use serde::{Deserialize, Serialize};

/// Host used by [`SwisConfig::default`].
pub const DEFAULT_SERVER: &str = "localhost";

/// HTTPS port the Information Service listens on in a stock Orion install.
pub const DEFAULT_PORT: u16 = 17778;

/// Connection settings for one SWIS server.
///
/// No field is validated; a bad host or port only shows up as a failed
/// envelope once a request is sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwisConfig {
    /// Host name or address of the Orion server.
    #[serde(default = "default_server")]
    pub server: String,

    /// Information Service port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Basic credentials sent with every request.
    pub auth: Credentials,

    /// Skip TLS certificate verification.
    ///
    /// Orion servers usually present a self-signed certificate, so this is
    /// `true` unless turned off explicitly.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

/// Username/password pair used for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl SwisConfig {
    /// Creates a configuration for `server` on [`DEFAULT_PORT`].
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            auth: Credentials::new(username, password),
            ..Self::default()
        }
    }

    /// Returns the configuration with a different port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the configuration with TLS certificate verification turned
    /// on (`false`) or off (`true`).
    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl Default for SwisConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_port(),
            auth: Credentials::default(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

fn default_server() -> String {
    DEFAULT_SERVER.to_owned()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_accept_invalid_certs() -> bool {
    true
}
