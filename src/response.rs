use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ClientError;

/// HTTP status of a response, as far as one was received.
///
/// Both fields are `None` when the request failed before any response came
/// back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub code: Option<u16>,
    pub message: Option<String>,
}

impl Status {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
        }
    }

    /// Captures the status line of a reqwest response.
    ///
    /// reqwest does not expose the reason phrase sent on the wire, so
    /// `message` is the canonical phrase for the code (`None` for codes
    /// without one). A custom phrase from the server is not preserved.
    pub fn from_http(status: reqwest::StatusCode) -> Self {
        Self {
            code: Some(status.as_u16()),
            message: status.canonical_reason().map(str::to_owned),
        }
    }

    fn is_ok(&self) -> bool {
        self.code == Some(200)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code} {message}"),
            (Some(code), None) => write!(f, "{code}"),
            (None, _) => f.write_str("<no response>"),
        }
    }
}

/// Why an operation did not succeed.
#[derive(Clone, Debug, PartialEq)]
pub enum Failure<E = ClientError> {
    /// No usable response: the request could not be built or sent.
    Transport(E),
    /// The server answered with a non-200 status; holds the raw body
    /// (`Value::Null` when the body was empty).
    Server(Value),
}

/// Normalized outcome of one SWIS operation.
///
/// At most one of `err` and `results` is set. On success `results` is
/// `Some(Value::Null)` for a query that matched nothing and `None` when the
/// server sent no body at all.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope<E = ClientError> {
    pub err: Option<Failure<E>>,
    pub results: Option<Value>,
    pub status: Status,
}

impl<E> Envelope<E> {
    pub fn is_success(&self) -> bool {
        self.err.is_none()
    }
}

impl Envelope<ClientError> {
    /// Converts the envelope into a `Result` so callers can use `?`.
    ///
    /// Server failures become [`ClientError::Server`] carrying the status and
    /// body.
    pub fn into_result(self) -> Result<Option<Value>, ClientError> {
        match self.err {
            None => Ok(self.results),
            Some(Failure::Transport(error)) => Err(error),
            Some(Failure::Server(body)) => Err(ClientError::Server {
                status: self.status,
                body,
            }),
        }
    }

    /// Deserializes successful results into `T`.
    ///
    /// Returns `Ok(None)` when there are no results (`None` or `null`).
    pub fn results_as<T: DeserializeOwned>(self) -> Result<Option<T>, ClientError> {
        match self.into_result()? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}

/// Maps a raw HTTP outcome to an [`Envelope`].
///
/// A response counts as successful only when there is no transport error and
/// the status code is exactly 200. On success a `results` member of the body
/// is unwrapped (an empty array becomes `null`); bodies without one are
/// returned as they are.
pub fn normalize<E>(error: Option<E>, status: Option<Status>, body: Option<Value>) -> Envelope<E> {
    let status = status.unwrap_or_default();

    if let Some(error) = error {
        return Envelope {
            err: Some(Failure::Transport(error)),
            results: None,
            status,
        };
    }

    if !status.is_ok() {
        return Envelope {
            err: Some(Failure::Server(body.unwrap_or(Value::Null))),
            results: None,
            status,
        };
    }

    Envelope {
        err: None,
        results: body.map(unwrap_results),
        status,
    }
}

// Query responses wrap rows in `results`; verbs and creates return bare values.
// A falsy `results` member (null, false, 0, "") counts as absent.
fn unwrap_results(mut body: Value) -> Value {
    let has_results = body.get("results").is_some_and(is_truthy);
    if !has_results {
        return body;
    }
    match body["results"].take() {
        Value::Array(rows) if rows.is_empty() => Value::Null,
        results => results,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decodes a response body.
///
/// Blank text means no body. Text that is not JSON is kept as a JSON string
/// rather than treated as an error.
pub fn decode_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned())))
}
