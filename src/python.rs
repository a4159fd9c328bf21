use std::sync::Mutex;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use serde_json::{Map, Value};

use crate::{BlockingSwisClient, ClientError, DEFAULT_PORT, Envelope, Query, SwisConfig};

#[pyclass(name = "Client")]
pub struct PyClient {
    inner: Mutex<BlockingSwisClient>,
}

#[pymethods]
impl PyClient {
    #[new]
    #[pyo3(signature = (server, username, password, port=DEFAULT_PORT, verify_tls=false))]
    fn new(
        server: String,
        username: String,
        password: String,
        port: u16,
        verify_tls: bool,
    ) -> PyResult<Self> {
        let config = SwisConfig::new(server, username, password)
            .with_port(port)
            .with_accept_invalid_certs(!verify_tls);
        let client = BlockingSwisClient::new(config).map_err(to_py_value_error)?;

        Ok(Self {
            inner: Mutex::new(client),
        })
    }

    #[pyo3(signature = (swql, parameters_json=None))]
    fn query(&self, swql: String, parameters_json: Option<String>) -> PyResult<String> {
        let mut query = Query::new(swql);
        if let Some(raw) = parameters_json {
            query.parameters = parse_object_arg(&raw)?;
        }
        self.with_client(|client| client.query(&query))
    }

    fn invoke(&self, verb: String, args_json: String) -> PyResult<String> {
        let args = match parse_json_arg(&args_json)? {
            Value::Array(args) => args,
            _ => return Err(PyValueError::new_err("expected a JSON array of arguments")),
        };
        self.with_client(|client| client.invoke(&verb, &args))
    }

    fn read(&self, uri: String) -> PyResult<String> {
        self.with_client(|client| client.read(&uri))
    }

    fn update(&self, uri: String, patch_json: String) -> PyResult<String> {
        let patch = parse_json_arg(&patch_json)?;
        self.with_client(|client| client.update(&patch, &uri))
    }

    fn create(&self, entity: String, data_json: String) -> PyResult<String> {
        let data = parse_json_arg(&data_json)?;
        self.with_client(|client| client.create(&data, &entity))
    }

    fn remove(&self, uri: String) -> PyResult<String> {
        self.with_client(|client| client.remove(&uri))
    }

    fn remove_bulk(&self, uris: Vec<String>) -> PyResult<String> {
        self.with_client(|client| client.remove_bulk(&uris))
    }
}

impl PyClient {
    fn with_client(&self, call: impl FnOnce(&BlockingSwisClient) -> Envelope) -> PyResult<String> {
        let client = self
            .inner
            .lock()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        let results = call(&*client)
            .into_result()
            .map_err(to_py_runtime_error)?;

        Ok(results.unwrap_or(Value::Null).to_string())
    }
}

#[pymodule]
fn swis_client(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyClient>()?;
    Ok(())
}

fn to_py_value_error(error: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn to_py_runtime_error(error: ClientError) -> PyErr {
    PyRuntimeError::new_err(error.to_string())
}

fn parse_json_arg(raw: &str) -> PyResult<Value> {
    serde_json::from_str(raw).map_err(to_py_value_error)
}

fn parse_object_arg(raw: &str) -> PyResult<Map<String, Value>> {
    match parse_json_arg(raw)? {
        Value::Object(object) => Ok(object),
        _ => Err(PyValueError::new_err("expected a JSON object")),
    }
}
