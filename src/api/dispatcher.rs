use std::time::Duration;

use serde_json::Value;

use crate::api::error::DispatchError;

/// Issues one request to one endpoint. Single attempt, no retry.
pub trait Dispatcher {
    fn send(
        &self,
        path: &str,
        body: &Value,
        credential: Option<&str>,
    ) -> Result<Value, DispatchError>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for &D {
    fn send(
        &self,
        path: &str,
        body: &Value,
        credential: Option<&str>,
    ) -> Result<Value, DispatchError> {
        (**self).send(path, body, credential)
    }
}

// ============================================================================
// HTTP Dispatcher
// ============================================================================

/// `POST` + JSON dispatcher over a blocking reqwest client.
///
/// The credential is always attached as a bearer token; a missing credential
/// is sent as an empty token and the server decides whether that is acceptable.
pub struct HttpDispatcher {
    client: reqwest::blocking::Client,
}

impl HttpDispatcher {
    /// `timeout` of `None` leaves the request lifecycle to the transport.
    pub fn new(timeout: Option<Duration>) -> Result<Self, DispatchError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| DispatchError::Setup {
            path: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }
}

impl Dispatcher for HttpDispatcher {
    fn send(
        &self,
        path: &str,
        body: &Value,
        credential: Option<&str>,
    ) -> Result<Value, DispatchError> {
        let response = self
            .client
            .post(path)
            .bearer_auth(credential.unwrap_or(""))
            .json(body)
            .send()
            .map_err(|e| classify_send_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            // An unread body cannot be translated, so it is a transport failure.
            let body = response.text().map_err(|e| DispatchError::Network {
                path: path.to_string(),
                source: Box::new(e),
            })?;
            return Err(DispatchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().map_err(|e| DispatchError::Decode {
            path: path.to_string(),
            source: Box::new(e),
        })
    }
}

fn classify_send_error(path: &str, err: reqwest::Error) -> DispatchError {
    if err.is_builder() {
        DispatchError::Setup {
            path: path.to_string(),
            message: err.to_string(),
        }
    } else {
        DispatchError::Network {
            path: path.to_string(),
            source: Box::new(err),
        }
    }
}
