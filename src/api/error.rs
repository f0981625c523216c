use thiserror::Error;

/// Outcome of a failed request, as classified by a [`Dispatcher`](super::dispatcher::Dispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Server replied outside the 2xx range; only this variant reaches the error translator
    #[error("server replied {status}: {body}")]
    Http { status: u16, body: String },

    /// Request went out but no response came back
    #[error("no response from {path}: {source}")]
    Network {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request could not be built or sent
    #[error("could not send request to {path}: {message}")]
    Setup { path: String, message: String },

    /// 2xx reply whose body was not a JSON document
    #[error("undecodable reply from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Top-level error for the session driver and the CLI.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no form available: {0}")]
    NoForm(String),

    #[error("server error: {0}")]
    Server(String),
}
