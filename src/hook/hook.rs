use std::{
    fmt,
    sync::{Arc, OnceLock},
    thread::{self, JoinHandle},
};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("post-processor failed to initialize: {0}")]
    Init(String),

    #[error("post-processor does not handle payload kind {0}")]
    UnsupportedKind(String),

    #[error("post-processor rejected {kind} payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// External processor for application payloads the navigator does not interpret.
pub trait PostProcessHook: Send + Sync {
    /// One-time setup, run lazily before the first payload.
    fn init(&self) -> Result<(), HookError> {
        Ok(())
    }

    fn process(&self, kind: &str, payload: &Value) -> Result<Value, HookError>;
}

/// Runs a [`PostProcessHook`] off the navigation path.
///
/// Every dispatched payload gets its own invocation. Failures and panics are
/// logged and never reach the caller.
pub struct HookRunner {
    hook: Option<Arc<dyn PostProcessHook>>,
    ready: Arc<OnceLock<Result<(), String>>>,
}

impl HookRunner {
    pub fn new(hook: Arc<dyn PostProcessHook>) -> Self {
        Self {
            hook: Some(hook),
            ready: Arc::new(OnceLock::new()),
        }
    }

    /// Runner without a hook; payloads are logged and dropped.
    pub fn none() -> Self {
        Self {
            hook: None,
            ready: Arc::new(OnceLock::new()),
        }
    }

    /// Start processing `payload` on a worker thread. `None` when there is no
    /// hook or the worker could not start.
    pub fn dispatch(&self, kind: &str, payload: Value) -> Option<HookHandle> {
        let Some(hook) = self.hook.clone() else {
            tracing::debug!(kind, "no post-processor configured, payload dropped");
            return None;
        };

        let ready = Arc::clone(&self.ready);
        let worker_kind = kind.to_string();
        let spawned = thread::Builder::new()
            .name("post-process".into())
            .spawn(move || {
                let init = ready.get_or_init(|| hook.init().map_err(|e| e.to_string()));
                if let Err(e) = init {
                    tracing::error!(kind = %worker_kind, error = %e, "post-processor unavailable");
                    return None;
                }
                match hook.process(&worker_kind, &payload) {
                    Ok(result) => {
                        tracing::info!(
                            kind = %worker_kind,
                            result = %result,
                            "post-processed payload"
                        );
                        Some(result)
                    }
                    Err(e) => {
                        tracing::error!(kind = %worker_kind, error = %e, "post-processing failed");
                        None
                    }
                }
            });

        match spawned {
            Ok(join) => Some(HookHandle {
                kind: kind.to_string(),
                join,
            }),
            Err(e) => {
                tracing::error!(kind, error = %e, "could not start post-processor");
                None
            }
        }
    }
}

impl Default for HookRunner {
    fn default() -> Self {
        Self::none()
    }
}

/// Completion of one hook invocation; awaiting it is only useful for logging.
pub struct HookHandle {
    kind: String,
    join: JoinHandle<Option<Value>>,
}

impl HookHandle {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn wait(self) -> Option<Value> {
        match self.join.join() {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(kind = %self.kind, "post-processor panicked");
                None
            }
        }
    }
}

impl fmt::Debug for HookHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookHandle")
            .field("kind", &self.kind)
            .field("finished", &self.join.is_finished())
            .finish()
    }
}
