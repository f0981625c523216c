use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hook::hook::{HookError, PostProcessHook};

pub const APP_MAIN_KIND: &str = "AppMain";

#[derive(Debug, Deserialize)]
pub struct MainResponse {
    pub hello: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessedMainResponse {
    pub hello_response: String,
}

/// Post-processor for the main application library's greeting payload.
pub struct AppMainHook;

impl PostProcessHook for AppMainHook {
    fn process(&self, kind: &str, payload: &Value) -> Result<Value, HookError> {
        if kind != APP_MAIN_KIND {
            return Err(HookError::UnsupportedKind(kind.to_string()));
        }

        let response: MainResponse =
            serde_json::from_value(payload.clone()).map_err(|e| HookError::Payload {
                kind: kind.to_string(),
                source: e,
            })?;

        let processed = ProcessedMainResponse {
            hello_response: format!("{} back from client", response.hello),
        };
        serde_json::to_value(processed).map_err(|e| HookError::Payload {
            kind: kind.to_string(),
            source: e,
        })
    }
}
