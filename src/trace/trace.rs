use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::state::state_model::Phase;

/// One line of the navigation trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub phase: String,
    pub transition: String,
    pub form: String,

    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, phase: Phase, transition: &str, form: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            phase: format!("{:?}", phase),
            transition: transition.to_string(),
            form: form.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
