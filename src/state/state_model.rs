use serde_json::Value;

use crate::{
    api::translator::Translation,
    form::form_model::{FormDefinition, FormIdentity},
    state::identity::FetchTicket,
};

/// Where requests go and which credential they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub base_url: String,
    pub base_path: String,
    pub credential: Option<String>,
}

impl SessionState {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_path: base_url.clone(),
            base_url,
            credential: None,
        }
    }

    /// Endpoint of an API library mounted under the base URL.
    pub fn library_path(&self, library: &str) -> String {
        format!("{}/{}", self.base_url, library)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub active_form: FormIdentity,
    pub needs_reload: bool,
    pub in_flight_data: Option<Value>,
    pub active_error: Option<String>,
}

impl NavigationState {
    pub fn new(active_form: FormIdentity) -> Self {
        Self {
            active_form,
            needs_reload: true,
            in_flight_data: None,
            active_error: None,
        }
    }
}

/// Observable phase of the navigator. An active error is reported
/// separately and can accompany any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingForm,
    FormReady,
    Submitting,
}

/// Every mutation of navigation or session state.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Go to a form, e.g. from a navigate button
    Navigate(FormIdentity),
    /// Server moved the session to another library and form
    SessionUpdated {
        library_path: String,
        next_form: FormIdentity,
    },
    CredentialIssued(String),
    /// Credential rejected: drop it and return to the login form
    Reauthenticate,
    ReloadRequested,

    FetchIssued(FetchTicket),
    FormLoaded {
        ticket: FetchTicket,
        form: FormDefinition,
    },
    FetchFailed {
        ticket: FetchTicket,
        translation: Translation,
    },

    DataChanged(Option<Value>),
    SubmitStarted,
    SubmitSettled { ok: bool },
    ErrorRaised(String),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Navigate(_) => "navigate",
            Transition::SessionUpdated { .. } => "session_updated",
            Transition::CredentialIssued(_) => "credential_issued",
            Transition::Reauthenticate => "reauthenticate",
            Transition::ReloadRequested => "reload_requested",
            Transition::FetchIssued(_) => "fetch_issued",
            Transition::FormLoaded { .. } => "form_loaded",
            Transition::FetchFailed { .. } => "fetch_failed",
            Transition::DataChanged(_) => "data_changed",
            Transition::SubmitStarted => "submit_started",
            Transition::SubmitSettled { .. } => "submit_settled",
            Transition::ErrorRaised(_) => "error_raised",
        }
    }
}
