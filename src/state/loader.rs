use serde_json::Value;

use crate::{
    api::{
        dispatcher::Dispatcher,
        envelope::{Payload, ResponseEnvelope, form_request_body},
        error::DispatchError,
        translator::{Translation, classify},
    },
    state::{identity::FetchTicket, navigator::Navigator, state_model::Transition},
};

/// A form fetch ready to send.
#[derive(Debug, Clone)]
pub struct FormFetch {
    pub ticket: FetchTicket,
    pub path: String,
    pub body: Value,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// Navigation moved on while the fetch was in flight
    Stale,
    Reauthenticate,
    Displayed(String),
    /// Network, setup or decode failure; logged only
    Transport,
    /// Success reply without a form definition
    NoForm,
}

impl Navigator {
    /// Hand out the fetch for the active form, if one is due.
    ///
    /// A fetch is due while `needs_reload` is set and no fetch has been issued
    /// for the current form and session yet.
    pub fn begin_fetch(&mut self) -> Option<FormFetch> {
        if !self.fetch_pending() {
            return None;
        }

        let ticket = self.issue_ticket();
        let fetch = FormFetch {
            path: self.session().base_path.clone(),
            body: form_request_body(self.active_form()),
            credential: self.session().credential.clone(),
            ticket: ticket.clone(),
        };
        tracing::info!(form = self.active_form().name(), seq = ticket.seq, "jsonform_call");
        self.apply(Transition::FetchIssued(ticket));
        Some(fetch)
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, DispatchError>,
    ) -> FetchOutcome {
        match result {
            Ok(value) => {
                let envelope = match ResponseEnvelope::from_value(value) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            seq = ticket.seq,
                            "form fetch reply not understood"
                        );
                        return FetchOutcome::Transport;
                    }
                };
                match envelope.payload {
                    Some(Payload::FormDefinition(form)) => {
                        if self.apply(Transition::FormLoaded { ticket, form }) {
                            FetchOutcome::Applied
                        } else {
                            FetchOutcome::Stale
                        }
                    }
                    other => {
                        tracing::warn!(
                            kind = other.as_ref().map(|p| p.kind()).unwrap_or("none"),
                            "form fetch reply carries no form definition"
                        );
                        FetchOutcome::NoForm
                    }
                }
            }

            Err(DispatchError::Http { status, body }) => {
                tracing::info!(status, body = %body, "ApiError");
                let translation = classify(status, &body);
                let outcome = match &translation {
                    Translation::Reauthenticate => FetchOutcome::Reauthenticate,
                    Translation::DisplayMessage(message) => {
                        FetchOutcome::Displayed(message.clone())
                    }
                };
                if self.apply(Transition::FetchFailed { ticket, translation }) {
                    outcome
                } else {
                    FetchOutcome::Stale
                }
            }

            Err(e) => {
                tracing::warn!(error = %e, seq = ticket.seq, "form fetch failed in transport");
                FetchOutcome::Transport
            }
        }
    }

    /// Fetch the active form synchronously. `None` when no fetch was due.
    pub fn load_form<D: Dispatcher>(&mut self, dispatcher: &D) -> Option<FetchOutcome> {
        let fetch = self.begin_fetch()?;
        let result = dispatcher.send(&fetch.path, &fetch.body, fetch.credential.as_deref());
        Some(self.complete_fetch(fetch.ticket, result))
    }
}
